use crate::{
    afa::{Afa, StateMode, Successors},
    encodings::{AfaVarMap, SuffixTrie},
    sat::Assignment,
    traces::Sample,
};
use anyhow::{anyhow, Context, Result};

/// Translates back a SAT model into an automaton.
///
/// Unassigned variables are read as `false`.
/// Transitions are built for the letters occurring in the sample only; the automaton gives `false` on any other letter.
///
/// The decoded automaton is checked against the sample before being returned:
/// a misclassified trace means the encoding or the solver is faulty, and is reported as an error.
pub struct ModelDecoder<'a> {
    sample: &'a Sample,
    trie: &'a SuffixTrie,
}

impl<'a> ModelDecoder<'a> {
    /// Builds a decoder for a sample and its suffix trie.
    pub fn new(sample: &'a Sample, trie: &'a SuffixTrie) -> Self {
        Self { sample, trie }
    }

    /// Decodes the automaton encoded by an assignment.
    pub fn decode(&self, var_map: &AfaVarMap, assignment: &Assignment) -> Result<Afa> {
        let n_states = var_map.n_states();
        let accepting = (0..n_states)
            .map(|q| assignment.is_true(var_map.accepting(q)))
            .collect();
        let modes = (0..n_states)
            .map(|q| {
                if assignment.is_true(var_map.universal(q)) {
                    StateMode::Universal
                } else {
                    StateMode::Existential
                }
            })
            .collect();
        let transitions = self
            .trie
            .letter_classes()
            .iter()
            .enumerate()
            .map(|(c, letter)| {
                let successors = (0..n_states)
                    .map(|q| {
                        (0..n_states)
                            .filter(|j| assignment.is_true(var_map.edge(q, c, *j)))
                            .collect::<Successors>()
                    })
                    .collect();
                (letter.clone(), successors)
            })
            .collect();
        let afa = Afa::new(
            self.sample.vocabulary().clone(),
            accepting,
            modes,
            transitions,
        )
        .context("while building the decoded automaton")?;
        self.check_sample(&afa)
            .context("the decoded automaton does not classify the sample")?;
        Ok(afa)
    }

    fn check_sample(&self, afa: &Afa) -> Result<()> {
        if let Some(i) = self
            .sample
            .positive_traces()
            .iter()
            .position(|t| !afa.accepts(t))
        {
            return Err(anyhow!("positive trace {} is rejected", i));
        }
        if let Some(i) = self
            .sample
            .negative_traces()
            .iter()
            .position(|t| afa.accepts(t))
        {
            return Err(anyhow!("negative trace {} is accepted", i));
        }
        Ok(())
    }
}
