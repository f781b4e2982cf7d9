use super::{Letter, Sample, Trace, Vocabulary};
use anyhow::{Context, Result};

/// A raw trace: each step is the list of the symbols that hold at this step.
pub type RawTrace<S> = Vec<Vec<S>>;

/// Translates raw traces, given as lists of symbol names, into [Trace] objects.
///
/// A step listing no symbol is the letter where all symbols are false.
/// Listing a symbol twice in a step has no effect.
pub struct TraceEncoder<'a> {
    vocabulary: &'a Vocabulary,
}

impl<'a> TraceEncoder<'a> {
    /// Builds an encoder for the given vocabulary.
    pub fn new(vocabulary: &'a Vocabulary) -> Self {
        Self { vocabulary }
    }

    /// Encodes a single step into a letter.
    pub fn encode_step<S>(&self, step: &[S]) -> Result<Letter>
    where
        S: AsRef<str>,
    {
        let mut letter = Letter::new_all_false(self.vocabulary.len());
        for s in step {
            letter.set(self.vocabulary.index_of(s.as_ref())?, true);
        }
        Ok(letter)
    }

    /// Encodes a list of traces.
    ///
    /// The `kind` parameter is used in error messages to identify the list (`"positive"`, `"negative"`).
    pub fn encode_traces<S>(&self, raw_traces: &[RawTrace<S>], kind: &str) -> Result<Vec<Trace>>
    where
        S: AsRef<str>,
    {
        raw_traces
            .iter()
            .enumerate()
            .map(|(i, raw)| {
                raw.iter()
                    .enumerate()
                    .map(|(j, step)| {
                        self.encode_step(step).with_context(|| {
                            format!("while encoding step {} of {} trace {}", j, kind, i)
                        })
                    })
                    .collect::<Result<Trace>>()
            })
            .collect()
    }

    /// Encodes the positive and the negative traces into a [Sample].
    ///
    /// # Example
    ///
    /// ```
    /// # use limeltl::traces::{TraceEncoder, Vocabulary};
    /// let vocabulary = Vocabulary::new_with_symbols(&["p", "q"]).unwrap();
    /// let sample = TraceEncoder::new(&vocabulary)
    ///     .encode_sample(&[vec![vec!["p"], vec![]]], &[vec![vec!["q", "p"]]])
    ///     .unwrap();
    /// assert_eq!(1, sample.positive_traces().len());
    /// assert!(TraceEncoder::new(&vocabulary)
    ///     .encode_sample(&[vec![vec!["r"]]], &[])
    ///     .is_err());
    /// ```
    pub fn encode_sample<S>(&self, positive: &[RawTrace<S>], negative: &[RawTrace<S>]) -> Result<Sample>
    where
        S: AsRef<str>,
    {
        let positive = self.encode_traces(positive, "positive")?;
        let negative = self.encode_traces(negative, "negative")?;
        Sample::new(self.vocabulary.clone(), positive, negative)
    }
}
