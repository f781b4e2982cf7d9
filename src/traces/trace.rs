use super::{Letter, Vocabulary};
use anyhow::{anyhow, Result};
use std::collections::HashMap;

/// A finite, possibly empty, sequence of letters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Trace(Vec<Letter>);

impl Trace {
    /// Builds a trace from its letters.
    pub fn new(letters: Vec<Letter>) -> Self {
        Self(letters)
    }

    /// Returns the letters of the trace.
    pub fn letters(&self) -> &[Letter] {
        &self.0
    }

    /// Returns the number of letters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` iff the trace is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Letter> for Trace {
    fn from_iter<I: IntoIterator<Item = Letter>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A labeled set of traces over a common vocabulary.
///
/// Traces are split into positive ones (which must be accepted) and negative ones (which must be rejected).
#[derive(Clone, Debug)]
pub struct Sample {
    vocabulary: Vocabulary,
    positive: Vec<Trace>,
    negative: Vec<Trace>,
}

impl Sample {
    /// Builds a new sample.
    ///
    /// An error is returned if a letter does not have the width of the vocabulary.
    pub fn new(vocabulary: Vocabulary, positive: Vec<Trace>, negative: Vec<Trace>) -> Result<Self> {
        let check = |traces: &[Trace], kind: &str| {
            for (i, t) in traces.iter().enumerate() {
                if let Some((j, l)) = t
                    .letters()
                    .iter()
                    .enumerate()
                    .find(|(_, l)| l.width() != vocabulary.len())
                {
                    return Err(anyhow!(
                        "letter at step {} of {} trace {} has width {} while the vocabulary has {} symbols",
                        j,
                        kind,
                        i,
                        l.width(),
                        vocabulary.len()
                    ));
                }
            }
            Ok(())
        };
        check(&positive, "positive")?;
        check(&negative, "negative")?;
        Ok(Self {
            vocabulary,
            positive,
            negative,
        })
    }

    /// Returns the vocabulary of the sample.
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Returns the traces that must be accepted.
    pub fn positive_traces(&self) -> &[Trace] {
        &self.positive
    }

    /// Returns the traces that must be rejected.
    pub fn negative_traces(&self) -> &[Trace] {
        &self.negative
    }

    /// Returns the total number of traces.
    pub fn n_traces(&self) -> usize {
        self.positive.len() + self.negative.len()
    }

    /// Looks for a trace which is both positive and negative.
    ///
    /// If such a trace exists, the indices of the first positive trace involved and of its negative twin are returned.
    ///
    /// # Example
    ///
    /// ```
    /// # use limeltl::traces::{Letter, Sample, Trace, Vocabulary};
    /// let vocabulary = Vocabulary::new_with_symbols(&["p"]).unwrap();
    /// let p = Trace::new(vec![Letter::new_with_values(&[true])]);
    /// let sample = Sample::new(vocabulary, vec![Trace::default(), p.clone()], vec![p]).unwrap();
    /// assert_eq!(Some((1, 0)), sample.find_contradiction());
    /// ```
    pub fn find_contradiction(&self) -> Option<(usize, usize)> {
        let negative_indices = self
            .negative
            .iter()
            .enumerate()
            .rev()
            .map(|(i, t)| (t, i))
            .collect::<HashMap<&Trace, usize>>();
        self.positive
            .iter()
            .enumerate()
            .find_map(|(i, t)| negative_indices.get(t).map(|j| (i, *j)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trace(values: &[&[bool]]) -> Trace {
        values.iter().map(|v| Letter::new_with_values(v)).collect()
    }

    #[test]
    fn test_sample_ok() {
        let vocabulary = Vocabulary::new_with_symbols(&["p", "q"]).unwrap();
        let sample = Sample::new(
            vocabulary,
            vec![trace(&[&[true, false]]), Trace::default()],
            vec![trace(&[&[false, false], &[true, true]])],
        )
        .unwrap();
        assert_eq!(2, sample.positive_traces().len());
        assert_eq!(1, sample.negative_traces().len());
        assert_eq!(3, sample.n_traces());
        assert_eq!(2, sample.negative_traces()[0].len());
        assert_eq!(None, sample.find_contradiction());
    }

    #[test]
    fn test_sample_wrong_width() {
        let vocabulary = Vocabulary::new_with_symbols(&["p", "q"]).unwrap();
        let err = Sample::new(vocabulary, vec![], vec![trace(&[&[true, false], &[true]])])
            .unwrap_err();
        assert!(err.to_string().contains("step 1 of negative trace 0"));
    }

    #[test]
    fn test_empty_trace_contradiction() {
        let vocabulary = Vocabulary::new_with_symbols(&["p"]).unwrap();
        let sample = Sample::new(
            vocabulary,
            vec![trace(&[&[true]]), Trace::default()],
            vec![trace(&[&[false]]), Trace::default(), Trace::default()],
        )
        .unwrap();
        assert_eq!(Some((1, 1)), sample.find_contradiction());
    }
}
