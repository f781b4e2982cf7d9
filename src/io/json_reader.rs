use super::{SampleReader, WarningHandler};
use crate::traces::{RawTrace, Sample, TraceEncoder, Vocabulary};
use anyhow::{Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use std::{collections::HashSet, io::Read};

lazy_static! {
    static ref IDENTIFIER_PATTERN: Regex = Regex::new(r"^[_[:alpha:]][_[:alpha:]\d]*$").unwrap();
}

#[derive(Deserialize)]
struct RawSample {
    vocab: Vec<String>,
    traces_pos: Vec<RawTrace<String>>,
    traces_neg: Vec<RawTrace<String>>,
}

/// A reader for samples written in JSON.
///
/// The JSON object must have three keys:
///   * `vocab`: the list of the symbols,
///   * `traces_pos`: the positive traces,
///   * `traces_neg`: the negative traces.
///
/// A trace is a list of steps, and a step is the list of the symbols that hold at this step.
///
/// ```text
/// {"vocab": ["p", "q"],
///  "traces_pos": [[["p"], ["p", "q"]], []],
///  "traces_neg": [[["q"]]]}
/// ```
///
/// Warnings are raised for symbols that are not identifiers, as they may make the symbolic formula ambiguous,
/// and for symbols listed twice in a step.
#[derive(Default)]
pub struct JsonSampleReader {
    warning_handlers: Vec<WarningHandler>,
}

impl JsonSampleReader {
    fn warn(&self, location: &str, message: &str) {
        self.warning_handlers
            .iter()
            .for_each(|h| (h)(location, message));
    }

    fn check_vocabulary(&self, vocabulary: &Vocabulary) {
        vocabulary
            .iter()
            .filter(|s| !IDENTIFIER_PATTERN.is_match(s))
            .for_each(|s| {
                self.warn(
                    "vocabulary",
                    &format!(
                        r#"symbol "{}" is not an identifier; the symbolic formula may be ambiguous"#,
                        s
                    ),
                )
            });
    }

    fn check_repeated_symbols(&self, traces: &[RawTrace<String>], kind: &str) {
        for (i, t) in traces.iter().enumerate() {
            for (j, step) in t.iter().enumerate() {
                let mut seen = HashSet::with_capacity(step.len());
                for s in step.iter().filter(|s| !seen.insert(s.as_str())) {
                    self.warn(
                        &format!("step {} of {} trace {}", j, kind, i),
                        &format!(r#"symbol "{}" is listed more than once"#, s),
                    );
                }
            }
        }
    }
}

impl SampleReader for JsonSampleReader {
    fn read(&self, reader: &mut dyn Read) -> Result<Sample> {
        let raw: RawSample =
            serde_json::from_reader(reader).context("while parsing the JSON sample")?;
        let vocabulary =
            Vocabulary::new_with_symbols(&raw.vocab).context("while reading the vocabulary")?;
        self.check_vocabulary(&vocabulary);
        self.check_repeated_symbols(&raw.traces_pos, "positive");
        self.check_repeated_symbols(&raw.traces_neg, "negative");
        TraceEncoder::new(&vocabulary).encode_sample(&raw.traces_pos, &raw.traces_neg)
    }

    fn add_warning_handler(&mut self, h: WarningHandler) {
        self.warning_handlers.push(h);
    }
}
