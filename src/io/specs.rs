use crate::{afa::Afa, traces::Sample};
use anyhow::{Context, Result};
use std::io::{Read, Write};

/// The type of callback functions to call when warnings are raised while reading a sample.
///
/// The first parameter locates the issue in the input, the second one describes it.
pub type WarningHandler = Box<dyn Fn(&str, &str)>;

/// A trait implemented by objects able to read samples.
pub trait SampleReader {
    /// Reads a [`Sample`].
    ///
    /// In case warnings are raised, the callback functions registered by [add_warning_handler](Self::add_warning_handler) are triggered.
    ///
    /// # Example
    ///
    /// ```
    /// # use limeltl::io::{JsonSampleReader, SampleReader};
    /// # use limeltl::traces::Sample;
    /// fn read_sample_from_str(s: &str) -> Sample {
    ///     let reader = JsonSampleReader::default();
    ///     reader.read(&mut s.as_bytes()).expect("invalid sample")
    /// }
    /// # read_sample_from_str(r#"{"vocab": [], "traces_pos": [], "traces_neg": []}"#);
    /// ```
    fn read(&self, reader: &mut dyn Read) -> Result<Sample>;

    /// Adds a callback function to call when warnings are raised while reading a sample.
    fn add_warning_handler(&mut self, h: WarningHandler);
}

/// A trait implemented by objects that write the result of a search.
pub trait ResultWriter {
    /// Writes the text associated with the fact no automaton was found.
    fn write_no_model(&self, writer: &mut dyn Write) -> Result<()>;

    /// Writes an automaton.
    fn write_afa(&self, writer: &mut dyn Write, afa: &Afa) -> Result<()>;
}

pub(crate) fn write_no_model(writer: &mut dyn Write) -> Result<()> {
    let context = "while writing there is no model";
    writeln!(writer, "NO").context(context)?;
    writer.flush().context(context)
}

pub(crate) fn write_line(writer: &mut dyn Write, line: &str) -> Result<()> {
    let context = "while writing an automaton";
    writeln!(writer, "{}", line).context(context)?;
    writer.flush().context(context)
}
