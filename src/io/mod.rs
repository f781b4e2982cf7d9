//! Objects used to read samples and write learned automata.

mod formula_writer;
pub use formula_writer::FormulaAndTupleWriter;
pub use formula_writer::FormulaWriter;
pub use formula_writer::LtlWriter;

mod json_reader;
pub use json_reader::JsonSampleReader;

mod output_format;
pub use output_format::OutputFormat;

mod specs;
pub use specs::ResultWriter;
pub use specs::SampleReader;
pub use specs::WarningHandler;

mod tuple_writer;
pub use tuple_writer::TupleWriter;
