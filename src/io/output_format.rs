use super::{FormulaAndTupleWriter, FormulaWriter, LtlWriter, ResultWriter, TupleWriter};
use strum_macros::{EnumIter, EnumString, IntoStaticStr};

/// The available output formats for learned automata.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum OutputFormat {
    /// The structural tuple, see [TupleWriter].
    Tuple,
    /// The symbolic formula, see [FormulaWriter].
    Formula,
    /// The pair of the formula and the tuple, see [FormulaAndTupleWriter].
    Both,
    /// The closed LTLf formula when it exists, see [LtlWriter].
    Ltl,
}

impl OutputFormat {
    /// Returns the name of this format, as used on the command line.
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Returns a writer for this format.
    pub fn new_writer(&self) -> Box<dyn ResultWriter> {
        match self {
            OutputFormat::Tuple => Box::new(TupleWriter),
            OutputFormat::Formula => Box::new(FormulaWriter),
            OutputFormat::Both => Box::new(FormulaAndTupleWriter),
            OutputFormat::Ltl => Box::new(LtlWriter),
        }
    }
}
