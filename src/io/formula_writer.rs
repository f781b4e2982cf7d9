use super::{
    tuple_writer::{afa_tuple, quote, tuple},
    ResultWriter,
};
use crate::afa::{Afa, LtlFormula, SymbolicFormula};
use anyhow::Result;
use log::warn;
use std::io::Write;

/// A writer for the symbolic formula of automata.
///
/// The formula is written on a single line, see [SymbolicFormula].
/// The absence of automaton is written `NO`.
#[derive(Default)]
pub struct FormulaWriter;

impl ResultWriter for FormulaWriter {
    fn write_no_model(&self, writer: &mut dyn Write) -> Result<()> {
        super::specs::write_no_model(writer)
    }

    fn write_afa(&self, writer: &mut dyn Write, afa: &Afa) -> Result<()> {
        super::specs::write_line(writer, &SymbolicFormula::new(afa).to_string())
    }
}

/// A writer producing both the symbolic formula and the structural tuple of automata.
///
/// The output is the pair `('<formula>', <tuple>)` on a single line,
/// where the tuple follows the format of [TupleWriter](super::TupleWriter).
/// The absence of automaton is written `NO`.
#[derive(Default)]
pub struct FormulaAndTupleWriter;

impl ResultWriter for FormulaAndTupleWriter {
    fn write_no_model(&self, writer: &mut dyn Write) -> Result<()> {
        super::specs::write_no_model(writer)
    }

    fn write_afa(&self, writer: &mut dyn Write, afa: &Afa) -> Result<()> {
        let formula = quote(&SymbolicFormula::new(afa).to_string());
        super::specs::write_line(writer, &tuple(vec![formula, afa_tuple(afa)]))
    }
}

/// A writer for the closed LTLf formula of automata.
///
/// The formula is written on a single line, see [LtlFormula].
/// Automata having no closed formula are written as their symbolic formula, see [SymbolicFormula].
/// The absence of automaton is written `NO`.
#[derive(Default)]
pub struct LtlWriter;

impl ResultWriter for LtlWriter {
    fn write_no_model(&self, writer: &mut dyn Write) -> Result<()> {
        super::specs::write_no_model(writer)
    }

    fn write_afa(&self, writer: &mut dyn Write, afa: &Afa) -> Result<()> {
        let formula = match LtlFormula::from_afa(afa) {
            Some(f) => f.to_string(),
            None => {
                warn!("the automaton has a cycle between states; writing its equation system instead");
                SymbolicFormula::new(afa).to_string()
            }
        };
        super::specs::write_line(writer, &formula)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        afa::StateMode,
        traces::{Letter, Vocabulary},
    };
    use std::io::BufWriter;

    fn afa() -> Afa {
        Afa::new(
            Vocabulary::new_with_symbols(&["p"]).unwrap(),
            vec![true],
            vec![StateMode::Existential],
            vec![(Letter::new_with_values(&[true]), vec![vec![0]])],
        )
        .unwrap()
    }

    fn write_with(writer: &dyn ResultWriter, afa: Option<&Afa>) -> String {
        let mut buffer = BufWriter::new(Vec::new());
        match afa {
            Some(a) => writer.write_afa(&mut buffer, a).unwrap(),
            None => writer.write_no_model(&mut buffer).unwrap(),
        }
        String::from_utf8(buffer.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_formula() {
        assert_eq!(
            "let q0 = p & N q0 in q0\n",
            write_with(&FormulaWriter, Some(&afa()))
        );
    }

    #[test]
    fn test_formula_and_tuple() {
        assert_eq!(
            "('let q0 = p & N q0 in q0', (1, 0, (True,), ('|',), ((('p',), ((0,),)),)))\n",
            write_with(&FormulaAndTupleWriter, Some(&afa()))
        );
    }

    #[test]
    fn test_ltl() {
        assert_eq!("(G (p))\n", write_with(&LtlWriter, Some(&afa())));
    }

    #[test]
    fn test_ltl_falls_back_on_cycles() {
        let parity = Afa::new(
            Vocabulary::new_with_symbols(&["p"]).unwrap(),
            vec![true, false],
            vec![StateMode::Existential; 2],
            vec![(Letter::new_with_values(&[true]), vec![vec![1], vec![0]])],
        )
        .unwrap();
        assert_eq!(
            "let q0 = p & X q1; q1 = p & N q0 in q0\n",
            write_with(&LtlWriter, Some(&parity))
        );
    }

    #[test]
    fn test_no_model() {
        assert_eq!("NO\n", write_with(&FormulaWriter, None));
        assert_eq!("NO\n", write_with(&LtlWriter, None));
        assert_eq!("NO\n", write_with(&FormulaAndTupleWriter, None));
    }
}
