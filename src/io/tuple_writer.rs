use super::ResultWriter;
use crate::afa::{Afa, StateMode};
use anyhow::Result;
use std::io::Write;

/// A writer for the structural output format.
///
/// An automaton is written on a single line as a literal tuple:
///
/// ```text
/// (n_states, initial_state, (accepting...), (modes...), ((letter, (successors_q0, successors_q1, ...)), ...))
/// ```
///
/// where acceptance flags are `True` or `False`, modes are `'|'` (existential) or `'&'` (universal),
/// a letter is the tuple of its true symbols and a successor set is the tuple of its state indices.
/// One-element tuples have a trailing comma, and strings are single-quoted with backslashes and quotes escaped.
/// This format can be read by literal parsers such as Python's `ast.literal_eval`.
///
/// The absence of automaton is written `NO`.
#[derive(Default)]
pub struct TupleWriter;

impl ResultWriter for TupleWriter {
    fn write_no_model(&self, writer: &mut dyn Write) -> Result<()> {
        super::specs::write_no_model(writer)
    }

    fn write_afa(&self, writer: &mut dyn Write, afa: &Afa) -> Result<()> {
        super::specs::write_line(writer, &afa_tuple(afa))
    }
}

pub(crate) fn afa_tuple(afa: &Afa) -> String {
    let vocabulary = afa.vocabulary();
    let accepting = (0..afa.n_states())
        .map(|q| {
            if afa.is_accepting(q) {
                "True".to_string()
            } else {
                "False".to_string()
            }
        })
        .collect();
    let modes = (0..afa.n_states())
        .map(|q| match afa.mode(q) {
            StateMode::Existential => quote("|"),
            StateMode::Universal => quote("&"),
        })
        .collect();
    let transitions = afa
        .observed_letters()
        .map(|l| {
            let letter = tuple(l.true_indices().map(|i| quote(vocabulary.symbol(i))).collect());
            let successors = tuple(
                (0..afa.n_states())
                    .map(|q| {
                        tuple(
                            afa.successors(q, l)
                                .iter()
                                .map(|j| j.to_string())
                                .collect(),
                        )
                    })
                    .collect(),
            );
            tuple(vec![letter, successors])
        })
        .collect();
    tuple(vec![
        afa.n_states().to_string(),
        afa.initial_state().to_string(),
        tuple(accepting),
        tuple(modes),
        tuple(transitions),
    ])
}

pub(crate) fn tuple(items: Vec<String>) -> String {
    match items.len() {
        1 => format!("({},)", items[0]),
        _ => format!("({})", items.join(", ")),
    }
}

/// Writes a single-quoted string literal, escaping characters as Python's `repr` does.
///
/// Control characters and line separators are escaped so that the literal stays on one line.
pub(crate) fn quote(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('\'');
    for c in s.chars() {
        match c {
            '\\' => quoted.push_str(r"\\"),
            '\'' => quoted.push_str(r"\'"),
            '\n' => quoted.push_str(r"\n"),
            '\r' => quoted.push_str(r"\r"),
            '\t' => quoted.push_str(r"\t"),
            c if c.is_control() || c == '\u{2028}' || c == '\u{2029}' => {
                let code = c as u32;
                if code < 0x100 {
                    quoted.push_str(&format!("\\x{:02x}", code));
                } else {
                    quoted.push_str(&format!("\\u{:04x}", code));
                }
            }
            c => quoted.push(c),
        }
    }
    quoted.push('\'');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traces::{Letter, Vocabulary};
    use std::io::BufWriter;

    fn write_afa(afa: &Afa) -> String {
        let mut buffer = BufWriter::new(Vec::new());
        TupleWriter::default().write_afa(&mut buffer, afa).unwrap();
        String::from_utf8(buffer.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_write_afa() {
        let afa = Afa::new(
            Vocabulary::new_with_symbols(&["p", "q"]).unwrap(),
            vec![false, true],
            vec![StateMode::Existential, StateMode::Universal],
            vec![
                (Letter::new_with_values(&[true, false]), vec![vec![0, 1], vec![]]),
                (Letter::new_with_values(&[false, false]), vec![vec![1], vec![0]]),
            ],
        )
        .unwrap();
        assert_eq!(
            "(2, 0, (False, True), ('|', '&'), ((('p',), ((0, 1), ())), ((), ((1,), (0,)))))\n",
            write_afa(&afa)
        );
    }

    #[test]
    fn test_single_state() {
        let afa = Afa::new(
            Vocabulary::new_with_symbols(&["p", "q"]).unwrap(),
            vec![true],
            vec![StateMode::Existential],
            vec![(Letter::new_with_values(&[true, true]), vec![vec![0]])],
        )
        .unwrap();
        assert_eq!(
            "(1, 0, (True,), ('|',), ((('p', 'q'), ((0,),)),))\n",
            write_afa(&afa)
        );
    }

    #[test]
    fn test_no_letter() {
        let afa = Afa::new(
            Vocabulary::new_with_symbols(&["p"]).unwrap(),
            vec![true],
            vec![StateMode::Universal],
            vec![],
        )
        .unwrap();
        assert_eq!("(1, 0, (True,), ('&',), ())\n", write_afa(&afa));
    }

    #[test]
    fn test_write_no_model() {
        let mut buffer = BufWriter::new(Vec::new());
        TupleWriter::default().write_no_model(&mut buffer).unwrap();
        assert_eq!(
            "NO\n",
            String::from_utf8(buffer.into_inner().unwrap()).unwrap()
        );
    }

    #[test]
    fn test_quote() {
        assert_eq!("'p'", quote("p"));
        assert_eq!(r"'a\'b\\c'", quote(r"a'b\c"));
    }

    #[test]
    fn test_quote_control_chars() {
        assert_eq!(r"'a\nb\rc\td'", quote("a\nb\rc\td"));
        assert_eq!(r"'\x00\x1b\x7f\x85'", quote("\u{0}\u{1b}\u{7f}\u{85}"));
        assert_eq!(r"'\u2028\u2029'", quote("\u{2028}\u{2029}"));
        assert_eq!("'é'", quote("é"));
    }

    #[test]
    fn test_symbol_with_newline_stays_on_one_line() {
        let afa = Afa::new(
            Vocabulary::new_with_symbols(&["a\nb"]).unwrap(),
            vec![true],
            vec![StateMode::Existential],
            vec![(Letter::new_with_values(&[true]), vec![vec![0]])],
        )
        .unwrap();
        let written = write_afa(&afa);
        assert_eq!(1, written.lines().count());
        assert_eq!(
            r"(1, 0, (True,), ('|',), ((('a\nb',), ((0,),)),))",
            written.trim_end()
        );
    }
}
