use anyhow::{anyhow, Result};
use std::collections::HashMap;

/// The ordered set of atomic propositions the traces are built on.
///
/// Each symbol is given an index equal to its position in the list provided at construction time.
/// A vocabulary cannot be modified once it is built.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Vocabulary {
    symbols: Vec<String>,
    symbol_to_index: HashMap<String, usize>,
}

impl Vocabulary {
    /// Builds a new vocabulary given its symbols.
    ///
    /// An error is returned if a symbol appears more than once.
    ///
    /// # Example
    ///
    /// ```
    /// # use limeltl::traces::Vocabulary;
    /// let vocabulary = Vocabulary::new_with_symbols(&["p", "q"]).unwrap();
    /// assert_eq!(2, vocabulary.len());
    /// assert_eq!(1, vocabulary.index_of("q").unwrap());
    /// assert!(Vocabulary::new_with_symbols(&["p", "p"]).is_err());
    /// ```
    pub fn new_with_symbols<T>(symbols: &[T]) -> Result<Self>
    where
        T: AsRef<str>,
    {
        let mut vocabulary = Vocabulary {
            symbols: Vec::with_capacity(symbols.len()),
            symbol_to_index: HashMap::with_capacity(symbols.len()),
        };
        for s in symbols.iter().map(|s| s.as_ref().to_string()) {
            if vocabulary.symbol_to_index.contains_key(&s) {
                return Err(anyhow!(r#"symbol "{}" is declared more than once"#, s));
            }
            vocabulary
                .symbol_to_index
                .insert(s.clone(), vocabulary.symbols.len());
            vocabulary.symbols.push(s);
        }
        Ok(vocabulary)
    }

    /// Returns the number of symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns `true` iff this vocabulary has no symbol.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Returns the symbol with the given index.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    pub fn symbol(&self, index: usize) -> &str {
        &self.symbols[index]
    }

    /// Returns the index of a symbol, or an error if the symbol is not in this vocabulary.
    pub fn index_of(&self, symbol: &str) -> Result<usize> {
        self.symbol_to_index
            .get(symbol)
            .copied()
            .ok_or_else(|| anyhow!(r#"no such symbol: "{}""#, symbol))
    }

    /// Iterates over the symbols, in index order.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.symbols.iter().map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ok() {
        let vocabulary = Vocabulary::new_with_symbols(&["p", "q", "r"]).unwrap();
        assert_eq!(3, vocabulary.len());
        assert!(!vocabulary.is_empty());
        assert_eq!(vec!["p", "q", "r"], vocabulary.iter().collect::<Vec<&str>>());
        assert_eq!("q", vocabulary.symbol(1));
    }

    #[test]
    fn test_empty() {
        let vocabulary = Vocabulary::new_with_symbols::<&str>(&[]).unwrap();
        assert!(vocabulary.is_empty());
        assert_eq!(0, vocabulary.iter().count());
    }

    #[test]
    fn test_duplicate_symbol() {
        let err = Vocabulary::new_with_symbols(&["p", "q", "p"]).unwrap_err();
        assert!(err.to_string().contains(r#""p""#));
    }

    #[test]
    fn test_index_of() {
        let vocabulary = Vocabulary::new_with_symbols(&["p", "q"]).unwrap();
        assert_eq!(0, vocabulary.index_of("p").unwrap());
        assert_eq!(1, vocabulary.index_of("q").unwrap());
        assert!(vocabulary.index_of("r").is_err());
    }
}
