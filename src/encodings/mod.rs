//! Objects used to encode the search for an automaton into SAT solvers.

mod afa_constraints_encoder;
pub use afa_constraints_encoder::AfaConstraintsEncoder;

mod suffix_trie;
pub use suffix_trie::SuffixTrie;

mod var_map;
pub use var_map::AfaVarMap;
pub use var_map::AfaVariable;
