//! The search for minimal automata classifying a sample.

mod model_decoder;
pub use model_decoder::ModelDecoder;

mod size_search_controller;
pub use size_search_controller::SearchState;
pub use size_search_controller::SearchStats;
pub use size_search_controller::SizeAttempt;
pub use size_search_controller::SizeSearchController;
