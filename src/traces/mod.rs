//! Data structures for the vocabulary, the letters and the labeled traces.

mod encoder;
pub use encoder::RawTrace;
pub use encoder::TraceEncoder;

mod letter;
pub use letter::Letter;

mod trace;
pub use trace::Sample;
pub use trace::Trace;

mod vocabulary;
pub use vocabulary::Vocabulary;
