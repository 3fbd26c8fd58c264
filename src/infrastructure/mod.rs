pub mod azure_openai;
pub mod index;
pub mod mock;
pub mod sequence;
pub mod tabular;

pub use index::VectorIndex;
