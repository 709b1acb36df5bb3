// * Extraction Stage
// * Turns unstructured source text into structured startup records via a local model.

pub mod chunker;
pub mod errors;
pub mod invoker;
pub mod orchestrator;
pub mod parser;

// * Re-exports for convenient access
pub use chunker::{truncate_chars, Batch, BatchChunker, ChunkerConfig};
pub use errors::ModelError;
pub use invoker::{CommandInvoker, ModelInvoker};
pub use orchestrator::{normalize_startup, BatchOutcome, ExtractionOrchestrator};
pub use parser::{parse_response, BracketScan, ExtractionStrategy, ResponseParser, WholeResponse};
