//! Concierge decision pipeline: language, fast paths, retrieval, cache,
//! generation and post-processing.

pub mod cache;
pub mod fastpath;
pub mod knowledge;
pub mod language;
pub mod pipeline;
pub mod postprocess;
pub mod scenario;
pub mod text;
pub mod venue;

pub use cache::{CacheKey, CachedResponse, ResponseCache};
pub use fastpath::{Detector, DetectorInput, FastPathChain, FastPathMatch};
pub use knowledge::{KnowledgeRetriever, Retrieval, RetrievalOutcome};
pub use language::LanguageClassifier;
pub use pipeline::{session_store, ChatReply, Collaborators, Pipeline, ResponseSource};
pub use postprocess::PostProcessor;
pub use venue::VenueClock;
