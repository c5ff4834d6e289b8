//! Knowledge base and semantic retrieval for Parlance.
//!
//! The store is built once from compiled-in teaching material. The retriever
//! ranks a pair's documents against a query by learned embedding similarity
//! when a hosted embedding model is available, and by a deterministic
//! lexical index otherwise.

pub mod embedding;
pub mod real_world;
pub mod retriever;
pub mod store;
pub mod vector;

pub use embedding::{Embedder, HashEmbedder, ProviderEmbedder};
pub use real_world::RealWorldContext;
pub use retriever::{Ranking, Retriever, ScoredDocument};
pub use store::KnowledgeStore;
pub use vector::cosine_similarity;
