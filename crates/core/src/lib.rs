//! # Parlance Core
//!
//! Domain types, traits, and error definitions for the Parlance curriculum
//! generator. This crate has **no framework dependencies**; it defines the
//! model that every other crate implements against.
//!
//! ## Layout
//!
//! - [`curriculum`]: the supported languages, scenarios and levels, plus the
//!   request/response shapes exchanged with callers.
//! - [`knowledge`]: immutable knowledge documents used for retrieval.
//! - [`provider`]: the seam to hosted language models.
//! - [`error`]: the error taxonomy shared by the pipeline and the API layer.

pub mod curriculum;
pub mod error;
pub mod knowledge;
pub mod message;
pub mod provider;

// Re-export key types at crate root for ergonomics
pub use curriculum::{
    CorrectionExample, CurriculumQuestion, CurriculumRequest, CurriculumResponse, Language, Level,
    Scenario,
};
pub use error::{Error, GenerationError, ProviderError, Result, ValidationError};
pub use knowledge::{Category, KnowledgeDocument};
pub use message::{Message, Role};
pub use provider::{
    EmbeddingRequest, EmbeddingResponse, Provider, ProviderRequest, ProviderResponse, Usage,
};
