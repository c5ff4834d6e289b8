//! The curriculum pipeline.
//!
//! A request flows through:
//!
//! 1. **Cache check**: a previously produced curriculum is returned as-is
//! 2. **Retrieve** the most relevant knowledge for the (language, scenario) pair
//! 3. **Assemble** a single prompt from knowledge and scenario metadata
//! 4. **Generate** with the hosted model, one attempt, bounded by a timeout
//! 5. **Fall back** to a deterministic template when generation fails
//! 6. **Cache store**, so the pair is served locally from then on

pub mod assembler;
pub mod cache;
pub mod fallback;
pub mod generation;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use assembler::assemble;
pub use cache::{CacheEntry, CacheStats, CurriculumSource, ResponseCache};
pub use fallback::FallbackGenerator;
pub use generation::{GenerationClient, ModelGenerationClient, parse_curriculum};
pub use pipeline::{Availability, CurriculumOutcome, CurriculumPipeline};
