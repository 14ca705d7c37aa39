//! Domain models for addon-index.
//!
//! - `Candidate`: a discovered name and its search-service date
//! - `Score`: tri-state quality rating
//! - `EnrichedAddon`: registry metadata joined with a score
//! - `PipelineError`: fatal errors of one run

pub mod addon;
pub mod candidate;
pub mod error;
pub mod score;

pub use addon::EnrichedAddon;
pub use candidate::Candidate;
pub use error::{PipelineError, Result};
pub use score::Score;
