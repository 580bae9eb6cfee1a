//! Enforcement engine: the staged decision pipeline at the heart of
//! Sentra.
//!
//! One call to [`EnforcementEngine::enforce`] runs a request through a
//! fixed stage order — kill-switch check, policy resolution, threat
//! classification, risk aggregation, decision, audit — and returns a
//! complete [`sentra_types::EnforcementDecision`]. Infrastructure faults
//! fail closed: a registry that cannot answer in time looks like an
//! absent system, and indeterminate classification resolves to maximal
//! risk. The one deliberate exception is the audit append, which degrades
//! the returned record to pending rather than blocking enforcement on a
//! slow disk.

pub mod engine;
pub mod error;
pub mod registry;
pub mod status;

pub use engine::{EngineConfig, EnforcementEngine};
pub use error::EngineError;
pub use registry::{InMemoryRegistry, Registry};
pub use status::validate_transition;
