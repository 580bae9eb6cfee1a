//! Threat Classifier and Risk Aggregator.
//!
//! Classification runs a fixed, enumerable set of weighted detectors over
//! an action request and produces tagged [`sentra_types::ThreatSignal`]s;
//! aggregation combines them into a single bounded risk score and
//! confidence value. Detectors are a closed set of variants with a fixed
//! dispatch table — adding one means adding a variant plus its weight
//! entry, kept exhaustive and testable. Detectors are independent and
//! side-effect-free; classification never mutates system state.

pub mod aggregate;
pub mod classify;
pub mod detector;

pub use aggregate::{aggregate, RiskAssessment, WeightProfile, MAX_RISK_SCORE};
pub use classify::{classify, ClassifyInput};
pub use detector::Detector;
