//! Regulatory mapping: sub-threat → applicable article and penalty range.
//!
//! One lookup interface regardless of whether an external regulatory data
//! source is configured. The compiled-in table is conservative: it covers
//! the enumerated sub-threats for known jurisdictions and returns nothing
//! for anything it does not know — a missing mapping is `None`, never a
//! fabricated entry. External-source unavailability is non-fatal: the
//! lookup falls back to the built-in table and logs the condition.

pub mod source;
pub mod table;

pub use source::{FallbackSource, RegulatoryError, RegulatorySource};
pub use table::{BuiltinPenaltyTable, PenaltyEntry};
