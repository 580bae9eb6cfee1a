//! Policy Resolver — merges the global, tenant, and system scopes into one
//! effective policy for an environment.
//!
//! Resolution is a pure function of its inputs: same scopes plus the same
//! environment always yield the same effective policy. Numeric limits merge
//! most-restrictive-wins (minimum across every scope that defines one);
//! flag rules merge as a logical OR of restriction. An environment no scope
//! defines a limit for yields an explicit undefined marker, never an error:
//! the decision then rests solely on hard rules (kill switch,
//! prohibited-practice detection).

pub mod resolve;

pub use resolve::{resolve, EffectivePolicy};
