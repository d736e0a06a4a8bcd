//! Domain model for entities materialized from backend reads.
//!
//! # Responsibility
//! - Define the audit capability shared by tracked entities.
//! - Define the concrete entities the core hands to callers.
//!
//! # Invariants
//! - Audit fields are composed into entities, never inherited or mutated.

pub mod audit;
pub mod system;
