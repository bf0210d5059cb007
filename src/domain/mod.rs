//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machine trait)
//! - `policy` - Documents, clauses, risk classification and the pipeline state
//! - `report` - Paginated report layout

pub mod foundation;
pub mod policy;
pub mod report;
