//! Shared domain types for the UberPrints platform.
//!
//! This crate holds everything the other workspace crates agree on:
//! primitive type aliases, the domain error taxonomy, the actor model
//! (guest / member / admin), the access policy, and the field-diff
//! helper behind the change log.

pub mod actor;
pub mod diff;
pub mod error;
pub mod policy;
pub mod types;

pub use actor::Actor;
pub use error::CoreError;
