//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!
//! Patch fields backed by nullable columns use the double-`Option`
//! pattern from [`patch`] so an explicit JSON `null` clears them.

pub mod filament;
pub mod filament_request;
pub mod patch;
pub mod print_request;
pub mod printer;
pub mod status;
pub mod user;
