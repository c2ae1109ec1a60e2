//! HTTP handler implementations, one module per resource.

pub mod auth;
pub mod filament_requests;
pub mod filaments;
pub mod print_requests;
pub mod printers;
pub mod users;
