//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod filament_repo;
pub mod filament_request_repo;
pub mod print_request_repo;
pub mod printer_repo;
pub mod user_repo;

pub use filament_repo::FilamentRepo;
pub use filament_request_repo::FilamentRequestRepo;
pub use print_request_repo::PrintRequestRepo;
pub use printer_repo::PrinterRepo;
pub use user_repo::UserRepo;
