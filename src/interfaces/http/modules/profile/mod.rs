//! Profile module — own profile, profile update, password change

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
