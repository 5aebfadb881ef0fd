//! Profile module — reading and updating the authenticated user's data

pub mod service;

pub use service::ProfileService;
