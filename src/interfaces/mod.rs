//! Interface layer - inbound adapters (REST API)

pub mod http;
