pub mod error;
pub mod features;
pub mod model;
pub mod server;
pub mod types;
