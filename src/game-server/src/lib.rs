pub mod entrypoint;
pub mod error;
pub mod model;
pub mod service;
