pub mod config;
pub mod credentials;
pub mod dnf;
pub mod error;
pub mod handler;
pub mod model;
pub mod progress;
pub mod results;
pub mod zwift;
