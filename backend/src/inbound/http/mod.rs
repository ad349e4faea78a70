//! HTTP inbound adapter exposing REST endpoints.

pub mod cars;
pub mod catalogue;
pub mod engines;
pub mod error;
pub mod health;
pub mod import;
pub mod performance;
pub mod references;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;
