//! Car catalogue backend library.
//!
//! Hexagonal layout: [`domain`] holds entities, services and ports;
//! [`outbound`] implements the driven ports over PostgreSQL and CSV files;
//! [`inbound`] exposes the driving ports over HTTP.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
