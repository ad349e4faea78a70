//! Inbound adapters that translate external requests into domain service
//! calls while keeping framework details at the edge.
//!
//! HTTP handlers live under [`http`]; the `import-catalogue` binary drives the
//! same ports from the command line.

pub mod http;
