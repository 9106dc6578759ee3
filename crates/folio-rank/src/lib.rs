//! Library crate for the portfolio scoring service.
//!
//! The `scoring` module holds the pure score aggregation engine; `portfolio`
//! layers the organization/project domain, repository abstraction, service
//! facade, HTTP router, and the administrative recompute driver on top of it.

pub mod config;
pub mod error;
pub mod portfolio;
pub mod scoring;
pub mod telemetry;
