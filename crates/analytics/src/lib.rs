//! # Vantage Analytics Engine
//!
//! This crate computes the standardized risk/return metrics for a portfolio
//! (or single instrument) and ranks two completed analyses against each
//! other. It acts as the "unbiased judge" of the system.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of
//!   external systems. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** The `MetricsEngine` is a stateless
//!   calculator. It takes immutable series as input and produces a
//!   `MetricsReport` as output. This makes it highly reliable, easy to test,
//!   and safe to run for two portfolios concurrently.
//! - **Total over well-formed input:** Degenerate denominators (zero
//!   volatility, zero drawdown, zero tracking error) are "no signal" results
//!   reported as 0.0, never panics or errors. Only malformed shapes surface
//!   as an `AnalyticsError`.
//!
//! ## Public API
//!
//! - `MetricsEngine`: The main struct that contains the calculation logic.
//! - `MetricsReport`: The standardized struct that holds all metrics.
//! - `compare` / `Verdict`: The qualitative ranking of two reports.
//! - `AnalyticsError`: The specific error types that can be returned from
//!   this crate.

// Declare the modules that constitute this crate.
pub mod comparison;
pub mod engine;
pub mod error;
pub mod report;
pub mod stats;

// Re-export the key components to create a clean, public-facing API.
pub use comparison::{compare, Candidate, Verdict};
pub use engine::{MetricsEngine, TRADING_DAYS_PER_YEAR};
pub use error::AnalyticsError;
pub use report::MetricsReport;
