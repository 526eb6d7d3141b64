//! # Vantage Portfolio Pipeline
//!
//! This crate turns raw per-symbol price history into the value and return
//! series the analytics engine consumes. It is the first half of the data
//! flow: raw prices -> aligned matrix -> portfolio value series -> daily
//! return series.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It performs no I/O and
//!   has no knowledge of where prices come from. It depends only on
//!   `core-types` (Layer 0).
//! - **One-way data flow:** Each stage consumes the previous stage's output
//!   and produces a fresh, immutable value object. Nothing here mutates a
//!   series once it has been handed on, which is what lets the caller run
//!   two portfolio analyses concurrently with no coordination.

pub mod aligner;
pub mod constructor;
pub mod error;
pub mod returns;

// Re-export the key components to create a clean, public-facing API.
pub use aligner::align;
pub use constructor::{construct, BASE_VALUE};
pub use error::PortfolioError;
pub use returns::daily_returns;
