//! lanesplit: where should a two-lane road put the fast/slow speed boundary?
//!
//! Vehicles draw independent uniform speeds. Two vehicles sharing a lane force
//! the slower one to give way; the threshold `a` decides which lane each
//! vehicle uses. The crate estimates `E(a)`, the expected distance lost per
//! pairwise interaction, searches for its minimizer and cross-checks the
//! curve shape with a polynomial fit.

pub mod config;
pub mod core;
pub mod error;
pub mod report;
pub mod study;

pub use error::{LanesplitError, Result};
