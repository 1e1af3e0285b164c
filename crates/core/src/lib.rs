//! Core library for riskmark
//!
//! This crate is the **Functional Core** of riskmark: every function here is a
//! pure transformation from data to data. Reading PDFs, talking to language
//! models and serving HTTP all live in the `riskmark` binary crate.
//!
//! # Module Organization
//!
//! - [`highlight`]: rule validation, whitespace-tolerant matching, overlap
//!   resolution and segmentation of a document into plain and highlighted runs
//! - [`analysis`]: prompts, model-response parsing and validation of risk
//!   classifications, chunking and premium fallbacks
//!
//! # Example Usage
//!
//! ```rust
//! use riskmark_core::highlight::{highlight, HighlightRule};
//!
//! let rules = vec![HighlightRule::new("late fees", "red", false).unwrap()];
//! let segments = highlight("No LATE   FEES apply.", &rules).unwrap();
//!
//! assert_eq!(segments.len(), 3);
//! assert_eq!(segments[1].text, "LATE   FEES");
//! assert!(segments[1].highlighted);
//! ```

pub mod analysis;
pub mod highlight;
