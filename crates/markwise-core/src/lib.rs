//! markwise-core — Core grading engine, data model, and analytics.
//!
//! This crate defines the question/submission data model, the per-question
//! grader, the aggregate evaluator, session timing, and the report and
//! analytics types that the rest of the markwise system builds on.

pub mod analytics;
pub mod error;
pub mod evaluator;
pub mod grader;
pub mod model;
pub mod parser;
pub mod report;
pub mod session;
