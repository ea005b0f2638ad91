//! markwise-report — HTML scorecard generation.
//!
//! Renders a `GradeReport` as a single self-contained HTML file for sharing
//! with students and parents.

pub mod html;

pub use html::{generate_html, write_html_report};
