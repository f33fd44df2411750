//! Diagnostic system for rule parsing and evaluation errors
//!
//! Structural and runtime errors both convert into [`Diagnostic`] values so
//! hosts can log, count or display them uniformly. The selector and navigator
//! use them to report rules they skipped.

#![warn(missing_docs)]

pub mod builder;
pub mod diagnostic;
pub mod formatter;

pub use builder::DiagnosticBuilder;
pub use diagnostic::{Diagnostic, DiagnosticCode, Severity};
pub use formatter::{DiagnosticFormatter, Format};
