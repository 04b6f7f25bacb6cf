//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured tracing events on stderr)
//!
//! The human-readable report is written separately to stdout by report.rs.
//! ```

pub mod logging;
