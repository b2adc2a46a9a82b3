//! LIMS pathology feed parser
//!
//! The export is a stream of HL7-style messages, one segment per line,
//! optionally wrapped in file/batch envelopes. Fields are read from fixed
//! character windows rather than by splitting on separators.
//!
//! ## Architecture
//!
//! - [`segment`] - Segment tag classification and fixed-window field extraction
//! - [`parser`] - Message state machine grouping segments into reports
//!
//! ## Message boundaries
//!
//! A message is committed only when the next `MSH` segment arrives. The last
//! message of a file is discarded unless trailing flush is enabled with
//! [`PathologyParser::with_trailing_flush`].

pub mod parser;
pub mod segment;

#[cfg(test)]
pub mod tests;

pub use parser::PathologyParser;
pub use segment::Segment;
