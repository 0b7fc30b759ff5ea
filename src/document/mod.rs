//! The instruction document ("gcode") consumed by the painting rig.
//!
//! # Structure
//!
//! - [`format`] - line vocabulary shared by the writer and the preview parser
//! - [`writer`] - the append-only [`DocumentWriter`]

pub mod format;
mod writer;

pub use writer::{DocumentError, DocumentWriter, StripeAnchor};
