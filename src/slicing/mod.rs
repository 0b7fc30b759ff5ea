//! Pipeline orchestration: mode selection, per-column encoding, and document assembly.
//!
//! A run moves `Idle -> <mode> -> Done`. The mode is fixed before the first block
//! is written, and reaching `Done` hands the finished document to every
//! [`CompletionHook`].

mod mode;
mod slicer;

pub use mode::SlicingMode;
pub use slicer::{CompletionHook, RunSummary, SliceError, Slicer};
