//! mural-slicer library crate.
//!
//! Turns a processed image into the instruction document driven by a two-cable
//! wall-painting robot, and renders such documents back into preview images.

pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod geometry;
pub mod palette;
pub mod preview;
pub mod slicing;
pub mod source;
pub mod stripe;

pub use error::{Error, Result};
