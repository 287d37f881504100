//! Image preprocessing module for OCR enhancement
//!
//! Turns a photographed or scanned page into a clean black-and-white image
//! before it is handed to the OCR engine.

pub mod pipeline;
pub mod steps;

pub use pipeline::{preprocess, StepTiming};
