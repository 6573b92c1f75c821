//! Record emission and conversion pipeline for qaextract.
//!
//! This crate ties together input discovery, per-file parsing, and JSONL
//! output into the end-to-end `convert` workflow.

pub mod batch;
pub mod emitter;
pub mod inputs;
pub mod output;
pub mod pipeline;
