//! Three-worker report generator.
//!
//! Reads a line-oriented input file, fans out to three concurrent workers
//! (factorial, system process listing, average), then consolidates their
//! section files into a single output file in a fixed order. Workers that
//! fail cost their section, never the run.

pub mod consolidate;
pub mod input;
pub mod orchestrator;
pub mod subprocess;
pub mod worker;
