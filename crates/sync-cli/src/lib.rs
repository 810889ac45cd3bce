//! Library half of the linear-sync binary.
//!
//! Split out of main.rs so command orchestration is testable with the
//! in-memory store and a scripted tracker, without the clap surface.

pub mod commands;
pub mod native_store;

pub use native_store::NativeStore;
