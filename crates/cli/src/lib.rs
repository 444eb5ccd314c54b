//! `mandelmovie` library crate.
//!
//! Re-exports the argument model and renderer preflight for integration
//! testing. The binary entrypoint lives in `main.rs`.

pub mod args;
pub mod preflight;
