//! Compile-time error types.
//!
//! Compilation stops at the first failure, so every lowering step returns
//! `Result<_, Error>` where `Error` pairs an `ErrorImpl` variant with the
//! source position of the offending token. Runtime failures are not errors
//! in this sense; they travel as exception signals (see `runtime::ret`).

pub mod errors;
