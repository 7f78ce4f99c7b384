#![forbid(unsafe_code)]
//! XCL configuration language host
//!
//! XCL is a small declarative configuration language with typed bindings,
//! user-declared enums, lists, and sections, and document imports. The core
//! frontend (lexing, parsing, type/value model) lives in the `xcl_syntax`
//! crate; this crate adds the pieces that touch the outside world: the CLI
//! and file-based import resolution.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod cli;

pub use xcl_syntax as syntax;
