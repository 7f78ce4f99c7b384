//! Core XCL frontend: lexer, parser, type system, values, diagnostics.
//!
//! This crate is dependency-light and intended for reuse by any host that
//! embeds XCL configuration: the CLI, services, and future tooling.
//!
//! ## Notes
//! - The crate performs no I/O of its own. Imports are delegated to a
//!   host-supplied [`parser::ImportResolver`].
//! - Parsing is strict: the first violated expectation aborts with an
//!   [`diagnostics::XclError`] and the partial document is discarded.
//!
//! ## Examples
//! ```rust
//! use xcl_syntax::parser;
//!
//! let doc = parser::parse_source("int port = 8080\n").unwrap();
//! assert!(doc.get("port").is_some());
//! ```

pub mod diagnostics;
pub mod document;
pub mod lexer;
pub mod parser;
pub mod types;
pub mod values;
