//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;
use std::path::{Path, PathBuf};

use xcl_syntax::diagnostics::XclError;
use xcl_syntax::document::Document;
use xcl_syntax::lexer;
use xcl_syntax::parser::{DocumentParser, ImportResolver};

use super::report;
use super::{CliError, CliResult, ExitCode};

/// Maximum source file size (10 MB)
///
/// Configuration files larger than this are rejected to prevent
/// out-of-memory conditions.
const MAX_SOURCE_SIZE: u64 = 10 * 1024 * 1024;

/// Read source file contents.
///
/// ## Errors
///
/// Fails when the file cannot be accessed, exceeds [`MAX_SOURCE_SIZE`], or
/// is not valid UTF-8.
pub fn read_source(file_path: &str) -> CliResult<String> {
    // Check file size before reading
    let metadata = fs::metadata(file_path)
        .map_err(|e| CliError::failure(format!("Cannot access file '{}': {}", file_path, e)))?;

    if metadata.len() > MAX_SOURCE_SIZE {
        return Err(CliError::failure(format!(
            "Source file '{}' is too large ({} bytes, max {} bytes)",
            file_path,
            metadata.len(),
            MAX_SOURCE_SIZE
        )));
    }

    fs::read_to_string(file_path)
        .map_err(|e| CliError::failure(format!("Error reading file '{}': {}", file_path, e)))
}

/// Import resolver backed by the filesystem.
///
/// Import names are joined onto the root document's directory, so nested
/// imports keep resolving against the same base. Import cycles are not
/// detected and will recurse until the stack runs out.
pub struct FileImportResolver {
    base: PathBuf,
}

impl FileImportResolver {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }
}

impl ImportResolver for FileImportResolver {
    fn resolve(&self, name: &str) -> Result<Document, XclError> {
        let path = self.base.join(name);
        tracing::debug!(path = %path.display(), "loading import");
        let source = fs::read_to_string(&path).map_err(|e| {
            XclError::runtime(format!("Cannot read import `{}`: {}.", path.display(), e))
        })?;
        let tokens = lexer::tokenize(&source)?;
        DocumentParser::new(Self::new(self.base.clone())).parse(&tokens, true)
    }
}

/// Parse a document from a file, resolving imports relative to its
/// directory.
pub fn parse_path(file_path: &str) -> CliResult<Document> {
    let source = read_source(file_path)?;
    let base = Path::new(file_path)
        .parent()
        .unwrap_or(Path::new("."))
        .to_path_buf();

    let tokens = lexer::tokenize(&source)
        .map_err(|e| CliError::failure(report::format_error(file_path, &source, &e)))?;

    DocumentParser::new(FileImportResolver::new(base))
        .parse(&tokens, false)
        .map_err(|e| CliError::failure(report::format_error(file_path, &source, &e)))
}

/// Parse a configuration file and print its bindings.
pub fn print_file(file_path: &str) -> CliResult<ExitCode> {
    let doc = parse_path(file_path)?;
    for (name, value) in doc.data() {
        println!("{name}: {} = {value}", value.type_name());
    }
    Ok(ExitCode::SUCCESS)
}

/// One line per token: kind, position, text.
fn format_token(tok: &lexer::Token) -> String {
    format!("{} {}:{} {:?}", tok.kind, tok.line, tok.column, tok.text)
}

/// Tokenize and display tokens (debug).
pub fn lex_file(file_path: &str) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let tokens = lexer::tokenize(&source)
        .map_err(|e| CliError::failure(report::format_error(file_path, &source, &e)))?;

    for tok in &tokens {
        println!("{}", format_token(tok));
    }
    Ok(ExitCode::SUCCESS)
}
