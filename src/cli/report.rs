//! Error reporting for the XCL CLI
//!
//! Renders parse errors with source highlighting.

use xcl_syntax::diagnostics::XclError;

/// Format an error with source context (simple implementation).
///
/// Errors that carry a token location get a source excerpt with a caret;
/// location-free errors get the header and file name only.
pub fn format_error(file_name: &str, source: &str, error: &XclError) -> String {
    // Color codes
    let red = "\x1b[31m";
    let cyan = "\x1b[36m";
    let bold = "\x1b[1m";
    let reset = "\x1b[0m";

    let mut out = String::new();

    // Header
    out.push_str(&format!("{bold}{red}error{reset}{bold}: {error}{reset}\n"));

    let Some((line, column)) = error.location() else {
        out.push_str(&format!("  {cyan}-->{reset} {file_name}\n"));
        return out;
    };

    // Location
    out.push_str(&format!("  {cyan}-->{reset} {file_name}:{line}:{column}\n"));

    // Source line with line number and a caret under the offending column
    if let Some(line_text) = source.lines().nth(line.saturating_sub(1)) {
        let width = line.to_string().len();
        out.push_str(&format!("  {cyan}{:>width$} |{reset}\n", ""));
        out.push_str(&format!("  {cyan}{line:>width$} |{reset} {line_text}\n"));
        out.push_str(&format!(
            "  {cyan}{:>width$} |{reset} {}{red}^{reset}\n",
            "",
            " ".repeat(column.saturating_sub(1)),
        ));
    }

    out
}
