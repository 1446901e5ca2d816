//! Delimited-text table codec
//!
//! Table format:
//!
//! ```text
//! id,name,country,...        <- header row
//! 1,Brazil FC,Brazil,...     <- one row per record
//! 2,"Club, Inc",Chile,...    <- quoted when a cell needs it
//! ```
//!
//! - Cells are comma separated
//! - A cell containing `,`, `"`, CR or LF is wrapped in double quotes, with
//!   embedded quotes doubled
//! - Rows end with LF on write; LF, CRLF and bare CR are accepted on read
//! - Empty lines between rows are ignored

use std::fmt;

/// Parse failure with the 1-based line it was detected on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecError {
    pub line: usize,
    pub reason: String,
}

impl CodecError {
    fn new(line: usize, reason: impl Into<String>) -> Self {
        Self {
            line,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.reason)
    }
}

impl std::error::Error for CodecError {}

fn needs_quotes(cell: &str) -> bool {
    cell.contains([',', '"', '\n', '\r'])
}

/// Encodes one row without a line terminator
pub fn encode_row<S: AsRef<str>>(cells: &[S]) -> String {
    let mut out = String::new();
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let cell = cell.as_ref();
        if needs_quotes(cell) {
            out.push('"');
            out.push_str(&cell.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(cell);
        }
    }
    out
}

/// Encodes a header and rows, each terminated by LF
pub fn encode_table<S: AsRef<str>>(header: &[S], rows: &[Vec<String>]) -> String {
    let mut out = encode_row(header);
    out.push('\n');
    for row in rows {
        out.push_str(&encode_row(row));
        out.push('\n');
    }
    out
}

/// Decodes every row of a table (header included, as the first row).
///
/// # Errors
///
/// Returns `CodecError` for an unterminated quoted cell or for text
/// following a closing quote.
pub fn decode(input: &str) -> Result<Vec<Vec<String>>, CodecError> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut chars = input.chars().peekable();

    let mut line = 1;
    let mut row_line = 1;
    let mut in_quotes = false;
    // Current cell was quoted and its closing quote has been consumed
    let mut closed = false;
    let mut at_cell_start = true;

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    cell.push('"');
                }
                '"' => {
                    in_quotes = false;
                    closed = true;
                }
                '\n' => {
                    line += 1;
                    cell.push(c);
                }
                _ => cell.push(c),
            }
            continue;
        }

        match c {
            '"' if at_cell_start => {
                in_quotes = true;
                at_cell_start = false;
            }
            ',' => {
                row.push(std::mem::take(&mut cell));
                at_cell_start = true;
                closed = false;
            }
            '\r' | '\n' => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                let blank = row.is_empty() && cell.is_empty() && at_cell_start;
                if !blank {
                    row.push(std::mem::take(&mut cell));
                    rows.push(std::mem::take(&mut row));
                }
                line += 1;
                row_line = line;
                at_cell_start = true;
                closed = false;
            }
            _ if closed => {
                return Err(CodecError::new(
                    line,
                    format!("unexpected character '{}' after closing quote", c),
                ));
            }
            _ => {
                cell.push(c);
                at_cell_start = false;
            }
        }
    }

    if in_quotes {
        return Err(CodecError::new(row_line, "unterminated quoted cell"));
    }

    let blank = row.is_empty() && cell.is_empty() && at_cell_start;
    if !blank {
        row.push(cell);
        rows.push(row);
    }

    Ok(rows)
}
