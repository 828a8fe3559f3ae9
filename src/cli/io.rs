//! JSON output for one-shot CLI commands
//!
//! - Output: single JSON object on stdout
//! - UTF-8 only

use std::io::{self, Write};

use serde::Serialize;

use super::errors::CliResult;

/// Write a success response to stdout
pub fn write_response<T: Serialize>(data: &T) -> CliResult<()> {
    let mut stdout = io::stdout();
    write_response_to(data, &mut stdout)
}

/// Write a success response to any writer
pub fn write_response_to<T: Serialize, W: Write>(data: &T, writer: &mut W) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });

    serde_json::to_writer(&mut *writer, &response)?;
    writeln!(writer)?;
    writer.flush()?;

    Ok(())
}
