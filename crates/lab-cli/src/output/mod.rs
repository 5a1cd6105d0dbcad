use std::io::Write;

use serde::Serialize;

use crate::cli::OutputFormat;

/// Render a response as pretty (`json`) or single-line (`raw`) JSON.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Raw => serde_json::to_string(value)?,
    };
    Ok(rendered)
}

/// Write a rendered response followed by a newline.
pub fn write_output<T: Serialize, W: Write>(
    writer: &mut W,
    value: &T,
    format: OutputFormat,
) -> anyhow::Result<()> {
    writeln!(writer, "{}", render(value, format)?)?;
    Ok(())
}

/// Print a response to stdout. Logs go to stderr, so stdout stays parseable.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    write_output(&mut handle, value, format)?;
    handle.flush()?;
    Ok(())
}
