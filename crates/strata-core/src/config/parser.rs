//! TOML parser for `.stratarc` with helpful error messages

use super::local::LocalRc;

/// Parse `.stratarc` content from string.
///
/// Errors are rendered with the offending line and its neighbours.
pub fn parse_local_rc_str(content: &str) -> Result<LocalRc, String> {
    let rc: LocalRc = toml::from_str(content).map_err(|e| enhance_toml_error(&e, content))?;
    rc.validate()?;
    Ok(rc)
}

/// Serialize a local config to TOML string
pub fn to_toml(rc: &LocalRc) -> Result<String, String> {
    toml::to_string_pretty(rc).map_err(|e| e.to_string())
}

fn enhance_toml_error(error: &toml::de::Error, content: &str) -> String {
    let message = error.message();

    match error.span() {
        Some(span) => {
            let line_num = content[..span.start.min(content.len())]
                .matches('\n')
                .count()
                + 1;
            format!(
                "TOML parsing error at line {}:\n{}\n\nError: {}",
                line_num,
                get_line_context(content, line_num),
                message
            )
        }
        None => format!("TOML parsing error: {}", message),
    }
}

/// Get context lines around an error
fn get_line_context(content: &str, line_num: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let start = line_num.saturating_sub(2);
    let end = (line_num + 1).min(lines.len());

    lines[start.min(end)..end]
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let num = start + i + 1;
            let marker = if num == line_num { ">>>" } else { "   " };
            format!("{} {:4} | {}", marker, num, line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
