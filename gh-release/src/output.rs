//! Workflow outputs and failure reporting for GitHub Actions

use crate::error::Result;
use crate::publisher::RunReport;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

const OUTPUT_DELIMITER: &str = "ghadelimiter_gh_release";

/// Named outputs of a successful run, in emission order
pub fn outputs(report: &RunReport) -> Result<Vec<(&'static str, String)>> {
    Ok(vec![
        ("url", report.release.html_url.clone()),
        ("id", report.release.id.to_string()),
        ("upload_url", report.release.upload_url.clone()),
        ("assets", serde_json::to_string(&report.assets)?),
    ])
}

/// Format one output in the multi-line safe `GITHUB_OUTPUT` syntax
pub fn format_output(name: &str, value: &str) -> String {
    format!("{name}<<{OUTPUT_DELIMITER}\n{value}\n{OUTPUT_DELIMITER}\n")
}

/// Append outputs to the `GITHUB_OUTPUT` file, or print them when unset
pub fn write_outputs(report: &RunReport) -> Result<()> {
    let outputs = outputs(report)?;

    match std::env::var_os("GITHUB_OUTPUT") {
        Some(path) if !path.is_empty() => append_outputs(Path::new(&path), &outputs),
        _ => {
            for (name, value) in &outputs {
                println!("{name}={value}");
            }
            Ok(())
        }
    }
}

pub fn append_outputs(path: &Path, outputs: &[(&str, String)]) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    for (name, value) in outputs {
        file.write_all(format_output(name, value).as_bytes())?;
    }
    Ok(())
}

/// Single-line `::error::` workflow command; newlines are escaped
pub fn error_command(message: &str) -> String {
    let escaped = message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A");
    format!("::error::{escaped}")
}
