//! Show command implementation.

use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::fs;
use tombstone_reaper::StatusArtifact;

/// Execute the show command.
pub fn execute_show(config: &Config, formatter: &Formatter) -> Result<()> {
    let path = config
        .reaper
        .output_path
        .as_ref()
        .unwrap_or(&config.status.artifact_path);

    if !path.exists() {
        return Err(CliError::InvalidInput(format!(
            "No status document at {}. Run 'tombstone once' first.",
            path.display()
        )));
    }

    let artifact: StatusArtifact = serde_json::from_str(&fs::read_to_string(path)?)?;
    println!("{}", formatter.format_artifact(&artifact)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;

    #[test]
    fn test_show_missing_document() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.reaper.output_path = Some(dir.path().join("status.json"));

        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let err = execute_show(&config, &formatter).unwrap_err();
        assert!(matches!(err, CliError::InvalidInput(msg) if msg.contains("tombstone once")));
    }

    #[test]
    fn test_show_reads_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("status.json");
        let artifact = StatusArtifact {
            pre_delete_pages: Vec::new(),
            deleted_pages: Vec::new(),
            errors: Vec::new(),
            update_timestamp: 1_700_000_000.0,
        };
        artifact.write_to(&path).unwrap();

        let mut config = Config::default();
        config.reaper.output_path = Some(path);
        let formatter = Formatter::new(OutputFormat::Json, false);
        execute_show(&config, &formatter).unwrap();
    }
}
