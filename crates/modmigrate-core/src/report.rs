use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::models::RunReport;
use crate::{Error, Result};

/// Render the end-of-run summary block printed to the console
pub fn render_summary(report: &RunReport) -> String {
    let mut output = String::new();

    output.push_str("\nSummary:\n");
    output.push_str(&format!("Total mods checked: {}\n", report.checked));
    output.push_str(&format!(
        "Mods with update for {} but not in target collection: {}\n",
        report.target_version, report.update_available
    ));
    output.push_str(&format!(
        "Mods already in target collection: {}\n",
        report.already_in_target
    ));
    output.push_str(&format!(
        "Mods without update for {}: {}\n",
        report.target_version, report.no_compatible
    ));

    if !report.missing.is_empty() {
        output.push_str(&format!(
            "\nMods NOT available for {} (not in target collection):\n",
            report.target_version
        ));
        for line in &report.missing {
            output.push_str(line);
            output.push('\n');
        }
    }

    output
}

/// Write the full report as pretty JSON
pub fn export_json<P: AsRef<Path>>(report: &RunReport, path: P) -> Result<()> {
    let content = serde_json::to_string_pretty(report)?;

    let mut file = File::create(path.as_ref())
        .map_err(|e| Error::ConfigError(format!("Failed to create export file: {}", e)))?;

    file.write_all(content.as_bytes())
        .map_err(|e| Error::ConfigError(format!("Failed to write export file: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ModReport, Outcome};
    use chrono::Utc;

    fn sample_report() -> RunReport {
        RunReport {
            source_collection: "HO2OnfaY".to_string(),
            target_collection: "WiQSfz9H".to_string(),
            current_version: "1.21.6".to_string(),
            target_version: "1.21.8".to_string(),
            loader: "fabric".to_string(),
            generated_at: Utc::now(),
            checked: 3,
            update_available: 1,
            already_in_target: 1,
            no_compatible: 1,
            update_links: vec!["https://modrinth.com/mod/A".to_string()],
            missing: vec!["1. Mod C (C)".to_string()],
            mods: vec![ModReport {
                project_id: "A".to_string(),
                title: "Mod A".to_string(),
                outcome: Outcome::UpdateAvailable,
                url: "https://modrinth.com/mod/A".to_string(),
            }],
        }
    }

    #[test]
    fn test_summary_lists_all_counts() {
        let summary = render_summary(&sample_report());

        assert!(summary.contains("Total mods checked: 3"));
        assert!(summary.contains("Mods with update for 1.21.8 but not in target collection: 1"));
        assert!(summary.contains("Mods already in target collection: 1"));
        assert!(summary.contains("Mods without update for 1.21.8: 1"));
        assert!(summary.contains("1. Mod C (C)"));
    }

    #[test]
    fn test_summary_omits_empty_missing_list() {
        let mut report = sample_report();
        report.missing.clear();
        report.no_compatible = 0;

        let summary = render_summary(&report);
        assert!(!summary.contains("Mods NOT available"));
    }

    #[test]
    fn test_report_round_trips_through_json() {
        let report = sample_report();
        let json = serde_json::to_string(&report).unwrap();
        let back: RunReport = serde_json::from_str(&json).unwrap();

        assert_eq!(back.checked, report.checked);
        assert_eq!(back.update_links, report.update_links);
        assert_eq!(back.mods[0].outcome, Outcome::UpdateAvailable);
    }

    #[test]
    fn test_export_writes_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        export_json(&sample_report(), &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"checked\": 3"));
        assert!(contents.contains("UpdateAvailable"));
    }
}
