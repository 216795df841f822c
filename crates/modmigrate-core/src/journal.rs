use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::models::MigrationRequest;
use crate::Result;

/// Log file for mods that have a target-version release but are not in
/// the target collection yet
pub const UPDATE_AVAILABLE_LOG: &str = "has_target_version_mods.txt";
/// Log file for mods that are already in the target collection
pub const ALREADY_IN_TARGET_LOG: &str = "already_in_target_collection.txt";

/// Which of the two journal files an entry goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JournalFile {
    UpdateAvailable,
    AlreadyInTarget,
}

impl JournalFile {
    pub fn file_name(&self) -> &'static str {
        match self {
            JournalFile::UpdateAvailable => UPDATE_AVAILABLE_LOG,
            JournalFile::AlreadyInTarget => ALREADY_IN_TARGET_LOG,
        }
    }
}

/// Append-only, numbered, timestamped run log.
///
/// Each file keeps its own sequence counter, derived by counting the
/// numbered entries already in the file - so numbering continues across
/// runs without any extra state. Entries are never rewritten or
/// truncated, only appended, and each append uses a scoped handle that
/// closes on drop. Every entry is mirrored to stdout so the console
/// shows the same text the file got.
pub struct Journal {
    dir: PathBuf,
    site_url: String,
    current_version: String,
    target_version: String,
    loader: String,
}

impl Journal {
    pub fn new(dir: impl Into<PathBuf>, site_url: impl Into<String>, request: &MigrationRequest) -> Self {
        Self {
            dir: dir.into(),
            site_url: site_url.into(),
            current_version: request.current_version.clone(),
            target_version: request.target_version.clone(),
            loader: request.loader.clone(),
        }
    }

    /// Canonical mod page link for a project id
    pub fn mod_url(&self, project_id: &str) -> String {
        format!("{}/mod/{}", self.site_url, project_id)
    }

    /// Append one entry and mirror it to stdout. Returns the entry's
    /// sequence number.
    pub fn append(
        &self,
        file: JournalFile,
        project_id: &str,
        mod_name: &str,
        message_prefix: &str,
    ) -> Result<u64> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file.file_name());

        let entry_number = next_entry_number(&path)?;
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");

        let body = format!(
            "{}\n\
             🔹 MOD_NAME: {}\n\
             🆔 MOD_ID: {}\n\
             🎮 CURRENT_GAME_VERSION: {}\n\
             🎯 TARGET_GAME_VERSION: {}\n\
             🛠️ LOADER: {}\n\
             🔗 MOD_LINK: {}\n",
            message_prefix,
            mod_name,
            project_id,
            self.current_version,
            self.target_version,
            self.loader.to_uppercase(),
            self.mod_url(project_id),
        );

        // Scoped append handle - closed when it drops, so a crash
        // mid-run leaves the file readable
        let mut handle = OpenOptions::new().create(true).append(true).open(&path)?;
        handle.write_all(format!("{}. [{}]\n{}\n\n", entry_number, timestamp, body).as_bytes())?;

        println!("{}. [{}]\n{}", entry_number, timestamp, body);

        Ok(entry_number)
    }
}

/// Next sequence number for a journal file: count the numbered entries
/// already present and add one. An O(file-length) rescan per append,
/// which is fine at this volume - the files are small append-only text.
fn next_entry_number(path: &Path) -> Result<u64> {
    if !path.exists() {
        return Ok(1);
    }

    let contents = std::fs::read_to_string(path)?;
    let existing = contents
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            trimmed.starts_with(|c: char| c.is_ascii_digit()) && trimmed.contains(". [")
        })
        .count() as u64;

    Ok(existing + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> MigrationRequest {
        MigrationRequest {
            source_collection: "HO2OnfaY".to_string(),
            target_collection: "WiQSfz9H".to_string(),
            current_version: "1.21.6".to_string(),
            target_version: "1.21.8".to_string(),
            loader: "fabric".to_string(),
        }
    }

    #[test]
    fn test_first_entry_is_numbered_one() {
        let dir = tempfile::tempdir().unwrap();
        let journal = Journal::new(dir.path(), "https://modrinth.com", &request());

        let n = journal
            .append(JournalFile::UpdateAvailable, "AANobbMI", "Sodium", "✅ PREFIX:")
            .unwrap();

        assert_eq!(n, 1);
    }

    #[test]
    fn test_numbers_increase_within_a_run() {
        let dir = tempfile::tempdir().unwrap();
        let journal = Journal::new(dir.path(), "https://modrinth.com", &request());

        for expected in 1..=3 {
            let n = journal
                .append(JournalFile::UpdateAvailable, "AANobbMI", "Sodium", "✅ PREFIX:")
                .unwrap();
            assert_eq!(n, expected);
        }
    }

    #[test]
    fn test_numbering_resumes_across_journal_instances() {
        let dir = tempfile::tempdir().unwrap();

        let first = Journal::new(dir.path(), "https://modrinth.com", &request());
        first
            .append(JournalFile::AlreadyInTarget, "P7dR8mSH", "Fabric API", "⏩ PREFIX:")
            .unwrap();
        first
            .append(JournalFile::AlreadyInTarget, "gvQqBUqZ", "Lithium", "⏩ PREFIX:")
            .unwrap();

        // New instance over the same directory, as a later run would be
        let second = Journal::new(dir.path(), "https://modrinth.com", &request());
        let n = second
            .append(JournalFile::AlreadyInTarget, "AANobbMI", "Sodium", "⏩ PREFIX:")
            .unwrap();

        assert_eq!(n, 3);
    }

    #[test]
    fn test_counters_are_independent_per_file() {
        let dir = tempfile::tempdir().unwrap();
        let journal = Journal::new(dir.path(), "https://modrinth.com", &request());

        journal
            .append(JournalFile::UpdateAvailable, "AANobbMI", "Sodium", "✅ PREFIX:")
            .unwrap();
        journal
            .append(JournalFile::UpdateAvailable, "gvQqBUqZ", "Lithium", "✅ PREFIX:")
            .unwrap();

        let n = journal
            .append(JournalFile::AlreadyInTarget, "P7dR8mSH", "Fabric API", "⏩ PREFIX:")
            .unwrap();

        assert_eq!(n, 1);
    }

    #[test]
    fn test_entry_carries_all_fields() {
        let dir = tempfile::tempdir().unwrap();
        let journal = Journal::new(dir.path(), "https://modrinth.com", &request());

        journal
            .append(JournalFile::UpdateAvailable, "AANobbMI", "Sodium", "✅ PREFIX:")
            .unwrap();

        let contents =
            std::fs::read_to_string(dir.path().join(UPDATE_AVAILABLE_LOG)).unwrap();
        assert!(contents.starts_with("1. ["));
        assert!(contents.contains("✅ PREFIX:"));
        assert!(contents.contains("MOD_NAME: Sodium"));
        assert!(contents.contains("MOD_ID: AANobbMI"));
        assert!(contents.contains("CURRENT_GAME_VERSION: 1.21.6"));
        assert!(contents.contains("TARGET_GAME_VERSION: 1.21.8"));
        assert!(contents.contains("LOADER: FABRIC"));
        assert!(contents.contains("MOD_LINK: https://modrinth.com/mod/AANobbMI"));
        // Blank separator after the entry
        assert!(contents.ends_with("\n\n\n"));
    }

    #[test]
    fn test_unnumbered_lines_do_not_count() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path()).unwrap();
        let path = dir.path().join(ALREADY_IN_TARGET_LOG);
        // Hand-written header plus one real entry
        std::fs::write(
            &path,
            "log opened\n1. [2025-01-01 00:00:00]\nsome entry\n\n2025 was a year\n",
        )
        .unwrap();

        let journal = Journal::new(dir.path(), "https://modrinth.com", &request());
        let n = journal
            .append(JournalFile::AlreadyInTarget, "AANobbMI", "Sodium", "⏩ PREFIX:")
            .unwrap();

        // Only the "1. [" line counts; "2025 was a year" has a digit
        // but no ". [" framing
        assert_eq!(n, 2);
    }

    #[test]
    fn test_append_never_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let journal = Journal::new(dir.path(), "https://modrinth.com", &request());

        journal
            .append(JournalFile::UpdateAvailable, "AANobbMI", "Sodium", "✅ PREFIX:")
            .unwrap();
        let after_first =
            std::fs::read_to_string(dir.path().join(UPDATE_AVAILABLE_LOG)).unwrap();

        journal
            .append(JournalFile::UpdateAvailable, "gvQqBUqZ", "Lithium", "✅ PREFIX:")
            .unwrap();
        let after_second =
            std::fs::read_to_string(dir.path().join(UPDATE_AVAILABLE_LOG)).unwrap();

        assert!(after_second.starts_with(&after_first));
        assert!(after_second.len() > after_first.len());
    }
}
