use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One run's worth of migration parameters, passed explicitly to every
/// component - no process-wide state.
#[derive(Debug, Clone)]
pub struct MigrationRequest {
    /// Collection whose mods are being checked
    pub source_collection: String,
    /// Collection that already-migrated mods live in
    pub target_collection: String,
    /// Game version the user is currently playing on
    pub current_version: String,
    /// Game version to check for updates
    pub target_version: String,
    /// Loader the mods must support (e.g. "fabric", "neoforge")
    pub loader: String,
}

/// A published release reduced to the two fields classification needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRecord {
    pub game_versions: Vec<String>,
    pub loaders: Vec<String>,
}

impl From<modmigrate_api::ProjectVersion> for VersionRecord {
    fn from(version: modmigrate_api::ProjectVersion) -> Self {
        Self {
            game_versions: version.game_versions,
            loaders: version.loaders,
        }
    }
}

/// Where a source mod landed after checking versions and membership
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Outcome {
    /// Compatible with the target version and already in the target collection
    AlreadyInTarget,
    /// Compatible with the target version but not yet migrated
    UpdateAvailable,
    /// No release matches the target version + loader pair
    NoCompatibleVersion,
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::AlreadyInTarget => "Already in target collection",
            Outcome::UpdateAvailable => "Update available",
            Outcome::NoCompatibleVersion => "No compatible version",
        }
    }

    /// Header line written above a journal entry for this outcome
    pub fn log_prefix(&self, target_version: &str) -> String {
        match self {
            Outcome::AlreadyInTarget => "⏩ ALREADY IN TARGET COLLECTION:".to_string(),
            Outcome::UpdateAvailable => format!(
                "✅ HAS {} VERSION UPDATE (BUT NOT IN TARGET COLLECTION):",
                target_version
            ),
            Outcome::NoCompatibleVersion => "❌ NO COMPATIBLE VERSION:".to_string(),
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Per-mod result of a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModReport {
    pub project_id: String,
    pub title: String,
    pub outcome: Outcome,
    pub url: String,
}

/// Everything a run produced, ready for rendering or export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub source_collection: String,
    pub target_collection: String,
    pub current_version: String,
    pub target_version: String,
    pub loader: String,
    pub generated_at: DateTime<Utc>,

    pub checked: usize,
    pub update_available: usize,
    pub already_in_target: usize,
    pub no_compatible: usize,

    /// Mod page links for everything classified `UpdateAvailable`
    pub update_links: Vec<String>,
    /// Pre-numbered "n. Title (id)" lines for the no-update list
    pub missing: Vec<String>,
    /// Per-mod results in source collection order
    pub mods: Vec<ModReport>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_prefix_mentions_target_version() {
        let prefix = Outcome::UpdateAvailable.log_prefix("1.21.8");
        assert!(prefix.contains("1.21.8"));
        assert!(prefix.contains("NOT IN TARGET COLLECTION"));
    }

    #[test]
    fn test_already_in_target_prefix_is_static() {
        assert_eq!(
            Outcome::AlreadyInTarget.log_prefix("1.21.8"),
            "⏩ ALREADY IN TARGET COLLECTION:"
        );
    }

    #[test]
    fn test_outcome_serializes_by_name() {
        let json = serde_json::to_string(&Outcome::NoCompatibleVersion).unwrap();
        assert_eq!(json, "\"NoCompatibleVersion\"");
    }
}
