// The per-run orchestration loop
use std::collections::HashSet;

use chrono::Utc;
use tracing::{info, warn};

use crate::catalog::ProjectCatalog;
use crate::classify;
use crate::journal::{Journal, JournalFile};
use crate::models::{MigrationRequest, ModReport, Outcome, RunReport};
use crate::{Error, Result};

/// Drives one migration check: fetch both collections, classify every
/// source mod in order, journal the positive outcomes, and aggregate a
/// report.
///
/// Strictly sequential - one request in flight at a time, mods checked
/// in the order the source collection lists them.
pub struct MigrationEngine {
    catalog: Box<dyn ProjectCatalog>,
    journal: Journal,
}

impl MigrationEngine {
    pub fn new(catalog: Box<dyn ProjectCatalog>, journal: Journal) -> Self {
        Self { catalog, journal }
    }

    pub async fn run(&self, request: &MigrationRequest) -> Result<RunReport> {
        // Source collection is the one thing we cannot proceed without
        let source = self
            .catalog
            .collection_projects(&request.source_collection)
            .await
            .map_err(|e| {
                warn!("Source collection fetch failed: {}", e);
                Error::NotFound(format!("collection {}", request.source_collection))
            })?;

        println!("Mods in source collection: {:?}\n", source);
        println!("Total mods in source collection: {}\n", source.len());
        println!(
            "Processing all {} mods to check for {} compatibility...\n",
            source.len(),
            request.target_version
        );

        // Membership set is computed once per run; a missing target
        // collection degrades to an empty set rather than aborting
        let target_ids: HashSet<String> = match self
            .catalog
            .collection_projects(&request.target_collection)
            .await
        {
            Ok(ids) => ids.into_iter().collect(),
            Err(e) => {
                warn!("Target collection fetch failed: {}", e);
                println!("Target collection id={} not found", request.target_collection);
                HashSet::new()
            }
        };

        let mut report = RunReport {
            source_collection: request.source_collection.clone(),
            target_collection: request.target_collection.clone(),
            current_version: request.current_version.clone(),
            target_version: request.target_version.clone(),
            loader: request.loader.clone(),
            generated_at: Utc::now(),
            checked: source.len(),
            update_available: 0,
            already_in_target: 0,
            no_compatible: 0,
            update_links: Vec::new(),
            missing: Vec::new(),
            mods: Vec::new(),
        };

        for (idx, project_id) in source.iter().enumerate() {
            println!("Checking mod {}/{}: {}", idx + 1, source.len(), project_id);

            let outcome = self.classify_project(project_id, &target_ids, request).await;

            // Title is fetched lazily, after the decision - it is only
            // needed to make the logs readable
            let title = self.project_title(project_id).await;

            match outcome {
                Outcome::AlreadyInTarget => {
                    report.already_in_target += 1;
                    self.journal.append(
                        JournalFile::AlreadyInTarget,
                        project_id,
                        &title,
                        &outcome.log_prefix(&request.target_version),
                    )?;
                }
                Outcome::UpdateAvailable => {
                    report.update_available += 1;
                    self.journal.append(
                        JournalFile::UpdateAvailable,
                        project_id,
                        &title,
                        &outcome.log_prefix(&request.target_version),
                    )?;
                    report.update_links.push(self.journal.mod_url(project_id));
                }
                Outcome::NoCompatibleVersion => {
                    report.no_compatible += 1;
                    report
                        .missing
                        .push(format!("{}. {} ({})", report.no_compatible, title, project_id));
                }
            }

            report.mods.push(ModReport {
                project_id: project_id.clone(),
                title,
                outcome,
                url: self.journal.mod_url(project_id),
            });
        }

        info!(
            checked = report.checked,
            update_available = report.update_available,
            already_in_target = report.already_in_target,
            no_compatible = report.no_compatible,
            "run complete"
        );

        Ok(report)
    }

    /// Classify one project. A failed version fetch is fail-closed:
    /// treated as zero releases, hence no compatible version.
    async fn classify_project(
        &self,
        project_id: &str,
        target_ids: &HashSet<String>,
        request: &MigrationRequest,
    ) -> Outcome {
        let versions = match self.catalog.project_versions(project_id).await {
            Ok(versions) => versions,
            Err(e) => {
                warn!("Version fetch failed for {}: {}", project_id, e);
                Vec::new()
            }
        };

        let compatible =
            classify::is_compatible(&versions, &request.target_version, &request.loader);
        classify::classify(compatible, target_ids.contains(project_id))
    }

    async fn project_title(&self, project_id: &str) -> String {
        match self.catalog.project_title(project_id).await {
            Ok(Some(title)) => title,
            Ok(None) => "Unknown".to_string(),
            Err(e) => {
                warn!("Detail fetch failed for {}: {}", project_id, e);
                "Unknown".to_string()
            }
        }
    }
}
