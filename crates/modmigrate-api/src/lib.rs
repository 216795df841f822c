// API client for the Modrinth platform
pub mod modrinth;

// Re-export common types
pub use modrinth::{Collection, ModrinthClient, ModrinthError, Project, ProjectVersion};
