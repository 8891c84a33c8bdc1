//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::path;

/// A folder in the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    /// Unique folder identifier.
    pub id: Uuid,
    /// Folder name (a single path segment).
    pub name: String,
    /// Materialized path, e.g. `Docs/Reports`.
    pub path: String,
    /// Parent folder ID (null for root-level folders).
    pub parent_id: Option<Uuid>,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    /// Whether `other` lies strictly below this folder.
    pub fn is_ancestor_of(&self, other: &Folder) -> bool {
        path::is_descendant(&other.path, &self.path)
    }
}

/// Data required to create a new folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateFolder {
    pub name: String,
    pub path: String,
    pub parent_id: Option<Uuid>,
}

/// A rename or move of one folder together with the path rewrite that
/// must reach every descendant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderRelocation {
    /// The folder being renamed or moved.
    pub id: Uuid,
    /// Its new name (unchanged on a move).
    pub name: String,
    /// Its new parent (unchanged on a rename).
    pub parent_id: Option<Uuid>,
    /// Path before the change; descendants are found under `old_path/`.
    pub old_path: String,
    /// Path after the change.
    pub new_path: String,
}
