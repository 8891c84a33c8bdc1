//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A file record. The payload itself lives in the object store under `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct File {
    /// Unique file identifier.
    pub id: Uuid,
    /// Generated storage key (`<uuid>-<sanitized original name>`).
    pub name: String,
    /// The file name as uploaded or last renamed by the user.
    pub original_name: String,
    /// MIME type reported at upload.
    pub mime_type: String,
    /// Payload size in bytes.
    pub size: i64,
    /// Object store locator (`/<bucket>/<name>`).
    pub path: String,
    /// Owning folder; `None` is the root level.
    #[serde(with = "super::folder_ref")]
    pub folder_id: Option<Uuid>,
    /// When the file was created.
    pub created_at: DateTime<Utc>,
    /// When the file was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new file record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateFile {
    /// Storage key.
    pub name: String,
    /// User-facing file name.
    pub original_name: String,
    /// MIME type.
    pub mime_type: String,
    /// Size in bytes.
    pub size: i64,
    /// Object store locator.
    pub path: String,
    /// Owning folder.
    pub folder_id: Option<Uuid>,
}

/// Changes applied to an existing file record in one update.
///
/// `folder_id` is doubly optional: `None` leaves the folder alone,
/// `Some(None)` moves the file to the root level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileChanges {
    pub folder_id: Option<Option<Uuid>>,
    pub original_name: Option<String>,
}

impl FileChanges {
    /// Whether applying these changes would modify anything.
    pub fn is_empty(&self) -> bool {
        self.folder_id.is_none() && self.original_name.is_none()
    }
}

/// Which files a listing should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FolderFilter {
    /// Every file.
    #[default]
    All,
    /// Files at the root level.
    Root,
    /// Files in one folder.
    Folder(Uuid),
}

impl FolderFilter {
    /// Whether a file with the given owning folder passes the filter.
    pub fn matches(&self, folder_id: Option<Uuid>) -> bool {
        match self {
            Self::All => true,
            Self::Root => folder_id.is_none(),
            Self::Folder(id) => folder_id == Some(*id),
        }
    }
}

impl From<Option<Uuid>> for FolderFilter {
    fn from(folder: Option<Uuid>) -> Self {
        match folder {
            Some(id) => Self::Folder(id),
            None => Self::Root,
        }
    }
}
