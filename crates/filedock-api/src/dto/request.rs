//! Request DTOs with validation.

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use filedock_entity::file::folder_ref;
use filedock_service::{CopyFile, UpdateFile};

/// Query string of `GET /api/files`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFilesQuery {
    /// Absent lists every file; `root` lists root-level files.
    pub folder_id: Option<String>,
}

/// Move and/or rename a file. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFileRequest {
    /// Target folder; `null` or `"root"` moves the file to the root level.
    #[serde(default, deserialize_with = "folder_ref::optional::deserialize")]
    pub folder_id: Option<Option<Uuid>>,
    /// New display name.
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,
}

impl From<UpdateFileRequest> for UpdateFile {
    fn from(req: UpdateFileRequest) -> Self {
        Self {
            folder_id: req.folder_id,
            name: req.name,
        }
    }
}

/// Copy a file. Absent fields inherit from the source.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CopyFileRequest {
    #[serde(default, deserialize_with = "folder_ref::optional::deserialize")]
    pub folder_id: Option<Option<Uuid>>,
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,
}

impl From<CopyFileRequest> for CopyFile {
    fn from(req: CopyFileRequest) -> Self {
        Self {
            folder_id: req.folder_id,
            name: req.name,
        }
    }
}

/// Create folder request.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest {
    /// Folder name.
    #[validate(length(min = 1, max = 255, message = "Folder name is required"))]
    pub name: String,
    /// Parent folder; absent or `null` creates a root folder.
    #[serde(default, deserialize_with = "folder_ref::deserialize")]
    pub parent_id: Option<Uuid>,
}

/// Rename folder request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RenameFolderRequest {
    #[validate(length(min = 1, max = 255, message = "Folder name is required"))]
    pub name: String,
}

/// Move folder request. `parentId` must be present; `null` or `"root"`
/// moves the folder to the root level.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MoveFolderRequest {
    #[serde(deserialize_with = "folder_ref::deserialize")]
    pub parent_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_file_request_distinguishes_null_from_absent() {
        let req: UpdateFileRequest = serde_json::from_str(r#"{"name":"a.txt"}"#).unwrap();
        assert_eq!(req.folder_id, None);

        let req: UpdateFileRequest = serde_json::from_str(r#"{"folderId":null}"#).unwrap();
        assert_eq!(req.folder_id, Some(None));

        let req: UpdateFileRequest = serde_json::from_str(r#"{"folderId":"root"}"#).unwrap();
        assert_eq!(req.folder_id, Some(None));

        let id = Uuid::new_v4();
        let req: UpdateFileRequest =
            serde_json::from_str(&format!(r#"{{"folderId":"{id}"}}"#)).unwrap();
        assert_eq!(req.folder_id, Some(Some(id)));
    }

    #[test]
    fn test_update_file_request_rejects_bad_id() {
        assert!(serde_json::from_str::<UpdateFileRequest>(r#"{"folderId":"nope"}"#).is_err());
    }

    #[test]
    fn test_empty_name_fails_validation() {
        let req: UpdateFileRequest = serde_json::from_str(r#"{"name":""}"#).unwrap();
        assert!(req.validate().is_err());

        let req: CreateFolderRequest = serde_json::from_str(r#"{"name":""}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_folder_parent_defaults_to_root() {
        let req: CreateFolderRequest = serde_json::from_str(r#"{"name":"Docs"}"#).unwrap();
        assert_eq!(req.parent_id, None);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_move_folder_requires_parent() {
        assert!(serde_json::from_str::<MoveFolderRequest>("{}").is_err());

        let req: MoveFolderRequest = serde_json::from_str(r#"{"parentId":null}"#).unwrap();
        assert_eq!(req.parent_id, None);
        let req: MoveFolderRequest = serde_json::from_str(r#"{"parentId":"root"}"#).unwrap();
        assert_eq!(req.parent_id, None);

        let id = Uuid::new_v4();
        let req: MoveFolderRequest =
            serde_json::from_value(serde_json::json!({ "parentId": id })).unwrap();
        assert_eq!(req.parent_id, Some(id));
    }
}
