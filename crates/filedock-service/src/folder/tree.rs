//! Folder tree for hierarchical display.

use filedock_core::result::AppResult;
use filedock_entity::folder::FolderTree;

use super::service::FolderService;

impl FolderService {
    /// Builds the nested folder tree with per-folder file counts.
    pub async fn folder_tree(&self) -> AppResult<FolderTree> {
        let (folders, counts) =
            tokio::try_join!(self.folders.find_all(), self.files.count_by_folder())?;
        Ok(FolderTree::build(folders, &counts))
    }
}
