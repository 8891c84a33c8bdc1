//! Folder tree structures for hierarchical display.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::model::Folder;

/// A node in a folder tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderNode {
    pub id: Uuid,
    pub name: String,
    pub path: String,
    pub parent_id: Option<Uuid>,
    /// Number of files directly in this folder.
    pub file_count: u64,
    /// Child folder nodes, sorted by name.
    pub children: Vec<FolderNode>,
}

/// The whole folder hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderTree {
    /// Root-level folders, sorted by name.
    pub roots: Vec<FolderNode>,
    /// Files at the root level.
    pub root_file_count: u64,
    /// Total number of folders in the tree.
    pub total_folders: u64,
}

impl FolderTree {
    /// Build the nested tree from a flat folder list.
    ///
    /// `file_counts` maps a folder id to the number of files it holds; the
    /// `None` key counts root-level files. A folder whose parent is not in
    /// the list is placed at the root. Depth is bounded by the heap, not
    /// the stack.
    pub fn build(folders: Vec<Folder>, file_counts: &HashMap<Option<Uuid>, u64>) -> Self {
        let total_folders = folders.len() as u64;
        let known: HashSet<Uuid> = folders.iter().map(|f| f.id).collect();

        let mut by_parent: HashMap<Option<Uuid>, Vec<Folder>> = HashMap::new();
        for folder in folders {
            let parent = folder.parent_id.filter(|p| known.contains(p));
            by_parent.entry(parent).or_default().push(folder);
        }

        let mut roots = Vec::new();
        let mut top_level = take_level(None, &mut by_parent);
        let mut stack: Vec<Pending> = Vec::new();

        loop {
            let next = match stack.last_mut() {
                Some(open) => open.remaining.next(),
                None => top_level.next(),
            };
            if let Some(folder) = next {
                let remaining = take_level(Some(folder.id), &mut by_parent);
                stack.push(Pending {
                    folder,
                    remaining,
                    children: Vec::new(),
                });
                continue;
            }

            let Some(done) = stack.pop() else { break };
            let node = done.into_node(file_counts);
            match stack.last_mut() {
                Some(parent) => parent.children.push(node),
                None => roots.push(node),
            }
        }

        Self {
            roots,
            root_file_count: file_counts.get(&None).copied().unwrap_or(0),
            total_folders,
        }
    }
}

/// A folder whose children are still being assembled.
struct Pending {
    folder: Folder,
    remaining: std::vec::IntoIter<Folder>,
    children: Vec<FolderNode>,
}

impl Pending {
    fn into_node(self, file_counts: &HashMap<Option<Uuid>, u64>) -> FolderNode {
        let folder = self.folder;
        FolderNode {
            file_count: file_counts.get(&Some(folder.id)).copied().unwrap_or(0),
            id: folder.id,
            name: folder.name,
            path: folder.path,
            parent_id: folder.parent_id,
            children: self.children,
        }
    }
}

/// Children of `parent`, sorted by name.
fn take_level(
    parent: Option<Uuid>,
    by_parent: &mut HashMap<Option<Uuid>, Vec<Folder>>,
) -> std::vec::IntoIter<Folder> {
    let mut level = by_parent.remove(&parent).unwrap_or_default();
    level.sort_by(|a, b| a.name.cmp(&b.name));
    level.into_iter()
}
