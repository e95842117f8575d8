//! Folder tree over the changed files of a pull request.

use pr_review_json::ChangedFile;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

/// Index of a node inside its [`FileTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A folder in the changed-file tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderEntry {
    /// Repository-relative path of the folder.
    pub path: String,
    /// Display label. For a compressed chain this is the dot-joined label of
    /// every folder in the chain, e.g. `a.b.c`.
    pub label: String,
}

/// Payload of a tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileTreeItem {
    Folder(FolderEntry),
    File(ChangedFile),
}

/// Node in the file tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTreeNode {
    pub item: FileTreeItem,
    /// Back-reference for navigation; the parent owns this node, not the
    /// other way round.
    pub parent: Option<NodeId>,
    /// Children, folders first, then by case-insensitive label.
    pub children: Vec<NodeId>,
}

impl FileTreeNode {
    pub fn is_folder(&self) -> bool {
        matches!(self.item, FileTreeItem::Folder(_))
    }

    /// Display label (folder label or file name).
    pub fn label(&self) -> &str {
        match &self.item {
            FileTreeItem::Folder(folder) => &folder.label,
            FileTreeItem::File(file) => file.name(),
        }
    }
}

/// Folders-and-files forest built from a flat change list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileTree {
    nodes: Vec<FileTreeNode>,
    roots: Vec<NodeId>,
}

/// Pending child registration, keyed by folder path.
enum Pending {
    Folder(String),
    File(usize),
}

impl FileTree {
    /// Build the tree for `files`.
    ///
    /// Every ancestor folder of every file gets a node. Root entries are the
    /// top-level folders plus files at the repository root. Afterwards each
    /// chain of folders that only contain a single folder is collapsed into
    /// its first folder.
    ///
    /// Siblings are ordered by their final label, so a compressed folder
    /// sorts as `a.b.c`, not as `a`.
    pub fn build(files: &[ChangedFile]) -> Self {
        let mut children_of: HashMap<String, Vec<Pending>> = HashMap::new();
        let mut folders: BTreeSet<String> = BTreeSet::new();
        let mut root_files = Vec::new();

        for (index, file) in files.iter().enumerate() {
            let segments = file.path.segments();
            match segments.len() {
                0 => {
                    log::warn!("Skipping changed file without path segments: {:?}", file.path);
                }
                1 => root_files.push(index),
                len => {
                    let mut folder = segments[..len - 1].to_vec();
                    children_of
                        .entry(folder.join("/"))
                        .or_default()
                        .push(Pending::File(index));

                    while !folder.is_empty() {
                        folders.insert(folder.join("/"));
                        folder.pop();
                    }
                }
            }
        }

        for folder in &folders {
            if let Some((parent, _)) = folder.rsplit_once('/') {
                children_of
                    .entry(parent.to_string())
                    .or_default()
                    .push(Pending::Folder(folder.clone()));
            }
        }

        let mut tree = FileTree::default();

        let mut folder_ids: HashMap<&str, NodeId> = HashMap::new();
        for folder in &folders {
            let label = folder.rsplit('/').next().unwrap_or(folder).to_string();
            let id = tree.push(FileTreeItem::Folder(FolderEntry {
                path: folder.clone(),
                label,
            }));
            folder_ids.insert(folder.as_str(), id);
        }

        let mut file_ids: HashMap<usize, NodeId> = HashMap::new();
        for (index, file) in files.iter().enumerate() {
            if !file.path.segments().is_empty() {
                file_ids.insert(index, tree.push(FileTreeItem::File(file.clone())));
            }
        }

        for (folder, pending) in children_of {
            let Some(&parent) = folder_ids.get(folder.as_str()) else {
                continue;
            };
            let children: Vec<NodeId> = pending
                .iter()
                .filter_map(|child| match child {
                    Pending::Folder(path) => folder_ids.get(path.as_str()).copied(),
                    Pending::File(index) => file_ids.get(index).copied(),
                })
                .collect();
            for &child in &children {
                tree.nodes[child.0].parent = Some(parent);
            }
            tree.nodes[parent.0].children = children;
        }

        tree.roots = folders
            .iter()
            .filter(|folder| !folder.contains('/'))
            .filter_map(|folder| folder_ids.get(folder.as_str()).copied())
            .chain(root_files.iter().filter_map(|index| file_ids.get(index).copied()))
            .collect();

        tree.compress_chains();
        tree.sort_all();
        let tree = tree.compact();

        log::debug!(
            "Built file tree: {} nodes, {} roots from {} files",
            tree.nodes.len(),
            tree.roots.len(),
            files.len()
        );
        tree
    }

    fn push(&mut self, item: FileTreeItem) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(FileTreeNode {
            item,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// The only child of `id` if that child is a folder.
    fn single_folder_child(&self, id: NodeId) -> Option<NodeId> {
        match self.nodes[id.0].children.as_slice() {
            [only] if self.nodes[only.0].is_folder() => Some(*only),
            _ => None,
        }
    }

    /// Collapse single-folder chains, top-down from the roots.
    fn compress_chains(&mut self) {
        let mut stack = self.roots.clone();

        while let Some(id) = stack.pop() {
            if self.nodes[id.0].is_folder() {
                let mut labels = vec![self.nodes[id.0].label().to_string()];
                let mut last = id;
                while let Some(next) = self.single_folder_child(last) {
                    labels.push(self.nodes[next.0].label().to_string());
                    last = next;
                }

                if last != id {
                    let adopted = std::mem::take(&mut self.nodes[last.0].children);
                    for child in &adopted {
                        self.nodes[child.0].parent = Some(id);
                    }
                    self.nodes[id.0].children = adopted;
                    if let FileTreeItem::Folder(folder) = &mut self.nodes[id.0].item {
                        folder.label = labels.join(".");
                    }
                }
            }

            stack.extend(self.nodes[id.0].children.iter().copied());
        }
    }

    /// Folders before files, then case-insensitive label.
    fn compare(&self, a: NodeId, b: NodeId) -> Ordering {
        let (a, b) = (&self.nodes[a.0], &self.nodes[b.0]);
        b.is_folder()
            .cmp(&a.is_folder())
            .then_with(|| a.label().to_lowercase().cmp(&b.label().to_lowercase()))
            .then_with(|| a.label().cmp(b.label()))
    }

    fn sort_all(&mut self) {
        let mut roots = std::mem::take(&mut self.roots);
        roots.sort_by(|a, b| self.compare(*a, *b));
        self.roots = roots;

        for index in 0..self.nodes.len() {
            let mut children = std::mem::take(&mut self.nodes[index].children);
            children.sort_by(|a, b| self.compare(*a, *b));
            self.nodes[index].children = children;
        }
    }

    /// Drop nodes no longer reachable from the roots and renumber the rest in
    /// display order.
    fn compact(self) -> Self {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }

        let mut remap = vec![None; self.nodes.len()];
        for (new, old) in order.iter().enumerate() {
            remap[old.0] = Some(NodeId(new));
        }
        let map = |id: &NodeId| remap[id.0];

        let mut slots: Vec<Option<FileTreeNode>> = self.nodes.into_iter().map(Some).collect();
        let nodes = order
            .iter()
            .filter_map(|old| slots[old.0].take())
            .map(|node| FileTreeNode {
                parent: node.parent.as_ref().and_then(map),
                children: node.children.iter().filter_map(map).collect(),
                item: node.item,
            })
            .collect();
        let roots = self.roots.iter().filter_map(map).collect();

        FileTree { nodes, roots }
    }

    /// Root entries in display order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> &FileTreeNode {
        &self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn label(&self, id: NodeId) -> &str {
        self.nodes[id.0].label()
    }

    pub fn is_folder(&self, id: NodeId) -> bool {
        self.nodes[id.0].is_folder()
    }

    pub fn folder(&self, id: NodeId) -> Option<&FolderEntry> {
        match &self.nodes[id.0].item {
            FileTreeItem::Folder(folder) => Some(folder),
            FileTreeItem::File(_) => None,
        }
    }

    pub fn file(&self, id: NodeId) -> Option<&ChangedFile> {
        match &self.nodes[id.0].item {
            FileTreeItem::File(file) => Some(file),
            FileTreeItem::Folder(_) => None,
        }
    }

    /// Number of nodes (folders and files).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node holding the changed file with the given full path.
    pub fn find_file(&self, path: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|node| matches!(&node.item, FileTreeItem::File(f) if f.path.full == path))
            .map(NodeId)
    }

    /// File paths in display order.
    pub fn file_paths(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter_map(|node| match &node.item {
                FileTreeItem::File(file) => Some(file.path.full.as_str()),
                FileTreeItem::Folder(_) => None,
            })
            .collect()
    }
}

/// Memoized [`FileTree`] keyed by the generation of the change list it was
/// built from.
#[derive(Debug, Default)]
pub struct FileTreeCache {
    generation: Option<u64>,
    tree: FileTree,
}

impl FileTreeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tree for `files`, rebuilt only when `generation` differs from the one
    /// the cached tree was built for.
    pub fn get_or_build(&mut self, generation: u64, files: &[ChangedFile]) -> &FileTree {
        if self.generation != Some(generation) {
            log::debug!(
                "Rebuilding file tree for generation {} (cached: {:?})",
                generation,
                self.generation
            );
            self.tree = FileTree::build(files);
            self.generation = Some(generation);
        }
        &self.tree
    }

    /// Generation of the cached tree, if any.
    pub fn generation(&self) -> Option<u64> {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pr_review_json::{ChangeType, Path};
    use pretty_assertions::assert_eq;

    fn changed(path: &str) -> ChangedFile {
        let components: Vec<String> = path.split('/').map(str::to_string).collect();
        ChangedFile {
            kind: "MODIFY".to_string(),
            change_type: ChangeType::Modified,
            path: Path {
                full: path.to_string(),
                name: components.last().cloned().unwrap_or_default(),
                extension: None,
                components,
            },
            src_path: None,
        }
    }

    fn build(paths: &[&str]) -> FileTree {
        let files: Vec<ChangedFile> = paths.iter().map(|p| changed(p)).collect();
        FileTree::build(&files)
    }

    fn labels(tree: &FileTree, ids: &[NodeId]) -> Vec<String> {
        ids.iter().map(|id| tree.label(*id).to_string()).collect()
    }

    #[test]
    fn test_chain_is_compressed() {
        let tree = build(&["a/b/c/file.txt"]);

        assert_eq!(labels(&tree, tree.roots()), vec!["a.b.c"]);
        let root = tree.roots()[0];
        assert_eq!(tree.folder(root).map(|f| f.path.as_str()), Some("a"));

        let children = tree.children(root);
        assert_eq!(children.len(), 1);
        assert_eq!(tree.file(children[0]).map(|f| f.name()), Some("file.txt"));
        assert_eq!(tree.parent(children[0]), Some(root));
        // Intermediate folders are gone
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_no_compression_with_two_children() {
        let tree = build(&["x/file1.txt", "x/y/file2.txt"]);

        assert_eq!(labels(&tree, tree.roots()), vec!["x"]);
        let x = tree.roots()[0];
        assert_eq!(labels(&tree, tree.children(x)), vec!["y", "file1.txt"]);

        let y = tree.children(x)[0];
        assert!(tree.is_folder(y));
        assert_eq!(labels(&tree, tree.children(y)), vec!["file2.txt"]);
        assert_eq!(tree.parent(y), Some(x));
    }

    #[test]
    fn test_root_files_only() {
        let tree = build(&["README.md", "Cargo.toml"]);
        assert_eq!(labels(&tree, tree.roots()), vec!["Cargo.toml", "README.md"]);
        assert!(tree.roots().iter().all(|id| !tree.is_folder(*id)));
        assert!(tree.roots().iter().all(|id| tree.parent(*id).is_none()));
    }

    #[test]
    fn test_folders_sort_before_files() {
        let tree = build(&["Zeta.txt", "alpha/one.txt"]);
        assert_eq!(labels(&tree, tree.roots()), vec!["alpha", "Zeta.txt"]);

        let tree = build(&["alpha.txt", "Zeta/one.txt"]);
        assert_eq!(labels(&tree, tree.roots()), vec!["Zeta", "alpha.txt"]);
    }

    #[test]
    fn test_case_insensitive_order() {
        let tree = build(&["src/b.rs", "src/A.rs", "src/c.rs"]);
        let src = tree.roots()[0];
        assert_eq!(labels(&tree, tree.children(src)), vec!["A.rs", "b.rs", "c.rs"]);
    }

    #[test]
    fn test_single_prefix_folder_is_not_compressed() {
        let tree = build(&["src/main.rs", "src/lib.rs"]);
        assert_eq!(labels(&tree, tree.roots()), vec!["src"]);
        assert_eq!(
            labels(&tree, tree.children(tree.roots()[0])),
            vec!["lib.rs", "main.rs"]
        );
    }

    #[test]
    fn test_independent_chains() {
        let tree = build(&[
            "java/org/example/app/Main.java",
            "java/org/example/app/Util.java",
            "java/test/Spec.java",
            "docs/guide/intro.md",
        ]);

        assert_eq!(labels(&tree, tree.roots()), vec!["docs.guide", "java"]);
        let java = tree.roots()[1];
        assert_eq!(labels(&tree, tree.children(java)), vec!["org.example.app", "test"]);

        let app = tree.children(java)[0];
        assert_eq!(labels(&tree, tree.children(app)), vec!["Main.java", "Util.java"]);
        assert!(tree
            .children(app)
            .iter()
            .all(|child| tree.parent(*child) == Some(app)));
    }

    #[test]
    fn test_chain_stops_at_mixed_folder() {
        let tree = build(&["a/b/one.txt", "a/b/c/two.txt"]);
        assert_eq!(labels(&tree, tree.roots()), vec!["a.b"]);
        let ab = tree.roots()[0];
        assert_eq!(labels(&tree, tree.children(ab)), vec!["c", "one.txt"]);
    }

    #[test]
    fn test_resort_after_compression() {
        // "a" sorts before "a-b", but its compressed label "a.z" sorts after
        let tree = build(&["a/z/f.txt", "a-b/g.txt"]);
        assert_eq!(labels(&tree, tree.roots()), vec!["a-b", "a.z"]);
    }

    #[test]
    fn test_empty_input() {
        let tree = build(&[]);
        assert!(tree.is_empty());
        assert!(tree.roots().is_empty());
    }

    #[test]
    fn test_file_paths_in_display_order() {
        let tree = build(&["z.txt", "src/main.rs", "src/a/mod.rs"]);
        assert_eq!(tree.file_paths(), vec!["src/a/mod.rs", "src/main.rs", "z.txt"]);
        let main = tree.find_file("src/main.rs").unwrap();
        assert_eq!(tree.label(main), "main.rs");
        assert_eq!(tree.find_file("nope"), None);
    }

    #[test]
    fn test_cache_rebuilds_on_new_generation() {
        let mut cache = FileTreeCache::new();
        assert_eq!(cache.generation(), None);

        let first = vec![changed("a.txt")];
        assert_eq!(cache.get_or_build(1, &first).len(), 1);

        // Same generation: cached tree is returned even for a different list
        let second = vec![changed("a.txt"), changed("b.txt")];
        assert_eq!(cache.get_or_build(1, &second).len(), 1);

        assert_eq!(cache.get_or_build(2, &second).len(), 2);
        assert_eq!(cache.generation(), Some(2));
    }
}
