//! Installer directory tree synthesis.
//!
//! Turns a flat list of prefix-relative file paths into a tree of directory
//! and component nodes. Every directory path gets exactly one node; files
//! sharing a directory hang off the same node regardless of input order.
//! Distinct paths never share a directory, component or file identifier.

use crate::constants::{WIX_ROOT_DIR_ID, WIX_ROOT_DIR_NAME};
use crate::error::{PackError, PackResult};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Index of a node inside a [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// What a node represents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Installer root.
    Root,
    /// A directory.
    Directory,
    /// A component carrying one file.
    Component {
        /// Component GUID.
        guid: Uuid,
        /// File identifier, stricter than the component identifier.
        file_id: String,
        /// Location of the file on the packaging host.
        source: String,
    },
}

/// A node of the installer tree.
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Identifier derived from `path`.
    pub id: String,
    /// Display name (last path segment).
    pub name: String,
    /// Normalized prefix-relative path; empty for the root.
    pub path: String,
    /// Node kind.
    pub kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena of nodes rooted at the installer root.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<TreeNode>,
}

/// How component GUIDs are chosen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GuidPolicy {
    /// Fresh random GUID per component on every build.
    #[default]
    Random,
    /// Name-based GUID derived from a seed (usually the package name) and the path.
    Stable(String),
}

/// Builds a [`Tree`] from file paths.
#[derive(Debug)]
pub struct TreeBuilder {
    tree: Tree,
    directories: HashMap<String, NodeId>,
    files: HashSet<String>,
    directory_ids: HashMap<String, String>,
    component_ids: HashMap<String, String>,
    file_ids: HashMap<String, String>,
    source_root: String,
    guid_policy: GuidPolicy,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Tree {
    /// The root node id.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Access a node.
    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    /// Children of a node in insertion order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Parent of a node; `None` for the root.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds only the root.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Find the directory node for `path` (`""` is the root).
    pub fn directory(&self, path: &str) -> Option<NodeId> {
        self.ids().find(|id| {
            let node = self.node(*id);
            node.path == path && matches!(node.kind, NodeKind::Root | NodeKind::Directory)
        })
    }

    /// Directory nodes, root excluded.
    pub fn directories(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes
            .iter()
            .filter(|n| matches!(n.kind, NodeKind::Directory))
    }

    /// Component nodes.
    pub fn components(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes
            .iter()
            .filter(|n| matches!(n.kind, NodeKind::Component { .. }))
    }

    fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    fn push(&mut self, parent: NodeId, node: TreeNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(TreeNode {
            parent: Some(parent),
            ..node
        });
        self.nodes[parent.0].children.push(id);
        id
    }
}

impl TreeNode {
    fn new(id: String, name: String, path: String, kind: NodeKind) -> Self {
        Self {
            id,
            name,
            path,
            kind,
            parent: None,
            children: Vec::new(),
        }
    }
}

impl GuidPolicy {
    fn guid_for(&self, path: &str) -> Uuid {
        match self {
            GuidPolicy::Random => Uuid::new_v4(),
            GuidPolicy::Stable(seed) => {
                Uuid::new_v5(&Uuid::NAMESPACE_URL, format!("{}/{}", seed, path).as_bytes())
            }
        }
    }
}

impl TreeBuilder {
    /// Create a builder whose file sources live under `source_root`.
    pub fn new(source_root: impl Into<String>) -> Self {
        let root = TreeNode::new(
            WIX_ROOT_DIR_ID.to_string(),
            WIX_ROOT_DIR_NAME.to_string(),
            String::new(),
            NodeKind::Root,
        );

        let mut directories = HashMap::new();
        directories.insert(String::new(), NodeId(0));

        let mut directory_ids = HashMap::new();
        directory_ids.insert(WIX_ROOT_DIR_ID.to_string(), String::new());

        Self {
            tree: Tree { nodes: vec![root] },
            directories,
            files: HashSet::new(),
            directory_ids,
            component_ids: HashMap::new(),
            file_ids: HashMap::new(),
            source_root: source_root.into(),
            guid_policy: GuidPolicy::default(),
        }
    }

    /// Set the component GUID policy.
    pub fn with_guid_policy(mut self, policy: GuidPolicy) -> Self {
        self.guid_policy = policy;
        self
    }

    /// Add every path and return the finished tree.
    pub fn build<S: AsRef<str>>(mut self, paths: &[S]) -> PackResult<Tree> {
        for path in paths {
            self.add_file(path.as_ref())?;
        }
        Ok(self.finish())
    }

    /// Add one file, creating its directory chain on demand.
    ///
    /// Adding a path twice returns the directory node it lives in without
    /// creating a second component. Fails with [`PackError::IdCollision`] when
    /// the path's identifiers are already taken by a different path.
    pub fn add_file(&mut self, path: &str) -> PackResult<NodeId> {
        let path = normalize_path(path)?;
        let (dir, name) = match path.rsplit_once('/') {
            Some((dir, name)) => (dir.to_string(), name.to_string()),
            None => (String::new(), path.clone()),
        };

        let parent = self.ensure_directory(&dir)?;
        if self.files.contains(&path) {
            tracing::debug!("Skipping duplicate file {}", path);
            return Ok(parent);
        }

        let id = format_id(&path);
        let file_id = format_file_id(&path);
        claim(&mut self.component_ids, &id, &path)?;
        claim(&mut self.file_ids, &file_id, &path)?;
        self.files.insert(path.clone());

        let kind = NodeKind::Component {
            guid: self.guid_policy.guid_for(&path),
            file_id,
            source: join_source(&self.source_root, &path),
        };

        Ok(self.tree.push(parent, TreeNode::new(id, name, path, kind)))
    }

    /// Return the tree built so far.
    pub fn finish(self) -> Tree {
        self.tree
    }

    /// Return the node for `dir`, creating it and any missing ancestors.
    fn ensure_directory(&mut self, dir: &str) -> PackResult<NodeId> {
        if let Some(&id) = self.directories.get(dir) {
            return Ok(id);
        }

        let mut missing = vec![dir];
        let mut current = dir;
        let mut parent = loop {
            let up = parent_dir(current);
            if let Some(&id) = self.directories.get(up) {
                break id;
            }
            missing.push(up);
            current = up;
        };

        for path in missing.into_iter().rev() {
            let id = format_id(path);
            claim(&mut self.directory_ids, &id, path)?;

            let name = path.rsplit('/').next().unwrap_or(path).to_string();
            let node = TreeNode::new(id, name, path.to_string(), NodeKind::Directory);
            parent = self.tree.push(parent, node);
            self.directories.insert(path.to_string(), parent);
        }

        Ok(parent)
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Identifier for a prefix-relative path.
///
/// `/`, `-` and any character outside `[A-Za-z0-9_.]` become `_`. A leading
/// digit or dot gets a `_` prefix.
pub fn format_id(path: &str) -> String {
    synthesize_id(path, true)
}

/// Identifier for a file entry: like [`format_id`] with dots removed.
pub fn format_file_id(path: &str) -> String {
    synthesize_id(path, false)
}

fn synthesize_id(path: &str, keep_dots: bool) -> String {
    let mut id: String = path
        .chars()
        .filter(|c| keep_dots || *c != '.')
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if id.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        id.insert(0, '_');
    }
    id
}

/// Normalize a prefix-relative path to `/`-separated form.
pub fn normalize_path(path: &str) -> PackResult<String> {
    let mut segments = Vec::new();
    for segment in path.split(['/', '\\']) {
        match segment {
            "" | "." => continue,
            ".." => {
                return Err(PackError::InvalidPath {
                    path: path.to_string(),
                    reason: "parent directory references are not allowed".to_string(),
                });
            }
            s => segments.push(s),
        }
    }

    if segments.is_empty() {
        return Err(PackError::InvalidPath {
            path: path.to_string(),
            reason: "path is empty".to_string(),
        });
    }

    Ok(segments.join("/"))
}

/// Reserve `id` for `path` in `ids`.
fn claim(ids: &mut HashMap<String, String>, id: &str, path: &str) -> PackResult<()> {
    match ids.get(id) {
        Some(first) if first != path => Err(PackError::IdCollision {
            id: id.to_string(),
            first: first.clone(),
            second: path.to_string(),
        }),
        Some(_) => Ok(()),
        None => {
            ids.insert(id.to_string(), path.to_string());
            Ok(())
        }
    }
}

fn parent_dir(path: &str) -> &str {
    path.rsplit_once('/').map(|(parent, _)| parent).unwrap_or("")
}

/// Join `relative` onto `root`, following the separator style of `root`.
fn join_source(root: &str, relative: &str) -> String {
    if root.is_empty() {
        return relative.to_string();
    }

    if root.contains('\\') {
        format!(
            "{}\\{}",
            root.trim_end_matches('\\'),
            relative.replace('/', "\\")
        )
    } else {
        format!("{}/{}", root.trim_end_matches('/'), relative)
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn shape(tree: &Tree) -> (BTreeSet<String>, BTreeSet<(String, String)>) {
        let dirs = std::iter::once(tree.node(tree.root()))
            .chain(tree.directories())
            .map(|n| n.path.clone())
            .collect();

        let mut edges = BTreeSet::new();
        let mut stack = vec![tree.root()];
        while let Some(id) = stack.pop() {
            for &child in tree.children(id) {
                edges.insert((tree.node(id).path.clone(), tree.node(child).path.clone()));
                stack.push(child);
            }
        }
        (dirs, edges)
    }

    #[test]
    fn test_tree_is_order_independent() {
        let paths = ["lib/a.so", "lib/b.so", "bin/x"];
        let permutations = [
            [0, 1, 2],
            [0, 2, 1],
            [1, 0, 2],
            [1, 2, 0],
            [2, 0, 1],
            [2, 1, 0],
        ];

        let expected_dirs: BTreeSet<String> =
            ["", "lib", "bin"].iter().map(|s| s.to_string()).collect();
        let reference = shape(&TreeBuilder::new("/prefix").build(&paths).unwrap());
        assert_eq!(reference.0, expected_dirs);

        for order in permutations {
            let permuted: Vec<&str> = order.iter().map(|&i| paths[i]).collect();
            let tree = TreeBuilder::new("/prefix").build(&permuted).unwrap();
            assert_eq!(shape(&tree), reference);
            assert_eq!(tree.len(), 6);
        }
    }

    #[test]
    fn test_root_level_file() {
        let tree = TreeBuilder::new("/prefix").build(&["README"]).unwrap();

        assert_eq!(tree.len(), 2);
        assert_eq!(tree.directories().count(), 0);

        let children = tree.children(tree.root());
        assert_eq!(children.len(), 1);
        let readme = tree.node(children[0]);
        assert_eq!(readme.name, "README");
        assert_eq!(tree.parent(children[0]), Some(tree.root()));
        assert!(matches!(readme.kind, NodeKind::Component { .. }));
    }

    #[test]
    fn test_directory_nodes_created_once() {
        let tree = TreeBuilder::new("/prefix")
            .build(&[
                "share/locale/fr/LC_MESSAGES/a.mo",
                "share/locale/de/LC_MESSAGES/a.mo",
                "share/doc/a.txt",
                "share/locale/fr/LC_MESSAGES/b.mo",
            ])
            .unwrap();

        let dirs: Vec<_> = tree.directories().map(|n| n.path.as_str()).collect();
        let unique: BTreeSet<_> = dirs.iter().collect();
        assert_eq!(dirs.len(), unique.len());
        assert_eq!(dirs.len(), 7);

        let fr = tree.directory("share/locale/fr/LC_MESSAGES").unwrap();
        assert_eq!(tree.children(fr).len(), 2);

        let locale = tree.directory("share/locale").unwrap();
        assert_eq!(tree.node(locale).name, "locale");
        assert_eq!(tree.parent(locale), tree.directory("share"));
    }

    #[test]
    fn test_duplicate_files_attached_once() {
        let tree = TreeBuilder::new("/prefix")
            .build(&["lib/a.so", "lib/a.so", "./lib//a.so"])
            .unwrap();
        assert_eq!(tree.components().count(), 1);
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(format_id("lib/libfoo.so"), "lib_libfoo.so");
        assert_eq!(format_id("lib/libfoo.so"), format_id("lib/libfoo.so"));
        assert_eq!(format_id("lib/gstreamer-0.10"), "lib_gstreamer_0.10");
        assert_eq!(format_file_id("lib/gstreamer-0.10/x.dll"), "lib_gstreamer_010_xdll");
        assert_eq!(format_id("3rdparty/x"), "_3rdparty_x");
        assert_eq!(format_id(".hidden"), "_.hidden");
        assert_eq!(format_id("share/my file+1"), "share_my_file_1");
        assert_ne!(format_id("lib/Foo.so"), format_id("lib/foo.so"));
    }

    #[test]
    fn test_directory_id_collision() {
        let err = TreeBuilder::new("/prefix")
            .build(&["share/gst-doc/a.txt", "share/gst_doc/b.txt"])
            .unwrap_err();
        match err {
            PackError::IdCollision { id, first, second } => {
                assert_eq!(id, "share_gst_doc");
                assert_eq!(first, "share/gst-doc");
                assert_eq!(second, "share/gst_doc");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_component_id_collision() {
        let result = TreeBuilder::new("/prefix").build(&["lib/a-b.so", "lib/a_b.so"]);
        assert!(matches!(
            result,
            Err(PackError::IdCollision { ref id, .. }) if id == "lib_a_b.so"
        ));
    }

    #[test]
    fn test_file_id_collision() {
        let result = TreeBuilder::new("/prefix").build(&["lib/a.so", "lib/as.o"]);
        assert!(matches!(
            result,
            Err(PackError::IdCollision { ref id, .. }) if id == "lib_aso"
        ));
    }

    #[test]
    fn test_root_id_is_reserved() {
        let result = TreeBuilder::new("/prefix").build(&["TARGETDIR/x"]);
        assert!(matches!(result, Err(PackError::IdCollision { .. })));
    }

    #[test]
    fn test_component_fields() {
        let tree = TreeBuilder::new("/opt/prefix")
            .build(&["lib/libfoo-1.0.so"])
            .unwrap();
        let component = tree.components().next().unwrap();

        assert_eq!(component.id, "lib_libfoo_1.0.so");
        assert_eq!(component.name, "libfoo-1.0.so");
        match &component.kind {
            NodeKind::Component { file_id, source, .. } => {
                assert_eq!(file_id, "lib_libfoo_10so");
                assert_eq!(source, "/opt/prefix/lib/libfoo-1.0.so");
            }
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_windows_style_source_root() {
        let tree = TreeBuilder::new("z:\\opt\\prefix\\")
            .build(&["bin/foo.dll"])
            .unwrap();
        match &tree.components().next().unwrap().kind {
            NodeKind::Component { source, .. } => {
                assert_eq!(source, "z:\\opt\\prefix\\bin\\foo.dll")
            }
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_guid_policies() {
        let guid = |tree: &Tree| match &tree.components().next().unwrap().kind {
            NodeKind::Component { guid, .. } => *guid,
            _ => unreachable!(),
        };

        let a = TreeBuilder::new("").build(&["bin/x"]).unwrap();
        let b = TreeBuilder::new("").build(&["bin/x"]).unwrap();
        assert_ne!(guid(&a), guid(&b));

        let stable = GuidPolicy::Stable("pkg".to_string());
        let c = TreeBuilder::new("")
            .with_guid_policy(stable.clone())
            .build(&["bin/x"])
            .unwrap();
        let d = TreeBuilder::new("")
            .with_guid_policy(stable)
            .build(&["bin/x"])
            .unwrap();
        assert_eq!(guid(&c), guid(&d));
    }

    #[test]
    fn test_invalid_paths() {
        assert!(matches!(
            TreeBuilder::new("").build(&["../etc/passwd"]),
            Err(PackError::InvalidPath { .. })
        ));
        assert!(matches!(
            TreeBuilder::new("").build(&["/"]),
            Err(PackError::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("./lib//a.so").unwrap(), "lib/a.so");
        assert_eq!(normalize_path("lib\\a.so").unwrap(), "lib/a.so");
        assert_eq!(normalize_path("/README").unwrap(), "README");
    }
}
