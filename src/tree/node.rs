//! The tree entity shared by every parser, scanner and consumer

use std::ops::ControlFlow;

/// A file or directory in a layout forest.
///
/// Children are owned exclusively by their parent, so a forest is always a
/// strict tree. `path` is the slash-joined path from the forest root; parsers
/// fill it in while building, and validation recomputes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub name: String,
    pub is_dir: bool,
    pub path: String,
    pub children: Vec<Node>,
    /// Source line in the indentation form; `None` for map formats.
    pub line: Option<usize>,
}

impl Node {
    pub fn file(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: name.clone(),
            name,
            is_dir: false,
            children: Vec::new(),
            line: None,
        }
    }

    pub fn dir(name: impl Into<String>, children: Vec<Node>) -> Self {
        let name = name.into();
        let mut node = Self {
            path: name.clone(),
            name,
            is_dir: true,
            children,
            line: None,
        };
        node.rebase_paths();
        node
    }

    /// Append a child and return a mutable reference to it.
    ///
    /// The child's path is derived from this node's path.
    pub fn add_child(&mut self, name: impl Into<String>, is_dir: bool) -> &mut Node {
        let name = name.into();
        let child = Node {
            path: join_path(&self.path, &name),
            name,
            is_dir,
            children: Vec::new(),
            line: None,
        };
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    pub fn find_child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Total number of nodes in this subtree, including this one.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Node::count).sum::<usize>()
    }

    /// Visit this subtree in pre-order, stopping at the first `Break`.
    pub fn walk<B>(&self, visit: &mut impl FnMut(&Node) -> ControlFlow<B>) -> ControlFlow<B> {
        visit(self)?;
        for child in &self.children {
            child.walk(visit)?;
        }
        ControlFlow::Continue(())
    }

    /// Recompute descendant paths from this node's current path.
    fn rebase_paths(&mut self) {
        for child in &mut self.children {
            child.path = join_path(&self.path, &child.name);
            child.rebase_paths();
        }
    }
}

/// Join a parent path and a name with `/`; an empty parent yields the name.
pub fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}

/// Count the nodes of a whole forest.
pub fn count_nodes(forest: &[Node]) -> usize {
    forest.iter().map(Node::count).sum()
}

/// Count directories and files in a forest, as `(dirs, files)`.
pub fn count_kinds(forest: &[Node]) -> (usize, usize) {
    let mut dirs = 0;
    let mut files = 0;
    for root in forest {
        let _ = root.walk(&mut |node: &Node| -> ControlFlow<()> {
            if node.is_dir {
                dirs += 1;
            } else {
                files += 1;
            }
            ControlFlow::Continue(())
        });
    }
    (dirs, files)
}
