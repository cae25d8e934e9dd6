//! Depth-first traversal of nested entity trees (sources, sections).

use std::collections::HashSet;

use nx_core::Id;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkNode {
    pub id: Id,
    /// 0 for the roots handed to [`TreeWalk::new`].
    pub depth: usize,
}

/// Explicit-stack walk over a tree whose children are discovered lazily.
///
/// Nodes come out in declaration order, parents before children. An id is
/// yielded at most once, so a malformed parent link cannot loop forever.
#[derive(Debug, Default)]
pub struct TreeWalk {
    stack: Vec<WalkNode>,
    visited: HashSet<Id>,
}

impl TreeWalk {
    pub fn new(roots: &[Id]) -> Self {
        let mut walk = Self::default();
        walk.push_children(roots, 0);
        walk
    }

    /// Next node to visit, skipping ids already seen.
    pub fn pop(&mut self) -> Option<WalkNode> {
        while let Some(node) = self.stack.pop() {
            if self.visited.insert(node.id) {
                return Some(node);
            }
            tracing::debug!(id = %node.id, depth = node.depth, "skipping revisited entity");
        }
        None
    }

    /// Queue the children of a node visited at `parent_depth`.
    pub fn descend(&mut self, children: &[Id], parent_depth: usize) {
        self.push_children(children, parent_depth + 1);
    }

    fn push_children(&mut self, children: &[Id], depth: usize) {
        self.stack
            .extend(children.iter().rev().map(|&id| WalkNode { id, depth }));
    }
}
