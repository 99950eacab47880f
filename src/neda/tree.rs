//! The top-level owning structure: an arena plus the root Container id, and
//! the Container-specific edit operations (add/remove/bracket matching).

use super::arena::{NedaArena, NodeId};
use super::cursor::Cursor;
use super::node::{self, BracketKind, NedaChild, NodeKind};

#[derive(Debug)]
pub struct NedaTree {
    pub arena: NedaArena,
    pub root: NodeId,
}

impl NedaTree {
    pub fn new() -> Self {
        let mut arena = NedaArena::new();
        let root = arena.alloc(NodeKind::Container(Vec::new()));
        node::compute_dimensions(&mut arena, root);
        Self { arena, root }
    }

    /// Allocates a fresh, empty operand container (used for fraction
    /// numerators/denominators, superscript bodies, matrix cells, etc).
    pub fn new_container(&mut self) -> NodeId {
        let id = self.arena.alloc(NodeKind::Container(Vec::new()));
        node::compute_dimensions(&mut self.arena, id);
        id
    }

    fn children(&self, container: NodeId) -> &[NedaChild] {
        match &self.arena.get(container).kind {
            NodeKind::Container(c) => c,
            _ => panic!("not a container"),
        }
    }

    pub fn child_count(&self, container: NodeId) -> usize {
        self.children(container).len()
    }

    pub fn child_at(&self, container: NodeId, index: usize) -> NedaChild {
        self.children(container)[index]
    }

    /// Sets the parent back-reference of a composite's direct operand
    /// children and of any node inserted into a container (invariant 2).
    fn adopt(&mut self, parent: NodeId, child: NedaChild) {
        if let NedaChild::Node(id) = child {
            self.arena.get_mut(id).parent = Some(parent);
        }
    }

    pub fn insert_at(&mut self, container: NodeId, index: usize, child: NedaChild) {
        self.adopt(container, child);
        match &mut self.arena.get_mut(container).kind {
            NodeKind::Container(children) => children.insert(index, child),
            _ => panic!("not a container"),
        }
        self.recompute_heights(container);
        node::recompute_upward(&mut self.arena, container);
    }

    pub fn push_char(&mut self, container: NodeId, b: u8) {
        let idx = self.child_count(container);
        self.insert_at(container, idx, NedaChild::Char(b));
    }

    pub fn push_str(&mut self, container: NodeId, s: &str) {
        for b in s.bytes() {
            self.push_char(container, b);
        }
    }

    /// Removes the child at `index` from `container` without destroying it,
    /// for relocating an operand into a newly built composite's slot (§4.2,
    /// the fraction key lifting a preceding run into its numerator).
    pub fn take_at(&mut self, container: NodeId, index: usize) -> NedaChild {
        let removed = match &mut self.arena.get_mut(container).kind {
            NodeKind::Container(children) => children.remove(index),
            _ => panic!("not a container"),
        };
        self.recompute_heights(container);
        node::recompute_upward(&mut self.arena, container);
        removed
    }

    /// Removes and destroys (transitively) the child at `index`.
    pub fn remove_at(&mut self, container: NodeId, index: usize) -> NedaChild {
        let removed = match &mut self.arena.get_mut(container).kind {
            NodeKind::Container(children) => children.remove(index),
            _ => panic!("not a container"),
        };
        if let NedaChild::Node(id) = removed {
            self.arena.free(id);
        }
        self.recompute_heights(container);
        node::recompute_upward(&mut self.arena, container);
        removed
    }

    /// Registers a composite node `id` as a child of `container` at
    /// `index`, wiring up its parent pointer. Used by insertion handlers
    /// that build a whole composite subtree first, then splice it in.
    pub fn insert_node_at(&mut self, container: NodeId, index: usize, id: NodeId) {
        self.insert_at(container, index, NedaChild::Node(id));
    }

    /// Matched-bracket auto-sizing (§4.1): scans a container's direct
    /// children for `LeftBracket`/`RightBracket` pairs (by a depth counter,
    /// exactly like the original's `Container::recomputeHeights`) and
    /// assigns each pair's height to the tallest expression strictly
    /// between them. An unmatched right bracket is left at its default
    /// size — it's a syntax atom, not a layout concern (§4.1).
    pub fn recompute_heights(&mut self, container: NodeId) {
        let children = self.children(container).to_vec();
        let mut stack: Vec<usize> = Vec::new();
        let mut pairs: Vec<(usize, usize)> = Vec::new();
        for (i, c) in children.iter().enumerate() {
            if let NedaChild::Node(id) = c {
                match &self.arena.get(*id).kind {
                    NodeKind::LeftBracket { .. } => stack.push(i),
                    NodeKind::RightBracket { .. } => {
                        if let Some(open) = stack.pop() {
                            pairs.push((open, i));
                        }
                    }
                    _ => {}
                }
            }
        }
        for (open, close) in pairs {
            let mut max_h = node::CONTAINER_EMPTY_HEIGHT;
            let mut max_top = node::CONTAINER_EMPTY_HEIGHT / 2;
            for c in &children[open + 1..close] {
                let (_, h, top) = match c {
                    NedaChild::Char(b) => {
                        let g = crate::glyph::glyph(*b);
                        (g.width, g.height, g.height / 2)
                    }
                    NedaChild::Node(id) => {
                        let geom = self.arena.get(*id).geom;
                        (geom.width, geom.height, geom.top_spacing)
                    }
                };
                max_h = max_h.max(h);
                max_top = max_top.max(top);
            }
            if let NedaChild::Node(open_id) = children[open] {
                let g = &mut self.arena.get_mut(open_id).geom;
                g.height = max_h;
                g.top_spacing = max_top;
            }
            if let NedaChild::Node(close_id) = children[close] {
                let g = &mut self.arena.get_mut(close_id).geom;
                g.height = max_h;
                g.top_spacing = max_top;
            }
        }
    }

    /// Allocates a matched `LeftBracket`/`RightBracket` node pair, unattached
    /// (the caller inserts each at the appropriate position once its
    /// contents are built, as the entry controller's bracket key does).
    pub fn bracket_pair(&mut self, kind: BracketKind) -> (NodeId, NodeId) {
        let left = self.arena.alloc(NodeKind::LeftBracket { kind });
        let right = self.arena.alloc(NodeKind::RightBracket { kind });
        node::compute_dimensions(&mut self.arena, left);
        node::compute_dimensions(&mut self.arena, right);
        (left, right)
    }

    pub fn default_cursor(&self) -> Cursor {
        Cursor { container: self.root, index: self.child_count(self.root) }
    }

    /// Deep-clones a composite subtree from `self` into `dst`'s arena,
    /// returning the clone's id. Used to give a stored function/variable
    /// body its own arena, independent of the entry controller's tree
    /// (which reuses its root container across lines).
    fn clone_subtree(&self, dst: &mut NedaTree, id: NodeId) -> NodeId {
        let kind = self.arena.get(id).kind.clone();
        let new_kind = match kind {
            NodeKind::Container(children) => {
                let cloned = children.iter().map(|c| self.clone_child(dst, *c)).collect();
                NodeKind::Container(cloned)
            }
            NodeKind::Fraction { num, den } => NodeKind::Fraction {
                num: self.clone_subtree(dst, num),
                den: self.clone_subtree(dst, den),
            },
            NodeKind::LeftBracket { kind } => NodeKind::LeftBracket { kind },
            NodeKind::RightBracket { kind } => NodeKind::RightBracket { kind },
            NodeKind::Radical { contents, n } => NodeKind::Radical {
                contents: self.clone_subtree(dst, contents),
                n: n.map(|n| self.clone_subtree(dst, n)),
            },
            NodeKind::Superscript { contents } => NodeKind::Superscript { contents: self.clone_subtree(dst, contents) },
            NodeKind::Subscript { contents } => NodeKind::Subscript { contents: self.clone_subtree(dst, contents) },
            NodeKind::Abs { contents } => NodeKind::Abs { contents: self.clone_subtree(dst, contents) },
            NodeKind::SigmaPi { is_product, start, finish, contents } => NodeKind::SigmaPi {
                is_product,
                start: self.clone_subtree(dst, start),
                finish: self.clone_subtree(dst, finish),
                contents: self.clone_subtree(dst, contents),
            },
            NodeKind::Matrix { m, n, cells } => NodeKind::Matrix {
                m,
                n,
                cells: cells.iter().map(|&c| self.clone_subtree(dst, c)).collect(),
            },
            NodeKind::Piecewise { values, conditions } => NodeKind::Piecewise {
                values: values.iter().map(|&v| self.clone_subtree(dst, v)).collect(),
                conditions: conditions.iter().map(|&c| self.clone_subtree(dst, c)).collect(),
            },
        };
        let new_id = dst.arena.alloc(new_kind);
        for child in dst.arena.get(new_id).kind.owned_children() {
            dst.arena.get_mut(child).parent = Some(new_id);
        }
        node::compute_dimensions(&mut dst.arena, new_id);
        new_id
    }

    fn clone_child(&self, dst: &mut NedaTree, child: NedaChild) -> NedaChild {
        match child {
            NedaChild::Char(b) => NedaChild::Char(b),
            NedaChild::Node(id) => NedaChild::Node(self.clone_subtree(dst, id)),
        }
    }

    /// Builds a freestanding tree holding a deep copy of
    /// `children[start..end]` as its root's contents (§4.3, function and
    /// variable bodies need to outlive the line they were entered on).
    pub fn snapshot(&self, children: &[NedaChild], start: usize, end: usize) -> NedaTree {
        let mut dst = NedaTree::new();
        let cloned: Vec<NedaChild> = children[start..end].iter().map(|c| self.clone_child(&mut dst, *c)).collect();
        match &mut dst.arena.get_mut(dst.root).kind {
            NodeKind::Container(c) => *c = cloned,
            _ => unreachable!(),
        }
        for c in dst.children(dst.root).to_vec() {
            if let NedaChild::Node(id) = c {
                dst.arena.get_mut(id).parent = Some(dst.root);
            }
        }
        dst.recompute_heights(dst.root);
        node::recompute_upward(&mut dst.arena, dst.root);
        dst
    }
}

impl Default for NedaTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_remove_chars() {
        let mut tree = NedaTree::new();
        tree.push_str(tree.root, "12");
        assert_eq!(tree.child_count(tree.root), 2);
        tree.remove_at(tree.root, 0);
        assert_eq!(tree.child_count(tree.root), 1);
        assert_eq!(tree.child_at(tree.root, 0), NedaChild::Char(b'2'));
    }

    #[test]
    fn bracket_pair_height_matches_tallest_between() {
        let mut tree = NedaTree::new();
        let left = tree.arena.alloc(NodeKind::LeftBracket { kind: BracketKind::Paren });
        let right = tree.arena.alloc(NodeKind::RightBracket { kind: BracketKind::Paren });
        let num = tree.new_container();
        let den = tree.new_container();
        tree.push_char(num, b'1');
        tree.push_char(den, b'2');
        node::compute_dimensions(&mut tree.arena, num);
        node::compute_dimensions(&mut tree.arena, den);
        let frac = tree.arena.alloc(NodeKind::Fraction { num, den });
        node::compute_dimensions(&mut tree.arena, frac);

        tree.insert_node_at(tree.root, 0, left);
        tree.insert_node_at(tree.root, 1, frac);
        tree.insert_node_at(tree.root, 2, right);

        let frac_h = tree.arena.get(frac).geom.height;
        assert_eq!(tree.arena.get(left).geom.height, frac_h);
        assert_eq!(tree.arena.get(right).geom.height, frac_h);
    }
}
