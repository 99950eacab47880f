//! Cursor: a `(container, index)` pair that moves through the tree (§3, §4.1).

use super::arena::NodeId;
use super::node::{NedaChild, NodeKind};
use super::tree::NedaTree;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub container: NodeId,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorLocation {
    Start,
    End,
}

impl Cursor {
    /// `(x, y, width=2, height)` visual shape, per §4.1. Blinking is
    /// toggled externally by the controller's periodic tick; the cursor
    /// never owns a timer.
    pub fn visual_rect(&self, tree: &NedaTree) -> (i16, i16, u16, u16) {
        let geom = tree.arena.get(self.container).geom;
        let empty_h = super::node::CONTAINER_EMPTY_HEIGHT;
        // x offset: sum of widths of children before `index`, plus spacing.
        let mut x = geom.x;
        for i in 0..self.index {
            let (w, _, _) = child_dims(tree, self.container, i);
            x += w as i16 + super::node::CONTAINER_SPACING as i16;
        }
        (x, geom.y, 2, empty_h)
    }

    pub fn left(&mut self, tree: &NedaTree) {
        if self.index > 0 {
            self.index -= 1;
            return;
        }
        propagate_left(tree, self);
    }

    pub fn right(&mut self, tree: &NedaTree) {
        let len = tree.child_count(self.container);
        if self.index < len {
            self.index += 1;
            return;
        }
        propagate_right(tree, self);
    }

    pub fn up(&mut self, tree: &NedaTree) {
        delegate_vertical(tree, self, true);
    }

    pub fn down(&mut self, tree: &NedaTree) {
        delegate_vertical(tree, self, false);
    }
}

fn child_dims(tree: &NedaTree, container: NodeId, index: usize) -> (u16, u16, u16) {
    match tree.child_at(container, index) {
        NedaChild::Char(b) => {
            let g = crate::glyph::glyph(b);
            (g.width, g.height, g.height / 2)
        }
        NedaChild::Node(id) => {
            let geom = tree.arena.get(id).geom;
            (geom.width, geom.height, geom.top_spacing)
        }
    }
}

/// Places `cursor` at the start or end of `container`.
pub fn place_at(tree: &NedaTree, container: NodeId, location: CursorLocation) -> Cursor {
    let len = tree.child_count(container);
    Cursor { container, index: if location == CursorLocation::Start { 0 } else { len } }
}

/// Walks upward to find the composite node that owns `container` as one of
/// its operand slots, and its enclosing container, then places the cursor
/// just before (left) or after (right) that composite.
fn enclosing(tree: &NedaTree, container: NodeId) -> Option<(NodeId, usize)> {
    let owner = tree.arena.get(container).parent?;
    let grandparent = tree.arena.get(owner).parent?;
    let children = match &tree.arena.get(grandparent).kind {
        NodeKind::Container(c) => c,
        _ => return None,
    };
    let idx = children.iter().position(|c| matches!(c, NedaChild::Node(id) if *id == owner))?;
    Some((grandparent, idx))
}

fn propagate_left(tree: &NedaTree, cursor: &mut Cursor) {
    if let Some((parent_container, idx)) = enclosing(tree, cursor.container) {
        *cursor = Cursor { container: parent_container, index: idx };
    }
    // At the true top level, `left` at index 0 is a no-op (§8 boundary).
}

fn propagate_right(tree: &NedaTree, cursor: &mut Cursor) {
    if let Some((parent_container, idx)) = enclosing(tree, cursor.container) {
        *cursor = Cursor { container: parent_container, index: idx + 1 };
    }
}

/// Delegates up/down navigation to the parent composite's node type, per
/// the table in §4.1 (Fraction num/den, Superscript/Subscript to base,
/// SigmaPi body<->finish<->start cycle, Matrix/Piecewise cell grid).
fn delegate_vertical(tree: &NedaTree, cursor: &mut Cursor, up: bool) {
    let Some(owner) = tree.arena.get(cursor.container).parent else {
        return;
    };
    match &tree.arena.get(owner).kind {
        NodeKind::Fraction { num, den } => {
            let target = if up { *num } else { *den };
            if cursor.container != target {
                *cursor = place_at(tree, target, CursorLocation::Start);
            }
        }
        NodeKind::Superscript { contents } => {
            if !up {
                // down from exponent goes to... there is no base container
                // inside Superscript; delegate further up via enclosing.
                let _ = contents;
                propagate_left(tree, cursor);
            }
        }
        NodeKind::Subscript { .. } => {
            if up {
                propagate_left(tree, cursor);
            }
        }
        NodeKind::SigmaPi { start, finish, contents, .. } => {
            let order = [*contents, *finish, *start];
            let cur_pos = order.iter().position(|c| *c == cursor.container).unwrap_or(0);
            let next = if up {
                (cur_pos + 1) % order.len()
            } else {
                (cur_pos + order.len() - 1) % order.len()
            };
            *cursor = place_at(tree, order[next], CursorLocation::Start);
        }
        NodeKind::Matrix { m, n, cells } => {
            if let Some(pos) = cells.iter().position(|c| *c == cursor.container) {
                let row = pos / *n;
                let col = pos % *n;
                let new_row = if up {
                    row.checked_sub(1)
                } else if row + 1 < *m {
                    Some(row + 1)
                } else {
                    None
                };
                if let Some(nr) = new_row {
                    let target = cells[nr * *n + col];
                    *cursor = place_at(tree, target, CursorLocation::Start);
                }
            }
        }
        NodeKind::Piecewise { values, conditions } => {
            let in_values = values.iter().position(|c| *c == cursor.container);
            let in_conditions = conditions.iter().position(|c| *c == cursor.container);
            if let Some(i) = in_values.or(in_conditions) {
                let target = if up {
                    conditions.get(i).copied()
                } else {
                    values.get(i).copied()
                };
                if let Some(t) = target {
                    *cursor = place_at(tree, t, CursorLocation::Start);
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neda::node;

    #[test]
    fn left_at_start_of_top_level_is_noop() {
        let tree = NedaTree::new();
        let mut c = tree.default_cursor();
        c.index = 0;
        let before = c;
        c.left(&tree);
        assert_eq!(c, before);
    }

    #[test]
    fn walking_left_then_right_returns_to_origin() {
        let mut tree = NedaTree::new();
        tree.push_str(tree.root, "123");
        let mut c = Cursor { container: tree.root, index: 2 };
        let start = c;
        c.left(&tree);
        c.left(&tree);
        c.right(&tree);
        c.right(&tree);
        assert_eq!(c, start);
    }

    #[test]
    fn fraction_up_goes_to_numerator() {
        let mut tree = NedaTree::new();
        let num = tree.new_container();
        let den = tree.new_container();
        tree.push_char(num, b'1');
        tree.push_char(den, b'2');
        node::compute_dimensions(&mut tree.arena, num);
        node::compute_dimensions(&mut tree.arena, den);
        let frac = tree.arena.alloc(crate::neda::node::NodeKind::Fraction { num, den });
        tree.arena.get_mut(num).parent = Some(frac);
        tree.arena.get_mut(den).parent = Some(frac);
        let mut c = Cursor { container: den, index: 0 };
        c.up(&tree);
        assert_eq!(c.container, num);
    }
}
