//! NEDA node variants and their layout contract (§3, §4.1).

use super::arena::{NedaArena, NodeId};
use crate::glyph;

/// A Container's children: either an atomic `Char` (no layout cache of its
/// own, §3) or a reference to a composite node living in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NedaChild {
    Char(u8),
    Node(NodeId),
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Container(Vec<NedaChild>),
    Fraction { num: NodeId, den: NodeId },
    LeftBracket { kind: BracketKind },
    RightBracket { kind: BracketKind },
    Radical { contents: NodeId, n: Option<NodeId> },
    Superscript { contents: NodeId },
    Subscript { contents: NodeId },
    SigmaPi { is_product: bool, start: NodeId, finish: NodeId, contents: NodeId },
    Matrix { m: usize, n: usize, cells: Vec<NodeId> },
    Piecewise { values: Vec<NodeId>, conditions: Vec<NodeId> },
    Abs { contents: NodeId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketKind {
    Paren,
    Square,
}

impl NodeKind {
    /// Direct operand-container children this node owns (for transitive
    /// free and for parent-walking during geometry recomputation).
    pub fn owned_children(&self) -> Vec<NodeId> {
        match self {
            NodeKind::Container(children) => {
                children.iter().filter_map(|c| match c {
                    NedaChild::Node(id) => Some(*id),
                    NedaChild::Char(_) => None,
                }).collect()
            }
            NodeKind::Fraction { num, den } => vec![*num, *den],
            NodeKind::LeftBracket { .. } | NodeKind::RightBracket { .. } => vec![],
            NodeKind::Radical { contents, n } => {
                let mut v = vec![*contents];
                if let Some(n) = n {
                    v.push(*n);
                }
                v
            }
            NodeKind::Superscript { contents } | NodeKind::Subscript { contents } | NodeKind::Abs { contents } => {
                vec![*contents]
            }
            NodeKind::SigmaPi { start, finish, contents, .. } => vec![*start, *finish, *contents],
            NodeKind::Matrix { cells, .. } => cells.clone(),
            NodeKind::Piecewise { values, conditions } => {
                values.iter().chain(conditions.iter()).copied().collect()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Geometry {
    pub width: u16,
    pub height: u16,
    pub top_spacing: u16,
    pub x: i16,
    pub y: i16,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub geom: Geometry,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self { kind, parent: None, geom: Geometry::default() }
    }
}

pub const CONTAINER_EMPTY_WIDTH: u16 = 5;
pub const CONTAINER_EMPTY_HEIGHT: u16 = 9;
pub const CONTAINER_SPACING: u16 = 3;
pub const SUPERSCRIPT_OVERLAP: u16 = 4;
pub const SUBSCRIPT_OVERLAP: u16 = 4;
pub const RADICAL_N_OVERLAP: u16 = 7;

fn child_dims(arena: &NedaArena, child: NedaChild) -> (u16, u16, u16) {
    match child {
        NedaChild::Char(b) => {
            let g = glyph::glyph(b);
            (g.width, g.height, g.height / 2)
        }
        NedaChild::Node(id) => {
            let geom = arena.get(id).geom;
            (geom.width, geom.height, geom.top_spacing)
        }
    }
}

/// Per-child `(width, height, top_spacing, y_shift)` within a Container,
/// folding in the Superscript/Subscript baseline-overlap rule with the
/// preceding sibling (§4.1 "Superscript baseline shift: base drawn at
/// `y + max(0, exp_h - 4)`, exponent at y; overlap constant = 4" — mirrored
/// for Subscript, whose base stays put and which drops down instead).
/// `y_shift` is the extra downward offset a child needs on top of the
/// normal per-child baseline alignment; it's 0 for every child not part of
/// such a pair. Widths are never merged — only the vertical placement
/// overlaps, so `Container width = Σ child widths` still holds exactly.
pub(crate) fn row_dims(arena: &NedaArena, children: &[NedaChild]) -> Vec<(u16, u16, u16, i16)> {
    let raw: Vec<(u16, u16, u16)> = children.iter().map(|c| child_dims(arena, *c)).collect();
    let mut out: Vec<(u16, u16, u16, i16)> = raw.iter().map(|&(w, h, t)| (w, h, t, 0)).collect();
    for i in 1..children.len() {
        let kind = match children[i] {
            NedaChild::Node(id) => Some(arena.get(id).kind.clone()),
            NedaChild::Char(_) => None,
        };
        let (base_w, base_h, base_top) = raw[i - 1];
        let (this_w, this_h, _) = raw[i];
        match kind {
            Some(NodeKind::Superscript { .. }) => {
                let shift = this_h.saturating_sub(SUPERSCRIPT_OVERLAP);
                let merged_top = shift + base_top;
                let merged_h = this_h.max(shift + base_h);
                out[i - 1] = (base_w, merged_h, merged_top, shift as i16);
                out[i] = (this_w, merged_h, merged_top, 0);
            }
            Some(NodeKind::Subscript { .. }) => {
                let shift = base_h.saturating_sub(SUBSCRIPT_OVERLAP);
                let merged_top = base_top;
                let merged_h = base_h.max(shift + this_h);
                out[i - 1] = (base_w, merged_h, merged_top, 0);
                out[i] = (this_w, merged_h, merged_top, shift as i16);
            }
            _ => {}
        }
    }
    out
}

/// Recomputes `width`/`height`/`top_spacing` for a single node from its
/// (already up to date) children, per the exact formulas in §4.1.
pub fn compute_dimensions(arena: &mut NedaArena, id: NodeId) {
    let kind = arena.get(id).kind.clone();
    let geom = match &kind {
        NodeKind::Container(children) => {
            if children.is_empty() {
                Geometry { width: CONTAINER_EMPTY_WIDTH, height: CONTAINER_EMPTY_HEIGHT, top_spacing: CONTAINER_EMPTY_HEIGHT / 2, x: 0, y: 0 }
            } else {
                let dims = row_dims(arena, children);
                let width: u16 = dims.iter().map(|d| d.0).sum::<u16>() + CONTAINER_SPACING * (dims.len() as u16 - 1);
                let max_top = dims.iter().map(|d| d.2).max().unwrap_or(0);
                let max_below = dims.iter().map(|d| d.1 - d.2).max().unwrap_or(0);
                let height = max_top + max_below;
                Geometry { width, height, top_spacing: max_top, x: 0, y: 0 }
            }
        }
        NodeKind::Fraction { num, den } => {
            let (nw, nh) = dims_of(arena, *num);
            let (dw, dh) = dims_of(arena, *den);
            let width = nw.max(dw);
            let height = nh + 1 + 1 + dh;
            Geometry { width, height, top_spacing: nh + 1, x: 0, y: 0 }
        }
        NodeKind::LeftBracket { .. } | NodeKind::RightBracket { .. } => {
            // Default unmatched size; recompute_heights() widens these to
            // match the tallest expression between a matched pair.
            Geometry { width: 3, height: CONTAINER_EMPTY_HEIGHT, top_spacing: CONTAINER_EMPTY_HEIGHT / 2, x: 0, y: 0 }
        }
        NodeKind::Radical { contents, n } => {
            let (cw, ch) = dims_of(arena, *contents);
            match n {
                None => Geometry { width: cw + 8, height: ch + 2, top_spacing: ch / 2 + 1, x: 0, y: 0 },
                Some(n_id) => {
                    let (nw, nh) = dims_of(arena, *n_id);
                    let width = nw.saturating_sub(1) + cw + 8;
                    let height = nh.saturating_sub(RADICAL_N_OVERLAP) + ch + 2;
                    Geometry { width, height, top_spacing: height / 2, x: 0, y: 0 }
                }
            }
        }
        NodeKind::Superscript { contents } => {
            let (cw, ch) = dims_of(arena, *contents);
            Geometry { width: cw, height: ch, top_spacing: ch, x: 0, y: 0 }
        }
        NodeKind::Subscript { contents } => {
            let (cw, ch) = dims_of(arena, *contents);
            Geometry { width: cw, height: ch, top_spacing: 0, x: 0, y: 0 }
        }
        NodeKind::SigmaPi { start, finish, contents, .. } => {
            let (_, sh) = dims_of(arena, *start);
            let (_, fh) = dims_of(arena, *finish);
            let (cw, ch) = dims_of(arena, *contents);
            let symbol_h = 9u16;
            let top_h = fh + 2 + symbol_h + 2 + sh;
            let width = 9u16.max(20) + cw;
            let height = top_h.max(ch);
            Geometry { width, height, top_spacing: height / 2, x: 0, y: 0 }
        }
        NodeKind::Matrix { m, n, cells } => {
            let rows = *m;
            let cols = *n;
            let mut col_w = vec![0u16; cols];
            let mut row_h = vec![0u16; rows];
            for r in 0..rows {
                for c in 0..cols {
                    let (w, h) = dims_of(arena, cells[r * cols + c]);
                    col_w[c] = col_w[c].max(w);
                    row_h[r] = row_h[r].max(h);
                }
            }
            let width: u16 = col_w.iter().sum::<u16>() + 4 * (cols.saturating_sub(1)) as u16 + 2 * 3;
            let height: u16 = row_h.iter().sum::<u16>() + 2 * 2;
            Geometry { width, height, top_spacing: height / 2, x: 0, y: 0 }
        }
        NodeKind::Piecewise { values, conditions } => {
            let k = values.len();
            let mut val_w = 0u16;
            let mut cond_w = 0u16;
            let mut height = 0u16;
            for i in 0..k {
                let (vw, vh) = dims_of(arena, values[i]);
                let (cwid, ch) = dims_of(arena, conditions[i]);
                val_w = val_w.max(vw);
                cond_w = cond_w.max(cwid);
                height += vh.max(ch) + 4;
            }
            let width = 4 + val_w + 4 + cond_w;
            Geometry { width, height: height.saturating_sub(4).max(1), top_spacing: height / 2, x: 0, y: 0 }
        }
        NodeKind::Abs { contents } => {
            let (cw, ch) = dims_of(arena, *contents);
            Geometry { width: cw + 2 * 2, height: ch, top_spacing: ch / 2, x: 0, y: 0 }
        }
    };
    arena.get_mut(id).geom = geom;
}

fn dims_of(arena: &NedaArena, id: NodeId) -> (u16, u16) {
    let g = arena.get(id).geom;
    (g.width, g.height)
}

/// Recomputes this node's dimensions and walks up through `parent` until the
/// top level, recomputing each ancestor in turn (§4.1 "Mutation of any child
/// triggers recomputation upward until the top.").
pub fn recompute_upward(arena: &mut NedaArena, id: NodeId) {
    let mut cur = Some(id);
    while let Some(node_id) = cur {
        compute_dimensions(arena, node_id);
        cur = arena.get(node_id).parent;
    }
}

/// Translates `(x, y)` through the whole subtree (§4.1 `update_position`).
pub fn update_position(arena: &mut NedaArena, id: NodeId, dx: i16, dy: i16) {
    {
        let geom = &mut arena.get_mut(id).geom;
        geom.x += dx;
        geom.y += dy;
    }
    let children = arena.get(id).kind.owned_children();
    for c in children {
        update_position(arena, c, dx, dy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neda::tree::NedaTree;

    #[test]
    fn empty_container_is_fixed_size() {
        let tree = NedaTree::new();
        let geom = tree.arena.get(tree.root).geom;
        assert_eq!(geom.width, CONTAINER_EMPTY_WIDTH);
        assert_eq!(geom.height, CONTAINER_EMPTY_HEIGHT);
    }

    #[test]
    fn fraction_top_spacing_is_numerator_height_plus_one() {
        let mut tree = NedaTree::new();
        let num = tree.new_container();
        let den = tree.new_container();
        tree.push_char(num, b'1');
        tree.push_char(den, b'2');
        compute_dimensions(&mut tree.arena, num);
        compute_dimensions(&mut tree.arena, den);
        let frac = tree.arena.alloc(NodeKind::Fraction { num, den });
        compute_dimensions(&mut tree.arena, frac);
        let num_h = tree.arena.get(num).geom.height;
        let geom = tree.arena.get(frac).geom;
        assert_eq!(geom.top_spacing, num_h + 1);
    }

    #[test]
    fn superscript_shifts_base_down_by_overlap_rule() {
        let mut tree = NedaTree::new();
        tree.push_char(tree.root, b'x');
        let exp_contents = tree.new_container();
        tree.push_char(exp_contents, b'2');
        let sup = tree.arena.alloc(NodeKind::Superscript { contents: exp_contents });
        tree.arena.get_mut(exp_contents).parent = Some(sup);
        compute_dimensions(&mut tree.arena, sup);
        let idx = tree.child_count(tree.root);
        tree.insert_node_at(tree.root, idx, sup);

        let exp_h = tree.arena.get(sup).geom.height;
        let shift = exp_h.saturating_sub(SUPERSCRIPT_OVERLAP);
        let base_top = glyph::glyph(b'x').height / 2;
        let root_geom = tree.arena.get(tree.root).geom;
        assert_eq!(root_geom.top_spacing, shift + base_top);
    }

    #[test]
    fn subscript_leaves_base_in_place_and_drops_itself() {
        let mut tree = NedaTree::new();
        tree.push_char(tree.root, b'x');
        let sub_contents = tree.new_container();
        tree.push_char(sub_contents, b'1');
        let sub = tree.arena.alloc(NodeKind::Subscript { contents: sub_contents });
        tree.arena.get_mut(sub_contents).parent = Some(sub);
        compute_dimensions(&mut tree.arena, sub);
        let idx = tree.child_count(tree.root);
        tree.insert_node_at(tree.root, idx, sub);

        let base_top = glyph::glyph(b'x').height / 2;
        let root_geom = tree.arena.get(tree.root).geom;
        assert_eq!(root_geom.top_spacing, base_top);
    }
}
