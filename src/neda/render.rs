//! `draw(display, x, y)` / `draw()`: paints a node at the given (or cached)
//! position, storing the position on the node as it goes (§4.1).

use crate::display::Display;

use super::arena::NodeId;
use super::node::{self, NedaChild, NodeKind};
use super::tree::NedaTree;

pub fn draw(tree: &mut NedaTree, display: &mut impl Display, id: NodeId, x: i16, y: i16) {
    tree.arena.get_mut(id).geom.x = x;
    tree.arena.get_mut(id).geom.y = y;
    draw_inner(tree, display, id);
}

/// Draws using the cached `(x, y)` already stored on the node.
pub fn draw_cached(tree: &mut NedaTree, display: &mut impl Display, id: NodeId) {
    draw_inner(tree, display, id);
}

fn draw_inner(tree: &mut NedaTree, display: &mut impl Display, id: NodeId) {
    let (kind, geom) = {
        let node = tree.arena.get(id);
        (node.kind.clone(), node.geom)
    };
    match kind {
        NodeKind::Container(children) => {
            let row = node::row_dims(&tree.arena, &children);
            let mut cx = geom.x;
            for (child, &(_, _, child_top, y_shift)) in children.iter().zip(row.iter()) {
                let cy = geom.y + geom.top_spacing as i16 - child_top as i16 + y_shift;
                match child {
                    NedaChild::Char(b) => {
                        let g = crate::glyph::glyph(*b);
                        display.draw_string(cx, cy, &[*b], false, false);
                        cx += g.width as i16 + node::CONTAINER_SPACING as i16;
                    }
                    NedaChild::Node(child_id) => {
                        let child_geom = tree.arena.get(*child_id).geom;
                        draw(tree, display, *child_id, cx, cy);
                        cx += child_geom.width as i16 + node::CONTAINER_SPACING as i16;
                    }
                }
            }
            if children_is_empty(tree, id) {
                display.draw_line(geom.x, geom.y, geom.x + geom.width as i16, geom.y);
                display.draw_line(geom.x, geom.y + geom.height as i16, geom.x + geom.width as i16, geom.y + geom.height as i16);
                display.draw_line(geom.x, geom.y, geom.x, geom.y + geom.height as i16);
                display.draw_line(geom.x + geom.width as i16, geom.y, geom.x + geom.width as i16, geom.y + geom.height as i16);
            }
        }
        NodeKind::Fraction { num, den } => {
            let num_geom = tree.arena.get(num).geom;
            let den_geom = tree.arena.get(den).geom;
            let num_x = geom.x + (geom.width as i16 - num_geom.width as i16) / 2;
            draw(tree, display, num, num_x, geom.y);
            let bar_y = geom.y + num_geom.height as i16 + 1;
            display.draw_line(geom.x, bar_y, geom.x + geom.width as i16, bar_y);
            let den_x = geom.x + (geom.width as i16 - den_geom.width as i16) / 2;
            draw(tree, display, den, den_x, bar_y + 1);
        }
        NodeKind::LeftBracket { .. } => {
            display.draw_line(geom.x + geom.width as i16 - 1, geom.y, geom.x + geom.width as i16 - 1, geom.y + geom.height as i16);
        }
        NodeKind::RightBracket { .. } => {
            display.draw_line(geom.x, geom.y, geom.x, geom.y + geom.height as i16);
        }
        NodeKind::Radical { contents, n } => {
            let c_geom = tree.arena.get(contents).geom;
            let n_offset = if let Some(n_id) = n {
                let n_geom = tree.arena.get(n_id).geom;
                draw(tree, display, n_id, geom.x, geom.y);
                n_geom.width.saturating_sub(1)
            } else {
                0
            };
            display.draw_string(geom.x as i16 + n_offset as i16, geom.y + (geom.height as i16 - c_geom.height as i16), b"\\", false, false);
            display.draw_line(geom.x + n_offset as i16 + 6, geom.y, geom.x + geom.width as i16, geom.y);
            draw(tree, display, contents, geom.x + n_offset as i16 + 8, geom.y + 2);
        }
        NodeKind::Superscript { contents } => {
            draw(tree, display, contents, geom.x, geom.y);
        }
        NodeKind::Subscript { contents } => {
            draw(tree, display, contents, geom.x, geom.y);
        }
        NodeKind::SigmaPi { is_product, start, finish, contents } => {
            let symbol: &[u8] = if is_product { b"\xCF\x80" } else { b"\xCE\xA3" };
            let finish_geom = tree.arena.get(finish).geom;
            draw(tree, display, finish, geom.x, geom.y);
            display.draw_string(geom.x, geom.y + finish_geom.height as i16 + 2, symbol, false, false);
            let start_geom = tree.arena.get(start).geom;
            draw(tree, display, start, geom.x, geom.y + finish_geom.height as i16 + 2 + 9 + 2);
            let top_h = finish_geom.height + 2 + 9 + 2 + start_geom.height;
            draw(tree, display, contents, geom.x + geom.width as i16 - tree.arena.get(contents).geom.width as i16, geom.y + (top_h as i16 - tree.arena.get(contents).geom.height as i16) / 2);
        }
        NodeKind::Matrix { m, n, cells } => {
            let rows = m;
            let cols = n;
            let mut col_w = vec![0u16; cols];
            let mut row_h = vec![0u16; rows];
            for r in 0..rows {
                for c in 0..cols {
                    let g = tree.arena.get(cells[r * cols + c]).geom;
                    col_w[c] = col_w[c].max(g.width);
                    row_h[r] = row_h[r].max(g.height);
                }
            }
            let mut cy = geom.y + 2;
            for r in 0..rows {
                let mut cx = geom.x + 3;
                for c in 0..cols {
                    draw(tree, display, cells[r * cols + c], cx, cy);
                    cx += col_w[c] as i16 + 4;
                }
                cy += row_h[r] as i16;
            }
            display.draw_line(geom.x, geom.y, geom.x, geom.y + geom.height as i16);
            display.draw_line(geom.x + geom.width as i16, geom.y, geom.x + geom.width as i16, geom.y + geom.height as i16);
        }
        NodeKind::Piecewise { values, conditions } => {
            let mut cy = geom.y;
            for (v, c) in values.iter().zip(conditions.iter()) {
                let v_geom = tree.arena.get(*v).geom;
                draw(tree, display, *v, geom.x + 4, cy);
                draw(tree, display, *c, geom.x + 4 + v_geom.width as i16 + 4, cy);
                cy += v_geom.height as i16 + 4;
            }
            display.draw_line(geom.x, geom.y, geom.x, geom.y + geom.height as i16);
        }
        NodeKind::Abs { contents } => {
            display.draw_line(geom.x, geom.y, geom.x, geom.y + geom.height as i16);
            draw(tree, display, contents, geom.x + 2, geom.y);
            display.draw_line(geom.x + geom.width as i16 - 1, geom.y, geom.x + geom.width as i16 - 1, geom.y + geom.height as i16);
        }
    }
}

fn children_is_empty(tree: &NedaTree, id: NodeId) -> bool {
    tree.child_count(id) == 0
}
