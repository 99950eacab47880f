//! Renders an evaluated `Value` back into a freestanding NEDA subtree for
//! display (§4.4): integer/float digit runs, exact fractions as a real
//! `Fraction` composite (honoring `force_decimal`/`as_mixed_number`), NaN as
//! a math-error marker, and matrices as a `Matrix` composite of rendered
//! cells.

use crate::neda::{NedaTree, NodeId, NodeKind};
use crate::numerical::Numerical;
use crate::settings::Settings;

use super::token::Value;

const MATH_ERROR_TEXT: &str = "Math Error";
pub const SYNTAX_ERROR_TEXT: &str = "Syntax Error";

fn trim_trailing_zeros(s: &str) -> String {
    if !s.contains('.') {
        return s.to_string();
    }
    let trimmed = s.trim_end_matches('0');
    let trimmed = trimmed.trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Formats `f` to `sig` significant digits (§4.4 "significant_digits").
fn sig_fig_string(f: f64, sig: u8) -> String {
    if f == 0.0 {
        return "0".to_string();
    }
    if f.is_nan() {
        return MATH_ERROR_TEXT.to_string();
    }
    if !f.is_finite() {
        return if f > 0.0 { "Inf".to_string() } else { "-Inf".to_string() };
    }
    let mag = f.abs().log10().floor() as i32;
    let decimals = (sig as i32 - 1 - mag).max(0) as usize;
    trim_trailing_zeros(&format!("{:.*}", decimals, f))
}

fn push_text(tree: &mut NedaTree, container: NodeId, s: &str) {
    tree.push_str(container, s);
}

fn make_fraction(tree: &mut NedaTree, num: i64, den: i64) -> NodeId {
    let n_c = tree.new_container();
    let d_c = tree.new_container();
    push_text(tree, n_c, &num.to_string());
    push_text(tree, d_c, &den.to_string());
    let id = tree.arena.alloc(NodeKind::Fraction { num: n_c, den: d_c });
    tree.arena.get_mut(n_c).parent = Some(id);
    tree.arena.get_mut(d_c).parent = Some(id);
    crate::neda::node::compute_dimensions(&mut tree.arena, id);
    id
}

/// Renders a single numerical scalar into `container`.
fn render_numerical(tree: &mut NedaTree, container: NodeId, n: Numerical, settings: &Settings) {
    if n.is_nan() {
        push_text(tree, container, MATH_ERROR_TEXT);
        return;
    }
    match n {
        Numerical::Fraction { num, den } if den != 1 && !settings.force_decimal => {
            if settings.as_mixed_number && num.abs() >= den {
                let whole = num / den;
                let rem = num % den;
                push_text(tree, container, &whole.to_string());
                if rem != 0 {
                    let frac = make_fraction(tree, rem.abs(), den);
                    tree.insert_node_at(container, tree.child_count(container), frac);
                }
            } else {
                let frac = make_fraction(tree, num, den);
                tree.insert_node_at(container, tree.child_count(container), frac);
            }
        }
        Numerical::Fraction { num, den } => {
            if den == 1 {
                push_text(tree, container, &num.to_string());
            } else {
                push_text(tree, container, &sig_fig_string(num as f64 / den as f64, settings.significant_digits));
            }
        }
        Numerical::Float(f) => push_text(tree, container, &sig_fig_string(f, settings.significant_digits)),
    }
}

/// Renders `value` directly into `container` (which the caller owns —
/// typically a history slot's or result line's root).
pub fn render_into(tree: &mut NedaTree, container: NodeId, value: &Value, settings: &Settings) {
    match value {
        Value::Num(n) => render_numerical(tree, container, *n, settings),
        Value::Mat(m) => {
            let mut cells = Vec::with_capacity(m.m * m.n);
            for &entry in &m.entries {
                let cell = tree.new_container();
                render_numerical(tree, cell, entry, settings);
                cells.push(cell);
            }
            let id = tree.arena.alloc(NodeKind::Matrix { m: m.m, n: m.n, cells: cells.clone() });
            for c in &cells {
                tree.arena.get_mut(*c).parent = Some(id);
            }
            crate::neda::node::compute_dimensions(&mut tree.arena, id);
            tree.insert_node_at(container, 0, id);
        }
    }
}

/// Renders `value` into a fresh, unattached container (the caller splices
/// it into wherever the display needs it: a history slot, an `Ans` echo).
pub fn render(tree: &mut NedaTree, value: &Value, settings: &Settings) -> NodeId {
    let container = tree.new_container();
    render_into(tree, container, value, settings);
    container
}

/// Renders a syntax-error marker directly into `container` (§4.4 "null ->
/// syntax-error glyph").
pub fn render_syntax_error_into(tree: &mut NedaTree, container: NodeId) {
    push_text(tree, container, SYNTAX_ERROR_TEXT);
}

/// Renders a syntax-error marker into a fresh, unattached container.
pub fn render_syntax_error(tree: &mut NedaTree) -> NodeId {
    let container = tree.new_container();
    render_syntax_error_into(tree, container);
    container
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neda::NedaChild;

    fn text_of(tree: &NedaTree, container: NodeId) -> String {
        (0..tree.child_count(container))
            .map(|i| match tree.child_at(container, i) {
                NedaChild::Char(b) => b as char,
                NedaChild::Node(_) => '?',
            })
            .collect()
    }

    #[test]
    fn renders_exact_fraction_as_fraction_node() {
        let mut tree = NedaTree::new();
        let settings = Settings::default();
        let id = render(&mut tree, &Value::Num(Numerical::fraction(1, 2).unwrap()), &settings);
        assert_eq!(tree.child_count(id), 1);
        assert!(matches!(tree.child_at(id, 0), NedaChild::Node(_)));
    }

    #[test]
    fn renders_integer_as_plain_digits() {
        let mut tree = NedaTree::new();
        let settings = Settings::default();
        let id = render(&mut tree, &Value::Num(Numerical::int(42)), &settings);
        assert_eq!(text_of(&tree, id), "42");
    }

    #[test]
    fn renders_nan_as_math_error() {
        let mut tree = NedaTree::new();
        let settings = Settings::default();
        let id = render(&mut tree, &Value::Num(Numerical::nan()), &settings);
        assert_eq!(text_of(&tree, id), MATH_ERROR_TEXT);
    }
}
