//! Evaluator: linearization (pass 1) + shunting-yard (pass 2) over a NEDA
//! container, plus the top-level assignment/expression dispatch (§4.3).

pub mod builtins;
pub mod env;
pub mod linearize;
pub mod render_result;
pub mod shunting;
pub mod solve;
pub mod token;
pub mod unitconv;

use crate::error::{EvalError, EvalResult};
use crate::neda::{NedaChild, NedaTree, NodeId};

use env::{Environment, EvalOutput, FunctionDef};
use linearize::{evaluate_container, is_name_char};
use token::Value;

/// Scans `children` for a top-level `=` that isn't part of `==`/`!=` (the
/// latter tokenize to a single NEQ byte, so a bare `=` here always means
/// assignment), returning its index.
fn find_assignment(children: &[NedaChild]) -> Option<usize> {
    for (i, c) in children.iter().enumerate() {
        if matches!(c, NedaChild::Char(b'=')) {
            if matches!(children.get(i + 1), Some(NedaChild::Char(b'='))) {
                continue;
            }
            return Some(i);
        }
    }
    None
}

fn name_at(children: &[NedaChild], start: usize) -> (String, usize) {
    let mut s = String::new();
    let mut i = start;
    while i < children.len() {
        if let NedaChild::Char(b) = children[i] {
            if is_name_char(b) {
                s.push(b as char);
                i += 1;
                continue;
            }
        }
        break;
    }
    (s, i)
}

/// Top-level evaluation entry point: detects a top-level assignment
/// (`name = expr` or `name(arg, ...) = expr`) and updates `env.vars`/
/// `env.funcs` instead of producing a value; otherwise evaluates the whole
/// container as a plain expression (§4.3, §4.4).
pub fn evaluate(tree: &NedaTree, container: NodeId, env: &mut Environment) -> EvalResult<EvalOutput> {
    let children = match &tree.arena.get(container).kind {
        crate::neda::NodeKind::Container(c) => c.clone(),
        _ => return Err(EvalError::Syntax),
    };

    if let Some(eq_pos) = find_assignment(&children) {
        let (name, name_end) = name_at(&children, 0);
        if name.is_empty() {
            return Err(EvalError::Syntax);
        }
        // Function definition: name immediately followed by a parenthesized
        // argument-name list.
        if let Some(NedaChild::Node(lb_id)) = children.get(name_end) {
            if matches!(tree.arena.get(*lb_id).kind, crate::neda::NodeKind::LeftBracket { .. }) {
                let close = find_matching_bracket(tree, &children, name_end).ok_or(EvalError::Syntax)?;
                if close + 1 != eq_pos {
                    return Err(EvalError::Syntax);
                }
                let argv = parse_argv(&children, name_end + 1, close)?;
                let body_tree = tree.snapshot(&children, eq_pos + 1, children.len());
                env.funcs.insert(
                    name.clone(),
                    FunctionDef { argv, body_tree, display_name: name },
                );
                return Ok(EvalOutput::Assigned);
            }
        }
        if name_end != eq_pos {
            return Err(EvalError::Syntax);
        }
        let body_tree = tree.snapshot(&children, eq_pos + 1, children.len());
        let value = evaluate_container(&body_tree, body_tree.root, env)?;
        env.vars.insert(name, value);
        return Ok(EvalOutput::Assigned);
    }

    Ok(EvalOutput::Value(evaluate_container(tree, container, env)?))
}

fn find_matching_bracket(tree: &NedaTree, children: &[NedaChild], open: usize) -> Option<usize> {
    let mut depth = 0i32;
    for (i, c) in children.iter().enumerate().skip(open) {
        if let NedaChild::Node(id) = c {
            match &tree.arena.get(*id).kind {
                crate::neda::NodeKind::LeftBracket { .. } => depth += 1,
                crate::neda::NodeKind::RightBracket { .. } => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            }
        }
    }
    None
}

fn parse_argv(children: &[NedaChild], start: usize, end: usize) -> EvalResult<Vec<String>> {
    let mut argv = Vec::new();
    let mut i = start;
    while i < end {
        match children[i] {
            NedaChild::Char(b',') => {
                i += 1;
            }
            NedaChild::Char(b) if is_name_char(b) => {
                let (name, next) = name_at(children, i);
                if name.is_empty() {
                    return Err(EvalError::Syntax);
                }
                argv.push(name);
                i = next;
            }
            _ => return Err(EvalError::Syntax),
        }
    }
    Ok(argv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use std::collections::HashMap;

    #[test]
    fn assigns_variable() {
        let mut tree = NedaTree::new();
        tree.push_str(tree.root, "x=5");
        let mut vars = HashMap::new();
        let mut funcs = HashMap::new();
        let mut env = Environment::new(&mut vars, &mut funcs, Settings::default());
        let out = evaluate(&tree, tree.root, &mut env).unwrap();
        assert_eq!(out, EvalOutput::Assigned);
        assert_eq!(env.vars.get("x"), Some(&Value::Num(crate::numerical::Numerical::int(5))));
    }
}
