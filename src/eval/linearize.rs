//! Pass 1: walks a Container's children left-to-right producing a flat
//! token list, resolving bracket groups, function calls, variable/constant
//! lookup, unit conversion, special forms, and composite sub-evaluation
//! inline (§4.3).

use crate::error::{EvalError, EvalResult};
use crate::matrix::Matrix;
use crate::neda::{NedaChild, NedaTree, NodeId, NodeKind};
use crate::numerical::Numerical;

use super::builtins::Builtin;
use super::env::Environment;
use super::token::{OpKind, STok, Value};

/// Byte stand-ins for glyphs that don't map to a printable ASCII character:
/// the unit-conversion arrow and the two-character comparison operators.
/// Chosen from the C0 control range, which never appears in entered text.
pub const ARROW: u8 = 0x1A;
pub const NEQ: u8 = 0x1B;
pub const GEQ: u8 = 0x1C;
pub const LEQ: u8 = 0x1D;

pub fn is_digit(b: u8) -> bool {
    b.is_ascii_digit()
}

pub fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

/// Finds, for each `LeftBracket`/`RightBracket` at the top level of
/// `children`, its matching partner by depth counting (§4.1). Returns pairs
/// of indices into `children`.
fn bracket_pairs(tree: &NedaTree, children: &[NedaChild]) -> Vec<(usize, usize)> {
    let mut stack = Vec::new();
    let mut pairs = Vec::new();
    for (i, c) in children.iter().enumerate() {
        if let NedaChild::Node(id) = c {
            match &tree.arena.get(*id).kind {
                NodeKind::LeftBracket { .. } => stack.push(i),
                NodeKind::RightBracket { .. } => {
                    if let Some(open) = stack.pop() {
                        pairs.push((open, i));
                    }
                    // An unmatched right bracket is a syntax atom consumed
                    // at evaluation time, not at layout (§4.1).
                }
                _ => {}
            }
        }
    }
    pairs
}

/// Splits `children[start..end]` on top-level commas (depth 0 relative to
/// nested brackets), used for function-call argument lists and subscript
/// index pairs.
fn split_commas(tree: &NedaTree, children: &[NedaChild], start: usize, end: usize) -> Vec<(usize, usize)> {
    let mut depth = 0i32;
    let mut parts = Vec::new();
    let mut seg_start = start;
    for i in start..end {
        match children[i] {
            NedaChild::Node(id) => match &tree.arena.get(id).kind {
                NodeKind::LeftBracket { .. } => depth += 1,
                NodeKind::RightBracket { .. } => depth -= 1,
                _ => {}
            },
            NedaChild::Char(b) if b == b',' && depth == 0 => {
                parts.push((seg_start, i));
                seg_start = i + 1;
            }
            _ => {}
        }
    }
    parts.push((seg_start, end));
    parts
}

fn name_run(children: &[NedaChild], start: usize) -> (String, usize) {
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

fn number_run(children: &[NedaChild], start: usize) -> (Numerical, usize) {
    let mut s = String::new();
    let mut i = start;
    let mut seen_dot = false;
    while i < children.len() {
        if let NedaChild::Char(b) = children[i] {
            if is_digit(b) {
                s.push(b as char);
                i += 1;
                continue;
            } else if b == b'.' && !seen_dot {
                seen_dot = true;
                s.push('.');
                i += 1;
                continue;
            }
        }
        break;
    }
    let num = if seen_dot {
        Numerical::Float(s.parse().unwrap_or(f64::NAN))
    } else {
        Numerical::int(s.parse().unwrap_or(0))
    };
    (num, i)
}

fn builtin_constant(name: &str) -> Option<Numerical> {
    match name {
        "pi" => Some(Numerical::Float(std::f64::consts::PI)),
        "e" => Some(Numerical::Float(std::f64::consts::E)),
        _ => None,
    }
}

fn keyword_op(name: &str) -> Option<OpKind> {
    match name {
        "and" => Some(OpKind::And),
        "or" => Some(OpKind::Or),
        "xor" => Some(OpKind::Xor),
        "not" => Some(OpKind::Not),
        _ => None,
    }
}

/// Returns the literal text of a container made up entirely of `Char`
/// children (used to detect the `T`/`-1` superscript shorthand for
/// transpose/inverse and the `else` piecewise keyword).
fn container_text(tree: &NedaTree, id: NodeId) -> Option<String> {
    let children = match &tree.arena.get(id).kind {
        NodeKind::Container(c) => c,
        _ => return None,
    };
    let mut s = String::with_capacity(children.len());
    for c in children {
        match c {
            NedaChild::Char(b) => s.push(*b as char),
            NedaChild::Node(_) => return None,
        }
    }
    Some(s)
}

/// Evaluates one comma-separated argument slice into a `Value`.
fn eval_slice(tree: &NedaTree, children: &[NedaChild], start: usize, end: usize, env: &mut Environment) -> EvalResult<Value> {
    let toks = scan(tree, &children[start..end], env)?;
    super::shunting::evaluate_tokens(toks, env.settings)
}

/// Evaluates an operand container in full (function bodies, operand slots
/// of composite nodes, summation bodies, etc).
pub fn evaluate_container(tree: &NedaTree, container: NodeId, env: &mut Environment) -> EvalResult<Value> {
    env.enter()?;
    let children = match &tree.arena.get(container).kind {
        NodeKind::Container(c) => c.clone(),
        _ => return Err(EvalError::Syntax),
    };
    let result = eval_slice(tree, &children, 0, children.len(), env);
    env.exit();
    result
}

/// Pass 1 proper: scans a flat children slice into a `Vec<STok>`, ready for
/// pass 2 (shunting-yard). Implicit-multiply insertion and unary-minus
/// rewriting happen here as a post-process.
pub(super) fn scan(tree: &NedaTree, children: &[NedaChild], env: &mut Environment) -> EvalResult<Vec<STok>> {
    let pairs = bracket_pairs(tree, children);
    let matching_right = |open: usize| pairs.iter().find(|(o, _)| *o == open).map(|(_, c)| *c);

    let mut toks: Vec<STok> = Vec::new();
    let mut i = 0usize;
    while i < children.len() {
        match children[i] {
            NedaChild::Char(b) if is_digit(b) => {
                let (n, next) = number_run(children, i);
                toks.push(STok::Operand(Value::Num(n)));
                i = next;
            }
            NedaChild::Char(b) if is_name_char(b) => {
                let (name, next) = name_run(children, i);
                if let Some(op) = keyword_op(&name) {
                    toks.push(STok::Op(op));
                    i = next;
                    continue;
                }
                i = next;
                // name followed directly by a left bracket => function call.
                if let Some(NedaChild::Node(lb_id)) = children.get(i) {
                    if matches!(tree.arena.get(*lb_id).kind, NodeKind::LeftBracket { .. }) {
                        let open = i;
                        let close = matching_right(open).ok_or(EvalError::Syntax)?;
                        let args_parts = split_commas(tree, children, open + 1, close);
                        if name == super::solve::NAME {
                            let val = eval_solve_call(tree, children, &args_parts, env)?;
                            toks.push(STok::Operand(val));
                            i = close + 1;
                            continue;
                        }
                        if name == "linReg" {
                            let val = eval_lin_reg_call(tree, children, &args_parts, env)?;
                            toks.push(STok::Operand(val));
                            i = close + 1;
                            continue;
                        }
                        let mut arg_values = Vec::with_capacity(args_parts.len());
                        for (s, e) in &args_parts {
                            if *s == *e {
                                continue;
                            }
                            arg_values.push(eval_slice(tree, children, *s, *e, env)?);
                        }
                        let val = call_function(tree, &name, &arg_values, env)?;
                        toks.push(STok::Operand(val));
                        i = close + 1;
                        continue;
                    }
                }
                // name followed by subscript => identity/zero matrix, log
                // base, or matrix row/col extraction.
                if let Some(NedaChild::Node(sub_id)) = children.get(i) {
                    if let NodeKind::Subscript { contents } = tree.arena.get(*sub_id).kind.clone() {
                        if name == "I" || name == "0" {
                            let n_val = evaluate_container(tree, contents, env)?.as_numerical()?;
                            let n = n_val.as_f64().round() as i64;
                            if n <= 0 {
                                return Err(EvalError::Syntax);
                            }
                            let mat = if name == "I" {
                                Matrix::identity(n as usize)
                            } else {
                                Matrix::zero(n as usize, n as usize)
                            };
                            toks.push(STok::Operand(Value::Mat(mat)));
                            i += 1;
                            continue;
                        }
                        if name == "log" {
                            let base = evaluate_container(tree, contents, env)?.as_numerical()?;
                            i += 1;
                            if let Some(NedaChild::Node(lb_id)) = children.get(i) {
                                if matches!(tree.arena.get(*lb_id).kind, NodeKind::LeftBracket { .. }) {
                                    let open = i;
                                    let close = matching_right(open).ok_or(EvalError::Syntax)?;
                                    let arg = eval_slice(tree, children, open + 1, close, env)?.as_numerical()?;
                                    let val = Numerical::Float(arg.as_f64().log2() / base.as_f64().log2());
                                    toks.push(STok::Operand(Value::Num(val)));
                                    i = close + 1;
                                    continue;
                                }
                            }
                            return Err(EvalError::Syntax);
                        }
                        // Matrix row/col extraction: name_{row,col} with
                        // numeric or '*' wildcard indices.
                        let base_val = env.lookup(&name).ok_or(EvalError::Syntax)?;
                        let mat = base_val.as_matrix()?.clone();
                        let idx_children = match &tree.arena.get(contents).kind {
                            NodeKind::Container(c) => c.clone(),
                            _ => return Err(EvalError::Syntax),
                        };
                        let parts = split_commas(tree, &idx_children, 0, idx_children.len());
                        if parts.len() != 2 {
                            return Err(EvalError::Syntax);
                        }
                        let val = extract_matrix_slice(tree, &idx_children, parts[0], parts[1], &mat, env)?;
                        toks.push(STok::Operand(val));
                        i += 1;
                        continue;
                    }
                }
                // name ARROW name: unit conversion.
                if let Some(NedaChild::Char(ARROW)) = children.get(i) {
                    let (to_name, next2) = name_run(children, i + 1);
                    i = next2;
                    if let Some(NedaChild::Node(lb_id)) = children.get(i) {
                        if matches!(tree.arena.get(*lb_id).kind, NodeKind::LeftBracket { .. }) {
                            let open = i;
                            let close = matching_right(open).ok_or(EvalError::Syntax)?;
                            let arg = eval_slice(tree, children, open + 1, close, env)?.as_numerical()?;
                            let converted = super::unitconv::convert(arg, &name, &to_name)?;
                            toks.push(STok::Operand(Value::Num(converted)));
                            i = close + 1;
                            continue;
                        }
                    }
                    return Err(EvalError::Syntax);
                }
                // plain identifier: constant, variable, or Ans.
                if let Some(c) = builtin_constant(&name) {
                    toks.push(STok::Operand(Value::Num(c)));
                } else if let Some(v) = env.lookup(&name) {
                    toks.push(STok::Operand(v));
                } else {
                    return Err(EvalError::Syntax);
                }
            }
            NedaChild::Node(id) => {
                let kind = tree.arena.get(id).kind.clone();
                match kind {
                    NodeKind::LeftBracket { .. } => {
                        let close = matching_right(i).ok_or(EvalError::Syntax)?;
                        let val = eval_slice(tree, children, i + 1, close, env)?;
                        toks.push(STok::Operand(val));
                        i = close + 1;
                        continue;
                    }
                    NodeKind::RightBracket { .. } => {
                        // unmatched right bracket: syntax atom (§4.1 note).
                        return Err(EvalError::Syntax);
                    }
                    NodeKind::Fraction { num, den } => {
                        let n = evaluate_container(tree, num, env)?.as_numerical()?;
                        let d = evaluate_container(tree, den, env)?.as_numerical()?;
                        let v = n.div(d, env.settings.auto_fractions, true)?;
                        toks.push(STok::Operand(Value::Num(v)));
                    }
                    NodeKind::Radical { contents, n } => {
                        let c = evaluate_container(tree, contents, env)?.as_numerical()?;
                        let v = match n {
                            None => c.sqrt(),
                            Some(n_id) => {
                                let deg = evaluate_container(tree, n_id, env)?.as_numerical()?.as_f64();
                                Numerical::Float(c.as_f64().powf(1.0 / deg))
                            }
                        };
                        toks.push(STok::Operand(Value::Num(v)));
                    }
                    NodeKind::Abs { contents } => {
                        let v = evaluate_container(tree, contents, env)?.as_numerical()?;
                        toks.push(STok::Operand(Value::Num(Numerical::Float(v.as_f64().abs()))));
                    }
                    NodeKind::Superscript { contents } => {
                        match container_text(tree, contents).as_deref() {
                            Some("T") => toks.push(STok::Op(OpKind::Transpose)),
                            Some("-1") => toks.push(STok::Op(OpKind::Inverse)),
                            _ => {
                                let exp = evaluate_container(tree, contents, env)?.as_numerical()?;
                                toks.push(STok::Op(OpKind::Exponent));
                                toks.push(STok::Operand(Value::Num(exp)));
                            }
                        }
                    }
                    NodeKind::Subscript { .. } => {
                        // A bare leading subscript with no attached name is
                        // a syntax error (not reachable from valid input).
                        return Err(EvalError::Syntax);
                    }
                    NodeKind::SigmaPi { is_product, start, finish, contents } => {
                        let v = eval_sigma_pi(tree, is_product, start, finish, contents, env)?;
                        toks.push(STok::Operand(Value::Num(v)));
                    }
                    NodeKind::Matrix { m, n, cells } => {
                        let v = eval_matrix_literal(tree, m, n, &cells, env)?;
                        toks.push(STok::Operand(v));
                    }
                    NodeKind::Piecewise { values, conditions } => {
                        let v = eval_piecewise(tree, &values, &conditions, env)?;
                        toks.push(STok::Operand(Value::Num(v)));
                    }
                }
                i += 1;
            }
            NedaChild::Char(NEQ) => {
                toks.push(STok::Op(OpKind::NotEqual));
                i += 1;
            }
            NedaChild::Char(GEQ) => {
                toks.push(STok::Op(OpKind::GtEq));
                i += 1;
            }
            NedaChild::Char(LEQ) => {
                toks.push(STok::Op(OpKind::LtEq));
                i += 1;
            }
            NedaChild::Char(b) => {
                let op = OpKind::from_char(b).ok_or(EvalError::Syntax)?;
                toks.push(STok::Op(op));
                i += 1;
            }
        }
    }
    Ok(postprocess(toks))
}

/// Inserts implicit multiply between adjacent operands and rewrites a
/// minus directly after an operator (or at the start) into `NEGATE` (§4.3).
fn postprocess(toks: Vec<STok>) -> Vec<STok> {
    let starts_operand = |t: &STok| {
        matches!(t, STok::Operand(_))
            || matches!(t, STok::Op(op) if matches!(op, OpKind::Fact | OpKind::Transpose | OpKind::Inverse))
    };
    let mut out: Vec<STok> = Vec::with_capacity(toks.len());
    for t in toks {
        match &t {
            STok::Operand(_) => {
                if matches!(out.last(), Some(last) if starts_operand(last)) {
                    out.push(STok::Op(OpKind::SpMult));
                }
                out.push(t);
            }
            STok::Op(OpKind::Minus) => {
                let rewrite = !matches!(out.last(), Some(last) if starts_operand(last));
                out.push(STok::Op(if rewrite { OpKind::Negate } else { OpKind::Minus }));
            }
            _ => out.push(t),
        }
    }
    out
}

fn eval_sigma_pi(
    tree: &NedaTree,
    is_product: bool,
    start: NodeId,
    finish: NodeId,
    contents: NodeId,
    env: &mut Environment,
) -> EvalResult<Numerical> {
    // start container holds "var=expr".
    let start_children = match &tree.arena.get(start).kind {
        NodeKind::Container(c) => c.clone(),
        _ => return Err(EvalError::Syntax),
    };
    let eq_pos = start_children
        .iter()
        .position(|c| matches!(c, NedaChild::Char(b'=')))
        .ok_or(EvalError::Syntax)?;
    let (var_name, name_end) = name_run(&start_children, 0);
    if name_end != eq_pos || var_name.is_empty() {
        return Err(EvalError::Syntax);
    }
    let start_val = eval_slice(tree, &start_children, eq_pos + 1, start_children.len(), env)?.as_numerical()?;
    let finish_val = evaluate_container(tree, finish, env)?.as_numerical()?;

    let mut counter = start_val.as_f64().round() as i64;
    let limit = finish_val.as_f64().round() as i64;
    let mut acc = if is_product { Numerical::int(1) } else { Numerical::int(0) };
    env.enter()?;
    while counter <= limit {
        env.args.push((var_name.clone(), Value::Num(Numerical::int(counter))));
        let term = evaluate_container(tree, contents, env)?.as_numerical();
        env.args.pop();
        let term = term?;
        acc = if is_product { acc.mul(term)? } else { acc.add(term)? };
        counter += 1;
    }
    env.exit();
    Ok(acc)
}

fn eval_matrix_literal(tree: &NedaTree, m: usize, n: usize, cells: &[NodeId], env: &mut Environment) -> EvalResult<Value> {
    let mut values = Vec::with_capacity(cells.len());
    for &c in cells {
        values.push(evaluate_container(tree, c, env)?);
    }
    // Column-wise assembly: if every cell of the first row is itself a
    // column vector of equal height, stack them as columns (§4.3).
    if n > 0 {
        let first_row: Vec<&Value> = (0..n).map(|c| &values[c]).collect();
        if let Some(h) = first_row.iter().find_map(|v| match v {
            Value::Mat(mat) if mat.n == 1 => Some(mat.m),
            _ => None,
        }) {
            if first_row.iter().all(|v| matches!(v, Value::Mat(mat) if mat.n == 1 && mat.m == h)) {
                let mut out = Matrix::zero(h, n);
                for (c, v) in first_row.iter().enumerate() {
                    if let Value::Mat(mat) = v {
                        for r in 0..h {
                            out.set(r, c, mat.get(r, 0));
                        }
                    }
                }
                return Ok(Value::Mat(out));
            }
        }
    }
    let mut entries = Vec::with_capacity(m * n);
    for v in values {
        entries.push(v.as_numerical()?);
    }
    Ok(Value::Mat(Matrix::new(m, n, entries)))
}

fn eval_piecewise(tree: &NedaTree, values: &[NodeId], conditions: &[NodeId], env: &mut Environment) -> EvalResult<Numerical> {
    for (i, &cond) in conditions.iter().enumerate() {
        let is_else = container_text(tree, cond).as_deref() == Some("else");
        let truthy = if is_else {
            true
        } else {
            evaluate_container(tree, cond, env)?.is_truthy()?
        };
        if truthy {
            return evaluate_container(tree, values[i], env)?.as_numerical();
        }
    }
    Err(EvalError::Math)
}

fn extract_matrix_slice(
    tree: &NedaTree,
    idx_children: &[NedaChild],
    row_part: (usize, usize),
    col_part: (usize, usize),
    mat: &Matrix,
    env: &mut Environment,
) -> EvalResult<Value> {
    let is_wildcard = |s: usize, e: usize| e == s + 1 && matches!(idx_children[s], NedaChild::Char(b'*'));
    let row_wild = is_wildcard(row_part.0, row_part.1);
    let col_wild = is_wildcard(col_part.0, col_part.1);
    match (row_wild, col_wild) {
        (true, true) => Ok(Value::Mat(mat.clone())),
        (false, true) => {
            let row = eval_slice(tree, idx_children, row_part.0, row_part.1, env)?.as_numerical()?.as_f64() as usize;
            Ok(Value::Mat(mat.row_vector(row)?))
        }
        (true, false) => {
            let col = eval_slice(tree, idx_children, col_part.0, col_part.1, env)?.as_numerical()?.as_f64() as usize;
            Ok(Value::Mat(mat.col_vector(col)?))
        }
        (false, false) => {
            let row = eval_slice(tree, idx_children, row_part.0, row_part.1, env)?.as_numerical()?.as_f64() as usize;
            let col = eval_slice(tree, idx_children, col_part.0, col_part.1, env)?.as_numerical()?.as_f64() as usize;
            if row >= mat.m || col >= mat.n {
                return Err(EvalError::Syntax);
            }
            Ok(Value::Num(mat.get(row, col)))
        }
    }
}

/// `solve(expr, min, max [, err])`: `expr` is passed to the bisection search
/// un-evaluated (it names the free variable `x`), bracketed by `[min, max]`,
/// with an optional tolerance (default 0) (§4.3, §8 scenario 8).
fn eval_solve_call(
    tree: &NedaTree,
    children: &[NedaChild],
    args_parts: &[(usize, usize)],
    env: &mut Environment,
) -> EvalResult<Value> {
    if args_parts.len() < 3 || args_parts.len() > 4 {
        return Err(EvalError::Syntax);
    }
    let (expr_start, expr_end) = args_parts[0];
    let (min_start, min_end) = args_parts[1];
    let (max_start, max_end) = args_parts[2];
    let min = eval_slice(tree, children, min_start, min_end, env)?.as_numerical()?.as_f64();
    let max = eval_slice(tree, children, max_start, max_end, env)?.as_numerical()?.as_f64();
    let err = if let Some(&(es, ee)) = args_parts.get(3) {
        eval_slice(tree, children, es, ee, env)?.as_numerical()?.as_f64()
    } else {
        0.0
    };
    super::solve::solve(tree, &children[expr_start..expr_end], min, max, err, env)
}

/// `linReg(xs, ys, model_1, model_2, ...)`: `xs`/`ys` are eagerly evaluated
/// column-vector matrices, but each `model_i` is a NEDA expression in the
/// free variable `x` that is re-evaluated, un-evaluated at call time, once
/// per row of `xs` to build the least-squares design matrix (§4.3, grounded
/// on `linRegSEP` in the original: the first two arguments are eagerly
/// evaluated, everything after is a basis expression evaluated per row).
fn eval_lin_reg_call(
    tree: &NedaTree,
    children: &[NedaChild],
    args_parts: &[(usize, usize)],
    env: &mut Environment,
) -> EvalResult<Value> {
    if args_parts.len() < 3 {
        return Err(EvalError::Syntax);
    }
    let (xs_start, xs_end) = args_parts[0];
    let (ys_start, ys_end) = args_parts[1];
    let xs = eval_slice(tree, children, xs_start, xs_end, env)?.as_matrix()?.clone();
    let ys = eval_slice(tree, children, ys_start, ys_end, env)?.as_matrix()?.clone();
    if xs.n != 1 || ys.n != 1 || xs.m != ys.m {
        return Err(EvalError::Syntax);
    }
    let model = &args_parts[2..];
    let mut design = Matrix::zero(xs.m, model.len());
    for row in 0..xs.m {
        env.args.push(("x".to_string(), Value::Num(xs.get(row, 0))));
        let filled = (|| -> EvalResult<()> {
            for (col, &(ms, me)) in model.iter().enumerate() {
                let v = eval_slice(tree, children, ms, me, env)?.as_numerical()?;
                design.set(row, col, v);
            }
            Ok(())
        })();
        env.args.pop();
        filled?;
    }
    Ok(Value::Mat(Matrix::least_squares(&design, &ys)?))
}

/// Resolves a function call: builtins first, then user-defined functions
/// (§4.3). `solve` is intercepted earlier, before its arguments are
/// eagerly evaluated.
fn call_function(_tree: &NedaTree, name: &str, args: &[Value], env: &mut Environment) -> EvalResult<Value> {
    if let Some(b) = Builtin::from_name(name) {
        if !b.is_varargs() && args.len() != b.num_args() {
            return Err(EvalError::Syntax);
        }
        return b.apply(args, env.settings.use_radians);
    }
    if let Some(def) = env.funcs.get(name).cloned() {
        if args.len() != def.argv.len() {
            return Err(EvalError::Syntax);
        }
        env.enter()?;
        for (n, v) in def.argv.iter().cloned().zip(args.iter().cloned()) {
            env.args.push((n, v));
        }
        let result = evaluate_container(&def.body_tree, def.body_tree.root, env);
        for _ in 0..def.argv.len() {
            env.args.pop();
        }
        env.exit();
        return result;
    }
    Err(EvalError::Syntax)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::env::FunctionDef;
    use std::collections::HashMap;

    fn fresh_env<'a>(vars: &'a mut HashMap<String, Value>, funcs: &'a mut HashMap<String, FunctionDef>) -> Environment<'a> {
        Environment::new(vars, funcs, crate::settings::Settings::default())
    }

    #[test]
    fn simple_addition() {
        let mut tree = NedaTree::new();
        tree.push_str(tree.root, "1+2");
        let mut vars = HashMap::new();
        let mut funcs = HashMap::new();
        let mut env = fresh_env(&mut vars, &mut funcs);
        let v = evaluate_container(&tree, tree.root, &mut env).unwrap();
        assert_eq!(v, Value::Num(Numerical::int(3)));
    }

    #[test]
    fn implicit_multiply_before_name() {
        let mut tree = NedaTree::new();
        tree.push_str(tree.root, "2");
        let mut vars = HashMap::new();
        vars.insert("x".to_string(), Value::Num(Numerical::int(5)));
        tree.push_str(tree.root, "x");
        let mut funcs = HashMap::new();
        let mut env = fresh_env(&mut vars, &mut funcs);
        let v = evaluate_container(&tree, tree.root, &mut env).unwrap();
        assert_eq!(v, Value::Num(Numerical::int(10)));
    }

    #[test]
    fn undefined_name_is_syntax_error() {
        let mut tree = NedaTree::new();
        tree.push_str(tree.root, "q");
        let mut vars = HashMap::new();
        let mut funcs = HashMap::new();
        let mut env = fresh_env(&mut vars, &mut funcs);
        assert_eq!(evaluate_container(&tree, tree.root, &mut env), Err(EvalError::Syntax));
    }
}
