//! End-to-end evaluator scenarios, built directly against NEDA trees the
//! way a keyboard would populate them (composite keys insert composite
//! nodes; there is no literal `^` character, for instance).

use std::collections::HashMap;

use neda_calc::error::EvalResult;
use neda_calc::eval::env::{Environment, EvalOutput, FunctionDef};
use neda_calc::eval::{self, token::Value};
use neda_calc::matrix::Matrix;
use neda_calc::neda::node::{self, NodeKind};
use neda_calc::neda::{BracketKind, NedaTree, NodeId};
use neda_calc::numerical::Numerical;
use neda_calc::settings::Settings;

fn run(tree: &NedaTree, settings: Settings) -> EvalResult<EvalOutput> {
    let mut vars = HashMap::new();
    let mut funcs: HashMap<String, FunctionDef> = HashMap::new();
    let mut env = Environment::new(&mut vars, &mut funcs, settings);
    eval::evaluate(tree, tree.root, &mut env)
}

fn run_with(tree: &NedaTree, vars: &mut HashMap<String, Value>, funcs: &mut HashMap<String, FunctionDef>, settings: Settings) -> EvalResult<EvalOutput> {
    let mut env = Environment::new(vars, funcs, settings);
    eval::evaluate(tree, tree.root, &mut env)
}

fn num(tree: &mut NedaTree, container: NodeId, s: &str) {
    tree.push_str(container, s);
}

/// Opens a parenthesized call/group at the end of `container`, returning the
/// id of the matching `RightBracket` so the caller can insert it once the
/// argument list has been pushed (brackets are nodes, not `(`/`)` chars —
/// only a key that draws a matched pair produces one, see `keys.rs`).
fn open_paren(tree: &mut NedaTree, container: NodeId) -> NodeId {
    let (left, right) = tree.bracket_pair(BracketKind::Paren);
    let idx = tree.child_count(container);
    tree.insert_node_at(container, idx, left);
    right
}

fn close_paren(tree: &mut NedaTree, container: NodeId, right: NodeId) {
    let idx = tree.child_count(container);
    tree.insert_node_at(container, idx, right);
}

fn push_superscript(tree: &mut NedaTree, container: NodeId, exponent: &str) {
    let contents = tree.new_container();
    tree.push_str(contents, exponent);
    let sup = tree.arena.alloc(NodeKind::Superscript { contents });
    tree.arena.get_mut(contents).parent = Some(sup);
    node::compute_dimensions(&mut tree.arena, sup);
    let idx = tree.child_count(container);
    tree.insert_node_at(container, idx, sup);
}

#[test]
fn scenario_1_operator_precedence() {
    let mut tree = NedaTree::new();
    num(&mut tree, tree.root, "1+2*3");
    let out = run(&tree, Settings::default()).unwrap();
    match out {
        EvalOutput::Value(Value::Num(n)) => assert_eq!(n, Numerical::int(7)),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn scenario_2_fraction_addition() {
    let mut tree = NedaTree::new();
    num(&mut tree, tree.root, "1/2+1/3");
    let out = run(&tree, Settings::default()).unwrap();
    match out {
        EvalOutput::Value(Value::Num(n)) => assert_eq!(n, Numerical::Fraction { num: 5, den: 6 }),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn scenario_3_approx_forces_decimal() {
    let mut tree = NedaTree::new();
    num(&mut tree, tree.root, "1/2+1/3");
    let settings = Settings { force_decimal: true, ..Settings::default() };
    let out = run(&tree, settings).unwrap();
    match out {
        EvalOutput::Value(Value::Num(n)) => assert!((n.as_f64() - 5.0 / 6.0).abs() < 1e-6),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn scenario_4_sqrt_two_promotes_to_float() {
    let mut tree = NedaTree::new();
    let contents = tree.new_container();
    tree.push_str(contents, "2");
    let radical = tree.arena.alloc(NodeKind::Radical { contents, n: None });
    tree.arena.get_mut(contents).parent = Some(radical);
    node::compute_dimensions(&mut tree.arena, radical);
    tree.insert_node_at(tree.root, 0, radical);

    let out = run(&tree, Settings::default()).unwrap();
    match out {
        EvalOutput::Value(Value::Num(n)) => assert!((n.as_f64() - std::f64::consts::SQRT_2).abs() < 1e-8),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn scenario_5_user_function_call() {
    let mut vars = HashMap::new();
    let mut funcs: HashMap<String, FunctionDef> = HashMap::new();
    let settings = Settings::default();

    // f(x) = x^2
    let mut def_tree = NedaTree::new();
    def_tree.push_str(def_tree.root, "f");
    let close = open_paren(&mut def_tree, def_tree.root);
    def_tree.push_str(def_tree.root, "x");
    close_paren(&mut def_tree, def_tree.root, close);
    def_tree.push_str(def_tree.root, "=x");
    push_superscript(&mut def_tree, def_tree.root, "2");
    let out = run_with(&def_tree, &mut vars, &mut funcs, settings).unwrap();
    assert_eq!(out, EvalOutput::Assigned);
    assert!(funcs.contains_key("f"));

    // f(3)
    let mut call_tree = NedaTree::new();
    call_tree.push_str(call_tree.root, "f");
    let close = open_paren(&mut call_tree, call_tree.root);
    call_tree.push_str(call_tree.root, "3");
    close_paren(&mut call_tree, call_tree.root, close);
    let out = run_with(&call_tree, &mut vars, &mut funcs, settings).unwrap();
    match out {
        EvalOutput::Value(Value::Num(n)) => assert_eq!(n, Numerical::int(9)),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn scenario_6_matrix_inverse() {
    let mut tree = NedaTree::new();
    let cells: Vec<_> = ["1", "2", "3", "4"]
        .iter()
        .map(|s| {
            let c = tree.new_container();
            tree.push_str(c, s);
            c
        })
        .collect();
    let matrix = tree.arena.alloc(NodeKind::Matrix { m: 2, n: 2, cells: cells.clone() });
    for c in &cells {
        tree.arena.get_mut(*c).parent = Some(matrix);
    }
    node::compute_dimensions(&mut tree.arena, matrix);
    tree.insert_node_at(tree.root, 0, matrix);

    let contents = tree.new_container();
    tree.push_str(contents, "-1");
    let sup = tree.arena.alloc(NodeKind::Superscript { contents });
    tree.arena.get_mut(contents).parent = Some(sup);
    node::compute_dimensions(&mut tree.arena, sup);
    tree.insert_node_at(tree.root, 1, sup);

    let out = run(&tree, Settings::default()).unwrap();
    match out {
        EvalOutput::Value(Value::Mat(m)) => {
            let expected = Matrix::new(
                2,
                2,
                vec![
                    Numerical::int(-2),
                    Numerical::int(1),
                    Numerical::Fraction { num: 3, den: 2 },
                    Numerical::Fraction { num: -1, den: 2 },
                ],
            );
            assert!(m.equality(&expected));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn scenario_7_summation() {
    let mut tree = NedaTree::new();
    let start = tree.new_container();
    tree.push_str(start, "k=1");
    let finish = tree.new_container();
    tree.push_str(finish, "5");
    let contents = tree.new_container();
    tree.push_str(contents, "k");
    let sigma = tree.arena.alloc(NodeKind::SigmaPi { is_product: false, start, finish, contents });
    for c in [start, finish, contents] {
        tree.arena.get_mut(c).parent = Some(sigma);
    }
    node::compute_dimensions(&mut tree.arena, sigma);
    tree.insert_node_at(tree.root, 0, sigma);

    let out = run(&tree, Settings::default()).unwrap();
    match out {
        EvalOutput::Value(Value::Num(n)) => assert_eq!(n, Numerical::int(15)),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn scenario_8_solve_root_finder() {
    // solve(x^2-2, 0, 2, 0.0001) ~= sqrt(2) via bisection over [0, 2].
    let mut tree = NedaTree::new();
    tree.push_str(tree.root, "solve");
    let close = open_paren(&mut tree, tree.root);
    tree.push_str(tree.root, "x");
    push_superscript(&mut tree, tree.root, "2");
    tree.push_str(tree.root, "-2,0,2,0.0001");
    close_paren(&mut tree, tree.root, close);

    let out = run(&tree, Settings::default()).unwrap();
    match out {
        EvalOutput::Value(Value::Num(n)) => assert!((n.as_f64() - std::f64::consts::SQRT_2).abs() < 1e-3),
        other => panic!("unexpected {other:?}"),
    }
}

fn column_matrix(tree: &mut NedaTree, values: &[&str]) -> NodeId {
    let cells: Vec<_> = values
        .iter()
        .map(|s| {
            let c = tree.new_container();
            tree.push_str(c, s);
            c
        })
        .collect();
    let matrix = tree.arena.alloc(NodeKind::Matrix { m: values.len(), n: 1, cells: cells.clone() });
    for c in &cells {
        tree.arena.get_mut(*c).parent = Some(matrix);
    }
    node::compute_dimensions(&mut tree.arena, matrix);
    matrix
}

#[test]
fn lin_reg_special_form_fits_model_per_row() {
    // linReg(xs, ys, 1, x) over y = 2x: basis [1, x] per row, fitted
    // coefficients should land near [0, 2].
    let mut tree = NedaTree::new();
    tree.push_str(tree.root, "linReg");
    let close = open_paren(&mut tree, tree.root);
    let xs = column_matrix(&mut tree, &["1", "2", "3"]);
    let idx = tree.child_count(tree.root);
    tree.insert_node_at(tree.root, idx, xs);
    tree.push_char(tree.root, b',');
    let ys = column_matrix(&mut tree, &["2", "4", "6"]);
    let idx = tree.child_count(tree.root);
    tree.insert_node_at(tree.root, idx, ys);
    tree.push_str(tree.root, ",1,x");
    close_paren(&mut tree, tree.root, close);

    let out = run(&tree, Settings::default()).unwrap();
    match out {
        EvalOutput::Value(Value::Mat(m)) => {
            assert!((m.get(0, 0).as_f64()).abs() < 1e-6);
            assert!((m.get(1, 0).as_f64() - 2.0).abs() < 1e-6);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn boundary_empty_container_is_syntax_error() {
    let tree = NedaTree::new();
    let out = run(&tree, Settings::default());
    assert!(out.is_err());
}
