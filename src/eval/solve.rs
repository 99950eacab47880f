//! `solve`: the one special form that genuinely needs its argument
//! unevaluated, since the expression names a free variable (always `x`,
//! matching the original) that doesn't resolve until the bisection search
//! binds it (§4.3, Design Notes "special-form registry").

use crate::error::{EvalError, EvalResult};
use crate::neda::{NedaChild, NedaTree};
use crate::numerical::Numerical;

use super::env::Environment;
use super::token::Value;

pub const NAME: &str = "solve";

const BISECTION_MAX_ITERATIONS: u32 = 255;

/// Evaluates `expr_children[..]` with the free variable `x` bound, returning
/// its float value (root-finding only ever needs a scalar).
fn f(tree: &NedaTree, expr_children: &[NedaChild], x: f64, env: &mut Environment) -> EvalResult<f64> {
    env.args.push(("x".to_string(), Value::Num(Numerical::Float(x))));
    let toks = super::linearize::scan(tree, expr_children, env);
    env.args.pop();
    let toks = toks?;
    let v = super::shunting::evaluate_tokens(toks, env.settings)?;
    Ok(v.as_numerical()?.as_f64())
}

/// `solve(expr, min, max, err=0)`: bisection over the bracketing interval
/// `[min, max]`, matching `solveSEP` in the original. Returns the bracket's
/// midpoint, an exact zero at an endpoint, or `NaN` if the interval doesn't
/// bracket a sign change (or `err` is negative).
pub fn solve(tree: &NedaTree, expr_children: &[NedaChild], min: f64, max: f64, err: f64, env: &mut Environment) -> EvalResult<Value> {
    if max < min {
        return Ok(Value::Num(Numerical::nan()));
    }

    let mut min = min;
    let mut max = max;
    let mut min_val = f(tree, expr_children, min, env)?;
    let max_val = f(tree, expr_children, max, env)?;

    if min_val == 0.0 {
        return Ok(Value::Num(Numerical::Float(min)));
    }
    if max_val == 0.0 {
        return Ok(Value::Num(Numerical::Float(max)));
    }
    if (min_val > 0.0 && max_val > 0.0) || (min_val < 0.0 && max_val < 0.0) || !min_val.is_finite() || !max_val.is_finite() || err < 0.0 {
        return Ok(Value::Num(Numerical::nan()));
    }

    for _ in 0..BISECTION_MAX_ITERATIONS {
        let x = min + (max - min) / 2.0;
        let val = f(tree, expr_children, x, env)?;
        if val.abs() <= err {
            return Ok(Value::Num(Numerical::Float(x)));
        }
        if (min_val < 0.0 && val > 0.0) || (min_val > 0.0 && val < 0.0) {
            max = x;
        } else {
            min = x;
            min_val = val;
        }
    }
    Ok(Value::Num(Numerical::Float(min + (max - min) / 2.0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::env::FunctionDef;
    use crate::settings::Settings;
    use std::collections::HashMap;

    #[test]
    fn solve_sqrt_two() {
        // x^2 - 2 = 0 bracketed in [0, 2]
        let mut tree = NedaTree::new();
        tree.push_str(tree.root, "x^2-2");
        let children: Vec<NedaChild> = (0..tree.child_count(tree.root)).map(|i| tree.child_at(tree.root, i)).collect();
        let mut vars = HashMap::new();
        let mut funcs: HashMap<String, FunctionDef> = HashMap::new();
        let mut env = Environment::new(&mut vars, &mut funcs, Settings::default());
        let v = solve(&tree, &children, 0.0, 2.0, 0.0001, &mut env).unwrap();
        let got = v.as_numerical().unwrap().as_f64();
        assert!((got - std::f64::consts::SQRT_2).abs() < 1e-3);
    }

    #[test]
    fn solve_same_sign_interval_is_nan() {
        let mut tree = NedaTree::new();
        tree.push_str(tree.root, "x^2+1");
        let children: Vec<NedaChild> = (0..tree.child_count(tree.root)).map(|i| tree.child_at(tree.root, i)).collect();
        let mut vars = HashMap::new();
        let mut funcs: HashMap<String, FunctionDef> = HashMap::new();
        let mut env = Environment::new(&mut vars, &mut funcs, Settings::default());
        let v = solve(&tree, &children, 0.0, 2.0, 0.0001, &mut env).unwrap();
        assert!(v.as_numerical().unwrap().as_f64().is_nan());
    }
}
