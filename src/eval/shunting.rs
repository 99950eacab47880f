//! Pass 2: classic operator-precedence (shunting-yard) conversion of a flat
//! `STok` stream to RPN, folded directly into a value during the pop instead
//! of materializing the RPN queue first (§4.3).

use crate::error::{EvalError, EvalResult};
use crate::matrix::Matrix;
use crate::numerical::Numerical;
use crate::settings::Settings;

use super::token::{Arity, Assoc, OpKind, STok, Value};

fn apply_binary(op: OpKind, a: Value, b: Value, settings: Settings) -> EvalResult<Value> {
    use OpKind::*;
    match op {
        Plus => match (a, b) {
            (Value::Num(x), Value::Num(y)) => Ok(Value::Num(x.add(y)?)),
            (Value::Mat(x), Value::Mat(y)) => Ok(Value::Mat(x.add(&y)?)),
            _ => Err(EvalError::Syntax),
        },
        Minus => match (a, b) {
            (Value::Num(x), Value::Num(y)) => Ok(Value::Num(x.sub(y)?)),
            (Value::Mat(x), Value::Mat(y)) => Ok(Value::Mat(x.subtract(&y)?)),
            _ => Err(EvalError::Syntax),
        },
        Multiply | SpMult => match (a, b) {
            (Value::Num(x), Value::Num(y)) => Ok(Value::Num(x.mul(y)?)),
            (Value::Mat(x), Value::Mat(y)) => Ok(Value::Mat(x.multiply(&y)?)),
            (Value::Mat(x), Value::Num(y)) | (Value::Num(y), Value::Mat(x)) => Ok(Value::Mat(x.scalar_multiply(y)?)),
        },
        Divide | SpDiv => match (a, b) {
            (Value::Num(x), Value::Num(y)) => Ok(Value::Num(x.div(y, settings.auto_fractions, false)?)),
            (Value::Mat(x), Value::Num(y)) => {
                let inv = y.div(Numerical::int(1), true, false)?;
                Ok(Value::Mat(x.scalar_multiply(inv)?))
            }
            _ => Err(EvalError::Syntax),
        },
        Exponent => {
            let (x, y) = (a.as_numerical()?, b.as_numerical()?);
            Ok(Value::Num(x.pow(y)?))
        }
        Equality => Ok(Value::Num(bool_num(values_equal(&a, &b)?))),
        NotEqual => Ok(Value::Num(bool_num(!values_equal(&a, &b)?))),
        Gt => Ok(Value::Num(bool_num(a.as_numerical()?.as_f64() > b.as_numerical()?.as_f64()))),
        Lt => Ok(Value::Num(bool_num(a.as_numerical()?.as_f64() < b.as_numerical()?.as_f64()))),
        GtEq => Ok(Value::Num(bool_num(a.as_numerical()?.as_f64() >= b.as_numerical()?.as_f64()))),
        LtEq => Ok(Value::Num(bool_num(a.as_numerical()?.as_f64() <= b.as_numerical()?.as_f64()))),
        And => Ok(Value::Num(bool_num(a.is_truthy()? && b.is_truthy()?))),
        Or => Ok(Value::Num(bool_num(a.is_truthy()? || b.is_truthy()?))),
        Xor => Ok(Value::Num(bool_num(a.is_truthy()? != b.is_truthy()?))),
        Augment => {
            let (x, y) = (a.as_matrix()?, b.as_matrix()?);
            Ok(Value::Mat(augment(x, y)?))
        }
        _ => Err(EvalError::Syntax),
    }
}

fn augment(a: &Matrix, b: &Matrix) -> EvalResult<Matrix> {
    if a.m != b.m {
        return Err(EvalError::Syntax);
    }
    let mut out = Matrix::zero(a.m, a.n + b.n);
    for r in 0..a.m {
        for c in 0..a.n {
            out.set(r, c, a.get(r, c));
        }
        for c in 0..b.n {
            out.set(r, a.n + c, b.get(r, c));
        }
    }
    Ok(out)
}

fn values_equal(a: &Value, b: &Value) -> EvalResult<bool> {
    match (a, b) {
        (Value::Num(x), Value::Num(y)) => Ok(x.approx_eq(*y)),
        (Value::Mat(x), Value::Mat(y)) => Ok(x.equality(y)),
        _ => Err(EvalError::Syntax),
    }
}

fn bool_num(b: bool) -> Numerical {
    Numerical::int(if b { 1 } else { 0 })
}

fn apply_unary(op: OpKind, a: Value) -> EvalResult<Value> {
    use OpKind::*;
    match op {
        Negate => match a {
            Value::Num(n) => Ok(Value::Num(n.negate())),
            Value::Mat(m) => Ok(Value::Mat(m.scalar_multiply(Numerical::int(-1))?)),
        },
        Not => Ok(Value::Num(bool_num(!a.is_truthy()?))),
        Fact => Ok(Value::Num(a.as_numerical()?.factorial()?)),
        Transpose => Ok(Value::Mat(a.as_matrix()?.transpose())),
        Inverse => Ok(Value::Mat(a.as_matrix()?.inverse()?)),
        _ => Err(EvalError::Syntax),
    }
}

/// Evaluates a flattened token stream via the standard two-stack
/// shunting-yard algorithm, folding each popped operator into a value
/// immediately rather than building an intermediate RPN list.
pub fn evaluate_tokens(toks: Vec<STok>, settings: Settings) -> EvalResult<Value> {
    let mut values: Vec<Value> = Vec::new();
    let mut ops: Vec<OpKind> = Vec::new();

    fn pop_op(values: &mut Vec<Value>, ops: &mut Vec<OpKind>, settings: Settings) -> EvalResult<()> {
        let op = ops.pop().ok_or(EvalError::Syntax)?;
        match op.arity() {
            Arity::Unary => {
                let a = values.pop().ok_or(EvalError::Syntax)?;
                values.push(apply_unary(op, a)?);
            }
            Arity::Binary => {
                let b = values.pop().ok_or(EvalError::Syntax)?;
                let a = values.pop().ok_or(EvalError::Syntax)?;
                values.push(apply_binary(op, a, b, settings)?);
            }
        }
        Ok(())
    }

    let should_pop = |top: OpKind, incoming: OpKind| -> bool {
        let (tp, ip) = (top.precedence(), incoming.precedence());
        tp < ip || (tp == ip && incoming.assoc() == Assoc::Left)
    };

    for tok in toks {
        match tok {
            STok::Operand(v) => values.push(v),
            STok::Op(op) => {
                while let Some(&top) = ops.last() {
                    if should_pop(top, op) {
                        pop_op(&mut values, &mut ops, settings)?;
                    } else {
                        break;
                    }
                }
                ops.push(op);
            }
        }
    }
    while !ops.is_empty() {
        pop_op(&mut values, &mut ops, settings)?;
    }
    if values.len() != 1 {
        // Either an empty expression or leftover operands with no operator
        // joining them ("too many numbers") -- both surface as a plain
        // syntax error (§9).
        return Err(EvalError::Syntax);
    }
    Ok(values.pop().unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(v: i64) -> STok {
        STok::Operand(Value::Num(Numerical::int(v)))
    }

    #[test]
    fn precedence_multiply_before_add() {
        // 1 + 2*3 = 7
        let toks = vec![n(1), STok::Op(OpKind::Plus), n(2), STok::Op(OpKind::Multiply), n(3)];
        let v = evaluate_tokens(toks, Settings::default()).unwrap();
        assert_eq!(v, Value::Num(Numerical::int(7)));
    }

    #[test]
    fn right_assoc_exponent() {
        // 2^3^2 = 2^(3^2) = 512
        let toks = vec![
            n(2),
            STok::Op(OpKind::Exponent),
            n(3),
            STok::Op(OpKind::Exponent),
            n(2),
        ];
        let v = evaluate_tokens(toks, Settings::default()).unwrap();
        assert_eq!(v, Value::Num(Numerical::int(512)));
    }

    #[test]
    fn leftover_operand_is_syntax_error() {
        let toks = vec![n(1), n(2)];
        assert_eq!(evaluate_tokens(toks, Settings::default()), Err(EvalError::Syntax));
    }
}
