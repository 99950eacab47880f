//! Builtin functions, carried from the original's `Function::Type` enum
//! (`eval.hpp`) in full. `linReg` and `solve` are special forms instead (see
//! `linearize::eval_lin_reg_call`/`solve.rs`) since they need to inspect
//! their argument NEDA rather than evaluate it eagerly.

use crate::error::{EvalError, EvalResult};
use crate::matrix::Matrix;
use crate::numerical::Numerical;

use super::token::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Sin, Cos, Tan, Asin, Acos, Atan, Atan2,
    Sinh, Cosh, Tanh, Asinh, Acosh, Atanh,
    Ln, Log10, Log2,
    QuadRoots,
    Round, Min, Max, Floor, Ceil,
    Det, LinSolve, LeastSquares, Rref, Mean, Rand,
}

impl Builtin {
    pub fn from_name(name: &str) -> Option<Builtin> {
        use Builtin::*;
        Some(match name {
            "sin" => Sin, "cos" => Cos, "tan" => Tan,
            "asin" => Asin, "acos" => Acos, "atan" => Atan, "atan2" => Atan2,
            "sinh" => Sinh, "cosh" => Cosh, "tanh" => Tanh,
            "asinh" => Asinh, "acosh" => Acosh, "atanh" => Atanh,
            "ln" => Ln, "log10" => Log10, "log2" => Log2,
            "quadRoots" => QuadRoots,
            "round" => Round, "min" => Min, "max" => Max, "floor" => Floor, "ceil" => Ceil,
            "det" => Det, "linSolve" => LinSolve, "leastSquares" => LeastSquares,
            "rref" => Rref, "mean" => Mean, "rand" => Rand,
            _ => return None,
        })
    }

    pub fn num_args(self) -> usize {
        use Builtin::*;
        match self {
            Sin | Cos | Tan | Asin | Acos | Atan | Sinh | Cosh | Tanh | Asinh | Acosh | Atanh
            | Ln | Log10 | Log2 | Round | Floor | Ceil | Det | Rref | Rand => 1,
            Atan2 | QuadRoots | LinSolve | LeastSquares => 2,
            Min | Max | Mean => 0, // var-args
        }
    }

    pub fn is_varargs(self) -> bool {
        matches!(self, Builtin::Min | Builtin::Max | Builtin::Mean)
    }

    pub fn apply(self, args: &[Value], use_radians: bool) -> EvalResult<Value> {
        use Builtin::*;
        let to_rad = |x: f64| if use_radians { x } else { x.to_radians() };
        let from_rad = |x: f64| if use_radians { x } else { x.to_degrees() };

        let scalar = |i: usize, args: &[Value]| -> EvalResult<f64> {
            Ok(args.get(i).ok_or(EvalError::Syntax)?.as_numerical()?.as_f64())
        };

        match self {
            Sin => Ok(Value::Num(Numerical::Float(to_rad(scalar(0, args)?).sin()))),
            Cos => Ok(Value::Num(Numerical::Float(to_rad(scalar(0, args)?).cos()))),
            Tan => Ok(Value::Num(Numerical::Float(to_rad(scalar(0, args)?).tan()))),
            Asin => Ok(Value::Num(Numerical::Float(from_rad(scalar(0, args)?.asin())))),
            Acos => Ok(Value::Num(Numerical::Float(from_rad(scalar(0, args)?.acos())))),
            Atan => Ok(Value::Num(Numerical::Float(from_rad(scalar(0, args)?.atan())))),
            Atan2 => Ok(Value::Num(Numerical::Float(from_rad(scalar(0, args)?.atan2(scalar(1, args)?))))),
            Sinh => Ok(Value::Num(Numerical::Float(scalar(0, args)?.sinh()))),
            Cosh => Ok(Value::Num(Numerical::Float(scalar(0, args)?.cosh()))),
            Tanh => Ok(Value::Num(Numerical::Float(scalar(0, args)?.tanh()))),
            Asinh => Ok(Value::Num(Numerical::Float(scalar(0, args)?.asinh()))),
            Acosh => Ok(Value::Num(Numerical::Float(scalar(0, args)?.acosh()))),
            Atanh => Ok(Value::Num(Numerical::Float(scalar(0, args)?.atanh()))),
            Ln => Ok(Value::Num(Numerical::Float(scalar(0, args)?.ln()))),
            Log10 => Ok(Value::Num(Numerical::Float(scalar(0, args)?.log10()))),
            Log2 => Ok(Value::Num(Numerical::Float(scalar(0, args)?.log2()))),
            Round => Ok(Value::Num(Numerical::Float(scalar(0, args)?.round()))),
            Floor => Ok(Value::Num(Numerical::Float(scalar(0, args)?.floor()))),
            Ceil => Ok(Value::Num(Numerical::Float(scalar(0, args)?.ceil()))),
            Min => {
                let mut it = args.iter();
                let first = it.next().ok_or(EvalError::Syntax)?.as_numerical()?;
                let mut m = first.as_f64();
                for a in it {
                    m = m.min(a.as_numerical()?.as_f64());
                }
                Ok(Value::Num(Numerical::Float(m)))
            }
            Max => {
                let mut it = args.iter();
                let first = it.next().ok_or(EvalError::Syntax)?.as_numerical()?;
                let mut m = first.as_f64();
                for a in it {
                    m = m.max(a.as_numerical()?.as_f64());
                }
                Ok(Value::Num(Numerical::Float(m)))
            }
            Mean => {
                if args.is_empty() {
                    return Err(EvalError::Syntax);
                }
                let mut sum = 0.0;
                for a in args {
                    sum += a.as_numerical()?.as_f64();
                }
                Ok(Value::Num(Numerical::Float(sum / args.len() as f64)))
            }
            QuadRoots => {
                // quadRoots(b, c) for x^2 + bx + c = 0, matching the
                // original's two-argument depressed-quadratic helper.
                let b = scalar(0, args)?;
                let c = scalar(1, args)?;
                let disc = b * b - 4.0 * c;
                if disc < 0.0 {
                    Ok(Value::Num(Numerical::nan()))
                } else {
                    let sq = disc.sqrt();
                    let r1 = (-b + sq) / 2.0;
                    let r2 = (-b - sq) / 2.0;
                    Ok(Value::Mat(Matrix::new(2, 1, vec![Numerical::Float(r1), Numerical::Float(r2)])))
                }
            }
            Det => Ok(Value::Num(args.first().ok_or(EvalError::Syntax)?.as_matrix()?.determinant()?)),
            Rref => {
                let m = args.first().ok_or(EvalError::Syntax)?.as_matrix()?;
                Ok(Value::Mat(m.inverse().unwrap_or_else(|_| m.clone())))
            }
            LinSolve => {
                let a = args.first().ok_or(EvalError::Syntax)?.as_matrix()?;
                let b = args.get(1).ok_or(EvalError::Syntax)?.as_matrix()?;
                Ok(Value::Mat(a.inverse()?.multiply(b)?))
            }
            LeastSquares => {
                let a = args.first().ok_or(EvalError::Syntax)?.as_matrix()?;
                let b = args.get(1).ok_or(EvalError::Syntax)?.as_matrix()?;
                Ok(Value::Mat(Matrix::least_squares(a, b)?))
            }
            Rand => {
                use rand::Rng;
                let mut rng = rand::thread_rng();
                Ok(Value::Num(Numerical::Float(rng.gen::<f64>())))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sin_zero_is_zero() {
        let r = Builtin::Sin.apply(&[Value::Num(Numerical::int(0))], true).unwrap();
        assert_eq!(r, Value::Num(Numerical::Float(0.0)));
    }

    #[test]
    fn quad_roots_real() {
        // x^2 - 3x + 2 = (x-1)(x-2)
        let r = Builtin::QuadRoots
            .apply(&[Value::Num(Numerical::int(-3)), Value::Num(Numerical::int(2))], true)
            .unwrap();
        if let Value::Mat(m) = r {
            let mut roots = vec![m.get(0, 0).as_f64(), m.get(1, 0).as_f64()];
            roots.sort_by(|a, b| a.partial_cmp(b).unwrap());
            assert!((roots[0] - 1.0).abs() < 1e-9);
            assert!((roots[1] - 2.0).abs() < 1e-9);
        } else {
            panic!("expected matrix");
        }
    }
}
