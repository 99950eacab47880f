//! Matrix values produced and consumed by the evaluator. Entries are always
//! `Numerical`s, never nested matrices (§3).

use crate::error::{EvalError, EvalResult};
use crate::numerical::Numerical;

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    pub m: usize,
    pub n: usize,
    pub entries: Vec<Numerical>,
}

impl Matrix {
    pub fn new(m: usize, n: usize, entries: Vec<Numerical>) -> Self {
        debug_assert_eq!(entries.len(), m * n);
        Self { m, n, entries }
    }

    pub fn zero(m: usize, n: usize) -> Self {
        Self::new(m, n, vec![Numerical::int(0); m * n])
    }

    pub fn identity(n: usize) -> Self {
        let mut entries = vec![Numerical::int(0); n * n];
        for i in 0..n {
            entries[i * n + i] = Numerical::int(1);
        }
        Self::new(n, n, entries)
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Numerical {
        self.entries[row * self.n + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, v: Numerical) {
        self.entries[row * self.n + col] = v;
    }

    pub fn add(&self, other: &Matrix) -> EvalResult<Matrix> {
        if self.m != other.m || self.n != other.n {
            return Err(EvalError::Syntax);
        }
        let mut out = self.clone();
        for i in 0..out.entries.len() {
            out.entries[i] = out.entries[i].add(other.entries[i])?;
        }
        Ok(out)
    }

    pub fn subtract(&self, other: &Matrix) -> EvalResult<Matrix> {
        if self.m != other.m || self.n != other.n {
            return Err(EvalError::Syntax);
        }
        let mut out = self.clone();
        for i in 0..out.entries.len() {
            out.entries[i] = out.entries[i].sub(other.entries[i])?;
        }
        Ok(out)
    }

    pub fn scalar_multiply(&self, s: Numerical) -> EvalResult<Matrix> {
        let mut out = self.clone();
        for e in out.entries.iter_mut() {
            *e = e.mul(s)?;
        }
        Ok(out)
    }

    /// Matrix multiply, falling back to a dot product when the shapes don't
    /// compose but both operands are equal-length column vectors (§4.3).
    pub fn multiply(&self, other: &Matrix) -> EvalResult<Matrix> {
        if self.n == other.m {
            let mut out = Matrix::zero(self.m, other.n);
            for i in 0..self.m {
                for j in 0..other.n {
                    let mut acc = Numerical::int(0);
                    for k in 0..self.n {
                        acc = acc.add(self.get(i, k).mul(other.get(k, j))?)?;
                    }
                    out.set(i, j, acc);
                }
            }
            return Ok(out);
        }
        if self.n == 1 && other.n == 1 && self.m == other.m {
            let dot = Matrix::dot(self, other)?;
            return Ok(Matrix::new(1, 1, vec![dot]));
        }
        Err(EvalError::Syntax)
    }

    pub fn dot(a: &Matrix, b: &Matrix) -> EvalResult<Numerical> {
        if a.n != 1 || b.n != 1 || a.m != b.m {
            return Err(EvalError::Syntax);
        }
        let mut acc = Numerical::int(0);
        for i in 0..a.m {
            acc = acc.add(a.get(i, 0).mul(b.get(i, 0))?)?;
        }
        Ok(acc)
    }

    pub fn cross(a: &Matrix, b: &Matrix) -> EvalResult<Matrix> {
        if a.m != 3 || a.n != 1 || b.m != 3 || b.n != 1 {
            return Err(EvalError::Syntax);
        }
        let (a1, a2, a3) = (a.get(0, 0), a.get(1, 0), a.get(2, 0));
        let (b1, b2, b3) = (b.get(0, 0), b.get(1, 0), b.get(2, 0));
        let c1 = a2.mul(b3)?.sub(a3.mul(b2)?)?;
        let c2 = a3.mul(b1)?.sub(a1.mul(b3)?)?;
        let c3 = a1.mul(b2)?.sub(a2.mul(b1)?)?;
        Ok(Matrix::new(3, 1, vec![c1, c2, c3]))
    }

    pub fn transpose(&self) -> Matrix {
        let mut out = Matrix::zero(self.n, self.m);
        for i in 0..self.m {
            for j in 0..self.n {
                out.set(j, i, self.get(i, j));
            }
        }
        out
    }

    /// Gaussian elimination tracking a sign bit for row swaps, per §4.3.
    fn eliminate(&self, track_sign: bool) -> (Matrix, i32, bool) {
        let mut mat = self.clone();
        let mut sign = 1i32;
        let mut singular = false;
        let mut pivot_row = 0;
        for col in 0..mat.n.min(mat.m) {
            let mut pivot = None;
            for r in pivot_row..mat.m {
                if !mat.get(r, col).is_zero() {
                    pivot = Some(r);
                    break;
                }
            }
            let Some(p) = pivot else {
                singular = true;
                continue;
            };
            if p != pivot_row {
                for c in 0..mat.n {
                    let tmp = mat.get(p, c);
                    mat.set(p, c, mat.get(pivot_row, c));
                    mat.set(pivot_row, c, tmp);
                }
                if track_sign {
                    sign = -sign;
                }
            }
            let pivot_val = mat.get(pivot_row, col);
            for r in (pivot_row + 1)..mat.m {
                let factor = mat.get(r, col).div(pivot_val, true, false).unwrap_or(Numerical::nan());
                for c in 0..mat.n {
                    let v = mat.get(r, c).sub(factor.mul(mat.get(pivot_row, c)).unwrap_or(Numerical::nan())).unwrap_or(Numerical::nan());
                    mat.set(r, c, v);
                }
            }
            pivot_row += 1;
        }
        (mat, sign, singular)
    }

    pub fn determinant(&self) -> EvalResult<Numerical> {
        if self.m != self.n {
            return Err(EvalError::Syntax);
        }
        let (upper, sign, singular) = self.eliminate(true);
        if singular {
            return Ok(Numerical::int(0));
        }
        let mut det = Numerical::int(sign as i64);
        for i in 0..self.n {
            det = det.mul(upper.get(i, i))?;
        }
        Ok(det)
    }

    /// Augments with the identity, eliminates, extracts the right half.
    /// Failure (singular matrix) produces a NaN-filled matrix per §4.3/§7.
    pub fn inverse(&self) -> EvalResult<Matrix> {
        if self.m != self.n {
            return Err(EvalError::Syntax);
        }
        let n = self.n;
        let mut aug = Matrix::zero(n, 2 * n);
        for i in 0..n {
            for j in 0..n {
                aug.set(i, j, self.get(i, j));
            }
            aug.set(i, n + i, Numerical::int(1));
        }
        // Gauss-Jordan elimination with partial pivoting on the augmented matrix.
        for col in 0..n {
            let mut pivot = None;
            for r in col..n {
                if !aug.get(r, col).is_zero() {
                    pivot = Some(r);
                    break;
                }
            }
            let Some(p) = pivot else {
                return Ok(Matrix::new(n, n, vec![Numerical::nan(); n * n]));
            };
            if p != col {
                for c in 0..2 * n {
                    let tmp = aug.get(p, c);
                    aug.set(p, c, aug.get(col, c));
                    aug.set(col, c, tmp);
                }
            }
            let pivot_val = aug.get(col, col);
            for c in 0..2 * n {
                let v = aug.get(col, c).div(pivot_val, true, false)?;
                aug.set(col, c, v);
            }
            for r in 0..n {
                if r == col {
                    continue;
                }
                let factor = aug.get(r, col);
                if factor.is_zero() {
                    continue;
                }
                for c in 0..2 * n {
                    let v = aug.get(r, c).sub(factor.mul(aug.get(col, c))?)?;
                    aug.set(r, c, v);
                }
            }
        }
        let mut out = Matrix::zero(n, n);
        for i in 0..n {
            for j in 0..n {
                out.set(i, j, aug.get(i, n + j));
            }
        }
        Ok(out)
    }

    pub fn row_vector(&self, row: usize) -> EvalResult<Matrix> {
        if row >= self.m {
            return Err(EvalError::Syntax);
        }
        let entries = (0..self.n).map(|c| self.get(row, c)).collect();
        Ok(Matrix::new(1, self.n, entries))
    }

    pub fn col_vector(&self, col: usize) -> EvalResult<Matrix> {
        if col >= self.n {
            return Err(EvalError::Syntax);
        }
        let entries = (0..self.m).map(|r| self.get(r, col)).collect();
        Ok(Matrix::new(self.m, 1, entries))
    }

    pub fn equality(&self, other: &Matrix) -> bool {
        self.m == other.m
            && self.n == other.n
            && self
                .entries
                .iter()
                .zip(other.entries.iter())
                .all(|(a, b)| a.approx_eq(*b))
    }

    /// Solves `A^T A x = A^T b` for `x` (least squares).
    pub fn least_squares(a: &Matrix, b: &Matrix) -> EvalResult<Matrix> {
        let at = a.transpose();
        let ata = at.multiply(a)?;
        let atb = at.multiply(b)?;
        ata.inverse()?.multiply(&atb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(vals: &[[i64; 2]; 2]) -> Matrix {
        Matrix::new(
            2,
            2,
            vec![
                Numerical::int(vals[0][0]),
                Numerical::int(vals[0][1]),
                Numerical::int(vals[1][0]),
                Numerical::int(vals[1][1]),
            ],
        )
    }

    #[test]
    fn determinant_row_swap_negates() {
        let a = m(&[[1, 2], [3, 4]]);
        let mut b = a.clone();
        b.entries.swap(0, 2);
        b.entries.swap(1, 3);
        let da = a.determinant().unwrap();
        let db = b.determinant().unwrap();
        assert_eq!(da.negate(), db);
    }

    #[test]
    fn determinant_row_add_invariant() {
        let a = m(&[[1, 2], [3, 4]]);
        let mut b = a.clone();
        // row1 += 2 * row0
        b.set(1, 0, b.get(1, 0).add(a.get(0, 0).mul(Numerical::int(2)).unwrap()).unwrap());
        b.set(1, 1, b.get(1, 1).add(a.get(0, 1).mul(Numerical::int(2)).unwrap()).unwrap());
        assert_eq!(a.determinant().unwrap(), b.determinant().unwrap());
    }

    #[test]
    fn inverse_of_2x2() {
        let a = m(&[[1, 2], [3, 4]]);
        let inv = a.inverse().unwrap();
        // [[1,2],[3,4]]^-1 == [[-2,1],[3/2,-1/2]]
        assert_eq!(inv.get(0, 0), Numerical::int(-2));
        assert_eq!(inv.get(0, 1), Numerical::int(1));
        assert_eq!(inv.get(1, 0), Numerical::fraction(3, 2).unwrap());
        assert_eq!(inv.get(1, 1), Numerical::fraction(-1, 2).unwrap());
    }
}
