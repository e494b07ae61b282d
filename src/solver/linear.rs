use std::collections::HashMap;

use crate::expr::{Expr, Rational};
use crate::simplify::{flatten_sum, simplify, split_coeff};
use num_traits::{Signed, Zero};

#[derive(Debug, Clone, PartialEq)]
pub enum LinearResult {
    Unique(Vec<(String, Expr)>),
    /// Solutions form a family; `free` lists the unconstrained variables.
    Infinite { rank: usize, free: Vec<String> },
    Inconsistent,
    /// At least one equation is not linear in the requested variables.
    NonLinear(Vec<usize>),
}

struct LinearRow {
    coeffs: Vec<Rational>,
    constant: Rational,
}

/// Solve a system of equations given as `(lhs, rhs)` pairs by exact Gaussian elimination.
pub fn solve_system(vars: &[&str], equations: &[(Expr, Expr)]) -> LinearResult {
    let var_map: HashMap<&str, usize> = vars.iter().enumerate().map(|(i, v)| (*v, i)).collect();

    let mut rows = Vec::with_capacity(equations.len());
    let mut nonlinear = Vec::new();
    for (idx, (lhs, rhs)) in equations.iter().enumerate() {
        let normalized = simplify(Expr::Sub(lhs.clone().boxed(), rhs.clone().boxed()));
        match decompose_linear(&normalized, &var_map) {
            Some(row) => rows.push(row),
            None => nonlinear.push(idx),
        }
    }
    if !nonlinear.is_empty() {
        return LinearResult::NonLinear(nonlinear);
    }

    let n_vars = vars.len();
    let mut matrix = Matrix::augmented(
        rows.iter().map(|r| r.coeffs.clone()).collect(),
        rows.iter().map(|r| -r.constant.clone()).collect(),
    );
    let pivots = matrix.rref(n_vars);
    if matrix.inconsistent(pivots.len(), n_vars) {
        return LinearResult::Inconsistent;
    }

    if pivots.len() < n_vars {
        let free = (0..n_vars)
            .filter(|col| !pivots.iter().any(|(_, c)| c == col))
            .map(|col| vars[col].to_string())
            .collect();
        return LinearResult::Infinite {
            rank: pivots.len(),
            free,
        };
    }

    let mut values = vec![Expr::Constant(Rational::zero()); n_vars];
    for (row, col) in pivots {
        values[col] = Expr::Constant(matrix.get(row, n_vars).clone());
    }
    LinearResult::Unique(
        vars.iter()
            .map(|v| v.to_string())
            .zip(values)
            .collect(),
    )
}

/// Solve a square system `rows * x = rhs` with rational entries. `None` when singular.
pub(crate) fn solve_square(rows: Vec<Vec<Rational>>, rhs: Vec<Rational>) -> Option<Vec<Rational>> {
    let n = rows.len();
    let mut matrix = Matrix::augmented(rows, rhs);
    let pivots = matrix.rref(n);
    if pivots.len() < n {
        return None;
    }
    let mut values = vec![Rational::zero(); n];
    for (row, col) in pivots {
        values[col] = matrix.get(row, n).clone();
    }
    Some(values)
}

fn decompose_linear(expr: &Expr, var_map: &HashMap<&str, usize>) -> Option<LinearRow> {
    let mut coeffs = vec![Rational::zero(); var_map.len()];
    let mut constant = Rational::zero();
    for term in flatten_sum(expr) {
        let (c, rest) = split_coeff(&term);
        if rest.is_one() {
            constant += c;
            continue;
        }
        let idx = rest.as_variable().and_then(|v| var_map.get(v))?;
        coeffs[*idx] += c;
    }
    Some(LinearRow { coeffs, constant })
}

struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<Rational>,
}

impl Matrix {
    fn augmented(rows: Vec<Vec<Rational>>, rhs: Vec<Rational>) -> Self {
        let n_rows = rows.len();
        let cols = rows.first().map_or(0, Vec::len) + 1;
        let mut data = Vec::with_capacity(n_rows * cols);
        for (row, value) in rows.into_iter().zip(rhs) {
            data.extend(row);
            data.push(value);
        }
        Matrix {
            rows: n_rows,
            cols,
            data,
        }
    }

    fn get(&self, row: usize, col: usize) -> &Rational {
        &self.data[row * self.cols + col]
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for offset in 0..self.cols {
            self.data.swap(a * self.cols + offset, b * self.cols + offset);
        }
    }

    /// Reduce to row echelon form over the first `n_vars` columns; returns `(row, col)` pivots.
    fn rref(&mut self, n_vars: usize) -> Vec<(usize, usize)> {
        let cols = self.cols;
        let mut pivots = Vec::new();
        let mut row = 0;
        for col in 0..n_vars {
            if row >= self.rows {
                break;
            }
            let Some(pivot_idx) = (row..self.rows)
                .filter(|r| !self.get(*r, col).is_zero())
                .max_by(|a, b| self.get(*a, col).abs().cmp(&self.get(*b, col).abs()))
            else {
                continue;
            };
            self.swap_rows(row, pivot_idx);

            let pivot_value = self.get(row, col).clone();
            for c in col..cols {
                self.data[row * cols + c] /= pivot_value.clone();
            }

            let pivot_row: Vec<Rational> = self.data[row * cols..(row + 1) * cols].to_vec();
            for other in (0..self.rows).filter(|r| *r != row) {
                let factor = self.get(other, col).clone();
                if factor.is_zero() {
                    continue;
                }
                for c in col..cols {
                    self.data[other * cols + c] -= &factor * &pivot_row[c];
                }
            }

            pivots.push((row, col));
            row += 1;
        }
        pivots
    }

    fn inconsistent(&self, rank: usize, n_vars: usize) -> bool {
        (rank..self.rows).any(|r| {
            (0..n_vars).all(|c| self.get(r, c).is_zero()) && !self.get(r, n_vars).is_zero()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::One;

    #[test]
    fn singular_square_system_has_no_unique_solution() {
        let one = Rational::one();
        let rows = vec![vec![one.clone(), one.clone()], vec![one.clone(), one.clone()]];
        assert_eq!(solve_square(rows, vec![one.clone(), one]), None);
    }
}
