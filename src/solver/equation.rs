//! Real solutions of a single equation in one unknown.

use crate::calculus::integrate::{fresh_symbol, replace_subexpr};
use crate::error::{CasError, Result};
use crate::eval::evaluate;
use crate::expr::{one, Expr, Rational};
use crate::polynomial::{Poly, Polynomial};
use crate::simplify::{
    exact_log, flatten_mul, flatten_sum, numer_denom, simplify, simplify_add, simplify_div,
    simplify_function, simplify_mul, simplify_neg, simplify_pow, simplify_sub, split_coeff,
    substitute_simplified,
};
use log::debug;
use num_integer::Integer;
use num_traits::{Signed, Zero};

/// Nesting limit for kernel inversion (`sin(exp(x)) = 1/2` needs two levels).
const MAX_DEPTH: usize = 6;
/// Relative tolerance when checking a numeric candidate against the equation.
const CHECK_TOLERANCE: f64 = 1e-8;

/// Solve `lhs = rhs` for `var` over the reals.
///
/// The equation is reduced to `numerator(lhs - rhs) = 0`. Candidates that make the
/// denominator vanish, or that do not satisfy the equation numerically, are dropped. The
/// result is free of duplicates and sorted by value when every solution is numeric.
pub fn solve_equation(lhs: &Expr, rhs: &Expr, var: &str) -> Result<Vec<Expr>> {
    let difference = simplify(Expr::Sub(lhs.clone().boxed(), rhs.clone().boxed()));
    if !difference.contains_var(var) {
        return Ok(Vec::new());
    }

    let (numerator, denominator) = numer_denom(&difference);
    let candidates = solve_zero(&numerator, var, 0)?;

    let mut solutions: Vec<Expr> = Vec::new();
    for candidate in candidates {
        if solutions.contains(&candidate) {
            continue;
        }
        if !satisfies(&difference, &denominator, var, &candidate) {
            debug!("rejecting {var} = {candidate} for {difference} = 0");
            continue;
        }
        solutions.push(candidate);
    }

    let numeric: Option<Vec<f64>> = solutions.iter().map(|s| evaluate(s, &[]).ok()).collect();
    if let Some(values) = numeric {
        let mut paired: Vec<(f64, Expr)> = values.into_iter().zip(solutions).collect();
        paired.sort_by(|a, b| a.0.total_cmp(&b.0));
        solutions = paired.into_iter().map(|(_, s)| s).collect();
    }
    Ok(solutions)
}

/// Candidate roots of `expr = 0`, possibly with extraneous entries.
fn solve_zero(expr: &Expr, var: &str, depth: usize) -> Result<Vec<Expr>> {
    if !expr.contains_var(var) {
        return Ok(Vec::new());
    }
    if depth > MAX_DEPTH {
        return Err(unsolvable(expr, var));
    }

    let (_, rest) = split_coeff(expr);
    let factors = flatten_mul(&rest);
    if factors.len() > 1 {
        let mut out = Vec::new();
        for factor in factors {
            out.extend(solve_zero(&factor, var, depth)?);
        }
        return Ok(out);
    }

    if let Expr::Pow(base, exp) = &rest {
        if exp.as_constant().is_some_and(|e| e.is_positive()) {
            return solve_zero(base, var, depth);
        }
    }

    if let Some(poly) = Poly::from_expr(&rest, var) {
        return solve_rational_polynomial(&poly, var);
    }
    if let Some(poly) = Polynomial::<Expr>::from_expr(&rest, var) {
        if let Some(roots) = solve_symbolic_polynomial(&poly) {
            return Ok(roots);
        }
    }
    solve_by_kernel(&rest, var, depth)
}

fn solve_rational_polynomial(poly: &Poly, var: &str) -> Result<Vec<Expr>> {
    let mut roots = Vec::new();
    let mut remaining = poly.clone();
    for root in poly.rational_roots() {
        let factor = Poly::identity() - Poly::from_constant(root.clone());
        while let Some(quotient) = remaining.div_exact(&factor) {
            remaining = quotient;
        }
        roots.push(Expr::Constant(root));
    }

    match remaining.degree().unwrap_or(0) {
        0 => {}
        2 => roots.extend(real_quadratic_roots(
            &remaining.coeff(2),
            &remaining.coeff(1),
            &remaining.coeff(0),
        )),
        4 if remaining.coeff(3).is_zero() && remaining.coeff(1).is_zero() => {
            for square in real_quadratic_roots(
                &remaining.coeff(4),
                &remaining.coeff(2),
                &remaining.coeff(0),
            ) {
                roots.extend(square_roots_of(square));
            }
        }
        _ => return Err(unsolvable(&remaining.to_expr(var), var)),
    }
    Ok(roots)
}

/// Real roots of `a*t^2 + b*t + c` with rational coefficients.
fn real_quadratic_roots(a: &Rational, b: &Rational, c: &Rational) -> Vec<Expr> {
    let four = Rational::from_integer(4.into());
    let discriminant = b * b - &four * a * c;
    if discriminant.is_negative() {
        return Vec::new();
    }
    quadratic_formula(
        Expr::Constant(a.clone()),
        Expr::Constant(b.clone()),
        Expr::Constant(discriminant),
    )
}

fn quadratic_formula(a: Expr, b: Expr, discriminant: Expr) -> Vec<Expr> {
    let root = simplify_pow(discriminant, Expr::constant(1, 2));
    let two_a = simplify_mul(Expr::integer(2), a);
    let minus_b = simplify_neg(b);
    let mut out = vec![simplify_div(
        simplify_sub(minus_b.clone(), root.clone()),
        two_a.clone(),
    )];
    if !root.is_zero() {
        out.push(simplify_div(simplify_add(minus_b, root), two_a));
    }
    out
}

/// `±sqrt(value)` when `value` is known to be non-negative.
fn square_roots_of(value: Expr) -> Vec<Expr> {
    if evaluate(&value, &[]).map_or(true, |v| v < 0.0) {
        return Vec::new();
    }
    let root = simplify_pow(value, Expr::constant(1, 2));
    if root.is_zero() {
        return vec![root];
    }
    vec![simplify_neg(root.clone()), root]
}

/// Degree one and two with coefficients that involve other symbols.
fn solve_symbolic_polynomial(poly: &Polynomial<Expr>) -> Option<Vec<Expr>> {
    match poly.degree()? {
        1 => Some(vec![simplify_div(simplify_neg(poly.coeff(0)), poly.coeff(1))]),
        2 => {
            let (a, b, c) = (poly.coeff(2), poly.coeff(1), poly.coeff(0));
            let discriminant = simplify_sub(
                simplify_mul(b.clone(), b.clone()),
                simplify_mul(Expr::integer(4), simplify_mul(a.clone(), c)),
            );
            Some(quadratic_formula(a, b, discriminant))
        }
        _ => None,
    }
}

/// Treat `expr` as a polynomial in one transcendental kernel `k(var)`, solve for the kernel
/// values, then invert the kernel.
fn solve_by_kernel(expr: &Expr, var: &str, depth: usize) -> Result<Vec<Expr>> {
    let mut kernels = Vec::new();
    collect_kernels(expr, var, &mut kernels);
    let placeholder = fresh_symbol(expr);

    for kernel in &kernels {
        let replaced = simplify(replace_subexpr(expr, kernel, &Expr::var(&placeholder)));
        if replaced.contains_var(var) {
            continue;
        }
        let Some(poly) = Poly::from_expr(&replaced, &placeholder) else {
            continue;
        };
        let values = solve_rational_polynomial(&poly, &placeholder)?;
        let mut out = Vec::new();
        for value in values {
            out.extend(invert_kernel(kernel, value, var, depth)?);
        }
        return Ok(out);
    }

    // A single term holding the unknown: `c*k(var) + rest = 0`.
    let (varying, fixed): (Vec<Expr>, Vec<Expr>) =
        flatten_sum(expr).into_iter().partition(|t| t.contains_var(var));
    if let [term] = varying.as_slice() {
        let (constant, kernel) = split_varying(term, var);
        if let Some(kernel) = kernel {
            let fixed = fixed.into_iter().fold(Expr::integer(0), simplify_add);
            let value = simplify_div(simplify_neg(fixed), constant);
            return invert_kernel(&kernel, value, var, depth);
        }
    }
    Err(unsolvable(expr, var))
}

fn collect_kernels(expr: &Expr, var: &str, out: &mut Vec<Expr>) {
    if !expr.contains_var(var) {
        return;
    }
    let is_kernel = match expr {
        Expr::Pow(base, exp) => {
            !exp.as_constant().is_some_and(|e| e.is_integer()) || !base.contains_var(var)
        }
        other => other.function_arg().is_some(),
    };
    if is_kernel {
        if !out.contains(expr) {
            out.push(expr.clone());
        }
        return;
    }
    if let Some((a, b)) = expr.binary_parts() {
        collect_kernels(a, var, out);
        collect_kernels(b, var, out);
    } else if let Expr::Neg(inner) = expr {
        collect_kernels(inner, var, out);
    }
}

/// Split a term into its factors free of `var` and the single factor that is not.
fn split_varying(term: &Expr, var: &str) -> (Expr, Option<Expr>) {
    let (coeff, rest) = split_coeff(term);
    let mut constant = Expr::Constant(coeff);
    let mut varying = Vec::new();
    for factor in flatten_mul(&rest) {
        if factor.contains_var(var) {
            varying.push(factor);
        } else {
            constant = simplify_mul(constant, factor);
        }
    }
    match varying.len() {
        1 => (constant, varying.pop()),
        _ => (constant, None),
    }
}

/// Solutions of `kernel = value`.
fn invert_kernel(kernel: &Expr, value: Expr, var: &str, depth: usize) -> Result<Vec<Expr>> {
    let pi = Expr::Pi;
    let inner_targets: Vec<(Expr, Expr)> = match kernel {
        Expr::Pow(base, exp) if !base.contains_var(var) => {
            if let Some(k) = base
                .as_constant()
                .zip(value.as_constant())
                .and_then(|(b, v)| exact_log(b, v))
            {
                return solve_zero(
                    &simplify_sub((**exp).clone(), Expr::Constant(k)),
                    var,
                    depth + 1,
                );
            }
            let log_base = simplify_function(&Expr::Log(one().boxed()), (**base).clone());
            let log_value = simplify_function(&Expr::Log(one().boxed()), value);
            vec![((**exp).clone(), simplify_div(log_value, log_base))]
        }
        Expr::Pow(base, exp) => {
            let root = simplify_pow(value, simplify_div(one(), (**exp).clone()));
            let even_numerator = exp.as_constant().is_some_and(|e| e.numer().is_even());
            let mut targets = vec![((**base).clone(), root.clone())];
            if even_numerator {
                targets.push(((**base).clone(), simplify_neg(root)));
            }
            targets
        }
        Expr::Sin(u) => {
            let principal = simplify_function(&Expr::Asin(one().boxed()), value);
            vec![
                ((**u).clone(), principal.clone()),
                ((**u).clone(), simplify_sub(pi, principal)),
            ]
        }
        Expr::Cos(u) => {
            let principal = simplify_function(&Expr::Acos(one().boxed()), value);
            let full_turn = simplify_mul(Expr::integer(2), pi);
            vec![
                ((**u).clone(), principal.clone()),
                ((**u).clone(), simplify_sub(full_turn, principal)),
            ]
        }
        Expr::Tan(u) => vec![((**u).clone(), simplify_function(&Expr::Atan(one().boxed()), value))],
        Expr::Asin(u) => vec![((**u).clone(), simplify_function(&Expr::Sin(one().boxed()), value))],
        Expr::Acos(u) => vec![((**u).clone(), simplify_function(&Expr::Cos(one().boxed()), value))],
        Expr::Atan(u) => vec![((**u).clone(), simplify_function(&Expr::Tan(one().boxed()), value))],
        Expr::Exp(u) => vec![((**u).clone(), simplify_function(&Expr::Log(one().boxed()), value))],
        Expr::Log(u) => vec![((**u).clone(), simplify_function(&Expr::Exp(one().boxed()), value))],
        Expr::Sinh(u) => vec![((**u).clone(), area_sine(value))],
        Expr::Cosh(u) => {
            let shifted = simplify_sub(simplify_mul(value.clone(), value.clone()), one());
            let root = simplify_pow(shifted, Expr::constant(1, 2));
            let log = simplify_function(&Expr::Log(one().boxed()), simplify_add(value, root));
            vec![((**u).clone(), log.clone()), ((**u).clone(), simplify_neg(log))]
        }
        Expr::Tanh(u) => {
            let ratio = simplify_div(
                simplify_add(one(), value.clone()),
                simplify_sub(one(), value),
            );
            let log = simplify_function(&Expr::Log(one().boxed()), ratio);
            vec![((**u).clone(), simplify_mul(Expr::constant(1, 2), log))]
        }
        Expr::Abs(u) => vec![
            ((**u).clone(), value.clone()),
            ((**u).clone(), simplify_neg(value)),
        ],
        other => return Err(unsolvable(other, var)),
    };

    let mut out = Vec::new();
    for (inner, target) in inner_targets {
        out.extend(solve_zero(&simplify_sub(inner, target), var, depth + 1)?);
    }
    Ok(out)
}

/// `asinh(v) = log(v + sqrt(v^2 + 1))`.
fn area_sine(value: Expr) -> Expr {
    let shifted = simplify_add(simplify_mul(value.clone(), value.clone()), one());
    let root = simplify_pow(shifted, Expr::constant(1, 2));
    simplify_function(&Expr::Log(one().boxed()), simplify_add(value, root))
}

/// Reject candidates that zero the denominator, fail to evaluate, or miss the equation.
fn satisfies(difference: &Expr, denominator: &Expr, var: &str, candidate: &Expr) -> bool {
    if substitute_simplified(denominator, var, candidate).is_zero() {
        return false;
    }
    if !candidate.free_symbols().is_empty() {
        return true;
    }
    let Ok(value) = evaluate(candidate, &[]) else {
        return false;
    };
    match evaluate(difference, &[(var, value)]) {
        Ok(residual) => residual.abs() <= CHECK_TOLERANCE * (1.0 + value.abs()),
        Err(_) => false,
    }
}

fn unsolvable(expr: &Expr, var: &str) -> CasError {
    CasError::Solve(format!("no closed-form solution of {expr} = 0 for {var}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expr;

    #[test]
    fn biquadratic_reduces_to_squares() {
        let lhs = parse_expr("x**4 - 5*x**2 + 6").unwrap();
        let roots = solve_equation(&lhs, &Expr::integer(0), "x").unwrap();
        assert_eq!(roots.len(), 4);
    }

    #[test]
    fn nested_kernels_are_inverted() {
        let lhs = parse_expr("exp(2*x - 1)").unwrap();
        let roots = solve_equation(&lhs, &Expr::integer(1), "x").unwrap();
        assert_eq!(roots, vec![Expr::constant(1, 2)]);
    }
}
