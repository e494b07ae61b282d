use crate::expr::{Expr, Rational};
use crate::polynomial::Poly;
use crate::simplify::{
    canon_sum, expand, numer_denom, simplify, simplify_add, simplify_div, simplify_mul,
    simplify_pow, simplify_sub,
};
use crate::solver::solve_square;
use num_traits::{Signed, Zero};

use super::types::ReasonCode;

/// One term of the partial-fraction decomposition.
enum Fraction {
    /// `A / (x - root)^power`
    Linear { root: Rational, power: usize },
    /// `(B*x + C) / quadratic`
    Quadratic(Poly),
}

/// Integrate a rational function whose denominator splits into rational linear factors and at
/// most one irreducible quadratic.
pub(super) fn integrate_partial_fractions(
    expr: &Expr,
    var: &str,
) -> Result<Expr, Option<ReasonCode>> {
    let (numer, denom) = numer_denom(expr);
    if !denom.contains_var(var) {
        return Err(None);
    }
    let p = Poly::from_expr(&numer, var).ok_or(Some(ReasonCode::NonRational))?;
    let q = Poly::from_expr(&expand(denom), var)
        .ok_or(Some(ReasonCode::NonRational))?;

    let (whole, remainder) = p.div_rem(&q);
    let fractions = split_denominator(&q).ok_or(Some(ReasonCode::UnsplittableDenominator))?;
    let coefficients = solve_coefficients(&remainder, &q, &fractions)
        .ok_or(Some(ReasonCode::UnsplittableDenominator))?;

    let mut pieces = vec![integrate_polynomial(&whole, var)];
    let mut index = 0;
    for fraction in &fractions {
        match fraction {
            Fraction::Linear { root, power } => {
                let a = coefficients[index].clone();
                index += 1;
                pieces.push(integrate_linear_term(a, root, *power, var));
            }
            Fraction::Quadratic(quadratic) => {
                let b = coefficients[index].clone();
                let c = coefficients[index + 1].clone();
                index += 2;
                pieces.push(integrate_quadratic_term(b, c, quadratic, var));
            }
        }
    }
    Ok(canon_sum(pieces))
}

fn integrate_polynomial(poly: &Poly, var: &str) -> Expr {
    let terms = poly
        .coeff_entries()
        .map(|(exp, c)| {
            let raised = exp + 1;
            let coeff = c / Rational::from_integer(raised.into());
            simplify_mul(
                Expr::Constant(coeff),
                simplify_pow(Expr::var(var), Expr::integer(raised)),
            )
        })
        .collect();
    canon_sum(terms)
}

fn split_denominator(q: &Poly) -> Option<Vec<Fraction>> {
    let mut rest = q.clone();
    let mut fractions = Vec::new();
    for root in q.rational_roots() {
        let factor = linear_factor(&root);
        let mut power = 0;
        while let Some(quotient) = rest.div_exact(&factor) {
            rest = quotient;
            power += 1;
        }
        for k in 1..=power {
            fractions.push(Fraction::Linear {
                root: root.clone(),
                power: k,
            });
        }
    }
    match rest.degree() {
        Some(0) => Some(fractions),
        Some(2) => {
            let disc = rest.coeff(1) * rest.coeff(1)
                - Rational::from_integer(4.into()) * rest.coeff(2) * rest.coeff(0);
            if !disc.is_negative() {
                return None;
            }
            fractions.push(Fraction::Quadratic(rest));
            Some(fractions)
        }
        _ => None,
    }
}

fn linear_factor(root: &Rational) -> Poly {
    Poly::identity() - Poly::from_constant(root.clone())
}

/// Equate coefficients of `remainder = sum(unknown_i * q / factor_i)` and solve.
fn solve_coefficients(remainder: &Poly, q: &Poly, fractions: &[Fraction]) -> Option<Vec<Rational>> {
    let mut columns: Vec<Poly> = Vec::new();
    for fraction in fractions {
        match fraction {
            Fraction::Linear { root, power } => {
                let divisor = linear_factor(root).pow(*power);
                columns.push(q.div_exact(&divisor)?);
            }
            Fraction::Quadratic(quadratic) => {
                let cofactor = q.div_exact(quadratic)?;
                columns.push(cofactor.clone() * Poly::identity());
                columns.push(cofactor);
            }
        }
    }
    let size = q.degree()?;
    if columns.len() != size {
        return None;
    }
    let rows: Vec<Vec<Rational>> = (0..size)
        .map(|power| columns.iter().map(|col| col.coeff(power)).collect())
        .collect();
    let rhs: Vec<Rational> = (0..size).map(|power| remainder.coeff(power)).collect();
    solve_square(rows, rhs)
}

fn integrate_linear_term(a: Rational, root: &Rational, power: usize, var: &str) -> Expr {
    if a.is_zero() {
        return Expr::Constant(Rational::zero());
    }
    let base = simplify_sub(Expr::var(var), Expr::Constant(root.clone()));
    if power == 1 {
        return simplify_mul(Expr::Constant(a), simplify(Expr::Log(base.boxed())));
    }
    let lowered = (power - 1) as i64;
    let coeff = -a / Rational::from_integer(lowered.into());
    simplify_mul(
        Expr::Constant(coeff),
        simplify_pow(base, Expr::integer(-lowered)),
    )
}

/// `(b*x + c) / (p*x^2 + q*x + r)` splits into a logarithm and an arctangent.
fn integrate_quadratic_term(b: Rational, c: Rational, quadratic: &Poly, var: &str) -> Expr {
    let p = quadratic.coeff(2);
    let q = quadratic.coeff(1);
    let r = quadratic.coeff(0);
    let two = Rational::from_integer(2.into());
    let four = Rational::from_integer(4.into());
    let x = Expr::var(var);

    let log_coeff = &b / (&two * &p);
    let atan_coeff = &c - &log_coeff * &q;

    let log_part = simplify_mul(
        Expr::Constant(log_coeff),
        simplify(Expr::Log(quadratic.to_expr(var).boxed())),
    );

    // sqrt(4pr - q^2) stays symbolic when it is irrational.
    let root = simplify_pow(
        Expr::Constant(&four * &p * &r - &q * &q),
        Expr::constant(1, 2),
    );
    let linear = simplify_add(
        simplify_mul(Expr::Constant(&two * &p), x),
        Expr::Constant(q.clone()),
    );
    let atan_arg = simplify_div(linear, root.clone());
    let atan_part = simplify_div(
        simplify_mul(
            Expr::Constant(&two * &atan_coeff),
            simplify(Expr::Atan(atan_arg.boxed())),
        ),
        root,
    );
    simplify_add(log_part, atan_part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::One;

    #[test]
    fn repeated_and_distinct_roots_split() {
        // (x - 1)^2 (x + 2)
        let q = linear_factor(&Rational::one()).pow(2) * linear_factor(&-Rational::from_integer(2.into()));
        let fractions = split_denominator(&q).expect("splits");
        assert_eq!(fractions.len(), 3);
    }

    #[test]
    fn irreducible_quadratic_is_kept() {
        let q = Poly::identity().pow(2) + Poly::one();
        let fractions = split_denominator(&q).expect("splits");
        assert!(matches!(fractions.as_slice(), [Fraction::Quadratic(_)]));
    }
}
