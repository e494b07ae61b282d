use crate::expr::{one, Expr, Rational};
use crate::polynomial::{Poly, Polynomial};
use crate::simplify::{
    canon_sum, expand, flatten_mul, flatten_sum, is_sum, simplify, simplify_add, simplify_div,
    simplify_mul, simplify_neg, simplify_pow, simplify_sub,
};
use num_traits::{One, Signed, Zero};

use super::common::{linear_coeff, split_constant_factors};

/// Linearity, polynomials, and the table of elementary antiderivatives.
pub(super) fn integrate_direct(expr: &Expr, var: &str) -> Option<Expr> {
    if !expr.contains_var(var) {
        return Some(simplify_mul(expr.clone(), Expr::var(var)));
    }
    if is_sum(expr) {
        let terms = flatten_sum(expr)
            .iter()
            .map(|term| integrate_direct(term, var))
            .collect::<Option<Vec<_>>>()?;
        return Some(canon_sum(terms));
    }
    if let Some(poly) = Polynomial::<Expr>::from_expr(expr, var) {
        return Some(poly.integral().to_expr(var));
    }
    let (constant, rest) = split_constant_factors(expr, var);
    if !constant.is_one() {
        return integrate_direct(&rest, var).map(|r| simplify_mul(constant, r));
    }
    integrate_table(expr, var).or_else(|| exp_trig_product(expr, var))
}

fn integrate_table(expr: &Expr, var: &str) -> Option<Expr> {
    match expr {
        Expr::Pow(base, exp) if !exp.contains_var(var) => power_of_linear(base, exp, var)
            .or_else(|| inverse_sqrt_quadratic(base, exp, var))
            .or_else(|| trig_square(base, exp, var)),
        Expr::Pow(base, exp) if !base.contains_var(var) => {
            let log_base = simplify(Expr::Log(base.clone()));
            over_linear(exp, var, simplify_div(expr.clone(), log_base))
        }
        Expr::Exp(u) => over_linear(u, var, expr.clone()),
        Expr::Sin(u) => over_linear(u, var, simplify_neg(Expr::Cos(u.clone()))),
        Expr::Cos(u) => over_linear(u, var, Expr::Sin(u.clone())),
        Expr::Tan(u) => over_linear(
            u,
            var,
            simplify_neg(simplify(Expr::Log(Expr::Cos(u.clone()).boxed()))),
        ),
        Expr::Sinh(u) => over_linear(u, var, Expr::Cosh(u.clone())),
        Expr::Cosh(u) => over_linear(u, var, Expr::Sinh(u.clone())),
        Expr::Tanh(u) => over_linear(u, var, simplify(Expr::Log(Expr::Cosh(u.clone()).boxed()))),
        Expr::Log(u) => {
            let u = (**u).clone();
            over_linear(&u, var, simplify_sub(simplify_mul(u.clone(), expr.clone()), u.clone()))
        }
        Expr::Atan(u) => {
            let u = (**u).clone();
            let log_term = simplify(Expr::Log(simplify_add(square(u.clone()), one()).boxed()));
            let antiderivative = simplify_sub(
                simplify_mul(u.clone(), expr.clone()),
                simplify_div(log_term, Expr::integer(2)),
            );
            over_linear(&u, var, antiderivative)
        }
        Expr::Asin(u) | Expr::Acos(u) => {
            let u = (**u).clone();
            let root = simplify_pow(simplify_sub(one(), square(u.clone())), Expr::constant(1, 2));
            let product = simplify_mul(u.clone(), expr.clone());
            let antiderivative = if matches!(expr, Expr::Asin(_)) {
                simplify_add(product, root)
            } else {
                simplify_sub(product, root)
            };
            over_linear(&u, var, antiderivative)
        }
        _ => None,
    }
}

fn over_linear(arg: &Expr, var: &str, antiderivative: Expr) -> Option<Expr> {
    let a = linear_coeff(arg, var)?;
    Some(simplify_div(antiderivative, a))
}

/// `(a*x + b)^n`, with `n = -1` giving the logarithm.
fn power_of_linear(base: &Expr, exp: &Expr, var: &str) -> Option<Expr> {
    let a = linear_coeff(base, var)?;
    if exp.as_constant().is_some_and(|c| *c == -Rational::one()) {
        return Some(simplify_div(simplify(Expr::Log(base.clone().boxed())), a));
    }
    let raised = simplify_add(exp.clone(), one());
    Some(simplify_div(
        simplify_pow(base.clone(), raised.clone()),
        simplify_mul(raised, a),
    ))
}

/// `1/sqrt(c - d*x^2)` with positive rationals `c`, `d`.
fn inverse_sqrt_quadratic(base: &Expr, exp: &Expr, var: &str) -> Option<Expr> {
    if exp.as_constant()? != &-Rational::new(1.into(), 2.into()) {
        return None;
    }
    let poly = Poly::from_expr(base, var)?;
    if poly.degree()? != 2 || !poly.coeff(1).is_zero() {
        return None;
    }
    let c = poly.coeff(0);
    let d = -poly.coeff(2);
    if !c.is_positive() || !d.is_positive() {
        return None;
    }
    let half = Expr::constant(1, 2);
    let scale = simplify_pow(Expr::Constant(&d / &c), half.clone());
    let arcsine = simplify(Expr::Asin(simplify_mul(scale, Expr::var(var)).boxed()));
    Some(simplify_div(arcsine, simplify_pow(Expr::Constant(d), half)))
}

/// `sin(u)^2` and `cos(u)^2` through the half-angle identities.
fn trig_square(base: &Expr, exp: &Expr, var: &str) -> Option<Expr> {
    if exp.as_constant()? != &Rational::from_integer(2.into()) {
        return None;
    }
    let (u, sign) = match base {
        Expr::Sin(u) => ((**u).clone(), -1),
        Expr::Cos(u) => ((**u).clone(), 1),
        _ => return None,
    };
    let mixed = simplify_div(
        simplify_mul(Expr::Sin(u.clone().boxed()), Expr::Cos(u.clone().boxed())),
        Expr::integer(2 * sign),
    );
    let antiderivative = simplify_add(simplify_div(u.clone(), Expr::integer(2)), mixed);
    over_linear(&u, var, antiderivative).map(expand)
}

/// `exp(a*x + p) * sin(b*x + q)` and the cosine counterpart.
fn exp_trig_product(expr: &Expr, var: &str) -> Option<Expr> {
    let factors = flatten_mul(expr);
    let [first, second] = factors.as_slice() else {
        return None;
    };
    let (exp_arg, trig) = match (first, second) {
        (Expr::Exp(arg), trig @ (Expr::Sin(_) | Expr::Cos(_)))
        | (trig @ (Expr::Sin(_) | Expr::Cos(_)), Expr::Exp(arg)) => ((**arg).clone(), trig),
        _ => return None,
    };
    let trig_arg = trig.function_arg()?.clone();
    let a = linear_coeff(&exp_arg, var)?;
    let b = linear_coeff(&trig_arg, var)?;
    let sin = Expr::Sin(trig_arg.clone().boxed());
    let cos = Expr::Cos(trig_arg.boxed());
    let combination = match trig {
        Expr::Sin(_) => simplify_sub(simplify_mul(a.clone(), sin), simplify_mul(b.clone(), cos)),
        _ => simplify_add(simplify_mul(a.clone(), cos), simplify_mul(b.clone(), sin)),
    };
    let norm = simplify_add(square(a), square(b));
    let result = simplify_div(
        simplify_mul(Expr::Exp(exp_arg.boxed()), combination),
        norm,
    );
    Some(expand(result))
}

fn square(expr: Expr) -> Expr {
    simplify_pow(expr, Expr::integer(2))
}
