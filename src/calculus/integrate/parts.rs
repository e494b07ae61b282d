use crate::calculus::differentiate;
use crate::expr::{one, Expr};
use crate::polynomial::Polynomial;
use crate::simplify::{canon_product, expand, flatten_mul, simplify_fully, simplify_mul, simplify_sub};
use num_traits::Signed;

use super::common::split_constant_factors;
use super::integrate_inner;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum LiateRank {
    Log,
    InverseTrig,
    Algebraic,
    Trig,
    Exponential,
}

fn factor_rank(expr: &Expr, var: &str) -> Option<LiateRank> {
    match expr {
        Expr::Log(_) => Some(LiateRank::Log),
        Expr::Atan(_) | Expr::Asin(_) | Expr::Acos(_) => Some(LiateRank::InverseTrig),
        e if Polynomial::<Expr>::from_expr(e, var).is_some() => Some(LiateRank::Algebraic),
        Expr::Sin(_) | Expr::Cos(_) | Expr::Tan(_) | Expr::Sinh(_) | Expr::Cosh(_) | Expr::Tanh(_) => {
            Some(LiateRank::Trig)
        }
        Expr::Exp(_) => Some(LiateRank::Exponential),
        Expr::Pow(base, _) if !base.contains_var(var) => Some(LiateRank::Exponential),
        Expr::Pow(base, exp)
            if exp.as_constant().is_some_and(|e| e.is_integer() && e.is_positive()) =>
        {
            factor_rank(base, var)
        }
        _ => None,
    }
}

/// `∫ u dv = u v - ∫ v du` with `u` the first factor in LIATE order. A lone logarithm or
/// inverse trigonometric factor is integrated against `dv = dx`.
pub(super) fn integrate_by_parts(expr: &Expr, var: &str, depth: usize) -> Option<Expr> {
    let (constant, rest) = split_constant_factors(expr, var);
    let factors = flatten_mul(&rest);

    let ranked: Vec<(LiateRank, usize)> = factors
        .iter()
        .enumerate()
        .filter_map(|(i, f)| factor_rank(f, var).map(|rank| (rank, i)))
        .collect();
    let (rank, index) = ranked.into_iter().min()?;
    let u = factors[index].clone();
    let dv = canon_product(
        factors
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, f)| f.clone())
            .collect(),
    );
    if dv == one() && !matches!(rank, LiateRank::Log | LiateRank::InverseTrig) {
        return None;
    }
    let v = integrate_inner(&dv, var, depth + 1)?;
    let v_du = simplify_fully(simplify_mul(v.clone(), differentiate(var, &u)));
    let remaining = integrate_inner(&v_du, var, depth + 1)?;
    let result = simplify_sub(simplify_mul(u, v), remaining);
    Some(expand(simplify_mul(constant, result)))
}
