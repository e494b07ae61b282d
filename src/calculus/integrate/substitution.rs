use crate::calculus::differentiate;
use crate::expr::Expr;
use crate::simplify::{simplify, simplify_div, simplify_fully, substitute_simplified};

use super::common::{fresh_symbol, replace_subexpr};
use super::integrate_inner;

/// Try `u = g(x)` for every inner expression `g` of the integrand: when `f / g'` rewrites to an
/// expression in `u` alone, integrate that and substitute back.
pub(super) fn integrate_by_substitution(expr: &Expr, var: &str, depth: usize) -> Option<Expr> {
    let symbol = fresh_symbol(expr);
    let placeholder = Expr::var(&symbol);

    for inner in inner_candidates(expr, var) {
        let du = differentiate(var, &inner);
        if du.is_zero() {
            continue;
        }
        let ratio = simplify_div(expr.clone(), du);
        for form in [ratio.clone(), simplify_fully(ratio)] {
            let in_u = simplify(replace_subexpr(&form, &inner, &placeholder));
            if in_u.contains_var(var) {
                continue;
            }
            if let Some(antiderivative) = integrate_inner(&in_u, &symbol, depth + 1) {
                return Some(substitute_simplified(&antiderivative, &symbol, &inner));
            }
        }
    }
    None
}

fn inner_candidates(expr: &Expr, var: &str) -> Vec<Expr> {
    let mut out = Vec::new();
    collect_candidates(expr, var, &mut out);
    out
}

fn collect_candidates(expr: &Expr, var: &str, out: &mut Vec<Expr>) {
    match expr {
        Expr::Pow(base, exp) => {
            push_candidate(base, var, out);
            push_candidate(exp, var, out);
            if exp.contains_var(var) {
                push_candidate(expr, var, out);
            }
            collect_candidates(base, var, out);
            collect_candidates(exp, var, out);
        }
        Expr::Neg(inner) => collect_candidates(inner, var, out),
        other => {
            if let Some((a, b)) = other.binary_parts() {
                collect_candidates(a, var, out);
                collect_candidates(b, var, out);
            } else if let Some(arg) = other.function_arg() {
                push_candidate(other, var, out);
                push_candidate(arg, var, out);
                collect_candidates(arg, var, out);
            }
        }
    }
}

fn push_candidate(candidate: &Expr, var: &str, out: &mut Vec<Expr>) {
    let trivial = candidate.as_variable() == Some(var) || !candidate.contains_var(var);
    if !trivial && !out.contains(candidate) {
        out.push(candidate.clone());
    }
}
