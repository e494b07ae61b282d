//! Symbolic integration: a strategy pipeline that records every attempt.

mod common;
mod direct;
mod partial_fractions;
mod parts;
mod substitution;
mod types;

use crate::error::{CasError, Result};
use crate::expr::Expr;
use crate::polynomial::Polynomial;
use crate::simplify::{
    canon_sum, expand, flatten_mul, flatten_sum, is_sum, numer_denom, simplify,
};
use log::debug;

use direct::integrate_direct;
use partial_fractions::integrate_partial_fractions;
use parts::integrate_by_parts;
use substitution::integrate_by_substitution;

pub(crate) use common::{fresh_symbol, replace_subexpr};
pub use types::{
    AttemptStatus, IntegrandKind, IntegrandReport, IntegrationAttempt, IntegrationResult,
    ReasonCode, Strategy,
};

/// Nesting allowed for substitution and integration by parts.
const MAX_DEPTH: usize = 8;
/// Integrands larger than this skip the rewriting strategies.
const TRANSFORM_SIZE_LIMIT: usize = 160;

/// Antiderivative of `expr` with respect to `var`, without a constant of integration.
pub fn integrate(var: &str, expr: &Expr) -> IntegrationResult {
    let integrand = simplify(expr.clone());
    let kind = classify_integrand(&integrand, var);
    let mut attempts = Vec::new();
    let outcome = run_pipeline(&integrand, var, 0, &mut attempts);
    let report = IntegrandReport {
        integrand,
        var: var.to_string(),
        kind,
        attempts,
    };
    match outcome {
        Some(result) => IntegrationResult::Integrated {
            result: simplify(result),
            report,
        },
        None => {
            debug!("no antiderivative found for {}", report.integrand);
            IntegrationResult::NotIntegrable(report)
        }
    }
}

/// Integrate with respect to the expression's only free symbol.
pub fn integrate_inferred(expr: &Expr) -> Result<IntegrationResult> {
    let symbols = expr.free_symbols();
    let mut iter = symbols.iter();
    match (iter.next(), iter.next()) {
        (Some(var), None) => Ok(integrate(var, expr)),
        (None, _) => Err(CasError::Variable(format!("specify dummy variables for {expr}"))),
        (Some(_), Some(_)) => Err(CasError::Variable(format!(
            "specify integration variables to integrate {expr}"
        ))),
    }
}

/// Recursive entry for strategies that integrate sub-problems.
pub(super) fn integrate_inner(expr: &Expr, var: &str, depth: usize) -> Option<Expr> {
    if depth > MAX_DEPTH {
        return None;
    }
    let mut scratch = Vec::new();
    run_pipeline(&simplify(expr.clone()), var, depth, &mut scratch)
}

fn run_pipeline(
    expr: &Expr,
    var: &str,
    depth: usize,
    attempts: &mut Vec<IntegrationAttempt>,
) -> Option<Expr> {
    if let Some(result) = integrate_direct(expr, var) {
        record(attempts, Strategy::Direct, AttemptStatus::Succeeded, None);
        return Some(result);
    }

    let expanded = expand(expr.clone());
    if expanded != *expr {
        if let Some(result) = integrate_direct(&expanded, var) {
            record(
                attempts,
                Strategy::Direct,
                AttemptStatus::Succeeded,
                Some("expanded".to_string()),
            );
            return Some(result);
        }
    }
    record(
        attempts,
        Strategy::Direct,
        AttemptStatus::Failed(ReasonCode::UnknownStructure),
        None,
    );

    if depth >= MAX_DEPTH {
        record(
            attempts,
            Strategy::Substitution,
            AttemptStatus::Failed(ReasonCode::DepthLimit(MAX_DEPTH)),
            None,
        );
        return None;
    }

    if is_sum(&expanded) {
        let terms: Option<Vec<Expr>> = flatten_sum(&expanded)
            .iter()
            .map(|term| integrate_inner(term, var, depth + 1))
            .collect();
        match terms {
            Some(terms) => {
                record(attempts, Strategy::Linearity, AttemptStatus::Succeeded, None);
                return Some(canon_sum(terms));
            }
            None => record(
                attempts,
                Strategy::Linearity,
                AttemptStatus::Failed(ReasonCode::UnknownStructure),
                None,
            ),
        }
    }

    let size = expr.size();
    if size > TRANSFORM_SIZE_LIMIT {
        record(
            attempts,
            Strategy::Substitution,
            AttemptStatus::HitLimit {
                size,
                limit: TRANSFORM_SIZE_LIMIT,
            },
            None,
        );
        return None;
    }

    match integrate_partial_fractions(expr, var) {
        Ok(result) => {
            record(attempts, Strategy::PartialFractions, AttemptStatus::Succeeded, None);
            return Some(result);
        }
        Err(Some(reason)) => record(
            attempts,
            Strategy::PartialFractions,
            AttemptStatus::Failed(reason),
            None,
        ),
        Err(None) => record(
            attempts,
            Strategy::PartialFractions,
            AttemptStatus::NotApplicable,
            None,
        ),
    }

    if let Some(result) = integrate_by_substitution(expr, var, depth) {
        record(attempts, Strategy::Substitution, AttemptStatus::Succeeded, None);
        return Some(result);
    }
    record(
        attempts,
        Strategy::Substitution,
        AttemptStatus::Failed(ReasonCode::UnknownStructure),
        None,
    );

    if let Some(result) = integrate_by_parts(expr, var, depth) {
        record(
            attempts,
            Strategy::IntegrationByParts,
            AttemptStatus::Succeeded,
            None,
        );
        return Some(result);
    }
    record(
        attempts,
        Strategy::IntegrationByParts,
        AttemptStatus::Failed(ReasonCode::UnknownStructure),
        None,
    );
    None
}

fn record(
    attempts: &mut Vec<IntegrationAttempt>,
    strategy: Strategy,
    status: AttemptStatus,
    note: Option<String>,
) {
    attempts.push(IntegrationAttempt {
        strategy,
        status,
        note,
    });
}

pub fn classify_integrand(expr: &Expr, var: &str) -> IntegrandKind {
    if !expr.contains_var(var) {
        return IntegrandKind::Constant;
    }
    if Polynomial::<Expr>::from_expr(expr, var).is_some() {
        return IntegrandKind::Polynomial;
    }
    if is_sum(expr) {
        return IntegrandKind::Sum;
    }
    let (numer, denom) = numer_denom(expr);
    if Polynomial::<Expr>::from_expr(&numer, var).is_some()
        && Polynomial::<Expr>::from_expr(&denom, var).is_some()
    {
        return IntegrandKind::Rational;
    }
    let factors: Vec<Expr> = flatten_mul(expr)
        .into_iter()
        .filter(|f| f.contains_var(var))
        .collect();
    match factors.as_slice() {
        [single] => classify_factor(single, var),
        [first, second, ..] => IntegrandKind::Product(
            Box::new(classify_factor(first, var)),
            Box::new(classify_factor(second, var)),
        ),
        [] => IntegrandKind::Unknown,
    }
}

fn classify_factor(expr: &Expr, var: &str) -> IntegrandKind {
    match expr {
        Expr::Sin(_) | Expr::Cos(_) | Expr::Tan(_) | Expr::Sinh(_) | Expr::Cosh(_) | Expr::Tanh(_) => {
            IntegrandKind::Trig
        }
        Expr::Exp(_) => IntegrandKind::Exponential,
        Expr::Log(_) => IntegrandKind::Logarithmic,
        Expr::Pow(base, exp) if !base.contains_var(var) && exp.contains_var(var) => {
            IntegrandKind::Exponential
        }
        Expr::Pow(base, _) => classify_factor(base, var),
        other if Polynomial::<Expr>::from_expr(other, var).is_some() => IntegrandKind::Polynomial,
        _ => IntegrandKind::Unknown,
    }
}
