use crate::calculus::integrate::{AttemptStatus, IntegrationAttempt, IntegrationResult};
use crate::expr::Expr;

use super::latex::latex;
use super::pretty::{precedence, pretty};

/// Antiderivative as text; a failed integral stays unevaluated as `Integral(f, x)`.
pub fn pretty_integration_result(result: &IntegrationResult) -> String {
    match result {
        IntegrationResult::Integrated { result, .. } => pretty(result),
        IntegrationResult::NotIntegrable(report) => {
            format!("Integral({}, {})", pretty(&report.integrand), report.var)
        }
    }
}

/// Antiderivative as LaTeX; a failed integral renders as `\int f\, dx`.
pub fn latex_integration_result(result: &IntegrationResult) -> String {
    match result {
        IntegrationResult::Integrated { result, .. } => latex(result),
        IntegrationResult::NotIntegrable(report) => {
            let integrand = if precedence(&report.integrand) < 50 {
                format!(r"\left({}\right)", latex(&report.integrand))
            } else {
                latex(&report.integrand)
            };
            format!(r"\int {integrand}\, d{}", latex(&Expr::var(report.var.as_str())))
        }
    }
}

/// One line per strategy attempt, for diagnostics.
pub fn describe_integration(result: &IntegrationResult) -> Vec<String> {
    let report = result.report();
    let mut lines = vec![match result.antiderivative() {
        Some(antiderivative) => format!("integrated: {}", pretty(antiderivative)),
        None => "not integrable".to_string(),
    }];
    lines.push(format!("kind: {:?}", report.kind));
    lines.extend(report.attempts.iter().map(describe_attempt));
    lines
}

fn describe_attempt(attempt: &IntegrationAttempt) -> String {
    let status = match &attempt.status {
        AttemptStatus::Succeeded => "ok".to_string(),
        AttemptStatus::NotApplicable => "n/a".to_string(),
        AttemptStatus::Failed(reason) => format!("failed {reason:?}"),
        AttemptStatus::HitLimit { size, limit } => format!("skipped size {size} > limit {limit}"),
    };
    match &attempt.note {
        Some(note) => format!(" - {:?}: {status} ({note})", attempt.strategy),
        None => format!(" - {:?}: {status}", attempt.strategy),
    }
}
