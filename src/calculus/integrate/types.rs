use crate::expr::Expr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrandKind {
    Constant,
    Polynomial,
    Rational,
    Trig,
    Exponential,
    Logarithmic,
    Product(Box<IntegrandKind>, Box<IntegrandKind>),
    Sum,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReasonCode {
    NonRational,
    UnsplittableDenominator,
    UnknownStructure,
    DepthLimit(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Direct,
    Linearity,
    Substitution,
    IntegrationByParts,
    PartialFractions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptStatus {
    Succeeded,
    NotApplicable,
    Failed(ReasonCode),
    HitLimit { size: usize, limit: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrationAttempt {
    pub strategy: Strategy,
    pub status: AttemptStatus,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrandReport {
    pub integrand: Expr,
    pub var: String,
    pub kind: IntegrandKind,
    pub attempts: Vec<IntegrationAttempt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrationResult {
    Integrated {
        result: Expr,
        report: IntegrandReport,
    },
    NotIntegrable(IntegrandReport),
}

impl IntegrationResult {
    pub fn antiderivative(&self) -> Option<&Expr> {
        match self {
            IntegrationResult::Integrated { result, .. } => Some(result),
            IntegrationResult::NotIntegrable(_) => None,
        }
    }

    pub fn report(&self) -> &IntegrandReport {
        match self {
            IntegrationResult::Integrated { report, .. } | IntegrationResult::NotIntegrable(report) => {
                report
            }
        }
    }
}
