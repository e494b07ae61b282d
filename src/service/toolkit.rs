//! Single-operation endpoints of the expression toolkit.

use log::debug;

use crate::calculus::{differentiate_inferred, integrate_inferred};
use crate::error::Result;
use crate::format::{describe_integration, latex, pretty, pretty_integration_result};
use crate::simplify::simplify_fully;

use super::dto::{DerivativeResponse, IntegralResponse, LatexResponse, SimplifyResponse};
use super::read_input;

pub fn simplify_expression(input: &str) -> Result<SimplifyResponse> {
    let expr = read_input(input)?;
    Ok(SimplifyResponse {
        input: input.to_string(),
        result: pretty(&simplify_fully(expr)),
    })
}

/// First derivative with respect to the expression's only symbol.
pub fn derivative(input: &str) -> Result<DerivativeResponse> {
    let expr = read_input(input)?;
    Ok(DerivativeResponse {
        input: input.to_string(),
        derivative: pretty(&differentiate_inferred(&expr)?),
    })
}

/// Indefinite integral with respect to the expression's only symbol.
pub fn integral(input: &str) -> Result<IntegralResponse> {
    let expr = read_input(input)?;
    let result = integrate_inferred(&expr)?;
    for line in describe_integration(&result) {
        debug!("{line}");
    }
    Ok(IntegralResponse {
        input: input.to_string(),
        integral: pretty_integration_result(&result),
    })
}

pub fn to_latex(input: &str) -> Result<LatexResponse> {
    let expr = read_input(input)?;
    Ok(LatexResponse {
        input: input.to_string(),
        latex: latex(&expr),
    })
}
