//! Equation and expression analysis behind `POST /analyze`.

use log::debug;

use crate::calculus::{differentiate, integrate};
use crate::error::Result;
use crate::eval::evaluate;
use crate::expr::Expr;
use crate::format::{latex, latex_integration_result, latex_list, pretty};
use crate::solver::solve_equation;

use super::dto::{AnalysisResponse, SurfacePoint};
use super::symbols::SymbolTable;
use super::read_input;

/// Inclusive bound of the integer grid sampled on each surface axis.
pub const GRID_BOUND: i32 = 10;

/// Analyze calculator-style input: carets become powers, input with `=` is solved for the
/// primary symbol, anything else is differentiated, integrated and sampled as a surface.
pub fn analyze(symbols: &SymbolTable, input: &str) -> Result<AnalysisResponse> {
    let rewritten = input.replace('^', "**");
    match rewritten.split_once('=') {
        Some((lhs, rhs)) => analyze_equation(symbols, lhs, rhs),
        None => analyze_expression(symbols, &rewritten),
    }
}

fn analyze_equation(symbols: &SymbolTable, lhs: &str, rhs: &str) -> Result<AnalysisResponse> {
    let var = symbols.primary();
    let lhs = read_input(lhs)?;
    let rhs = read_input(rhs)?;
    let solutions = solve_equation(&lhs, &rhs, var)?;
    debug!("{lhs} = {rhs} has {} solution(s) in {var}", solutions.len());

    let integral = match solutions.first() {
        Some(first) => format!("{}{var}", latex_integration_result(&integrate(var, first))),
        None => "N/A".to_string(),
    };
    Ok(AnalysisResponse {
        latex: format!("{var} = {}", latex_list(&solutions)),
        solution: Some(solutions.iter().map(pretty).collect()),
        derivative: "0".to_string(),
        integral,
        points: Vec::new(),
    })
}

fn analyze_expression(symbols: &SymbolTable, input: &str) -> Result<AnalysisResponse> {
    let var = symbols.primary();
    let expr = read_input(input)?;
    let names = expr.free_symbols();
    let foreign = symbols.foreign(&names);
    if !foreign.is_empty() {
        debug!("{expr} uses symbols outside the table: {foreign:?}");
    }
    Ok(AnalysisResponse {
        latex: latex(&expr),
        solution: None,
        derivative: latex(&differentiate(var, &expr)),
        integral: latex_integration_result(&integrate(var, &expr)),
        points: surface_points(symbols, &expr),
    })
}

/// Sample `expr` over the integer grid `[-GRID_BOUND, GRID_BOUND]^2`, skipping points where it
/// has no finite real value.
pub fn surface_points(symbols: &SymbolTable, expr: &Expr) -> Vec<SurfacePoint> {
    let (x_axis, y_axis) = symbols.surface_axes();
    let mut points = Vec::new();
    for x in -GRID_BOUND..=GRID_BOUND {
        for y in -GRID_BOUND..=GRID_BOUND {
            match evaluate(expr, &[(x_axis, f64::from(x)), (y_axis, f64::from(y))]) {
                Ok(z) => points.push(SurfacePoint { x, y, z }),
                Err(err) => debug!("skipping ({x}, {y}): {err}"),
            }
        }
    }
    points
}
