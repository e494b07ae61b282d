use approx::assert_relative_eq;
use mathnotes::service::analysis::{analyze, surface_points};
use mathnotes::service::SymbolTable;
use mathnotes::{parse_expr, CasError};

fn symbols() -> SymbolTable {
    SymbolTable::standard()
}

#[test]
fn equations_are_solved_for_x() {
    let response = analyze(&symbols(), "x^2 = 4").expect("analyze");
    assert_eq!(
        response.solution,
        Some(vec!["-2".to_string(), "2".to_string()])
    );
    assert_eq!(response.latex, r"x = \left[ -2, \  2\right]");
    assert_eq!(response.derivative, "0");
    assert_eq!(response.integral, "- 2 xx");
    assert!(response.points.is_empty());
}

#[test]
fn equations_without_solutions_use_a_sentinel() {
    let response = analyze(&symbols(), "y = 2").expect("analyze");
    assert_eq!(response.solution, Some(Vec::new()));
    assert_eq!(response.latex, r"x = \left[ \right]");
    assert_eq!(response.integral, "N/A");

    let response = analyze(&symbols(), "x**2 = -1").expect("analyze");
    assert_eq!(response.integral, "N/A");
}

#[test]
fn expressions_are_differentiated_integrated_and_sampled() {
    let response = analyze(&symbols(), "2*x").expect("analyze");
    assert_eq!(response.latex, "2 x");
    assert_eq!(response.derivative, "2");
    assert_eq!(response.integral, "x^{2}");
    assert!(response.solution.is_none());
    assert_eq!(response.points.len(), 441);

    let point = response
        .points
        .iter()
        .find(|p| p.x == 3 && p.y == -7)
        .expect("grid point");
    assert_relative_eq!(point.z, 6.0);
}

#[test]
fn powers_of_e_are_exponentials() {
    let response = analyze(&symbols(), "E^x").expect("analyze");
    assert_eq!(response.latex, "e^{x}");
    assert_eq!(response.derivative, "e^{x}");
}

#[test]
fn division_by_zero_is_an_error() {
    assert!(matches!(
        analyze(&symbols(), "0/0"),
        Err(CasError::Evaluation(_))
    ));
}

#[test]
fn carets_are_powers() {
    let response = analyze(&symbols(), "x^2 + y").expect("analyze");
    assert_eq!(response.latex, "x^{2} + y");
    assert_eq!(response.derivative, "2 x");

    let point = response
        .points
        .iter()
        .find(|p| p.x == -2 && p.y == 5)
        .expect("grid point");
    assert_relative_eq!(point.z, 9.0);
}

#[test]
fn singular_grid_points_are_skipped() {
    let reciprocal = parse_expr("1/x").expect("parse");
    let points = surface_points(&symbols(), &reciprocal);
    assert_eq!(points.len(), 420);
    assert!(points.iter().all(|p| p.x != 0));

    let root = parse_expr("sqrt(y)").expect("parse");
    let points = surface_points(&symbols(), &root);
    assert_eq!(points.len(), 21 * 11);
}

#[test]
fn malformed_input_is_an_error() {
    assert!(matches!(
        analyze(&symbols(), "2 +* 3"),
        Err(CasError::Parse { .. })
    ));
    assert!(analyze(&symbols(), "x = 1 = 2").is_err());
}
