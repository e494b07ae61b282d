use mathnotes::{
    parse_expr, pretty, solve_equation, solve_system, CasError, Expr, LinearResult,
};

fn solve(lhs: &str, rhs: &str) -> Vec<String> {
    let lhs = parse_expr(lhs).expect("parse lhs");
    let rhs = parse_expr(rhs).expect("parse rhs");
    solve_equation(&lhs, &rhs, "x")
        .expect("solve")
        .iter()
        .map(pretty)
        .collect()
}

#[test]
fn polynomial_equations() {
    assert_eq!(solve("x**2", "4"), vec!["-2", "2"]);
    assert_eq!(solve("x**2", "2"), vec!["-sqrt(2)", "sqrt(2)"]);
    assert_eq!(solve("2*x + 3", "0"), vec!["-3/2"]);
    assert_eq!(solve("x**3 - 6*x**2 + 11*x", "6"), vec!["1", "2", "3"]);
    assert!(solve("x**2 + 1", "0").is_empty());
}

#[test]
fn repeated_roots_are_reported_once() {
    assert_eq!(solve("x**2 - 2*x + 1", "0"), vec!["1"]);
}

#[test]
fn transcendental_equations() {
    assert_eq!(solve("sin(x)", "1/2"), vec!["pi/6", "5*pi/6"]);
    assert_eq!(solve("exp(x)", "1"), vec!["0"]);
    assert!(solve("exp(x)", "0").is_empty());
    assert_eq!(solve("log(x)", "0"), vec!["1"]);
}

#[test]
fn exponentials_of_matching_powers_solve_exactly() {
    assert_eq!(solve("2**x", "8"), vec!["3"]);
    assert_eq!(solve("4**x", "1/2"), vec!["-1/2"]);
    assert_eq!(solve("2**(x + 1)", "8"), vec!["2"]);
    assert_eq!(solve("2**x", "3"), vec!["log(3)/log(2)"]);
}

#[test]
fn rational_equations_exclude_poles() {
    assert_eq!(solve("1/x", "2"), vec!["1/2"]);
    assert_eq!(solve("(x**2 - 1)/(x - 1)", "0"), vec!["-1"]);
}

#[test]
fn equations_without_the_unknown_have_no_solutions() {
    assert!(solve("y + 1", "3").is_empty());
    assert!(solve("2", "3").is_empty());
}

#[test]
fn unsolvable_equations_are_errors() {
    let lhs = parse_expr("x**5 + x + 3").expect("parse");
    assert!(matches!(
        solve_equation(&lhs, &Expr::integer(0), "x"),
        Err(CasError::Solve(_))
    ));
}

#[test]
fn linear_systems() {
    let pair = |l: &str, r: &str| (parse_expr(l).expect("lhs"), parse_expr(r).expect("rhs"));

    let unique = solve_system(&["x", "y"], &[pair("x + y", "3"), pair("x - y", "1")]);
    assert_eq!(
        unique,
        LinearResult::Unique(vec![
            ("x".to_string(), Expr::integer(2)),
            ("y".to_string(), Expr::integer(1)),
        ])
    );

    let dependent = solve_system(&["x", "y"], &[pair("x + y", "1"), pair("2*x + 2*y", "2")]);
    assert_eq!(
        dependent,
        LinearResult::Infinite {
            rank: 1,
            free: vec!["y".to_string()],
        }
    );

    let inconsistent = solve_system(&["x", "y"], &[pair("x + y", "1"), pair("x + y", "2")]);
    assert_eq!(inconsistent, LinearResult::Inconsistent);

    let nonlinear = solve_system(&["x", "y"], &[pair("x + y", "1"), pair("x*y", "2")]);
    assert_eq!(nonlinear, LinearResult::NonLinear(vec![1]));
}
