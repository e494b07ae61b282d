use approx::assert_relative_eq;
use mathnotes::{evaluate, parse_expr, CasError, Expr};

fn parse(input: &str) -> Expr {
    parse_expr(input).expect("parse input")
}

#[test]
fn evaluates_with_bindings() {
    let value = evaluate(&parse("x**2 + 2*x*y"), &[("x", 3.0), ("y", 0.5)]).expect("evaluate");
    assert_relative_eq!(value, 12.0);

    let value = evaluate(&parse("sin(pi/2) + exp(0) + log(E)"), &[]).expect("evaluate");
    assert_relative_eq!(value, 3.0);

    let value = evaluate(&parse("sqrt(2)"), &[]).expect("evaluate");
    assert_relative_eq!(value, std::f64::consts::SQRT_2);
}

#[test]
fn unbound_symbols_are_errors() {
    assert!(matches!(
        evaluate(&parse("x + z"), &[("x", 1.0)]),
        Err(CasError::Evaluation(_))
    ));
}

#[test]
fn singular_points_are_errors() {
    let reciprocal = parse("1/x");
    assert!(evaluate(&reciprocal, &[("x", 0.0)]).is_err());
    assert_relative_eq!(evaluate(&reciprocal, &[("x", 4.0)]).expect("evaluate"), 0.25);

    assert!(evaluate(&parse("log(x)"), &[("x", 0.0)]).is_err());
    assert!(evaluate(&parse("log(x)"), &[("x", -1.0)]).is_err());
    assert!(evaluate(&parse("sqrt(x)"), &[("x", -4.0)]).is_err());
    assert!(evaluate(&parse("asin(x)"), &[("x", 2.0)]).is_err());
}

#[test]
fn negative_bases_need_integer_exponents() {
    assert_relative_eq!(evaluate(&parse("x**3"), &[("x", -2.0)]).expect("evaluate"), -8.0);
    assert!(evaluate(&parse("x**(1/3)"), &[("x", -8.0)]).is_err());
}
