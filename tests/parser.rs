use mathnotes::{parse_expr, simplify, CasError, Expr};

fn canonical(input: &str) -> Expr {
    simplify(parse_expr(input).expect("parse input"))
}

#[test]
fn power_binds_tighter_than_unary_minus() {
    assert_eq!(canonical("-x**2"), canonical("-(x**2)"));
    assert_eq!(canonical("2**-1"), canonical("1/2"));
    assert_eq!(canonical("2**3**2"), Expr::integer(512));
}

#[test]
fn caret_is_a_power_operator() {
    assert_eq!(canonical("x^2"), canonical("x**2"));
}

#[test]
fn decimals_are_exact() {
    assert_eq!(canonical("0.5*x"), canonical("x/2"));
    assert_eq!(canonical(".25 + 1e1"), Expr::constant(41, 4));
}

#[test]
fn function_aliases_and_constants() {
    assert_eq!(canonical("arcsin(x)"), canonical("asin(x)"));
    assert_eq!(canonical("ln(x)"), canonical("log(x)"));
    assert_eq!(canonical("abs(x)"), canonical("Abs(x)"));
    assert_eq!(canonical("sqrt(x)"), canonical("x**(1/2)"));
    assert_eq!(canonical("log(E)"), Expr::integer(1));
    assert_eq!(canonical("cos(pi)"), Expr::integer(-1));
}

#[test]
fn two_argument_log_changes_base() {
    assert_eq!(canonical("log(x, 2)"), canonical("log(x)/log(2)"));
}

#[test]
fn malformed_input_reports_offset() {
    match parse_expr("2 +* 3") {
        Err(CasError::Parse { offset, .. }) => assert_eq!(offset, 2),
        other => panic!("expected parse error, got {other:?}"),
    }
    assert!(parse_expr("").is_err());
    assert!(parse_expr("x = 2").is_err());
    assert!(parse_expr("(x + 1").is_err());
    assert!(parse_expr("2x").is_err());
}

#[test]
fn unknown_functions_and_symbols_are_rejected() {
    assert!(matches!(parse_expr("foo(x)"), Err(CasError::Parse { .. })));
    assert!(matches!(parse_expr("I + 1"), Err(CasError::Parse { .. })));
    assert!(matches!(parse_expr("sin()"), Err(CasError::Parse { .. })));
}

fn assert_too_big(input: &str, message: &str) {
    match parse_expr(input) {
        Err(CasError::Parse { message: m, .. }) => assert_eq!(m, message),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn oversized_input_is_rejected() {
    assert_too_big(&vec!["x"; 3000].join("+"), "expression too large");
    assert_too_big(&format!("{}x", "-".repeat(3000)), "expression too large");
    assert_too_big(&format!("x{}", "**x".repeat(3000)), "expression too large");
    let parens = format!("{}x{}", "(".repeat(5000), ")".repeat(5000));
    assert_too_big(&parens, "expression nested too deeply");
    let calls = format!("{}x{}", "sin(".repeat(3000), ")".repeat(3000));
    assert_too_big(&calls, "expression nested too deeply");
}

#[test]
fn long_but_bounded_input_is_accepted() {
    let sum = vec!["x"; 200].join(" + ");
    assert_eq!(canonical(&sum), canonical("200*x"));
    let nested = format!("{}x{}", "(".repeat(40), ")".repeat(40));
    assert_eq!(canonical(&nested), Expr::var("x"));
}
