use approx::assert_relative_eq;
use mathnotes::{
    differentiate, differentiate_inferred, evaluate, parse_expr, simplify_fully, CasError, Expr,
};

const SAMPLES: [f64; 4] = [0.3, 0.7, 1.3, 2.9];

fn assert_same_function(var: &str, got: &Expr, expected: &Expr) {
    for point in SAMPLES {
        let bindings = [(var, point), ("y", 1.7)];
        let lhs = evaluate(got, &bindings).expect("evaluate result");
        let rhs = evaluate(expected, &bindings).expect("evaluate expected");
        assert_relative_eq!(lhs, rhs, epsilon = 1e-9, max_relative = 1e-9);
    }
}

fn assert_diff_eq(var: &str, input: &str, expected: &str) {
    let expr = parse_expr(input).expect("parse input");
    let got = simplify_fully(differentiate(var, &expr));
    let expected_expr = simplify_fully(parse_expr(expected).expect("parse expected"));
    assert_same_function(var, &got, &expected_expr);
}

#[test]
fn basic_vars_and_constants() {
    assert_eq!(differentiate("x", &Expr::var("x")), Expr::integer(1));
    assert_eq!(differentiate("x", &Expr::var("y")), Expr::integer(0));
    assert_eq!(differentiate("x", &Expr::integer(5)), Expr::integer(0));
}

#[test]
fn polynomials_and_products() {
    assert_diff_eq("x", "x^3", "3*x^2");
    assert_diff_eq("x", "x*y", "y");
    assert_diff_eq("x", "2*x^2+3*x", "4*x+3");
}

#[test]
fn trig_and_exponentials() {
    assert_diff_eq("x", "sin(x)", "cos(x)");
    assert_diff_eq("x", "cos(x)", "-sin(x)");
    assert_diff_eq("x", "tan(x)", "1 + tan(x)**2");
    assert_diff_eq("x", "exp(x^2)", "2*x*exp(x^2)");
    assert_diff_eq("x", "atan(x)", "1/(x**2 + 1)");
    assert_diff_eq("x", "asin(x/4)", "1/sqrt(16 - x**2)");
}

#[test]
fn logs_powers_and_quotients() {
    assert_diff_eq("x", "log(x)", "1/x");
    assert_diff_eq("x", "x^x", "x^x*(log(x)+1)");
    assert_diff_eq("x", "2^x", "log(2)*2^x");
    assert_diff_eq("x", "sqrt(x)", "1/(2*sqrt(x))");
    assert_diff_eq("x", "sin(x)/x", "cos(x)/x - sin(x)/x**2");
    assert_diff_eq("x", "Abs(x)", "x/Abs(x)");
}

#[test]
fn inferred_variable() {
    let single = parse_expr("x**2 + 1").expect("parse");
    assert_eq!(
        differentiate_inferred(&single).expect("one symbol"),
        differentiate("x", &single)
    );

    let constant = parse_expr("5").expect("parse");
    assert_eq!(differentiate_inferred(&constant).expect("constant"), Expr::integer(0));

    let two = parse_expr("x*y").expect("parse");
    match differentiate_inferred(&two) {
        Err(CasError::Variable(message)) => {
            assert!(message.contains("more than one variable"), "{message}")
        }
        other => panic!("expected variable error, got {other:?}"),
    }
}
