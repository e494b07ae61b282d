use mathnotes::service::toolkit::{derivative, integral, simplify_expression, to_latex};
use mathnotes::CasError;

#[test]
fn simplify_echoes_the_input() {
    let response = simplify_expression("x + x").expect("simplify");
    assert_eq!(response.input, "x + x");
    assert_eq!(response.result, "2*x");

    let response = simplify_expression("sin(x)**2 + cos(x)**2").expect("simplify");
    assert_eq!(response.result, "1");
}

#[test]
fn derivative_uses_the_only_symbol() {
    assert_eq!(derivative("x**2").expect("derivative").derivative, "2*x");
    assert_eq!(derivative("sin(t)").expect("derivative").derivative, "cos(t)");
    assert_eq!(derivative("7").expect("derivative").derivative, "0");
    assert!(matches!(derivative("x*y"), Err(CasError::Variable(_))));
}

#[test]
fn integral_uses_the_only_symbol() {
    assert_eq!(integral("2*x").expect("integral").integral, "x**2");
    assert_eq!(
        integral("exp(x**2)").expect("integral").integral,
        "Integral(exp(x**2), x)"
    );
    assert!(matches!(integral("5"), Err(CasError::Variable(_))));
    assert!(matches!(integral("x*y"), Err(CasError::Variable(_))));
}

#[test]
fn latex_rendering() {
    let response = to_latex("x**2").expect("latex");
    assert_eq!(response.input, "x**2");
    assert_eq!(response.latex, "x^{2}");
}

#[test]
fn parse_failures_are_errors() {
    for input in ["2 +* 3", "", "foo(x)"] {
        assert!(simplify_expression(input).is_err(), "{input}");
        assert!(derivative(input).is_err(), "{input}");
        assert!(integral(input).is_err(), "{input}");
        assert!(to_latex(input).is_err(), "{input}");
    }
}

#[test]
fn oversized_input_is_a_parse_error() {
    let sum = vec!["x"; 3000].join("+");
    assert!(matches!(to_latex(&sum), Err(CasError::Parse { .. })));
    let calls = format!("{}x{}", "sin(".repeat(3000), ")".repeat(3000));
    assert!(matches!(simplify_expression(&calls), Err(CasError::Parse { .. })));
    assert!(matches!(derivative(&format!("{}x", "-".repeat(3000))), Err(CasError::Parse { .. })));
}

#[test]
fn constant_division_by_zero_is_an_evaluation_error() {
    for input in ["0/0", "1/0", "0*(1/0)", "1/0 - 1/0", "x/(1 - 1)"] {
        assert!(
            matches!(simplify_expression(input), Err(CasError::Evaluation(_))),
            "{input}"
        );
    }
    assert!(matches!(to_latex("1/0"), Err(CasError::Evaluation(_))));
    assert_eq!(simplify_expression("0/x").expect("simplify").result, "0");
}
