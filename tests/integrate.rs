use approx::assert_relative_eq;
use mathnotes::{
    differentiate, evaluate, integrate, integrate_inferred, parse_expr, simplify_fully,
    AttemptStatus, CasError, Expr, IntegrandKind, IntegrationResult, Strategy,
};

const SAMPLES: [f64; 4] = [1.3, 1.7, 2.2, 3.1];

fn parse(input: &str) -> Expr {
    parse_expr(input).expect("parse input")
}

/// Compare two antiderivatives pointwise; they must agree exactly, not up to a constant.
fn assert_same_function(got: &Expr, expected: &str) {
    let expected = simplify_fully(parse(expected));
    for point in SAMPLES {
        let bindings = [("x", point), ("y", 0.6)];
        let lhs = evaluate(got, &bindings).expect("evaluate antiderivative");
        let rhs = evaluate(&expected, &bindings).expect("evaluate expected");
        assert_relative_eq!(lhs, rhs, epsilon = 1e-9, max_relative = 1e-9);
    }
}

/// The derivative of the antiderivative recovers the integrand.
fn assert_differentiates_back(result: &Expr, integrand: &Expr) {
    let derivative = differentiate("x", result);
    for point in SAMPLES {
        let bindings = [("x", point)];
        let lhs = evaluate(&derivative, &bindings).expect("evaluate derivative");
        let rhs = evaluate(integrand, &bindings).expect("evaluate integrand");
        assert_relative_eq!(lhs, rhs, epsilon = 1e-9, max_relative = 1e-9);
    }
}

fn integrated(input: &str) -> Expr {
    match integrate("x", &parse(input)) {
        IntegrationResult::Integrated { result, .. } => result,
        other => panic!("expected integration of {input}, got {other:?}"),
    }
}

#[test]
fn integrates_polynomial_and_rational() {
    match integrate("x", &parse("x^3")) {
        IntegrationResult::Integrated { result, report } => {
            assert_eq!(simplify_fully(result), simplify_fully(parse("1/4 * x^4")));
            assert_eq!(report.kind, IntegrandKind::Polynomial);
            assert!(report
                .attempts
                .iter()
                .any(|a| a.strategy == Strategy::Direct && a.status == AttemptStatus::Succeeded));
        }
        other => panic!("expected integration, got {other:?}"),
    }

    match integrate("x", &parse("(2*x+3)/(x+1)")) {
        IntegrationResult::Integrated { result, report } => {
            assert_same_function(&result, "2*x + log(x+1)");
            assert_eq!(report.kind, IntegrandKind::Rational);
        }
        other => panic!("expected integration, got {other:?}"),
    }
}

#[test]
fn partial_fractions_over_distinct_roots() {
    match integrate("x", &parse("1/(x**2 - 1)")) {
        IntegrationResult::Integrated { result, report } => {
            assert_same_function(&result, "log(x - 1)/2 - log(x + 1)/2");
            assert!(report.attempts.iter().any(|a| a.strategy == Strategy::PartialFractions
                && a.status == AttemptStatus::Succeeded));
        }
        other => panic!("expected partial fractions, got {other:?}"),
    }

    let atan = integrated("1/(x**2 + 1)");
    assert_same_function(&atan, "atan(x)");
}

#[test]
fn integrates_affine_trig_exp_log_and_one_over_x() {
    assert_same_function(&integrated("sin(2*x + 3)"), "-1/2 * cos(2*x + 3)");
    assert_same_function(&integrated("exp(2*x + 1)"), "1/2 * exp(2*x + 1)");
    assert_same_function(
        &integrated("log(2*x + 3)"),
        "((2*x + 3)*log(2*x + 3) - (2*x + 3)) / 2",
    );
    assert_same_function(&integrated("x^-1"), "log(x)");
    assert_same_function(&integrated("cos(x)"), "sin(x)");
    assert_same_function(&integrated("2^x"), "2^x/log(2)");
}

#[test]
fn substitution_and_parts_heuristics() {
    match integrate("x", &parse("2*x*exp(x^2)")) {
        IntegrationResult::Integrated { result, report } => {
            assert_same_function(&result, "exp(x^2)");
            assert!(report.attempts.iter().any(|a| a.strategy == Strategy::Substitution
                && a.status == AttemptStatus::Succeeded));
        }
        other => panic!("expected substitution integration, got {other:?}"),
    }

    match integrate("x", &parse("x*sin(x)")) {
        IntegrationResult::Integrated { result, report } => {
            assert_same_function(&result, "sin(x) - x*cos(x)");
            assert!(report.attempts.iter().any(|a| a.strategy
                == Strategy::IntegrationByParts
                && a.status == AttemptStatus::Succeeded));
        }
        other => panic!("expected parts integration, got {other:?}"),
    }

    let log_parts = parse("x*log(x)");
    assert_differentiates_back(&integrated("x*log(x)"), &log_parts);
}

#[test]
fn sums_integrate_term_by_term() {
    let integrand = parse("x**2 + sin(x) + 3");
    let result = integrated("x**2 + sin(x) + 3");
    assert_differentiates_back(&result, &integrand);
}

#[test]
fn flags_non_elementary_inputs() {
    let exp_square = parse("exp(x^2)");
    match integrate("x", &exp_square) {
        IntegrationResult::NotIntegrable(report) => {
            assert_eq!(report.var, "x");
            assert!(!report.attempts.is_empty());
            assert!(report
                .attempts
                .iter()
                .all(|a| a.status != AttemptStatus::Succeeded));
        }
        other => panic!("expected non-integrable result, got {other:?}"),
    }

    match integrate("y", &exp_square) {
        IntegrationResult::Integrated { result, report } => {
            assert_same_function(&result, "y*exp(x^2)");
            assert_eq!(report.kind, IntegrandKind::Constant);
        }
        other => panic!("expected constant-wrt-other-var integration, got {other:?}"),
    }
}

#[test]
fn inferred_variable() {
    let single = parse("3*x**2");
    let result = integrate_inferred(&single).expect("one symbol");
    assert_same_function(result.antiderivative().expect("integrated"), "x**3");

    match integrate_inferred(&parse("4")) {
        Err(CasError::Variable(message)) => assert!(message.contains("dummy variables")),
        other => panic!("expected variable error, got {other:?}"),
    }
    match integrate_inferred(&parse("x*y")) {
        Err(CasError::Variable(message)) => {
            assert!(message.contains("integration variables"))
        }
        other => panic!("expected variable error, got {other:?}"),
    }
}
