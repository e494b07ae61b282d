use mathnotes::{
    integrate, latex, latex_integration_result, latex_list, parse_expr, pretty,
    pretty_integration_result, simplify, Expr,
};

fn canonical(input: &str) -> Expr {
    simplify(parse_expr(input).expect("parse input"))
}

fn text(input: &str) -> String {
    pretty(&canonical(input))
}

fn tex(input: &str) -> String {
    latex(&canonical(input))
}

#[test]
fn plain_text_rendering() {
    assert_eq!(text("1 + 2*x + x**2"), "x**2 + 2*x + 1");
    assert_eq!(text("x**3/3"), "x**3/3");
    assert_eq!(text("x - 1"), "x - 1");
    assert_eq!(text("-x"), "-x");
    assert_eq!(text("sqrt(x)"), "sqrt(x)");
    assert_eq!(text("exp(1)"), "E");
    assert_eq!(text("exp(x)"), "exp(x)");
    assert_eq!(text("pi/2"), "pi/2");
    assert_eq!(text("3/x**2"), "3/x**2");
    assert_eq!(text("1/(x + 1)"), "1/(x + 1)");
    assert_eq!(text("-3/4"), "-3/4");
}

#[test]
fn latex_rendering() {
    assert_eq!(tex("x^2 + 2*x + 1"), "x^{2} + 2 x + 1");
    assert_eq!(tex("x/2"), r"\frac{x}{2}");
    assert_eq!(tex("sin(x)**2"), r"\sin^{2}{\left(x \right)}");
    assert_eq!(tex("exp(x)"), "e^{x}");
    assert_eq!(tex("sqrt(x)"), r"\sqrt{x}");
    assert_eq!(tex("1/x"), r"\frac{1}{x}");
    assert_eq!(tex("pi"), r"\pi");
    assert_eq!(tex("log(x)"), r"\log{\left(x \right)}");
    assert_eq!(tex("x - 1/2"), r"x - \frac{1}{2}");
    assert_eq!(tex("Abs(x)"), r"\left|{x}\right|");
}

#[test]
fn latex_fractions_over_sums() {
    assert_eq!(tex("x/(x**2+1)"), r"\frac{x}{x^{2} + 1}");
    assert_eq!(tex("(x + 1)/(x - 1)"), r"\frac{x + 1}{x - 1}");
    assert_eq!(tex("2/(x + 1)"), r"\frac{2}{x + 1}");
    assert_eq!(
        tex("x*(x + 1)/(x - 1)"),
        r"\frac{x \left(x + 1\right)}{x - 1}"
    );
}

#[test]
fn terms_and_factors_in_conventional_order() {
    assert_eq!(text("-x + x*log(x)"), "x*log(x) - x");
    assert_eq!(text("-x**2 + 1"), "1 - x**2");
    assert_eq!(text("2 - x"), "2 - x");
    assert_eq!(text("x - 2"), "x - 2");
    assert_eq!(text("-x**2 + 2*x"), "-x**2 + 2*x");
    assert_eq!(text("cos(x)*sin(x)"), "sin(x)*cos(x)");
    assert_eq!(text("cos(x) + sin(x)"), "sin(x) + cos(x)");
    assert_eq!(text("log(x) + exp(x)"), "exp(x) + log(x)");
    assert_eq!(text("x*sin(x) + cos(x)"), "x*sin(x) + cos(x)");
    assert_eq!(text("1 + 1/x"), "1 + 1/x");
    assert_eq!(text("sqrt(2) + 1"), "1 + sqrt(2)");
    assert_eq!(tex("1 - x**2"), "1 - x^{2}");
    assert_eq!(
        tex("cos(x)*sin(x)"),
        r"\sin{\left(x \right)} \cos{\left(x \right)}"
    );
}

#[test]
fn powers_of_e_render_as_exponentials() {
    assert_eq!(text("E**x"), "exp(x)");
    assert_eq!(tex("E^x"), "e^{x}");
    assert_eq!(text("E**(2*x)"), "exp(2*x)");
    assert_eq!(text("exp(x)**3"), "exp(3*x)");
}

#[test]
fn latex_lists() {
    assert_eq!(latex_list(&[]), r"\left[ \right]");
    assert_eq!(
        latex_list(&[Expr::integer(-2), Expr::integer(2)]),
        r"\left[ -2, \  2\right]"
    );
    assert_eq!(latex_list(&[Expr::constant(1, 2)]), r"\left[ \frac{1}{2}\right]");
}

#[test]
fn integration_results() {
    let done = integrate("x", &canonical("2*x"));
    assert_eq!(pretty_integration_result(&done), "x**2");
    assert_eq!(latex_integration_result(&done), "x^{2}");

    let stuck = integrate("x", &canonical("exp(x**2)"));
    assert_eq!(pretty_integration_result(&stuck), "Integral(exp(x**2), x)");
    assert_eq!(latex_integration_result(&stuck), r"\int e^{x^{2}}\, dx");
}
