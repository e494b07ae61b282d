use crate::expr::Expr;
use crate::polynomial::Polynomial;
use crate::simplify::{canon_product, flatten_mul, mk_mul_list, split_coeff};

/// Coefficient `a` when `expr` is `a*var + b` with `a` and `b` free of `var`.
pub(crate) fn linear_coeff(expr: &Expr, var: &str) -> Option<Expr> {
    let poly = Polynomial::<Expr>::from_expr(expr, var)?;
    (poly.degree()? == 1).then(|| poly.coeff(1))
}

/// Split a product into the factors free of `var` and the rest.
pub(crate) fn split_constant_factors(expr: &Expr, var: &str) -> (Expr, Expr) {
    let (coeff, rest) = split_coeff(expr);
    let (constant, varying): (Vec<Expr>, Vec<Expr>) = flatten_mul(&rest)
        .into_iter()
        .partition(|factor| !factor.contains_var(var));
    let mut constant_factors = vec![Expr::Constant(coeff)];
    constant_factors.extend(constant);
    (canon_product(constant_factors), mk_mul_list(varying))
}

/// Structural replacement of every occurrence of `target`.
pub(crate) fn replace_subexpr(expr: &Expr, target: &Expr, with: &Expr) -> Expr {
    if expr == target {
        return with.clone();
    }
    match expr {
        Expr::Add(a, b) => Expr::Add(
            replace_subexpr(a, target, with).boxed(),
            replace_subexpr(b, target, with).boxed(),
        ),
        Expr::Sub(a, b) => Expr::Sub(
            replace_subexpr(a, target, with).boxed(),
            replace_subexpr(b, target, with).boxed(),
        ),
        Expr::Mul(a, b) => Expr::Mul(
            replace_subexpr(a, target, with).boxed(),
            replace_subexpr(b, target, with).boxed(),
        ),
        Expr::Div(a, b) => Expr::Div(
            replace_subexpr(a, target, with).boxed(),
            replace_subexpr(b, target, with).boxed(),
        ),
        Expr::Pow(a, b) => Expr::Pow(
            replace_subexpr(a, target, with).boxed(),
            replace_subexpr(b, target, with).boxed(),
        ),
        Expr::Neg(a) => Expr::Neg(replace_subexpr(a, target, with).boxed()),
        other => match other.function_arg() {
            Some(arg) => other.with_function_arg(replace_subexpr(arg, target, with)),
            None => other.clone(),
        },
    }
}

/// A symbol name that does not occur in `expr`.
pub(crate) fn fresh_symbol(expr: &Expr) -> String {
    let taken = expr.free_symbols();
    (0..)
        .map(|i| if i == 0 { "u".to_string() } else { format!("u{i}") })
        .find(|name| !taken.contains(name))
        .unwrap_or_else(|| "u".to_string())
}
