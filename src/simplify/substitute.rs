use crate::expr::Expr;

use super::rules::simplify;

/// Substitute variable `var` with `replacement` throughout `expr`. The result is not simplified.
pub fn substitute(expr: &Expr, var: &str, replacement: &Expr) -> Expr {
    match expr {
        Expr::Variable(name) if name == var => replacement.clone(),
        Expr::Variable(_) | Expr::Constant(_) | Expr::Pi => expr.clone(),
        Expr::Add(a, b) => Expr::Add(
            substitute(a, var, replacement).boxed(),
            substitute(b, var, replacement).boxed(),
        ),
        Expr::Sub(a, b) => Expr::Sub(
            substitute(a, var, replacement).boxed(),
            substitute(b, var, replacement).boxed(),
        ),
        Expr::Mul(a, b) => Expr::Mul(
            substitute(a, var, replacement).boxed(),
            substitute(b, var, replacement).boxed(),
        ),
        Expr::Div(a, b) => Expr::Div(
            substitute(a, var, replacement).boxed(),
            substitute(b, var, replacement).boxed(),
        ),
        Expr::Pow(a, b) => Expr::Pow(
            substitute(a, var, replacement).boxed(),
            substitute(b, var, replacement).boxed(),
        ),
        Expr::Neg(a) => Expr::Neg(substitute(a, var, replacement).boxed()),
        other => match other.function_arg() {
            Some(arg) => other.with_function_arg(substitute(arg, var, replacement)),
            None => other.clone(),
        },
    }
}

/// Substitute and re-canonicalize.
pub fn substitute_simplified(expr: &Expr, var: &str, replacement: &Expr) -> Expr {
    simplify(substitute(expr, var, replacement))
}
