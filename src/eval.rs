//! Floating point evaluation of expressions.

use crate::error::{CasError, Result};
use crate::expr::Expr;
use num_traits::ToPrimitive;

/// Evaluate `expr` with the given symbol bindings. Unbound symbols and results that are not
/// finite real numbers are errors.
pub fn evaluate(expr: &Expr, bindings: &[(&str, f64)]) -> Result<f64> {
    let value = eval_node(expr, bindings)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CasError::Evaluation(format!("{expr} is not a finite real number")))
    }
}

fn eval_node(expr: &Expr, bindings: &[(&str, f64)]) -> Result<f64> {
    let real = |value: f64, what: &Expr| {
        if value.is_nan() {
            Err(CasError::Evaluation(format!("{what} is not real")))
        } else {
            Ok(value)
        }
    };
    let value = match expr {
        Expr::Variable(name) => bindings
            .iter()
            .find(|(bound, _)| bound == name)
            .map(|(_, v)| *v)
            .ok_or_else(|| CasError::Evaluation(format!("symbol {name} has no value")))?,
        Expr::Constant(c) => c
            .to_f64()
            .ok_or_else(|| CasError::Evaluation(format!("{c} does not fit in a float")))?,
        Expr::Pi => std::f64::consts::PI,
        Expr::Add(a, b) => eval_node(a, bindings)? + eval_node(b, bindings)?,
        Expr::Sub(a, b) => eval_node(a, bindings)? - eval_node(b, bindings)?,
        Expr::Mul(a, b) => eval_node(a, bindings)? * eval_node(b, bindings)?,
        Expr::Div(a, b) => {
            let denominator = eval_node(b, bindings)?;
            if denominator == 0.0 {
                return Err(CasError::Evaluation(format!("division by zero in {expr}")));
            }
            eval_node(a, bindings)? / denominator
        }
        Expr::Pow(base, exp) => power(eval_node(base, bindings)?, exp, bindings, expr)?,
        Expr::Neg(a) => -eval_node(a, bindings)?,
        Expr::Sin(a) => eval_node(a, bindings)?.sin(),
        Expr::Cos(a) => eval_node(a, bindings)?.cos(),
        Expr::Tan(a) => eval_node(a, bindings)?.tan(),
        Expr::Asin(a) => eval_node(a, bindings)?.asin(),
        Expr::Acos(a) => eval_node(a, bindings)?.acos(),
        Expr::Atan(a) => eval_node(a, bindings)?.atan(),
        Expr::Sinh(a) => eval_node(a, bindings)?.sinh(),
        Expr::Cosh(a) => eval_node(a, bindings)?.cosh(),
        Expr::Tanh(a) => eval_node(a, bindings)?.tanh(),
        Expr::Exp(a) => eval_node(a, bindings)?.exp(),
        Expr::Log(a) => {
            let arg = eval_node(a, bindings)?;
            if arg == 0.0 {
                return Err(CasError::Evaluation(format!("{expr} is not finite")));
            }
            arg.ln()
        }
        Expr::Abs(a) => eval_node(a, bindings)?.abs(),
    };
    real(value, expr)
}

/// Real power on the principal branch: a negative base needs an integer exponent.
fn power(base: f64, exp: &Expr, bindings: &[(&str, f64)], whole: &Expr) -> Result<f64> {
    let integer_exponent = match exp.as_constant() {
        Some(e) if e.is_integer() => e.to_integer().to_i32(),
        _ => None,
    };
    let exponent = match integer_exponent {
        Some(n) => f64::from(n),
        None => eval_node(exp, bindings)?,
    };
    if base == 0.0 && exponent < 0.0 {
        return Err(CasError::Evaluation(format!("division by zero in {whole}")));
    }
    if base < 0.0 && exponent.fract() != 0.0 {
        return Err(CasError::Evaluation(format!("{whole} is not real")));
    }
    Ok(match integer_exponent {
        Some(n) => base.powi(n),
        None => base.powf(exponent),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expr;

    #[test]
    fn negative_base_with_fractional_exponent_is_not_real() {
        let expr = parse_expr("x**(1/3)").unwrap();
        assert!(evaluate(&expr, &[("x", -8.0)]).is_err());
        assert!((evaluate(&expr, &[("x", 8.0)]).unwrap() - 2.0).abs() < 1e-12);
    }
}
