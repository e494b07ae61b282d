use crate::expr::{Expr, Rational};
use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive};

use super::layout::{ordered_terms, Fraction};
use super::pretty::precedence;

const MUL: u8 = 50;
const POW: u8 = 60;

const GREEK: [&str; 24] = [
    "alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta", "iota", "kappa",
    "lambda", "mu", "nu", "xi", "omicron", "rho", "sigma", "tau", "upsilon", "phi", "chi",
    "psi", "omega", "Gamma",
];

/// LaTeX rendering, e.g. `x^{2} + 2 x + 1` or `\frac{\sin{\left(x \right)}}{x}`.
pub fn latex(expr: &Expr) -> String {
    match expr {
        Expr::Variable(v) => symbol(v),
        Expr::Constant(c) => rational(c),
        Expr::Pi => r"\pi".to_string(),
        Expr::Add(..) | Expr::Sub(..) => sum(expr),
        Expr::Mul(..) | Expr::Div(..) | Expr::Neg(..) => product(expr),
        Expr::Pow(base, exp) => power(base, exp),
        Expr::Exp(arg) if arg.is_one() => "e".to_string(),
        Expr::Exp(arg) => format!("e^{{{}}}", latex(arg)),
        Expr::Abs(arg) => format!(r"\left|{{{}}}\right|", latex(arg)),
        other => match other.function_arg() {
            Some(arg) => format!(r"{}{{\left({} \right)}}", function_name(other), latex(arg)),
            None => String::new(),
        },
    }
}

/// `\left[ a, \  b\right]`; the empty list is `\left[ \right]`.
pub fn latex_list(items: &[Expr]) -> String {
    if items.is_empty() {
        return r"\left[ \right]".to_string();
    }
    let body: Vec<String> = items.iter().map(latex).collect();
    format!(r"\left[ {}\right]", body.join(r", \  "))
}

fn symbol(name: &str) -> String {
    let split = name.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    let (stem, digits) = name.split_at(split);
    let stem = if GREEK.contains(&stem) {
        format!(r"\{stem}")
    } else {
        stem.to_string()
    };
    if digits.is_empty() || stem.is_empty() {
        format!("{stem}{digits}")
    } else {
        format!("{stem}_{{{digits}}}")
    }
}

fn rational(r: &Rational) -> String {
    if r.is_integer() {
        return r.numer().to_string();
    }
    let body = format!(r"\frac{{{}}}{{{}}}", r.numer().abs(), r.denom());
    if r.is_negative() {
        format!("- {body}")
    } else {
        body
    }
}

fn function_name(node: &Expr) -> &'static str {
    match node {
        Expr::Sin(_) => r"\sin",
        Expr::Cos(_) => r"\cos",
        Expr::Tan(_) => r"\tan",
        Expr::Asin(_) => r"\operatorname{asin}",
        Expr::Acos(_) => r"\operatorname{acos}",
        Expr::Atan(_) => r"\operatorname{atan}",
        Expr::Sinh(_) => r"\sinh",
        Expr::Cosh(_) => r"\cosh",
        Expr::Tanh(_) => r"\tanh",
        _ => r"\log",
    }
}

fn sum(expr: &Expr) -> String {
    let mut out = String::new();
    for (i, term) in ordered_terms(expr).iter().enumerate() {
        let negative = Fraction::is_negative_term(term);
        let body = match term {
            Expr::Constant(c) if negative => rational(&c.abs()),
            _ if negative => product_body(&Fraction::of(term)),
            _ => latex(term),
        };
        match (i, negative) {
            (0, true) => out.push_str("- "),
            (0, false) => {}
            (_, true) => out.push_str(" - "),
            (_, false) => out.push_str(" + "),
        }
        out.push_str(&body);
    }
    out
}

fn product(expr: &Expr) -> String {
    let fraction = Fraction::of(expr);
    let body = product_body(&fraction);
    if fraction.negative {
        format!("- {body}")
    } else {
        body
    }
}

fn product_body(fraction: &Fraction) -> String {
    let has_denom = !fraction.denom_coeff.is_one() || !fraction.denom.is_empty();
    let numer = fraction_side(&fraction.numer_coeff, &fraction.numer, has_denom);
    if !has_denom {
        return numer;
    }
    let denom = fraction_side(&fraction.denom_coeff, &fraction.denom, true);
    format!(r"\frac{{{numer}}}{{{denom}}}")
}

/// One side of a product. A lone factor inside `\frac` needs no parentheses.
fn fraction_side(coeff: &BigInt, factors: &[Expr], in_frac: bool) -> String {
    let mut parts: Vec<String> = Vec::new();
    if !coeff.is_one() {
        parts.push(coeff.to_string());
    }
    if in_frac && parts.is_empty() && factors.len() == 1 {
        parts.push(latex(&factors[0]));
    } else {
        parts.extend(factors.iter().map(factor));
    }
    join_factors(parts)
}

/// Juxtapose factors, with `\cdot` between two adjacent numbers.
fn join_factors(parts: Vec<String>) -> String {
    let mut out = String::new();
    for part in parts {
        if !out.is_empty() {
            let digit_pair = out.ends_with(|c: char| c.is_ascii_digit())
                && part.starts_with(|c: char| c.is_ascii_digit());
            out.push_str(if digit_pair { r" \cdot " } else { " " });
        }
        out.push_str(&part);
    }
    if out.is_empty() {
        out.push('1');
    }
    out
}

fn factor(expr: &Expr) -> String {
    if precedence(expr) < MUL {
        format!(r"\left({}\right)", latex(expr))
    } else {
        latex(expr)
    }
}

fn power(base: &Expr, exp: &Expr) -> String {
    let Some(e) = exp.as_constant() else {
        return format!("{}^{{{}}}", power_base(base), latex(exp));
    };
    if e.is_negative() {
        let positive = Expr::Pow(Box::new(base.clone()), Box::new(Expr::Constant(-e)));
        let denominator = if (-e).is_one() { latex(base) } else { latex(&positive) };
        return format!(r"\frac{{1}}{{{denominator}}}");
    }
    if e.numer().is_one() && !e.is_integer() {
        let index = e.denom();
        return if *index == 2.into() {
            format!(r"\sqrt{{{}}}", latex(base))
        } else {
            format!(r"\sqrt[{index}]{{{}}}", latex(base))
        };
    }
    let exponent = if e.is_integer() {
        e.numer().to_string()
    } else {
        rational(e)
    };
    let folds = e.is_integer()
        && e.to_integer().to_u32().is_some()
        && base.function_arg().is_some()
        && !matches!(base, Expr::Exp(_) | Expr::Abs(_));
    if folds {
        if let Some(arg) = base.function_arg() {
            return format!(
                r"{}^{{{exponent}}}{{\left({} \right)}}",
                function_name(base),
                latex(arg)
            );
        }
    }
    format!("{}^{{{exponent}}}", power_base(base))
}

fn power_base(base: &Expr) -> String {
    let needs_parens = precedence(base) <= POW
        || matches!(base, Expr::Exp(_))
        || matches!(base, Expr::Pow(_, e) if e.as_constant().is_some_and(|e| e.numer().is_one() && !e.is_integer()));
    if needs_parens {
        format!(r"\left({}\right)", latex(base))
    } else {
        latex(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_with_digits_get_subscripts() {
        assert_eq!(symbol("x1"), "x_{1}");
        assert_eq!(symbol("theta"), r"\theta");
        assert_eq!(symbol("y"), "y");
    }
}
