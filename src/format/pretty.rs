use crate::expr::{Expr, Rational};
use num_traits::{One, Signed};

use super::layout::{ordered_terms, Fraction};

const ADD: u8 = 40;
const MUL: u8 = 50;
const POW: u8 = 60;
const ATOM: u8 = 100;

/// Plain-text rendering with `**` for powers, e.g. `x**2 + 2*x + 1`.
pub fn pretty(expr: &Expr) -> String {
    match expr {
        Expr::Variable(v) => v.clone(),
        Expr::Constant(c) => show_rational(c),
        Expr::Pi => "pi".to_string(),
        Expr::Add(..) | Expr::Sub(..) => sum(expr),
        Expr::Mul(..) | Expr::Div(..) | Expr::Neg(..) => product(expr),
        Expr::Pow(base, exp) => power(base, exp),
        Expr::Exp(arg) if arg.is_one() => "E".to_string(),
        other => match (other.function_name(), other.function_arg()) {
            (Some(name), Some(arg)) => format!("{name}({})", pretty(arg)),
            _ => String::new(),
        },
    }
}

fn sum(expr: &Expr) -> String {
    let mut out = String::new();
    for (i, term) in ordered_terms(expr).iter().enumerate() {
        let negative = Fraction::is_negative_term(term);
        let body = if negative { magnitude(term) } else { pretty(term) };
        match (i, negative) {
            (0, true) => out.push('-'),
            (0, false) => {}
            (_, true) => out.push_str(" - "),
            (_, false) => out.push_str(" + "),
        }
        out.push_str(&body);
    }
    out
}

fn magnitude(term: &Expr) -> String {
    match term {
        Expr::Constant(c) => show_rational(&c.abs()),
        other => product_body(&Fraction::of(other)),
    }
}

fn product(expr: &Expr) -> String {
    let fraction = Fraction::of(expr);
    let body = product_body(&fraction);
    if fraction.negative {
        format!("-{body}")
    } else {
        body
    }
}

fn product_body(fraction: &Fraction) -> String {
    let mut numer: Vec<String> = Vec::new();
    if !fraction.numer_coeff.is_one() || fraction.numer.is_empty() {
        numer.push(fraction.numer_coeff.to_string());
    }
    numer.extend(fraction.numer.iter().map(|f| parenthesize(f, MUL)));
    let numer = numer.join("*");

    let mut denom: Vec<String> = Vec::new();
    if !fraction.denom_coeff.is_one() {
        denom.push(fraction.denom_coeff.to_string());
    }
    denom.extend(fraction.denom.iter().map(|f| parenthesize(f, MUL)));
    match denom.len() {
        0 => numer,
        1 => format!("{numer}/{}", denom[0]),
        _ => format!("{numer}/({})", denom.join("*")),
    }
}

fn power(base: &Expr, exp: &Expr) -> String {
    if let Some(e) = exp.as_constant() {
        let half = Rational::new(1.into(), 2.into());
        if *e == half {
            return format!("sqrt({})", pretty(base));
        }
        if *e == -half {
            return format!("1/sqrt({})", pretty(base));
        }
        if e == &-Rational::one() {
            return format!("1/{}", parenthesize(base, MUL));
        }
    }
    format!("{}**{}", wrap_strict(base), wrap_strict(exp))
}

/// Parenthesize when binding at most as tight as a power.
fn wrap_strict(expr: &Expr) -> String {
    if precedence(expr) <= POW {
        format!("({})", pretty(expr))
    } else {
        pretty(expr)
    }
}

fn parenthesize(expr: &Expr, level: u8) -> String {
    if precedence(expr) < level {
        format!("({})", pretty(expr))
    } else {
        pretty(expr)
    }
}

pub(crate) fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Add(..) | Expr::Sub(..) => ADD,
        Expr::Constant(c) if c.is_negative() => ADD,
        Expr::Constant(c) if !c.is_integer() => MUL,
        Expr::Mul(..) | Expr::Div(..) | Expr::Neg(..) => {
            if Fraction::of(expr).negative {
                ADD
            } else {
                MUL
            }
        }
        Expr::Pow(_, exp) => match exp.as_constant() {
            Some(e) if *e == Rational::new(1.into(), 2.into()) => ATOM,
            Some(e) if e.is_negative() => MUL,
            _ => POW,
        },
        _ => ATOM,
    }
}

pub(crate) fn show_rational(r: &Rational) -> String {
    if r.is_integer() {
        r.numer().to_string()
    } else {
        format!("{}/{}", r.numer(), r.denom())
    }
}
