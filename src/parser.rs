//! Parser for calculator-style expression strings.
//!
//! The accepted syntax follows Python arithmetic: `**` is exponentiation and
//! binds tighter than unary minus, `^` is accepted as a synonym for `**`, and
//! decimals are read as exact rationals.

use crate::error::{CasError, Result};
use crate::expr::{Expr, Rational};
use nom::branch::alt;
use nom::bytes::complete::{tag, take_while};
use nom::character::complete::{alpha1, char, digit0, digit1, multispace0, one_of};
use nom::combinator::{all_consuming, not, opt, peek, recognize};
use nom::error::{VerboseError, VerboseErrorKind};
use nom::multi::{fold_many0, separated_list1};
use nom::sequence::{delimited, pair, preceded, terminated, tuple};
use nom::IResult;
use num_bigint::BigInt;
use num_traits::One;

type PResult<'a, O> = IResult<&'a str, O, VerboseError<&'a str>>;

const MAX_DECIMAL_EXPONENT: i64 = 1000;
/// Deepest parenthesis nesting accepted.
const MAX_NESTING: usize = 48;
/// Most operator symbols accepted; each one adds a level to the expression tree.
const MAX_OPERATORS: usize = 256;

pub fn parse_expr(input: &str) -> Result<Expr> {
    if input.trim().is_empty() {
        return Err(CasError::parse(input, 0, "empty expression"));
    }
    check_size(input)?;
    match all_consuming(ws(parse_add_sub))(input) {
        Ok((_, expr)) => Ok(expr),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(describe_error(input, &e)),
        Err(nom::Err::Incomplete(_)) => Err(CasError::parse(
            input,
            input.len(),
            "unexpected end of input",
        )),
    }
}

/// Bound the depth of the tree before building it; parsing and evaluation both recurse over it.
fn check_size(input: &str) -> Result<()> {
    let mut depth = 0usize;
    let mut operators = 0usize;
    for (offset, c) in input.char_indices() {
        match c {
            '(' => {
                depth += 1;
                if depth > MAX_NESTING {
                    return Err(CasError::parse(input, offset, "expression nested too deeply"));
                }
            }
            ')' => depth = depth.saturating_sub(1),
            '+' | '-' | '*' | '/' | '^' | ',' => {
                operators += 1;
                if operators > MAX_OPERATORS {
                    return Err(CasError::parse(input, offset, "expression too large"));
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn describe_error(input: &str, err: &VerboseError<&str>) -> CasError {
    let context = err.errors.iter().find_map(|(rest, kind)| match kind {
        VerboseErrorKind::Context(ctx) => Some((*rest, *ctx)),
        _ => None,
    });
    match context {
        Some((rest, ctx)) => {
            let name: String = rest
                .chars()
                .take_while(|c| c.is_alphanumeric() || *c == '_')
                .collect();
            let message = if name.is_empty() {
                ctx.to_string()
            } else {
                format!("{ctx} '{name}'")
            };
            CasError::parse(input, input.len() - rest.len(), message)
        }
        None => {
            let offset = err
                .errors
                .first()
                .map(|(rest, _)| input.len() - rest.len())
                .unwrap_or(0);
            CasError::parse(input, offset, "invalid syntax")
        }
    }
}

fn fail<'a, O>(at: &'a str, ctx: &'static str) -> PResult<'a, O> {
    Err(nom::Err::Failure(VerboseError {
        errors: vec![(at, VerboseErrorKind::Context(ctx))],
    }))
}

fn parse_add_sub(input: &str) -> PResult<'_, Expr> {
    let (rest, init) = parse_mul_div(input)?;
    fold_many0(
        pair(ws(alt((char('+'), char('-')))), parse_mul_div),
        move || init.clone(),
        |acc, (op, rhs)| match op {
            '+' => Expr::Add(acc.boxed(), rhs.boxed()),
            _ => Expr::Sub(acc.boxed(), rhs.boxed()),
        },
    )(rest)
}

fn parse_mul_div(input: &str) -> PResult<'_, Expr> {
    let (rest, init) = parse_unary(input)?;
    fold_many0(
        pair(
            ws(alt((terminated(char('*'), not(char('*'))), char('/')))),
            parse_unary,
        ),
        move || init.clone(),
        |acc, (op, rhs)| match op {
            '*' => Expr::Mul(acc.boxed(), rhs.boxed()),
            _ => Expr::Div(acc.boxed(), rhs.boxed()),
        },
    )(rest)
}

fn parse_unary(input: &str) -> PResult<'_, Expr> {
    match preceded(ws(char('-')), parse_unary)(input) {
        Ok((rest, expr)) => return Ok((rest, Expr::Neg(expr.boxed()))),
        Err(nom::Err::Failure(e)) => return Err(nom::Err::Failure(e)),
        Err(_) => {}
    }
    match preceded(ws(char('+')), parse_unary)(input) {
        Ok(parsed) => return Ok(parsed),
        Err(nom::Err::Failure(e)) => return Err(nom::Err::Failure(e)),
        Err(_) => {}
    }
    parse_pow(input)
}

fn parse_pow(input: &str) -> PResult<'_, Expr> {
    let (rest, base) = parse_primary(input)?;
    match preceded(ws(alt((tag("**"), tag("^")))), parse_unary)(rest) {
        Ok((next, exp)) => Ok((next, Expr::Pow(base.boxed(), exp.boxed()))),
        Err(nom::Err::Failure(e)) => Err(nom::Err::Failure(e)),
        Err(_) => Ok((rest, base)),
    }
}

fn parse_primary(input: &str) -> PResult<'_, Expr> {
    alt((parse_parens, parse_number, parse_name))(input)
}

fn parse_parens(input: &str) -> PResult<'_, Expr> {
    delimited(ws(char('(')), parse_add_sub, ws(char(')')))(input)
}

fn parse_number(input: &str) -> PResult<'_, Expr> {
    let (rest, text) = ws(recognize(tuple((
        alt((
            recognize(pair(digit1, opt(pair(char('.'), digit0)))),
            recognize(pair(char('.'), digit1)),
        )),
        opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
    ))))(input)?;
    match decimal_to_rational(text) {
        Some(value) => Ok((rest, Expr::Constant(value))),
        None => fail(input.trim_start(), "number out of range"),
    }
}

fn decimal_to_rational(text: &str) -> Option<Rational> {
    let (mantissa, exponent) = match text.find(['e', 'E']) {
        Some(idx) => (&text[..idx], text[idx + 1..].parse::<i64>().ok()?),
        None => (text, 0),
    };
    if exponent.abs() > MAX_DECIMAL_EXPONENT {
        return None;
    }
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let digits = format!("{int_part}{frac_part}");
    let digits = if digits.is_empty() { "0".to_string() } else { digits };
    let numer = BigInt::parse_bytes(digits.as_bytes(), 10)?;
    let scale = exponent - frac_part.len() as i64;
    let ten = BigInt::from(10);
    let value = if scale >= 0 {
        Rational::from_integer(numer * ten.pow(scale as u32))
    } else {
        Rational::new(numer, ten.pow((-scale) as u32))
    };
    Some(value)
}

fn parse_name(input: &str) -> PResult<'_, Expr> {
    let (rest, name) = ws(recognize(pair(
        alt((alpha1, tag("_"))),
        take_while(|c: char| c.is_alphanumeric() || c == '_'),
    )))(input)?;
    let name_at = input.trim_start();

    if peek(ws(char::<&str, VerboseError<&str>>('(')))(rest).is_ok() {
        let (rest, args) = delimited(
            ws(char('(')),
            separated_list1(ws(char(',')), parse_add_sub),
            ws(char(')')),
        )(rest)?;
        return match build_call(name, args) {
            Ok(expr) => Ok((rest, expr)),
            Err(ctx) => fail(name_at, ctx),
        };
    }

    match name {
        "pi" => Ok((rest, Expr::Pi)),
        "E" => Ok((rest, Expr::e())),
        "I" | "oo" | "zoo" | "nan" => fail(name_at, "unsupported symbol"),
        _ if is_function_name(name) => fail(name_at, "missing arguments for function"),
        _ => Ok((rest, Expr::Variable(name.to_string()))),
    }
}

fn is_function_name(name: &str) -> bool {
    matches!(
        name,
        "sin" | "cos" | "tan" | "asin" | "acos" | "atan" | "arcsin" | "arccos" | "arctan"
            | "sinh" | "cosh" | "tanh" | "exp" | "log" | "ln" | "sqrt" | "Abs" | "abs"
    )
}

fn build_call(name: &str, mut args: Vec<Expr>) -> std::result::Result<Expr, &'static str> {
    if !is_function_name(name) {
        return Err("unknown function");
    }
    if name == "log" && args.len() == 2 {
        let base = args.pop().unwrap_or_else(|| Expr::Constant(Rational::one()));
        let arg = args.pop().unwrap_or_else(|| Expr::Constant(Rational::one()));
        return Ok(Expr::Div(
            Expr::Log(arg.boxed()).boxed(),
            Expr::Log(base.boxed()).boxed(),
        ));
    }
    if args.len() != 1 {
        return Err("wrong number of arguments for function");
    }
    let arg = args.remove(0).boxed();
    Ok(match name {
        "sin" => Expr::Sin(arg),
        "cos" => Expr::Cos(arg),
        "tan" => Expr::Tan(arg),
        "asin" | "arcsin" => Expr::Asin(arg),
        "acos" | "arccos" => Expr::Acos(arg),
        "atan" | "arctan" => Expr::Atan(arg),
        "sinh" => Expr::Sinh(arg),
        "cosh" => Expr::Cosh(arg),
        "tanh" => Expr::Tanh(arg),
        "exp" => Expr::Exp(arg),
        "log" | "ln" => Expr::Log(arg),
        "sqrt" => arg.sqrt(),
        _ => Expr::Abs(arg),
    })
}

fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> PResult<'a, O>
where
    F: FnMut(&'a str) -> PResult<'a, O>,
{
    delimited(multispace0, inner, multispace0)
}
