//! Expression tree definitions and helpers.

use std::collections::BTreeSet;
use std::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Zero};

pub type Rational = BigRational;

/// A symbolic expression. Euler's number is `Exp(1)` and square roots are
/// `Pow(_, 1/2)`, so neither needs its own variant.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Expr {
    Variable(String),
    Constant(Rational),
    Pi,
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Neg(Box<Expr>),
    Sin(Box<Expr>),
    Cos(Box<Expr>),
    Tan(Box<Expr>),
    Asin(Box<Expr>),
    Acos(Box<Expr>),
    Atan(Box<Expr>),
    Sinh(Box<Expr>),
    Cosh(Box<Expr>),
    Tanh(Box<Expr>),
    Exp(Box<Expr>),
    Log(Box<Expr>),
    Abs(Box<Expr>),
}

impl Expr {
    pub fn var(name: impl Into<String>) -> Self {
        Expr::Variable(name.into())
    }

    pub fn constant(num: impl Into<BigInt>, den: impl Into<BigInt>) -> Self {
        Expr::Constant(Rational::new(num.into(), den.into()))
    }

    pub fn integer(value: impl Into<BigInt>) -> Self {
        Expr::Constant(Rational::from_integer(value.into()))
    }

    pub fn rational(value: Rational) -> Self {
        Expr::Constant(value)
    }

    /// Euler's number.
    pub fn e() -> Self {
        Expr::Exp(one().boxed())
    }

    pub fn sqrt(self) -> Self {
        Expr::Pow(self.boxed(), Expr::constant(1, 2).boxed())
    }

    pub fn negate(self) -> Self {
        match self {
            Expr::Constant(r) => Expr::Constant(-r),
            Expr::Neg(inner) => *inner,
            other => Expr::Neg(Box::new(other)),
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Constant(r) if r.is_zero())
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Expr::Constant(r) if r.is_one())
    }

    pub fn as_variable(&self) -> Option<&str> {
        if let Expr::Variable(name) = self {
            Some(name)
        } else {
            None
        }
    }

    pub fn as_constant(&self) -> Option<&Rational> {
        if let Expr::Constant(c) = self {
            Some(c)
        } else {
            None
        }
    }

    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    /// Argument of a single-argument function node.
    pub fn function_arg(&self) -> Option<&Expr> {
        match self {
            Expr::Sin(a)
            | Expr::Cos(a)
            | Expr::Tan(a)
            | Expr::Asin(a)
            | Expr::Acos(a)
            | Expr::Atan(a)
            | Expr::Sinh(a)
            | Expr::Cosh(a)
            | Expr::Tanh(a)
            | Expr::Exp(a)
            | Expr::Log(a)
            | Expr::Abs(a) => Some(a),
            _ => None,
        }
    }

    /// Rebuild a function node with a new argument. Non-function nodes are returned unchanged.
    pub fn with_function_arg(&self, arg: Expr) -> Expr {
        let arg = arg.boxed();
        match self {
            Expr::Sin(_) => Expr::Sin(arg),
            Expr::Cos(_) => Expr::Cos(arg),
            Expr::Tan(_) => Expr::Tan(arg),
            Expr::Asin(_) => Expr::Asin(arg),
            Expr::Acos(_) => Expr::Acos(arg),
            Expr::Atan(_) => Expr::Atan(arg),
            Expr::Sinh(_) => Expr::Sinh(arg),
            Expr::Cosh(_) => Expr::Cosh(arg),
            Expr::Tanh(_) => Expr::Tanh(arg),
            Expr::Exp(_) => Expr::Exp(arg),
            Expr::Log(_) => Expr::Log(arg),
            Expr::Abs(_) => Expr::Abs(arg),
            other => other.clone(),
        }
    }

    /// Function name as the parser spells it.
    pub fn function_name(&self) -> Option<&'static str> {
        Some(match self {
            Expr::Sin(_) => "sin",
            Expr::Cos(_) => "cos",
            Expr::Tan(_) => "tan",
            Expr::Asin(_) => "asin",
            Expr::Acos(_) => "acos",
            Expr::Atan(_) => "atan",
            Expr::Sinh(_) => "sinh",
            Expr::Cosh(_) => "cosh",
            Expr::Tanh(_) => "tanh",
            Expr::Exp(_) => "exp",
            Expr::Log(_) => "log",
            Expr::Abs(_) => "Abs",
            _ => return None,
        })
    }

    pub fn binary_parts(&self) -> Option<(&Expr, &Expr)> {
        match self {
            Expr::Add(a, b) | Expr::Sub(a, b) | Expr::Mul(a, b) | Expr::Div(a, b) | Expr::Pow(a, b) => {
                Some((a, b))
            }
            _ => None,
        }
    }

    pub fn contains_var(&self, var: &str) -> bool {
        match self {
            Expr::Variable(v) => v == var,
            Expr::Constant(_) | Expr::Pi => false,
            Expr::Neg(inner) => inner.contains_var(var),
            other => {
                if let Some((a, b)) = other.binary_parts() {
                    a.contains_var(var) || b.contains_var(var)
                } else {
                    other.function_arg().is_some_and(|a| a.contains_var(var))
                }
            }
        }
    }

    /// Free symbols in sorted order.
    pub fn free_symbols(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_symbols(&mut out);
        out
    }

    fn collect_symbols(&self, out: &mut BTreeSet<String>) {
        match self {
            Expr::Variable(v) => {
                out.insert(v.clone());
            }
            Expr::Constant(_) | Expr::Pi => {}
            Expr::Neg(inner) => inner.collect_symbols(out),
            other => {
                if let Some((a, b)) = other.binary_parts() {
                    a.collect_symbols(out);
                    b.collect_symbols(out);
                } else if let Some(a) = other.function_arg() {
                    a.collect_symbols(out);
                }
            }
        }
    }

    /// Node count, used to compare candidate forms.
    pub fn size(&self) -> usize {
        match self {
            Expr::Variable(_) | Expr::Constant(_) | Expr::Pi => 1,
            Expr::Neg(inner) => 1 + inner.size(),
            other => {
                if let Some((a, b)) = other.binary_parts() {
                    1 + a.size() + b.size()
                } else {
                    1 + other.function_arg().map_or(0, Expr::size)
                }
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::format::pretty(self))
    }
}

pub fn zero() -> Expr {
    Expr::Constant(Rational::zero())
}

pub fn one() -> Expr {
    Expr::Constant(Rational::one())
}

pub fn rational(num: i64, den: i64) -> Rational {
    Rational::new(num.into(), den.into())
}

pub fn pow(base: Expr, exp: Expr) -> Expr {
    Expr::Pow(base.boxed(), exp.boxed())
}

pub fn add(a: Expr, b: Expr) -> Expr {
    Expr::Add(a.boxed(), b.boxed())
}

pub fn sub(a: Expr, b: Expr) -> Expr {
    Expr::Sub(a.boxed(), b.boxed())
}

pub fn mul(a: Expr, b: Expr) -> Expr {
    Expr::Mul(a.boxed(), b.boxed())
}

pub fn div(a: Expr, b: Expr) -> Expr {
    Expr::Div(a.boxed(), b.boxed())
}

pub fn neg(a: Expr) -> Expr {
    Expr::Neg(a.boxed())
}
