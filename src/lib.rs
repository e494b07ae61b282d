//! Symbolic mathematics for the MathNotes services: parsing, simplification, calculus,
//! equation solving and rendering, plus the HTTP adapters that expose them.

pub mod calculus;
pub mod error;
pub mod eval;
pub mod expr;
pub mod format;
pub mod parser;
pub mod polynomial;
pub mod service;
pub mod simplify;
pub mod solver;

pub use calculus::{
    differentiate, differentiate_inferred, integrate, integrate_inferred, AttemptStatus,
    IntegrandKind, IntegrandReport, IntegrationAttempt, IntegrationResult, ReasonCode, Strategy,
};
pub use error::{CasError, Result};
pub use eval::evaluate;
pub use expr::{add, div, mul, neg, one, pow, rational, sub, zero, Expr, Rational};
pub use format::{latex, latex_integration_result, latex_list, pretty, pretty_integration_result};
pub use parser::parse_expr;
pub use polynomial::{Poly, Polynomial};
pub use simplify::{cancel, expand, simplify, simplify_checked, simplify_fully, substitute};
pub use solver::{solve_equation, solve_system, LinearResult};
