//! HTTP adapters over the engine: the equation analysis service and the expression toolkit.
//!
//! Handlers parse the request, make one or two engine calls on the blocking pool and
//! serialize the result. Engine failures come back as `{"error": ...}` with status 200;
//! only malformed requests produce an error status.

pub mod analysis;
pub mod config;
pub mod docs;
pub mod dto;
pub mod error;
pub mod router;
pub mod symbols;
pub mod toolkit;

pub use config::{ApiInfo, ServerConfig, ServiceKind};
pub use router::{create_router, AppState};
pub use symbols::SymbolTable;

use crate::error::Result;
use crate::expr::Expr;
use crate::parser::parse_expr;
use crate::simplify::simplify_checked;

/// Parse and auto-evaluate user input. Constant divisions by zero are evaluation errors.
pub(crate) fn read_input(input: &str) -> Result<Expr> {
    simplify_checked(parse_expr(input)?)
}
