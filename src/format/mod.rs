//! Text and LaTeX rendering of expressions and integration results.

mod integrate;
mod latex;
mod layout;
mod pretty;

pub use integrate::{describe_integration, latex_integration_result, pretty_integration_result};
pub use latex::{latex, latex_list};
pub use pretty::pretty;
