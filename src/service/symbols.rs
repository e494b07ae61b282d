use std::collections::BTreeSet;

/// The symbols the analysis service works with, built once at startup and shared through
/// router state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolTable {
    x: String,
    y: String,
    z: String,
}

impl SymbolTable {
    pub fn standard() -> Self {
        SymbolTable {
            x: "x".to_string(),
            y: "y".to_string(),
            z: "z".to_string(),
        }
    }

    /// The unknown solved for, differentiated and integrated against.
    pub fn primary(&self) -> &str {
        &self.x
    }

    /// Horizontal axes of the sampled surface.
    pub fn surface_axes(&self) -> (&str, &str) {
        (&self.x, &self.y)
    }

    pub fn contains(&self, name: &str) -> bool {
        [&self.x, &self.y, &self.z].iter().any(|s| s.as_str() == name)
    }

    /// Symbols of `names` that are not in the table.
    pub fn foreign<'a>(&self, names: &'a BTreeSet<String>) -> Vec<&'a str> {
        names
            .iter()
            .map(String::as_str)
            .filter(|name| !self.contains(name))
            .collect()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        SymbolTable::standard()
    }
}
