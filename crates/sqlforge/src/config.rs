//! Library-wide configuration.

use crate::binder::PlaceholderStyle;

/// Settings shared by parameterized statements and mappings.
///
/// ```ignore
/// let config = OrmConfig::new()
///     .placeholder_style(PlaceholderStyle::Question)
///     .default_alias("e");
/// let mapping = Mapping::<Employee>::with_config("Employee", &config);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrmConfig {
    pub placeholder_style: PlaceholderStyle,
    pub default_alias: String,
}

impl Default for OrmConfig {
    fn default() -> Self {
        Self {
            placeholder_style: PlaceholderStyle::Dollar,
            default_alias: "_t0".to_string(),
        }
    }
}

impl OrmConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Positional marker style emitted by the binder.
    pub fn placeholder_style(mut self, style: PlaceholderStyle) -> Self {
        self.placeholder_style = style;
        self
    }

    /// Table alias used by mappings that do not set one explicitly.
    pub fn default_alias(mut self, alias: impl Into<String>) -> Self {
        self.default_alias = alias.into();
        self
    }
}
