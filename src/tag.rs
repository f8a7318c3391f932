//! Field annotation parsing.
//!
//! An annotation is a comma-separated token string such as `"primary,widgets"`
//! or `"attr,name"`. Splitting is purely positional: no trimming, no quoting,
//! no escaping, and no validation of role names.

use crate::types::Role;

/// Split an annotation into its ordered tokens.
///
/// An empty annotation yields an empty list, meaning the field has no role.
pub fn parse_tag(tag: &str) -> Vec<&str> {
    if tag.is_empty() {
        return Vec::new();
    }
    tag.split(',').collect()
}

/// Parse an annotation and classify its role.
///
/// Returns `None` for empty annotations and unknown role kinds.
pub fn parse_role(tag: &str) -> Option<Role<'_>> {
    Role::parse(&parse_tag(tag))
}
