//! Typed query predicates and eager-load options for the catalog repositories.

use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    /// Exact, case-sensitive name match
    NameEquals(String),
    /// Same name held by a category other than `id`
    NameEqualsExcept { name: String, id: Uuid },
    /// Substring of name or description
    Search(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductFilter {
    InCategory(Uuid),
    /// Inclusive on both ends
    PriceBetween { min: Decimal, max: Decimal },
    /// Substring of name or description
    Search(String),
}

/// Categories have nothing to eager-load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryInclude {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductInclude {
    Category,
}

/// Escapes `%`, `_` and `\` and wraps the term for a `LIKE` substring match.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
