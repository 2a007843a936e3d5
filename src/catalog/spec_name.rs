//! Conversion between operator-typed spec field names and stored keys.
//!
//! `"Base Color"` is stored as `baseColor` and shown back as `"Base Color"`.

use crate::domain::SpecKey;

/// Trims, strips all whitespace and lower-cases the first character.
/// Returns `None` when nothing is left.
pub fn normalize(raw: &str) -> Option<SpecKey> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let mut chars = compact.chars();
    let first = chars.next()?;
    let key: String = first.to_lowercase().chain(chars).collect();
    Some(SpecKey::new(key))
}

/// Inserts a space before each upper-case letter and capitalizes the first.
pub fn display(key: &SpecKey) -> String {
    let mut spaced = String::with_capacity(key.as_str().len() + 4);
    for (i, c) in key.as_str().chars().enumerate() {
        if c.is_uppercase() && i > 0 {
            spaced.push(' ');
        }
        spaced.push(c);
    }
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
