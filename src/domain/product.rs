use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Key of an order line. Matches the id of the catalog template the line was
/// built from at the time the order was created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductKey(String);

impl ProductKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProductKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl fmt::Display for ProductKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier-like name of a customization field, e.g. `baseColor`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpecKey(String);

impl SpecKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SpecKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl fmt::Display for SpecKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecValue {
    pub field: SpecKey,
    pub value: String,
}

/// Spec values of one line, in the order of the template's spec list.
///
/// The key set is fixed when the line is built; later edits only replace
/// values of fields that already exist.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpecValues(Vec<SpecValue>);

impl SpecValues {
    /// One empty value per field, in the given order. Duplicate fields are kept once.
    pub fn blank<'a>(fields: impl IntoIterator<Item = &'a SpecKey>) -> Self {
        let mut values = Self::default();
        for field in fields {
            if !values.contains(field) {
                values.0.push(SpecValue { field: field.clone(), value: String::new() });
            }
        }
        values
    }

    pub fn get(&self, field: &SpecKey) -> Option<&str> {
        self.0.iter().find(|v| &v.field == field).map(|v| v.value.as_str())
    }

    pub fn contains(&self, field: &SpecKey) -> bool {
        self.0.iter().any(|v| &v.field == field)
    }

    /// Replaces the value of an existing field. Returns false for unknown fields.
    pub fn set(&mut self, field: &SpecKey, value: impl Into<String>) -> bool {
        match self.0.iter_mut().find(|v| &v.field == field) {
            Some(entry) => {
                entry.value = value.into();
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SpecKey, &str)> {
        self.0.iter().map(|v| (&v.field, v.value.as_str()))
    }

    pub fn fields(&self) -> impl Iterator<Item = &SpecKey> {
        self.0.iter().map(|v| &v.field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(SpecKey, String)> for SpecValues {
    fn from_iter<I: IntoIterator<Item = (SpecKey, String)>>(iter: I) -> Self {
        let mut values = Self::default();
        for (field, value) in iter {
            if !values.set(&field, value.clone()) {
                values.0.push(SpecValue { field, value });
            }
        }
        values
    }
}

/// One line of an order.
///
/// Unselected lines are kept so they can be toggled back on without
/// re-entering their specs, but they never count towards totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductLine {
    pub name: String,
    pub quantity: u32,
    pub selected: bool,
    #[serde(default)]
    pub specs: SpecValues,
}

impl ProductLine {
    pub fn blank<'a>(name: impl Into<String>, fields: impl IntoIterator<Item = &'a SpecKey>) -> Self {
        Self {
            name: name.into(),
            quantity: 0,
            selected: false,
            specs: SpecValues::blank(fields),
        }
    }

    pub fn set_quantity_input(&mut self, input: &str) {
        self.quantity = coerce_quantity(input);
    }
}

pub type Products = BTreeMap<ProductKey, ProductLine>;

/// Parses operator input the way a numeric form field does: leading digits
/// are taken, anything else (including negatives) becomes 0.
pub fn coerce_quantity(input: &str) -> u32 {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(digits.len(), |(i, _)| i);
    if end == 0 {
        return 0;
    }
    digits[..end].parse::<u64>().map_or(u32::MAX, |n| u32::try_from(n).unwrap_or(u32::MAX))
}
