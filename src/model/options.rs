//! Picklist options.

use serde::{Deserialize, Serialize};

/// One picklist entry as described by field metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PicklistOption {
    pub value: String,
    pub label: String,
}

impl PicklistOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Ordered value → label mapping for a picklist field.
///
/// Order is the order in which the CRM listed the values. Inserting an existing
/// value replaces its label in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldOptions(Vec<PicklistOption>);

impl FieldOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or relabel a value.
    pub fn insert(&mut self, value: impl Into<String>, label: impl Into<String>) {
        let value = value.into();
        let label = label.into();
        match self.0.iter_mut().find(|option| option.value == value) {
            Some(existing) => existing.label = label,
            None => self.0.push(PicklistOption { value, label }),
        }
    }

    /// Label for a value.
    pub fn get(&self, value: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|option| option.value == value)
            .map(|option| option.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `(value, label)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|option| (option.value.as_str(), option.label.as_str()))
    }

    /// Values in order.
    pub fn values(&self) -> Vec<&str> {
        self.0.iter().map(|option| option.value.as_str()).collect()
    }
}

impl FromIterator<PicklistOption> for FieldOptions {
    fn from_iter<I: IntoIterator<Item = PicklistOption>>(iter: I) -> Self {
        let mut options = FieldOptions::new();
        for option in iter {
            options.insert(option.value, option.label);
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_is_preserved() {
        let options: FieldOptions = vec![
            PicklistOption::new("Teacher", "Teacher"),
            PicklistOption::new("Parent", "Parent / Guardian"),
            PicklistOption::new("Other", "Other"),
        ]
        .into_iter()
        .collect();

        assert_eq!(options.values(), vec!["Teacher", "Parent", "Other"]);
        assert_eq!(options.get("Parent"), Some("Parent / Guardian"));
        assert_eq!(options.get("Student"), None);
    }

    #[test]
    fn test_insert_existing_value_keeps_position() {
        let mut options = FieldOptions::new();
        options.insert("a", "A");
        options.insert("b", "B");
        options.insert("a", "Alpha");

        let pairs: Vec<_> = options.iter().collect();
        assert_eq!(pairs, vec![("a", "Alpha"), ("b", "B")]);
    }
}
