//! Field-selection expressions for listing pages
//!
//! A small query subset used to project listing pages down to the fields a
//! pipeline actually consumes: dotted field access plus `[]` to flatten a
//! list, e.g. `entries[].key` selects every key on a page.

use serde_json::Value;

use crate::error::{Error, Result};

/// A parsed projection expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    field: String,
    flatten: bool,
}

impl Projection {
    /// Parse an expression of the form `field[.field]...` where any field
    /// may carry a trailing `[]` to flatten the list it selects.
    pub fn parse(expr: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidProjection {
            expr: expr.to_string(),
            reason: reason.to_string(),
        };

        if expr.trim().is_empty() {
            return Err(invalid("expression is empty"));
        }

        let mut steps = Vec::new();
        for part in expr.split('.') {
            let (field, flatten) = match part.strip_suffix("[]") {
                Some(field) => (field, true),
                None => (part, false),
            };

            if field.is_empty() {
                return Err(invalid("empty field segment"));
            }
            if !field
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
            {
                return Err(invalid("field segments must be alphanumeric"));
            }

            steps.push(Step {
                field: field.to_string(),
                flatten,
            });
        }

        Ok(Self { steps })
    }

    /// Apply the projection to one page value, yielding the selected values.
    ///
    /// A missing field yields nothing; a final list is flattened into its
    /// elements, matching the per-item iteration of the original search.
    pub fn apply(&self, page: &Value) -> Vec<Value> {
        let mut current = vec![page.clone()];

        for step in &self.steps {
            let mut next = Vec::new();
            for value in current {
                let Some(selected) = value.get(&step.field) else {
                    continue;
                };
                if step.flatten {
                    if let Value::Array(items) = selected {
                        next.extend(items.iter().cloned());
                    }
                } else {
                    next.push(selected.clone());
                }
            }
            current = next;
        }

        // A trailing list selection iterates its elements
        current
            .into_iter()
            .flat_map(|v| match v {
                Value::Array(items) => items,
                Value::Null => Vec::new(),
                other => vec![other],
            })
            .collect()
    }
}

impl std::str::FromStr for Projection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
