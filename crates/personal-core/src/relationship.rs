//! Relationship types — user-defined labels such as "spouse" or "sister".

use serde::{Deserialize, Serialize};

use crate::{Result, id::RelationshipTypeId, person::required};

/// A relationship label. Labels are unique, compared case-insensitively by
/// the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipType {
  pub relationship_type_id: RelationshipTypeId,
  pub label:                String,
}

/// Trim a label and reject it if blank.
pub fn normalize_label(label: &str) -> Result<String> {
  required("relationship label", label)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn label_is_trimmed_and_required() {
    assert_eq!(normalize_label("  sister ").unwrap(), "sister");
    assert!(normalize_label("   ").is_err());
  }
}
