//! Integer identifiers assigned by the store on creation.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! row_id {
  ($(#[$meta:meta])* $name:ident) => {
    $(#[$meta])*
    #[derive(
      Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
      Deserialize,
    )]
    #[serde(transparent)]
    pub struct $name(pub i64);

    impl $name {
      pub fn get(self) -> i64 { self.0 }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
      }
    }

    impl From<i64> for $name {
      fn from(value: i64) -> Self { Self(value) }
    }
  };
}

row_id!(
  /// Primary key of a `persona` row.
  PersonId
);
row_id!(PhoneId);
row_id!(EmailId);
row_id!(AddressId);
row_id!(
  /// Primary key of a `codigo_postal` row.
  PostalCodeId
);
row_id!(RelationshipTypeId);
