//! Contact methods owned by a person: phone numbers, emails and postal
//! addresses.
//!
//! Each kind carries a preferred flag. At most one row of each kind may be
//! preferred for a given person; the store clears the others whenever one is
//! marked.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
  Result,
  id::{AddressId, EmailId, PersonId, PhoneId, PostalCodeId},
  person::{optional, required},
  postal::PostalCode,
};

/// The three kinds of contact method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactKind {
  Phone,
  Email,
  Address,
}

impl fmt::Display for ContactKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Phone => "phone",
      Self::Email => "email",
      Self::Address => "address",
    })
  }
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Create/update input shared by phones and emails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactInput {
  /// The phone number or email address.
  pub value:     String,
  pub preferred: bool,
  pub notes:     Option<String>,
}

impl ContactInput {
  pub fn new(value: impl Into<String>, preferred: bool) -> Self {
    Self { value: value.into(), preferred, notes: None }
  }

  pub fn normalized(self, kind: ContactKind) -> Result<Self> {
    let field = match kind {
      ContactKind::Phone => "phone number",
      ContactKind::Email => "email",
      ContactKind::Address => "address",
    };
    Ok(Self {
      value:     required(field, &self.value)?,
      preferred: self.preferred,
      notes:     optional(self.notes),
    })
  }
}

/// Create/update input for a postal address. The postal code must already
/// exist; see [`crate::store::PersonalStore::resolve_postal_code`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressInput {
  pub street:         String,
  pub postal_code_id: PostalCodeId,
  pub preferred:      bool,
  pub notes:          Option<String>,
}

impl AddressInput {
  pub fn new(
    street: impl Into<String>,
    postal_code_id: PostalCodeId,
    preferred: bool,
  ) -> Self {
    Self { street: street.into(), postal_code_id, preferred, notes: None }
  }

  pub fn normalized(self) -> Result<Self> {
    Ok(Self {
      street:         required("street", &self.street)?,
      postal_code_id: self.postal_code_id,
      preferred:      self.preferred,
      notes:          optional(self.notes),
    })
  }
}

// ─── Records ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phone {
  pub phone_id:  PhoneId,
  pub person_id: PersonId,
  pub number:    String,
  pub preferred: bool,
  pub notes:     Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
  pub email_id:  EmailId,
  pub person_id: PersonId,
  pub address:   String,
  pub preferred: bool,
  pub notes:     Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
  pub address_id:     AddressId,
  pub person_id:      PersonId,
  pub street:         String,
  pub postal_code_id: PostalCodeId,
  pub preferred:      bool,
  pub notes:          Option<String>,
}

/// An address with its postal code already joined in, so callers never go
/// back to the store for locality or province.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressView {
  #[serde(flatten)]
  pub address:     Address,
  pub postal_code: PostalCode,
}

impl AddressView {
  /// `"<street>, <code> <locality> (<province>)"`
  pub fn formatted(&self) -> String {
    format!(
      "{}, {} {} ({})",
      self.address.street,
      self.postal_code.code,
      self.postal_code.locality,
      self.postal_code.province
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn contact_input_rejects_blank_value() {
    let err = ContactInput::new("  ", true)
      .normalized(ContactKind::Email)
      .unwrap_err();
    assert_eq!(err.to_string(), "invalid email: must not be empty");
  }

  #[test]
  fn blank_value_error_names_the_contact_kind() {
    for (kind, field) in [
      (ContactKind::Phone, "phone number"),
      (ContactKind::Email, "email"),
      (ContactKind::Address, "address"),
    ] {
      let err = ContactInput::new(" ", false).normalized(kind).unwrap_err();
      assert_eq!(err.to_string(), format!("invalid {field}: must not be empty"));
    }
  }

  #[test]
  fn contact_input_folds_blank_notes() {
    let mut input = ContactInput::new(" 600123123 ", false);
    input.notes = Some("\n".into());
    let out = input.normalized(ContactKind::Phone).unwrap();
    assert_eq!(out.value, "600123123");
    assert_eq!(out.notes, None);
  }

  #[test]
  fn address_view_formats_postal_line() {
    let view = AddressView {
      address:     Address {
        address_id:     AddressId(1),
        person_id:      PersonId(1),
        street:         "Calle Mayor 1".into(),
        postal_code_id: PostalCodeId(7),
        preferred:      true,
        notes:          None,
      },
      postal_code: PostalCode {
        postal_code_id: PostalCodeId(7),
        code:           "28001".into(),
        locality:       "Madrid".into(),
        province:       "Madrid".into(),
      },
    };
    assert_eq!(view.formatted(), "Calle Mayor 1, 28001 Madrid (Madrid)");
  }
}
