//! Postal codes — a shared lookup many addresses point at.

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  id::PostalCodeId,
  person::required,
};

/// Required length of a postal code, in characters.
pub const POSTAL_CODE_LEN: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalCode {
  pub postal_code_id: PostalCodeId,
  pub code:           String,
  pub locality:       String,
  pub province:       String,
}

/// Input to create or overwrite a postal code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPostalCode {
  pub code:     String,
  pub locality: String,
  pub province: String,
}

impl NewPostalCode {
  pub fn new(
    code: impl Into<String>,
    locality: impl Into<String>,
    province: impl Into<String>,
  ) -> Self {
    Self {
      code:     code.into(),
      locality: locality.into(),
      province: province.into(),
    }
  }

  pub fn normalized(self) -> Result<Self> {
    let code = self.code.trim().to_owned();
    let len = code.chars().count();
    if len != POSTAL_CODE_LEN {
      return Err(Error::validation(
        "postal code",
        format!("expected {POSTAL_CODE_LEN} characters, got {len}"),
      ));
    }
    Ok(Self {
      code,
      locality: required("locality", &self.locality)?,
      province: required("province", &self.province)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn code_must_be_five_characters() {
    assert!(NewPostalCode::new("28001", "Madrid", "Madrid").normalized().is_ok());
    assert!(NewPostalCode::new("2800", "Madrid", "Madrid").normalized().is_err());
    assert!(NewPostalCode::new("280011", "Madrid", "Madrid").normalized().is_err());
  }

  #[test]
  fn locality_and_province_are_required() {
    let err = NewPostalCode::new("28001", "", "Madrid").normalized().unwrap_err();
    assert!(matches!(err, Error::Validation { field: "locality", .. }));
  }
}
