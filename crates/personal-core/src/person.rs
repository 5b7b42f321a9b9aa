//! Person — the record every contact method hangs off.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  id::{PersonId, RelationshipTypeId},
};

/// Required length of a national id, in characters.
pub const NATIONAL_ID_LEN: usize = 9;

// ─── National id ─────────────────────────────────────────────────────────────

/// A government identifier, unique per person. Uniqueness is
/// case-insensitive and enforced by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NationalId(String);

impl NationalId {
  pub fn new(value: impl Into<String>) -> Result<Self> {
    let value = value.into().trim().to_owned();
    let len = value.chars().count();
    if len != NATIONAL_ID_LEN {
      return Err(Error::validation(
        "national id",
        format!("expected {NATIONAL_ID_LEN} characters, got {len}"),
      ));
    }
    Ok(Self(value))
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl TryFrom<String> for NationalId {
  type Error = Error;

  fn try_from(value: String) -> Result<Self> { Self::new(value) }
}

impl From<NationalId> for String {
  fn from(value: NationalId) -> Self { value.0 }
}

impl fmt::Display for NationalId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

// ─── Sex ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
  Male,
  Female,
}

impl fmt::Display for Sex {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Male => "male",
      Self::Female => "female",
    })
  }
}

impl FromStr for Sex {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_lowercase().as_str() {
      "male" | "m" | "hombre" => Ok(Self::Male),
      "female" | "f" | "mujer" => Ok(Self::Female),
      other => Err(Error::validation(
        "sex",
        format!("expected male or female, got {other:?}"),
      )),
    }
  }
}

// ─── Person ──────────────────────────────────────────────────────────────────

/// A persisted person.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
  pub person_id:         PersonId,
  pub national_id:       NationalId,
  pub given_name:        String,
  pub first_surname:     String,
  pub second_surname:    Option<String>,
  pub birth_date:        NaiveDate,
  pub sex:               Sex,
  pub notes:             Option<String>,
  /// Raw image bytes. Left out of serialised output.
  #[serde(default, skip_serializing)]
  pub photo:             Option<Vec<u8>>,
  /// Another person this one is related to.
  pub related_to:        Option<PersonId>,
  pub relationship_type: Option<RelationshipTypeId>,
}

impl Person {
  /// "given first-surname second-surname", without dangling spaces.
  pub fn full_name(&self) -> String {
    full_name(&self.given_name, &self.first_surname, self.second_surname.as_deref())
  }

  /// Case-insensitive substring match against [`Person::full_name`].
  pub fn matches(&self, text: &str) -> bool {
    let needle = text.trim().to_lowercase();
    needle.is_empty() || self.full_name().to_lowercase().contains(&needle)
  }
}

fn full_name(given: &str, first: &str, second: Option<&str>) -> String {
  [Some(given), Some(first), second]
    .into_iter()
    .flatten()
    .map(str::trim)
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(" ")
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Input to [`crate::store::PersonalStore::create_person`]. The id is assigned
/// by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPerson {
  pub national_id:    NationalId,
  pub given_name:     String,
  pub first_surname:  String,
  pub second_surname: Option<String>,
  pub birth_date:     NaiveDate,
  pub sex:            Sex,
  pub notes:          Option<String>,
  #[serde(default, skip_serializing)]
  pub photo:          Option<Vec<u8>>,
}

impl NewPerson {
  /// Convenience constructor with the optional fields left empty.
  pub fn new(
    national_id: NationalId,
    given_name: impl Into<String>,
    first_surname: impl Into<String>,
    birth_date: NaiveDate,
    sex: Sex,
  ) -> Self {
    Self {
      national_id,
      given_name: given_name.into(),
      first_surname: first_surname.into(),
      second_surname: None,
      birth_date,
      sex,
      notes: None,
      photo: None,
    }
  }

  /// Trim text fields, fold blank optional text to `None`, and reject blank
  /// mandatory fields.
  pub fn normalized(mut self) -> Result<Self> {
    self.given_name = required("given name", &self.given_name)?;
    self.first_surname = required("first surname", &self.first_surname)?;
    self.second_surname = optional(self.second_surname);
    self.notes = optional(self.notes);
    if self.photo.as_ref().is_some_and(Vec::is_empty) {
      self.photo = None;
    }
    Ok(self)
  }

  pub fn full_name(&self) -> String {
    full_name(&self.given_name, &self.first_surname, self.second_surname.as_deref())
  }
}

/// Input to [`crate::store::PersonalStore::update_person`]. Every field is
/// overwritten, including the relation fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonUpdate {
  #[serde(flatten)]
  pub details:           NewPerson,
  pub related_to:        Option<PersonId>,
  pub relationship_type: Option<RelationshipTypeId>,
}

impl PersonUpdate {
  /// Start from the current state of `person`.
  pub fn from_person(person: Person) -> Self {
    Self {
      related_to:        person.related_to,
      relationship_type: person.relationship_type,
      details:           NewPerson {
        national_id:    person.national_id,
        given_name:     person.given_name,
        first_surname:  person.first_surname,
        second_surname: person.second_surname,
        birth_date:     person.birth_date,
        sex:            person.sex,
        notes:          person.notes,
        photo:          person.photo,
      },
    }
  }

  /// Normalise the details and reject a person related to itself.
  pub fn normalized(mut self, id: PersonId) -> Result<Self> {
    if self.related_to == Some(id) {
      return Err(Error::SelfRelation);
    }
    self.details = self.details.normalized()?;
    Ok(self)
  }
}

// ─── Text helpers ────────────────────────────────────────────────────────────

pub(crate) fn required(field: &'static str, value: &str) -> Result<String> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return Err(Error::validation(field, "must not be empty"));
  }
  Ok(trimmed.to_owned())
}

pub(crate) fn optional(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_owned())
    .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ana() -> NewPerson {
    NewPerson {
      second_surname: Some("López".into()),
      ..NewPerson::new(
        NationalId::new("12345678A").unwrap(),
        "Ana",
        "Gómez",
        NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
        Sex::Female,
      )
    }
  }

  #[test]
  fn national_id_requires_nine_characters() {
    assert!(NationalId::new("12345678A").is_ok());
    assert!(NationalId::new(" 12345678A ").is_ok());
    assert!(matches!(
      NationalId::new("1234A"),
      Err(Error::Validation { field: "national id", .. })
    ));
    // Counted in characters, not bytes.
    assert!(NationalId::new("1234567Ñ8").is_ok());
  }

  #[test]
  fn sex_parses_both_spellings() {
    assert_eq!("male".parse::<Sex>().unwrap(), Sex::Male);
    assert_eq!("Mujer".parse::<Sex>().unwrap(), Sex::Female);
    assert!("x".parse::<Sex>().is_err());
  }

  #[test]
  fn normalized_trims_and_folds_blanks() {
    let mut input = ana();
    input.given_name = "  Ana ".into();
    input.notes = Some("   ".into());
    input.photo = Some(Vec::new());

    let out = input.normalized().unwrap();
    assert_eq!(out.given_name, "Ana");
    assert_eq!(out.notes, None);
    assert_eq!(out.photo, None);
  }

  #[test]
  fn normalized_rejects_blank_surname() {
    let mut input = ana();
    input.first_surname = " ".into();
    assert!(matches!(
      input.normalized(),
      Err(Error::Validation { field: "first surname", .. })
    ));
  }

  #[test]
  fn update_rejects_self_relation() {
    let update = PersonUpdate {
      details:           ana(),
      related_to:        Some(PersonId(4)),
      relationship_type: None,
    };
    assert!(matches!(update.normalized(PersonId(4)), Err(Error::SelfRelation)));
  }

  #[test]
  fn full_name_skips_missing_second_surname() {
    let mut input = ana();
    assert_eq!(input.full_name(), "Ana Gómez López");
    input.second_surname = None;
    assert_eq!(input.full_name(), "Ana Gómez");
  }
}
