//! Encoding and decoding helpers between Rust domain types and the column
//! representations stored in SQLite.
//!
//! Dates are stored as `YYYY-MM-DD` text, sex as `Hombre` / `Mujer`, and
//! preferred flags as `0` / `1`. Ids are plain integers.

use chrono::NaiveDate;
use personal_core::{
  contact::{Address, AddressView, Email, Phone},
  id::{
    AddressId, EmailId, PersonId, PhoneId, PostalCodeId, RelationshipTypeId,
  },
  person::{NationalId, Person, Sex},
  postal::PostalCode,
  relationship::RelationshipType,
};

use crate::{Error, Result};

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Sex ─────────────────────────────────────────────────────────────────────

pub fn encode_sex(s: Sex) -> &'static str {
  match s {
    Sex::Male => "Hombre",
    Sex::Female => "Mujer",
  }
}

pub fn decode_sex(s: &str) -> Result<Sex> {
  match s {
    "Hombre" => Ok(Sex::Male),
    "Mujer" => Ok(Sex::Female),
    other => Err(Error::Decode(format!("unknown sex: {other:?}"))),
  }
}

// ─── Preferred flag ──────────────────────────────────────────────────────────

pub fn encode_preferred(p: bool) -> i64 { i64::from(p) }

pub fn decode_preferred(v: i64) -> bool { v != 0 }

/// Rows written by older front ends may hold `''` where we expect `NULL`.
fn blank_to_none(v: Option<String>) -> Option<String> {
  v.filter(|s| !s.trim().is_empty())
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawPerson::from_row`].
pub const PERSON_COLUMNS: &str = "id_, nif, nombre, ap1, ap2, fnac, \
  relacionado_con, tipo_relacion_id, observ, foto, sexo";

/// Raw values read directly from a `persona` row.
pub struct RawPerson {
  pub id:               i64,
  pub nif:              String,
  pub nombre:           String,
  pub ap1:              String,
  pub ap2:              Option<String>,
  pub fnac:             String,
  pub relacionado_con:  Option<i64>,
  pub tipo_relacion_id: Option<i64>,
  pub observ:           Option<String>,
  pub foto:             Option<Vec<u8>>,
  pub sexo:             String,
}

impl RawPerson {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:               row.get(0)?,
      nif:              row.get(1)?,
      nombre:           row.get(2)?,
      ap1:              row.get(3)?,
      ap2:              row.get(4)?,
      fnac:             row.get(5)?,
      relacionado_con:  row.get(6)?,
      tipo_relacion_id: row.get(7)?,
      observ:           row.get(8)?,
      foto:             row.get(9)?,
      sexo:             row.get(10)?,
    })
  }

  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      person_id:         PersonId(self.id),
      national_id:       NationalId::new(self.nif)?,
      given_name:        self.nombre,
      first_surname:     self.ap1,
      second_surname:    blank_to_none(self.ap2),
      birth_date:        decode_date(&self.fnac)?,
      sex:               decode_sex(&self.sexo)?,
      notes:             blank_to_none(self.observ),
      photo:             self.foto.filter(|bytes| !bytes.is_empty()),
      related_to:        self.relacionado_con.map(PersonId),
      relationship_type: self.tipo_relacion_id.map(RelationshipTypeId),
    })
  }
}

/// Raw values from a `telefono` or `mail` row:
/// `id_, persona_id, <value>, preferencia, observ`.
pub struct RawContact {
  pub id:          i64,
  pub persona_id:  i64,
  pub value:       String,
  pub preferencia: i64,
  pub observ:      Option<String>,
}

impl RawContact {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      persona_id:  row.get(1)?,
      value:       row.get(2)?,
      preferencia: row.get(3)?,
      observ:      row.get(4)?,
    })
  }

  pub fn into_phone(self) -> Phone {
    Phone {
      phone_id:  PhoneId(self.id),
      person_id: PersonId(self.persona_id),
      number:    self.value,
      preferred: decode_preferred(self.preferencia),
      notes:     blank_to_none(self.observ),
    }
  }

  pub fn into_email(self) -> Email {
    Email {
      email_id:  EmailId(self.id),
      person_id: PersonId(self.persona_id),
      address:   self.value,
      preferred: decode_preferred(self.preferencia),
      notes:     blank_to_none(self.observ),
    }
  }
}

/// Raw values from `direccion` joined with `codigo_postal`.
pub struct RawAddressView {
  pub id:          i64,
  pub persona_id:  i64,
  pub direccion:   String,
  pub cp_id:       i64,
  pub preferencia: i64,
  pub observ:      Option<String>,
  pub cp:          String,
  pub localidad:   String,
  pub provincia:   String,
}

impl RawAddressView {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      persona_id:  row.get(1)?,
      direccion:   row.get(2)?,
      cp_id:       row.get(3)?,
      preferencia: row.get(4)?,
      observ:      row.get(5)?,
      cp:          row.get(6)?,
      localidad:   row.get(7)?,
      provincia:   row.get(8)?,
    })
  }

  pub fn into_view(self) -> AddressView {
    AddressView {
      address:     Address {
        address_id:     AddressId(self.id),
        person_id:      PersonId(self.persona_id),
        street:         self.direccion,
        postal_code_id: PostalCodeId(self.cp_id),
        preferred:      decode_preferred(self.preferencia),
        notes:          blank_to_none(self.observ),
      },
      postal_code: PostalCode {
        postal_code_id: PostalCodeId(self.cp_id),
        code:           self.cp,
        locality:       self.localidad,
        province:       self.provincia,
      },
    }
  }
}

pub fn postal_code_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PostalCode> {
  Ok(PostalCode {
    postal_code_id: PostalCodeId(row.get(0)?),
    code:           row.get(1)?,
    locality:       row.get(2)?,
    province:       row.get(3)?,
  })
}

pub fn relationship_type_from_row(
  row: &rusqlite::Row<'_>,
) -> rusqlite::Result<RelationshipType> {
  Ok(RelationshipType {
    relationship_type_id: RelationshipTypeId(row.get(0)?),
    label:                row.get(1)?,
  })
}
