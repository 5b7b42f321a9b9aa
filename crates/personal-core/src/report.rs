//! Person report — the flat field snapshot handed to a document renderer.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  contact::{AddressView, Email, Phone},
  id::PersonId,
  person::{Person, Sex},
  relationship::RelationshipType,
  store::PersonalStore,
};

pub const REPORT_TITLE: &str = "Personal report";

/// Everything printed for one person. Contact fields hold the preferred
/// method of each kind, or an empty string when none is preferred.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonReport {
  pub name:          String,
  pub national_id:   String,
  /// `dd/mm/yyyy`
  pub birth_date:    String,
  pub sex:           String,
  pub notes:         String,
  /// `"<name> (<relationship>)"`, or empty when unrelated.
  pub relationship:  String,
  pub address:       String,
  pub address_notes: String,
  pub email:         String,
  pub email_notes:   String,
  pub phone:         String,
  pub phone_notes:   String,
  #[serde(default, skip_serializing)]
  pub photo:         Option<Vec<u8>>,
}

impl PersonReport {
  pub fn build(
    person: &Person,
    addresses: &[AddressView],
    emails: &[Email],
    phones: &[Phone],
  ) -> Self {
    let mut report = Self {
      name: person.full_name(),
      national_id: person.national_id.to_string(),
      birth_date: person.birth_date.format("%d/%m/%Y").to_string(),
      sex: match person.sex {
        Sex::Male => "Male".into(),
        Sex::Female => "Female".into(),
      },
      notes: person.notes.clone().unwrap_or_default(),
      photo: person.photo.clone(),
      ..Self::default()
    };

    if let Some(view) = addresses.iter().find(|a| a.address.preferred) {
      report.address = view.formatted();
      report.address_notes = view.address.notes.clone().unwrap_or_default();
    }
    if let Some(email) = emails.iter().find(|e| e.preferred) {
      report.email = email.address.clone();
      report.email_notes = email.notes.clone().unwrap_or_default();
    }
    if let Some(phone) = phones.iter().find(|p| p.preferred) {
      report.phone = phone.number.clone();
      report.phone_notes = phone.notes.clone().unwrap_or_default();
    }

    report
  }

  /// Fill in the relationship summary from the related person and the
  /// relationship type, either of which may be missing.
  pub fn with_relationship(
    mut self,
    related: Option<&Person>,
    kind: Option<&RelationshipType>,
  ) -> Self {
    self.relationship = match (related, kind) {
      (Some(p), Some(k)) => format!("{} ({})", p.full_name(), k.label),
      (Some(p), None) => p.full_name(),
      (None, Some(k)) => k.label.clone(),
      (None, None) => String::new(),
    };
    self
  }

  /// Gather the snapshot for `id` from `store`. Returns `None` if the person
  /// does not exist.
  pub async fn load<S: PersonalStore>(store: &S, id: PersonId) -> Result<Option<Self>> {
    let Some(person) = store.get_person(id).await.map_err(Error::store)? else {
      return Ok(None);
    };
    let addresses = store.list_addresses(id).await.map_err(Error::store)?;
    let emails = store.list_emails(id).await.map_err(Error::store)?;
    let phones = store.list_phones(id).await.map_err(Error::store)?;

    let related = match person.related_to {
      Some(other) => store.get_person(other).await.map_err(Error::store)?,
      None => None,
    };
    let kind = match person.relationship_type {
      Some(kind) => store.get_relationship_type(kind).await.map_err(Error::store)?,
      None => None,
    };

    Ok(Some(
      Self::build(&person, &addresses, &emails, &phones)
        .with_relationship(related.as_ref(), kind.as_ref()),
    ))
  }

  /// Render the report as a plain-text document.
  pub fn render_text(&self) -> String {
    let mut out = String::new();
    let rule = "=".repeat(REPORT_TITLE.len());
    let _ = writeln!(out, "{REPORT_TITLE}\n{rule}\n");

    let _ = writeln!(out, "Name:          {}", self.name);
    let _ = writeln!(out, "National id:   {}\n", self.national_id);
    let _ = writeln!(out, "Sex:           {}", self.sex);
    let _ = writeln!(out, "Date of birth: {}", self.birth_date);
    let _ = writeln!(out, "Notes:         {}", self.notes);
    let _ = writeln!(out, "Related to:    {}\n", self.relationship);
    let _ = writeln!(out, "Address:       {}", with_notes(&self.address, &self.address_notes));
    let _ = writeln!(out, "Email:         {}", with_notes(&self.email, &self.email_notes));
    let _ = writeln!(out, "Phone:         {}", with_notes(&self.phone, &self.phone_notes));
    if let Some(photo) = &self.photo {
      let _ = writeln!(out, "\nPhoto:         attached ({} bytes)", photo.len());
    }
    out
  }
}

fn with_notes(value: &str, notes: &str) -> String {
  if notes.is_empty() {
    value.to_owned()
  } else {
    format!("{value} ({notes})")
  }
}
