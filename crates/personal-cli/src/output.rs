//! Printing command results as plain text or JSON.

use anyhow::Context as _;
use personal_core::{
  contact::{AddressView, Email, Phone},
  person::Person,
  postal::PostalCode,
  relationship::RelationshipType,
};
use serde::Serialize;

pub struct Output {
  json: bool,
}

impl Output {
  pub fn new(json: bool) -> Self { Self { json } }

  /// Print `value` as pretty JSON, or as the text `render` produces.
  pub fn emit<T: Serialize + ?Sized>(
    &self,
    value: &T,
    render: impl FnOnce(&T) -> String,
  ) -> anyhow::Result<()> {
    if self.json {
      let json = serde_json::to_string_pretty(value).context("serialising output")?;
      println!("{json}");
    } else {
      println!("{}", render(value));
    }
    Ok(())
  }

  /// Print one line per item, or `(none)`.
  pub fn list<T: Serialize>(
    &self,
    items: &[T],
    line: impl Fn(&T) -> String,
  ) -> anyhow::Result<()> {
    self.emit(items, |items| {
      if items.is_empty() {
        "(none)".to_owned()
      } else {
        items.iter().map(&line).collect::<Vec<_>>().join("\n")
      }
    })
  }

  pub fn created(&self, entity: &str, id: i64) -> anyhow::Result<()> {
    self.emit(&serde_json::json!({ "entity": entity, "id": id }), |_| {
      format!("created {entity} {id}")
    })
  }

  pub fn updated(&self, entity: &str, id: i64) -> anyhow::Result<()> {
    self.emit(&serde_json::json!({ "entity": entity, "id": id }), |_| {
      format!("updated {entity} {id}")
    })
  }

  pub fn deleted(&self, entity: &str, id: i64) -> anyhow::Result<()> {
    self.emit(
      &serde_json::json!({ "entity": entity, "id": id, "deleted": true }),
      |_| format!("deleted {entity} {id}"),
    )
  }
}

// ─── Text lines ──────────────────────────────────────────────────────────────

fn star(preferred: bool) -> &'static str { if preferred { "*" } else { " " } }

fn notes_suffix(notes: Option<&str>) -> String {
  notes.map(|n| format!(" ({n})")).unwrap_or_default()
}

pub fn person_line(p: &Person) -> String {
  format!(
    "{:>5}  {}  {}  {}",
    p.person_id,
    p.national_id,
    p.birth_date.format("%d/%m/%Y"),
    p.full_name()
  )
}

pub fn phone_line(p: &Phone) -> String {
  format!(
    "{:>5} {} {}{}",
    p.phone_id,
    star(p.preferred),
    p.number,
    notes_suffix(p.notes.as_deref())
  )
}

pub fn email_line(e: &Email) -> String {
  format!(
    "{:>5} {} {}{}",
    e.email_id,
    star(e.preferred),
    e.address,
    notes_suffix(e.notes.as_deref())
  )
}

pub fn address_line(a: &AddressView) -> String {
  format!(
    "{:>5} {} {}{}",
    a.address.address_id,
    star(a.address.preferred),
    a.formatted(),
    notes_suffix(a.address.notes.as_deref())
  )
}

pub fn postal_code_line(pc: &PostalCode) -> String {
  format!(
    "{:>5}  {}  {} ({})",
    pc.postal_code_id, pc.code, pc.locality, pc.province
  )
}

pub fn relationship_line(r: &RelationshipType) -> String {
  format!("{:>5}  {}", r.relationship_type_id, r.label)
}

/// Multi-line view of one person and their contact methods.
pub fn person_card(
  person: &Person,
  phones: &[Phone],
  emails: &[Email],
  addresses: &[AddressView],
) -> String {
  let mut lines = vec![
    format!("{} [{}]", person.full_name(), person.person_id),
    format!("  national id: {}", person.national_id),
    format!("  born:        {}", person.birth_date.format("%d/%m/%Y")),
    format!("  sex:         {}", person.sex),
  ];
  if let Some(notes) = &person.notes {
    lines.push(format!("  notes:       {notes}"));
  }
  if let Some(other) = person.related_to {
    let kind = person
      .relationship_type
      .map(|k| format!(" (type {k})"))
      .unwrap_or_default();
    lines.push(format!("  related to:  person {other}{kind}"));
  }
  if let Some(photo) = &person.photo {
    lines.push(format!("  photo:       {} bytes", photo.len()));
  }

  let sections: [(&str, Vec<String>); 3] = [
    ("phones", phones.iter().map(phone_line).collect()),
    ("emails", emails.iter().map(email_line).collect()),
    ("addresses", addresses.iter().map(address_line).collect()),
  ];
  for (title, rows) in sections {
    if !rows.is_empty() {
      lines.push(format!("{title}:"));
      lines.extend(rows);
    }
  }
  lines.join("\n")
}
