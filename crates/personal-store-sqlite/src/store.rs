//! [`SqliteStore`] — the SQLite implementation of [`PersonalStore`].

use std::{path::Path, time::Duration};

use rusqlite::{OptionalExtension as _, TransactionBehavior};

use personal_core::{
  contact::{AddressInput, AddressView, ContactInput, ContactKind, Email, Phone},
  id::{
    AddressId, EmailId, PersonId, PhoneId, PostalCodeId, RelationshipTypeId,
  },
  person::{NewPerson, Person, PersonUpdate},
  postal::{NewPostalCode, PostalCode},
  relationship::{RelationshipType, normalize_label},
  store::PersonalStore,
};

use crate::{
  Error, Result,
  encode::{
    PERSON_COLUMNS, RawAddressView, RawContact, RawPerson, encode_date,
    encode_preferred, encode_sex, postal_code_from_row,
    relationship_type_from_row,
  },
  schema::{
    CLEAR_DANGLING_RELATIONS, CLEAR_DANGLING_RELATIONSHIP_TYPES, SCHEMA,
    SCHEMA_VERSION, contact_table, contact_value_column,
  },
};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

// ─── Store ───────────────────────────────────────────────────────────────────

/// A personal records store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    let repaired = self
      .conn
      .call(|conn| {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        let version: i64 =
          conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
        conn.execute_batch(SCHEMA)?;
        if version >= SCHEMA_VERSION {
          return Ok(0);
        }

        let tx = conn.transaction()?;
        let repaired = tx.execute(CLEAR_DANGLING_RELATIONS, [])?
          + tx.execute(CLEAR_DANGLING_RELATIONSHIP_TYPES, [])?;
        tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        tx.commit()?;
        Ok(repaired)
      })
      .await?;

    if repaired > 0 {
      tracing::info!(repaired, "cleared references to deleted rows");
    }
    Ok(())
  }

  // ── Shared row helpers ──────────────────────────────────────────────────

  /// Delete one row by id; `NotFound` if nothing was deleted.
  async fn delete_row(
    &self,
    table: &'static str,
    entity: &'static str,
    id: i64,
  ) -> Result<()> {
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          &format!("DELETE FROM {table} WHERE id_ = ?1"),
          rusqlite::params![id],
        )?)
      })
      .await?;

    if deleted == 0 {
      return Err(Error::NotFound { entity, id });
    }
    Ok(())
  }

  // ── Contact-method helpers (phones and emails) ──────────────────────────

  async fn add_contact(
    &self,
    kind: ContactKind,
    person_id: PersonId,
    input: ContactInput,
  ) -> Result<i64> {
    let input = input.normalized(kind)?;
    let person = person_id.get();
    let sql = format!(
      "INSERT INTO {} (persona_id, {}, preferencia, observ) VALUES (?1, ?2, ?3, ?4)",
      contact_table(kind),
      contact_value_column(kind),
    );

    let id = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          &sql,
          rusqlite::params![
            person,
            input.value,
            encode_preferred(input.preferred),
            input.notes,
          ],
        )?;
        let id = tx.last_insert_rowid();
        if input.preferred {
          clear_other_preferred(&tx, kind, person, id)?;
        }
        tx.commit()?;
        Ok(id)
      })
      .await?;

    Ok(id)
  }

  async fn update_contact(
    &self,
    kind: ContactKind,
    id: i64,
    input: ContactInput,
  ) -> Result<i64> {
    let input = input.normalized(kind)?;
    let sql = format!(
      "UPDATE {} SET {} = ?1, preferencia = ?2, observ = ?3 WHERE id_ = ?4",
      contact_table(kind),
      contact_value_column(kind),
    );

    let found = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          &sql,
          rusqlite::params![
            input.value,
            encode_preferred(input.preferred),
            input.notes,
            id,
          ],
        )?;
        if changed == 0 {
          return Ok(false);
        }
        if input.preferred {
          let person = owner_of(&tx, kind, id)?;
          clear_other_preferred(&tx, kind, person, id)?;
        }
        tx.commit()?;
        Ok(true)
      })
      .await?;

    if !found {
      return Err(Error::NotFound { entity: entity_name(kind), id });
    }
    Ok(id)
  }

  /// Flag `id` as preferred and clear every sibling in one statement.
  async fn set_preferred(&self, kind: ContactKind, id: i64) -> Result<()> {
    let table = contact_table(kind);
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          &format!(
            "UPDATE {table} SET preferencia = (id_ = ?1)
             WHERE persona_id = (SELECT persona_id FROM {table} WHERE id_ = ?1)"
          ),
          rusqlite::params![id],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::NotFound { entity: entity_name(kind), id });
    }
    Ok(())
  }

  async fn list_contacts(
    &self,
    kind: ContactKind,
    person_id: PersonId,
  ) -> Result<Vec<RawContact>> {
    let person = person_id.get();
    let sql = format!(
      "SELECT id_, persona_id, {}, preferencia, observ FROM {}
       WHERE persona_id = ?1 ORDER BY id_",
      contact_value_column(kind),
      contact_table(kind),
    );

    let raws = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![person], RawContact::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(raws)
  }

  // ── Addresses ───────────────────────────────────────────────────────────

  async fn insert_address(&self, person_id: PersonId, input: AddressInput) -> Result<i64> {
    let input = input.normalized()?;
    let person = person_id.get();

    let id = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO direccion (persona_id, direccion, cp_id, preferencia, observ)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![
            person,
            input.street,
            input.postal_code_id.get(),
            encode_preferred(input.preferred),
            input.notes,
          ],
        )?;
        let id = tx.last_insert_rowid();
        if input.preferred {
          clear_other_preferred(&tx, ContactKind::Address, person, id)?;
        }
        tx.commit()?;
        Ok(id)
      })
      .await?;

    Ok(id)
  }

  async fn overwrite_address(&self, id: i64, input: AddressInput) -> Result<i64> {
    let input = input.normalized()?;

    let found = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          "UPDATE direccion
           SET direccion = ?1, cp_id = ?2, preferencia = ?3, observ = ?4
           WHERE id_ = ?5",
          rusqlite::params![
            input.street,
            input.postal_code_id.get(),
            encode_preferred(input.preferred),
            input.notes,
            id,
          ],
        )?;
        if changed == 0 {
          return Ok(false);
        }
        if input.preferred {
          let person = owner_of(&tx, ContactKind::Address, id)?;
          clear_other_preferred(&tx, ContactKind::Address, person, id)?;
        }
        tx.commit()?;
        Ok(true)
      })
      .await?;

    if !found {
      return Err(Error::NotFound { entity: "address", id });
    }
    Ok(id)
  }

  // ── People ──────────────────────────────────────────────────────────────

  async fn select_people(&self) -> Result<Vec<Person>> {
    let raws: Vec<RawPerson> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {PERSON_COLUMNS} FROM persona ORDER BY id_"))?;
        let rows = stmt
          .query_map([], RawPerson::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }
}

/// Clear the preferred flag on every row of `kind` owned by `person_id`
/// except `keep_id`.
fn clear_other_preferred(
  conn: &rusqlite::Connection,
  kind: ContactKind,
  person_id: i64,
  keep_id: i64,
) -> rusqlite::Result<usize> {
  conn.execute(
    &format!(
      "UPDATE {} SET preferencia = 0
       WHERE persona_id = ?1 AND id_ != ?2 AND preferencia != 0",
      contact_table(kind)
    ),
    rusqlite::params![person_id, keep_id],
  )
}

fn owner_of(conn: &rusqlite::Connection, kind: ContactKind, id: i64) -> rusqlite::Result<i64> {
  conn.query_row(
    &format!("SELECT persona_id FROM {} WHERE id_ = ?1", contact_table(kind)),
    rusqlite::params![id],
    |row| row.get(0),
  )
}

fn entity_name(kind: ContactKind) -> &'static str {
  match kind {
    ContactKind::Phone => "phone",
    ContactKind::Email => "email",
    ContactKind::Address => "address",
  }
}

/// Log a failed store operation and pass the result through.
fn checked<T>(op: &'static str, result: Result<T>) -> Result<T> {
  if let Err(e) = &result {
    tracing::warn!(op, error = %e, "store operation failed");
  }
  result
}

/// [`checked`], plus a debug event for a successful write.
fn observe<T>(op: &'static str, result: Result<T>) -> Result<T> {
  let result = checked(op, result);
  if result.is_ok() {
    tracing::debug!(op, "store operation succeeded");
  }
  result
}

// ─── PersonalStore impl ──────────────────────────────────────────────────────

impl PersonalStore for SqliteStore {
  type Error = Error;

  // ── Relationship types ────────────────────────────────────────────────────

  async fn create_relationship_type(&self, label: String) -> Result<RelationshipTypeId> {
    let result: Result<_> = async {
      let label = normalize_label(&label)?;
      let id = self
        .conn
        .call(move |conn| {
          conn.execute(
            "INSERT INTO tipo_relacion (relacion) VALUES (?1)",
            rusqlite::params![label],
          )?;
          Ok(conn.last_insert_rowid())
        })
        .await?;
      Ok(RelationshipTypeId(id))
    }
    .await;
    observe("create_relationship_type", result)
  }

  async fn update_relationship_type(
    &self,
    id: RelationshipTypeId,
    label: String,
  ) -> Result<RelationshipTypeId> {
    let result: Result<_> = async {
      let label = normalize_label(&label)?;
      let raw = id.get();
      let changed = self
        .conn
        .call(move |conn| {
          Ok(conn.execute(
            "UPDATE tipo_relacion SET relacion = ?1 WHERE id_ = ?2",
            rusqlite::params![label, raw],
          )?)
        })
        .await?;
      if changed == 0 {
        return Err(Error::NotFound { entity: "relationship type", id: raw });
      }
      Ok(id)
    }
    .await;
    observe("update_relationship_type", result)
  }

  async fn delete_relationship_type(&self, id: RelationshipTypeId) -> Result<()> {
    let raw = id.get();
    let result: Result<_> = async {
      let found = self
        .conn
        .call(move |conn| {
          let tx = conn.transaction()?;
          // Older files were created without ON DELETE SET NULL.
          tx.execute(
            "UPDATE persona SET tipo_relacion_id = NULL WHERE tipo_relacion_id = ?1",
            rusqlite::params![raw],
          )?;
          let deleted = tx.execute(
            "DELETE FROM tipo_relacion WHERE id_ = ?1",
            rusqlite::params![raw],
          )?;
          if deleted == 0 {
            return Ok(false);
          }
          tx.commit()?;
          Ok(true)
        })
        .await?;
      if !found {
        return Err(Error::NotFound { entity: "relationship type", id: raw });
      }
      Ok(())
    }
    .await;
    observe("delete_relationship_type", result)
  }

  async fn get_relationship_type(
    &self,
    id: RelationshipTypeId,
  ) -> Result<Option<RelationshipType>> {
    let raw = id.get();
    let found = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT id_, relacion FROM tipo_relacion WHERE id_ = ?1",
            rusqlite::params![raw],
            relationship_type_from_row,
          )
          .optional()?)
      })
      .await;
    checked("get_relationship_type", found.map_err(Error::from))
  }

  async fn list_relationship_types(&self) -> Result<Vec<RelationshipType>> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT id_, relacion FROM tipo_relacion ORDER BY id_")?;
        let rows = stmt
          .query_map([], relationship_type_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await;
    checked("list_relationship_types", rows.map_err(Error::from))
  }

  // ── Phones ────────────────────────────────────────────────────────────────

  async fn add_phone(&self, person_id: PersonId, input: ContactInput) -> Result<PhoneId> {
    observe(
      "add_phone",
      self.add_contact(ContactKind::Phone, person_id, input).await.map(PhoneId),
    )
  }

  async fn update_phone(&self, id: PhoneId, input: ContactInput) -> Result<PhoneId> {
    observe(
      "update_phone",
      self.update_contact(ContactKind::Phone, id.get(), input).await.map(PhoneId),
    )
  }

  async fn delete_phone(&self, id: PhoneId) -> Result<()> {
    observe(
      "delete_phone",
      self.delete_row("telefono", "phone", id.get()).await,
    )
  }

  async fn set_preferred_phone(&self, id: PhoneId) -> Result<()> {
    observe(
      "set_preferred_phone",
      self.set_preferred(ContactKind::Phone, id.get()).await,
    )
  }

  async fn list_phones(&self, person_id: PersonId) -> Result<Vec<Phone>> {
    let raws = self.list_contacts(ContactKind::Phone, person_id).await;
    checked("list_phones", raws.map(|raws| raws.into_iter().map(RawContact::into_phone).collect()))
  }

  // ── Emails ────────────────────────────────────────────────────────────────

  async fn add_email(&self, person_id: PersonId, input: ContactInput) -> Result<EmailId> {
    observe(
      "add_email",
      self.add_contact(ContactKind::Email, person_id, input).await.map(EmailId),
    )
  }

  async fn update_email(&self, id: EmailId, input: ContactInput) -> Result<EmailId> {
    observe(
      "update_email",
      self.update_contact(ContactKind::Email, id.get(), input).await.map(EmailId),
    )
  }

  async fn delete_email(&self, id: EmailId) -> Result<()> {
    observe("delete_email", self.delete_row("mail", "email", id.get()).await)
  }

  async fn set_preferred_email(&self, id: EmailId) -> Result<()> {
    observe(
      "set_preferred_email",
      self.set_preferred(ContactKind::Email, id.get()).await,
    )
  }

  async fn list_emails(&self, person_id: PersonId) -> Result<Vec<Email>> {
    let raws = self.list_contacts(ContactKind::Email, person_id).await;
    checked("list_emails", raws.map(|raws| raws.into_iter().map(RawContact::into_email).collect()))
  }

  // ── Addresses ─────────────────────────────────────────────────────────────

  async fn add_address(&self, person_id: PersonId, input: AddressInput) -> Result<AddressId> {
    observe(
      "add_address",
      self.insert_address(person_id, input).await.map(AddressId),
    )
  }

  async fn update_address(&self, id: AddressId, input: AddressInput) -> Result<AddressId> {
    observe(
      "update_address",
      self.overwrite_address(id.get(), input).await.map(AddressId),
    )
  }

  async fn delete_address(&self, id: AddressId) -> Result<()> {
    observe(
      "delete_address",
      self.delete_row("direccion", "address", id.get()).await,
    )
  }

  async fn set_preferred_address(&self, id: AddressId) -> Result<()> {
    observe(
      "set_preferred_address",
      self.set_preferred(ContactKind::Address, id.get()).await,
    )
  }

  async fn list_addresses(&self, person_id: PersonId) -> Result<Vec<AddressView>> {
    let person = person_id.get();
    let raws = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT
             d.id_, d.persona_id, d.direccion, d.cp_id, d.preferencia, d.observ,
             c.cp, c.localidad, c.provincia
           FROM direccion d
           JOIN codigo_postal c ON c.id_ = d.cp_id
           WHERE d.persona_id = ?1
           ORDER BY d.id_",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![person], RawAddressView::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(Error::from)
      .map(|raws: Vec<RawAddressView>| raws.into_iter().map(RawAddressView::into_view).collect());
    checked("list_addresses", raws)
  }

  // ── Postal codes ──────────────────────────────────────────────────────────

  async fn create_postal_code(&self, input: NewPostalCode) -> Result<PostalCodeId> {
    let result: Result<_> = async {
      let input = input.normalized()?;
      let id = self
        .conn
        .call(move |conn| {
          conn.execute(
            "INSERT INTO codigo_postal (cp, localidad, provincia) VALUES (?1, ?2, ?3)",
            rusqlite::params![input.code, input.locality, input.province],
          )?;
          Ok(conn.last_insert_rowid())
        })
        .await?;
      Ok(PostalCodeId(id))
    }
    .await;
    observe("create_postal_code", result)
  }

  async fn update_postal_code(
    &self,
    id: PostalCodeId,
    input: NewPostalCode,
  ) -> Result<PostalCodeId> {
    let result: Result<_> = async {
      let input = input.normalized()?;
      let raw = id.get();
      let changed = self
        .conn
        .call(move |conn| {
          Ok(conn.execute(
            "UPDATE codigo_postal SET cp = ?1, localidad = ?2, provincia = ?3
             WHERE id_ = ?4",
            rusqlite::params![input.code, input.locality, input.province, raw],
          )?)
        })
        .await?;
      if changed == 0 {
        return Err(Error::NotFound { entity: "postal code", id: raw });
      }
      Ok(id)
    }
    .await;
    observe("update_postal_code", result)
  }

  async fn delete_postal_code(&self, id: PostalCodeId) -> Result<()> {
    observe(
      "delete_postal_code",
      self.delete_row("codigo_postal", "postal code", id.get()).await,
    )
  }

  async fn get_postal_code(&self, id: PostalCodeId) -> Result<Option<PostalCode>> {
    let raw = id.get();
    let found = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT id_, cp, localidad, provincia FROM codigo_postal WHERE id_ = ?1",
            rusqlite::params![raw],
            postal_code_from_row,
          )
          .optional()?)
      })
      .await;
    checked("get_postal_code", found.map_err(Error::from))
  }

  async fn find_postal_code(&self, code: String) -> Result<Option<PostalCode>> {
    let code = code.trim().to_owned();
    let found = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT id_, cp, localidad, provincia FROM codigo_postal WHERE cp = ?1",
            rusqlite::params![code],
            postal_code_from_row,
          )
          .optional()?)
      })
      .await;
    checked("find_postal_code", found.map_err(Error::from))
  }

  async fn list_postal_codes(&self) -> Result<Vec<PostalCode>> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare("SELECT id_, cp, localidad, provincia FROM codigo_postal ORDER BY cp")?;
        let rows = stmt
          .query_map([], postal_code_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await;
    checked("list_postal_codes", rows.map_err(Error::from))
  }

  async fn resolve_postal_code(&self, input: NewPostalCode) -> Result<PostalCodeId> {
    let result: Result<_> = async {
      let input = input.normalized()?;
      let id = self
        .conn
        .call(move |conn| {
          // Take the write lock before the lookup.
          let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
          let existing: Option<i64> = tx
            .query_row(
              "SELECT id_ FROM codigo_postal WHERE cp = ?1",
              rusqlite::params![input.code],
              |row| row.get(0),
            )
            .optional()?;
          let id = match existing {
            Some(id) => id,
            None => {
              tx.execute(
                "INSERT INTO codigo_postal (cp, localidad, provincia) VALUES (?1, ?2, ?3)",
                rusqlite::params![input.code, input.locality, input.province],
              )?;
              tx.last_insert_rowid()
            }
          };
          tx.commit()?;
          Ok(id)
        })
        .await?;
      Ok(PostalCodeId(id))
    }
    .await;
    observe("resolve_postal_code", result)
  }

  // ── People ────────────────────────────────────────────────────────────────

  async fn create_person(&self, input: NewPerson) -> Result<PersonId> {
    let result: Result<_> = async {
      let input = input.normalized()?;
      let nif = input.national_id.to_string();
      let fnac = encode_date(input.birth_date);
      let sexo = encode_sex(input.sex);

      let id = self
        .conn
        .call(move |conn| {
          conn.execute(
            "INSERT INTO persona (nif, nombre, ap1, ap2, fnac, observ, foto, sexo)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
              nif,
              input.given_name,
              input.first_surname,
              input.second_surname,
              fnac,
              input.notes,
              input.photo,
              sexo,
            ],
          )?;
          Ok(conn.last_insert_rowid())
        })
        .await?;
      Ok(PersonId(id))
    }
    .await;
    observe("create_person", result)
  }

  async fn update_person(&self, id: PersonId, input: PersonUpdate) -> Result<PersonId> {
    let result: Result<_> = async {
      let input = input.normalized(id)?;
      let raw = id.get();
      let details = input.details;
      let nif = details.national_id.to_string();
      let fnac = encode_date(details.birth_date);
      let sexo = encode_sex(details.sex);
      let related_to = input.related_to.map(PersonId::get);
      let relationship_type = input.relationship_type.map(RelationshipTypeId::get);

      let changed = self
        .conn
        .call(move |conn| {
          Ok(conn.execute(
            "UPDATE persona
             SET nif = ?1, nombre = ?2, ap1 = ?3, ap2 = ?4, fnac = ?5,
                 observ = ?6, foto = ?7, sexo = ?8,
                 relacionado_con = ?9, tipo_relacion_id = ?10
             WHERE id_ = ?11",
            rusqlite::params![
              nif,
              details.given_name,
              details.first_surname,
              details.second_surname,
              fnac,
              details.notes,
              details.photo,
              sexo,
              related_to,
              relationship_type,
              raw,
            ],
          )?)
        })
        .await?;
      if changed == 0 {
        return Err(Error::NotFound { entity: "person", id: raw });
      }
      Ok(id)
    }
    .await;
    observe("update_person", result)
  }

  async fn delete_person(&self, id: PersonId) -> Result<()> {
    let raw = id.get();
    let result: Result<_> = async {
      let found = self
        .conn
        .call(move |conn| {
          let tx = conn.transaction()?;
          // Explicit cleanup: older files were created without the ON DELETE
          // clauses, so the schema cannot be relied on here.
          tx.execute(
            "UPDATE persona SET relacionado_con = NULL WHERE relacionado_con = ?1",
            rusqlite::params![raw],
          )?;
          for table in ["telefono", "mail", "direccion"] {
            tx.execute(
              &format!("DELETE FROM {table} WHERE persona_id = ?1"),
              rusqlite::params![raw],
            )?;
          }
          let deleted =
            tx.execute("DELETE FROM persona WHERE id_ = ?1", rusqlite::params![raw])?;
          if deleted == 0 {
            return Ok(false);
          }
          tx.commit()?;
          Ok(true)
        })
        .await?;
      if !found {
        return Err(Error::NotFound { entity: "person", id: raw });
      }
      Ok(())
    }
    .await;
    observe("delete_person", result)
  }

  async fn get_person(&self, id: PersonId) -> Result<Option<Person>> {
    let raw = id.get();
    let found = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {PERSON_COLUMNS} FROM persona WHERE id_ = ?1"),
            rusqlite::params![raw],
            RawPerson::from_row,
          )
          .optional()?)
      })
      .await
      .map_err(Error::from)
      .and_then(|raw: Option<RawPerson>| raw.map(RawPerson::into_person).transpose());
    checked("get_person", found)
  }

  async fn list_people(&self) -> Result<Vec<Person>> {
    checked("list_people", self.select_people().await)
  }

  async fn search_people(&self, text: String) -> Result<Vec<Person>> {
    let people = self.select_people().await.map(|mut people| {
      people.retain(|p| p.matches(&text));
      people
    });
    checked("search_people", people)
  }
}
