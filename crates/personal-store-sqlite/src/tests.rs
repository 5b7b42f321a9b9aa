//! Integration tests for `SqliteStore` against in-memory and file-backed
//! databases.

use chrono::NaiveDate;
use personal_core::{
  contact::{AddressInput, ContactInput},
  id::{PersonId, PhoneId, PostalCodeId, RelationshipTypeId},
  person::{NationalId, NewPerson, PersonUpdate, Sex},
  postal::NewPostalCode,
  report::PersonReport,
  store::PersonalStore,
  workflow::{Action, EditContext, Workflow},
};

use tracing_test::traced_test;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_person(nif: &str, given: &str, first: &str) -> NewPerson {
  NewPerson::new(
    NationalId::new(nif).unwrap(),
    given,
    first,
    NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
    Sex::Female,
  )
}

async fn ana(s: &SqliteStore) -> PersonId {
  let mut input = new_person("12345678A", "Ana", "Gómez");
  input.second_surname = Some("López".into());
  s.create_person(input).await.unwrap()
}

async fn madrid(s: &SqliteStore) -> PostalCodeId {
  s.resolve_postal_code(NewPostalCode::new("28001", "Madrid", "Madrid"))
    .await
    .unwrap()
}

// ─── People ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_person() {
  let s = store().await;
  let id = ana(&s).await;
  assert!(id.get() > 0);

  let person = s.get_person(id).await.unwrap().unwrap();
  assert_eq!(person.person_id, id);
  assert_eq!(person.full_name(), "Ana Gómez López");
  assert_eq!(person.sex, Sex::Female);
  assert_eq!(person.birth_date, NaiveDate::from_ymd_opt(1990, 1, 1).unwrap());
  assert_eq!(person.related_to, None);
}

#[tokio::test]
async fn get_person_missing_returns_none() {
  let s = store().await;
  assert!(s.get_person(PersonId(42)).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_national_id_differing_in_case_is_rejected() {
  let s = store().await;
  ana(&s).await;

  let err = s
    .create_person(new_person("12345678a", "Otra", "Persona"))
    .await
    .unwrap_err();
  assert!(err.is_constraint(), "unexpected error: {err}");
  assert_eq!(s.list_people().await.unwrap().len(), 1);
}

#[tokio::test]
async fn photo_round_trips_byte_identical() {
  let s = store().await;
  let photo: Vec<u8> = (0..=255).cycle().take(4096).collect();
  let mut input = new_person("12345678A", "Ana", "Gómez");
  input.photo = Some(photo.clone());

  let id = s.create_person(input).await.unwrap();
  let person = s.get_person(id).await.unwrap().unwrap();
  assert_eq!(person.photo.as_deref(), Some(photo.as_slice()));
}

#[tokio::test]
async fn update_person_overwrites_fields() {
  let s = store().await;
  let id = ana(&s).await;
  let mut update = PersonUpdate::from_person(s.get_person(id).await.unwrap().unwrap());
  update.details.notes = Some("  moved  ".into());
  update.details.second_surname = None;

  assert_eq!(s.update_person(id, update).await.unwrap(), id);
  let person = s.get_person(id).await.unwrap().unwrap();
  assert_eq!(person.notes.as_deref(), Some("moved"));
  assert_eq!(person.full_name(), "Ana Gómez");
}

#[tokio::test]
async fn update_and_delete_missing_person_are_not_found() {
  let s = store().await;
  let update = PersonUpdate {
    details:           new_person("12345678A", "Ana", "Gómez"),
    related_to:        None,
    relationship_type: None,
  };
  assert!(s.update_person(PersonId(9), update).await.unwrap_err().is_not_found());
  assert!(s.delete_person(PersonId(9)).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn search_is_case_insensitive_substring_of_full_name() {
  let s = store().await;
  ana(&s).await;
  s.create_person(new_person("87654321B", "Luis", "Pérez")).await.unwrap();

  let hits = s.search_people("gómez lóp".into()).await.unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].given_name, "Ana");

  assert_eq!(s.search_people("PÉREZ".into()).await.unwrap().len(), 1);
  assert_eq!(s.search_people(String::new()).await.unwrap().len(), 2);
  assert!(s.search_people("nadie".into()).await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_person_cascades_contact_methods() {
  let s = store().await;
  let id = ana(&s).await;
  let cp = madrid(&s).await;
  s.add_phone(id, ContactInput::new("600000001", true)).await.unwrap();
  s.add_email(id, ContactInput::new("ana@example.com", true)).await.unwrap();
  s.add_address(id, AddressInput::new("Calle Mayor 1", cp, true)).await.unwrap();

  s.delete_person(id).await.unwrap();

  assert!(s.get_person(id).await.unwrap().is_none());
  assert!(s.list_phones(id).await.unwrap().is_empty());
  assert!(s.list_emails(id).await.unwrap().is_empty());
  assert!(s.list_addresses(id).await.unwrap().is_empty());
  // The postal code is shared data and survives.
  assert!(s.get_postal_code(cp).await.unwrap().is_some());
}

#[tokio::test]
async fn delete_person_clears_relations_pointing_at_them() {
  let s = store().await;
  let ana_id = ana(&s).await;
  let luis = s.create_person(new_person("87654321B", "Luis", "Pérez")).await.unwrap();
  let sibling = s.create_relationship_type("sibling".into()).await.unwrap();

  let mut update = PersonUpdate::from_person(s.get_person(luis).await.unwrap().unwrap());
  update.related_to = Some(ana_id);
  update.relationship_type = Some(sibling);
  s.update_person(luis, update).await.unwrap();

  s.delete_person(ana_id).await.unwrap();

  let luis = s.get_person(luis).await.unwrap().unwrap();
  assert_eq!(luis.related_to, None);
  assert_eq!(luis.relationship_type, Some(sibling));
}

#[tokio::test]
async fn self_relation_is_rejected_before_writing() {
  let s = store().await;
  let id = ana(&s).await;
  let mut update = PersonUpdate::from_person(s.get_person(id).await.unwrap().unwrap());
  update.related_to = Some(id);

  let err = s.update_person(id, update).await.unwrap_err();
  assert!(matches!(err, Error::Core(personal_core::Error::SelfRelation)));
}

// ─── Preferred flag ──────────────────────────────────────────────────────────

#[tokio::test]
async fn exactly_one_phone_stays_preferred() {
  let s = store().await;
  let id = ana(&s).await;
  let mut phones: Vec<PhoneId> = Vec::new();
  for n in 1..=3 {
    phones.push(
      s.add_phone(id, ContactInput::new(format!("60000000{n}"), false))
        .await
        .unwrap(),
    );
  }

  for &chosen in &phones {
    s.set_preferred_phone(chosen).await.unwrap();
    let listed = s.list_phones(id).await.unwrap();
    let preferred: Vec<_> = listed.iter().filter(|p| p.preferred).collect();
    assert_eq!(preferred.len(), 1);
    assert_eq!(preferred[0].phone_id, chosen);
  }
}

#[tokio::test]
async fn adding_preferred_email_clears_previous() {
  let s = store().await;
  let id = ana(&s).await;
  let first = s.add_email(id, ContactInput::new("a@example.com", true)).await.unwrap();
  let second = s.add_email(id, ContactInput::new("b@example.com", true)).await.unwrap();

  let emails = s.list_emails(id).await.unwrap();
  assert!(!emails.iter().find(|e| e.email_id == first).unwrap().preferred);
  assert!(emails.iter().find(|e| e.email_id == second).unwrap().preferred);
}

#[tokio::test]
async fn preferred_flags_are_scoped_per_person() {
  let s = store().await;
  let ana_id = ana(&s).await;
  let luis = s.create_person(new_person("87654321B", "Luis", "Pérez")).await.unwrap();
  s.add_phone(ana_id, ContactInput::new("600000001", true)).await.unwrap();
  s.add_phone(luis, ContactInput::new("600000002", true)).await.unwrap();

  assert!(s.list_phones(ana_id).await.unwrap()[0].preferred);
  assert!(s.list_phones(luis).await.unwrap()[0].preferred);
}

#[tokio::test]
async fn updating_phone_to_preferred_clears_siblings() {
  let s = store().await;
  let id = ana(&s).await;
  s.add_phone(id, ContactInput::new("600000001", true)).await.unwrap();
  let other = s.add_phone(id, ContactInput::new("600000002", false)).await.unwrap();

  let mut input = ContactInput::new("600000009", true);
  input.notes = Some("work".into());
  s.update_phone(other, input).await.unwrap();

  let phones = s.list_phones(id).await.unwrap();
  let preferred: Vec<_> = phones.iter().filter(|p| p.preferred).collect();
  assert_eq!(preferred.len(), 1);
  assert_eq!(preferred[0].number, "600000009");
  assert_eq!(preferred[0].notes.as_deref(), Some("work"));
}

#[tokio::test]
async fn contact_operations_on_missing_rows_are_not_found() {
  let s = store().await;
  assert!(s.set_preferred_phone(PhoneId(5)).await.unwrap_err().is_not_found());
  assert!(s.delete_phone(PhoneId(5)).await.unwrap_err().is_not_found());
  assert!(
    s.update_phone(PhoneId(5), ContactInput::new("600000001", true))
      .await
      .unwrap_err()
      .is_not_found()
  );
}

#[tokio::test]
async fn delete_phone_removes_only_that_row() {
  let s = store().await;
  let id = ana(&s).await;
  let first = s.add_phone(id, ContactInput::new("600000001", false)).await.unwrap();
  s.add_phone(id, ContactInput::new("600000002", false)).await.unwrap();

  s.delete_phone(first).await.unwrap();
  let phones = s.list_phones(id).await.unwrap();
  assert_eq!(phones.len(), 1);
  assert_eq!(phones[0].number, "600000002");
}

// ─── Addresses and postal codes ──────────────────────────────────────────────

#[tokio::test]
async fn resolve_postal_code_reuses_existing_row() {
  let s = store().await;
  let first = madrid(&s).await;
  let again = s
    .resolve_postal_code(NewPostalCode::new("28001", "Otra", "Otra"))
    .await
    .unwrap();
  assert_eq!(first, again);

  let pc = s.get_postal_code(first).await.unwrap().unwrap();
  assert_eq!(pc.locality, "Madrid");
  assert_eq!(s.list_postal_codes().await.unwrap().len(), 1);
}

#[tokio::test]
async fn bad_postal_code_length_persists_nothing() {
  let s = store().await;
  let err = s
    .create_postal_code(NewPostalCode::new("2800", "Madrid", "Madrid"))
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::Core(personal_core::Error::Validation { field: "postal code", .. })
  ));
  assert!(s.list_postal_codes().await.unwrap().is_empty());
}

#[tokio::test]
async fn find_postal_code_by_code() {
  let s = store().await;
  let id = madrid(&s).await;
  let found = s.find_postal_code(" 28001 ".into()).await.unwrap().unwrap();
  assert_eq!(found.postal_code_id, id);
  assert!(s.find_postal_code("08001".into()).await.unwrap().is_none());
}

#[tokio::test]
async fn referenced_postal_code_cannot_be_deleted() {
  let s = store().await;
  let id = ana(&s).await;
  let cp = madrid(&s).await;
  s.add_address(id, AddressInput::new("Calle Mayor 1", cp, true)).await.unwrap();

  assert!(s.delete_postal_code(cp).await.unwrap_err().is_constraint());
  assert!(s.get_postal_code(cp).await.unwrap().is_some());
}

#[tokio::test]
async fn list_addresses_joins_postal_code() {
  let s = store().await;
  let id = ana(&s).await;
  let cp = madrid(&s).await;
  let first = s
    .add_address(id, AddressInput::new("Calle Mayor 1", cp, true))
    .await
    .unwrap();
  let second = s
    .add_address(id, AddressInput::new("Calle Alcalá 2", cp, false))
    .await
    .unwrap();

  s.set_preferred_address(second).await.unwrap();

  let views = s.list_addresses(id).await.unwrap();
  assert_eq!(views.len(), 2);
  assert_eq!(views[0].address.address_id, first);
  assert!(!views[0].address.preferred);
  assert!(views[1].address.preferred);
  assert_eq!(views[1].postal_code.locality, "Madrid");
  assert_eq!(views[1].formatted(), "Calle Alcalá 2, 28001 Madrid (Madrid)");
}

#[tokio::test]
async fn address_with_unknown_postal_code_is_rejected() {
  let s = store().await;
  let id = ana(&s).await;
  let err = s
    .add_address(id, AddressInput::new("Calle Mayor 1", PostalCodeId(77), false))
    .await
    .unwrap_err();
  assert!(err.is_constraint());
}

// ─── Relationship types ──────────────────────────────────────────────────────

#[tokio::test]
async fn relationship_type_labels_are_unique_ignoring_case() {
  let s = store().await;
  let id = s.create_relationship_type(" Spouse ".into()).await.unwrap();
  assert_eq!(
    s.get_relationship_type(id).await.unwrap().unwrap().label,
    "Spouse"
  );
  assert!(
    s.create_relationship_type("spouse".into())
      .await
      .unwrap_err()
      .is_constraint()
  );
}

#[tokio::test]
async fn deleting_relationship_type_clears_references() {
  let s = store().await;
  let ana_id = ana(&s).await;
  let cousin = s.create_relationship_type("cousin".into()).await.unwrap();

  let mut update = PersonUpdate::from_person(s.get_person(ana_id).await.unwrap().unwrap());
  update.relationship_type = Some(cousin);
  s.update_person(ana_id, update).await.unwrap();

  s.delete_relationship_type(cousin).await.unwrap();
  assert!(s.list_relationship_types().await.unwrap().is_empty());
  let person = s.get_person(ana_id).await.unwrap().unwrap();
  assert_eq!(person.relationship_type, None);

  assert!(
    s.delete_relationship_type(RelationshipTypeId(99))
      .await
      .unwrap_err()
      .is_not_found()
  );
}

#[tokio::test]
async fn rename_relationship_type() {
  let s = store().await;
  let id = s.create_relationship_type("friend".into()).await.unwrap();
  s.update_relationship_type(id, "close friend".into()).await.unwrap();
  let all = s.list_relationship_types().await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].label, "close friend");
}

// ─── Workflow and report ─────────────────────────────────────────────────────

#[tokio::test]
async fn workflow_creates_relates_and_deletes() {
  let s = store().await;
  let other = s.create_person(new_person("87654321B", "Luis", "Pérez")).await.unwrap();
  let wf = Workflow::new(&s);

  let ctx = wf.apply(EditContext::Idle, Action::Create).await.unwrap();
  assert_eq!(ctx, EditContext::New);

  let form = PersonUpdate {
    details:           new_person("12345678A", "Ana", "Gómez"),
    related_to:        None,
    relationship_type: None,
  };
  let ctx = wf.apply(ctx, Action::Save(form.clone())).await.unwrap();
  let EditContext::Saved { id } = ctx else { panic!("expected Saved, got {ctx:?}") };

  let ctx = wf.apply(ctx, Action::BeginRelate).await.unwrap();
  let ctx = wf.apply(ctx, Action::PickRelation(other)).await.unwrap();
  let ctx = wf.apply(ctx, Action::Save(form)).await.unwrap();
  assert_eq!(ctx, EditContext::Saved { id });
  assert_eq!(s.get_person(id).await.unwrap().unwrap().related_to, Some(other));

  let ctx = wf.apply(ctx, Action::Delete).await.unwrap();
  assert_eq!(ctx, EditContext::Idle);
  assert!(s.get_person(id).await.unwrap().is_none());
}

#[tokio::test]
async fn workflow_open_missing_person_keeps_caller_context() {
  let s = store().await;
  let wf = Workflow::new(&s);
  let err = wf
    .apply(EditContext::Idle, Action::Open(PersonId(3)))
    .await
    .unwrap_err();
  assert!(matches!(err, personal_core::Error::NotFound { entity: "person", id: 3 }));
}

#[tokio::test]
async fn report_for_madrid_resident() {
  let s = store().await;
  let id = ana(&s).await;
  let cp = madrid(&s).await;
  let mut address = AddressInput::new("Calle Mayor 1", cp, true);
  address.notes = Some("home".into());
  s.add_address(id, address).await.unwrap();
  s.add_phone(id, ContactInput::new("600000001", false)).await.unwrap();
  s.add_phone(id, ContactInput::new("600000002", true)).await.unwrap();

  let report = PersonReport::load(&s, id).await.unwrap().unwrap();
  assert_eq!(report.name, "Ana Gómez López");
  assert_eq!(report.birth_date, "01/01/1990");
  assert_eq!(report.address, "Calle Mayor 1, 28001 Madrid (Madrid)");
  assert_eq!(report.address_notes, "home");
  assert_eq!(report.phone, "600000002");
  assert!(report.email.is_empty());

  assert!(PersonReport::load(&s, PersonId(99)).await.unwrap().is_none());
}

// ─── File-backed store ───────────────────────────────────────────────────────

#[tokio::test]
async fn file_store_persists_across_reopen() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("personal.db");

  let id = {
    let s = SqliteStore::open(&path).await.unwrap();
    ana(&s).await
  };

  let s = SqliteStore::open(&path).await.unwrap();
  let person = s.get_person(id).await.unwrap().unwrap();
  assert_eq!(person.given_name, "Ana");
}

#[tokio::test]
async fn concurrent_resolves_of_one_code_share_a_row() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("personal.db");
  let a = SqliteStore::open(&path).await.unwrap();
  let b = SqliteStore::open(&path).await.unwrap();

  let (x, y) = tokio::join!(
    a.resolve_postal_code(NewPostalCode::new("28001", "Madrid", "Madrid")),
    b.resolve_postal_code(NewPostalCode::new("28001", "Madrid", "Madrid")),
  );
  assert_eq!(x.unwrap(), y.unwrap());
  assert_eq!(a.list_postal_codes().await.unwrap().len(), 1);
}

#[tokio::test]
#[traced_test]
async fn unreadable_row_is_logged_on_read() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("personal.db");
  let s = SqliteStore::open(&path).await.unwrap();
  let id = ana(&s).await;

  rusqlite::Connection::open(&path)
    .unwrap()
    .execute("UPDATE persona SET fnac = 'not a date'", [])
    .unwrap();

  assert!(matches!(s.get_person(id).await, Err(Error::DateParse(_))));
  assert!(logs_contain("store operation failed"));
  assert!(logs_contain("get_person"));
}

// ─── Files from the desktop application ──────────────────────────────────────

/// Tables as the desktop application created them: no `ON DELETE` actions
/// and foreign keys never switched on.
const LEGACY_SCHEMA: &str = "
CREATE TABLE tipo_relacion (
    id_      INTEGER PRIMARY KEY AUTOINCREMENT,
    relacion TEXT COLLATE NOCASE NOT NULL UNIQUE
);
CREATE TABLE codigo_postal (
    id_       INTEGER PRIMARY KEY AUTOINCREMENT,
    cp        TEXT NOT NULL UNIQUE,
    localidad TEXT COLLATE NOCASE NOT NULL,
    provincia TEXT COLLATE NOCASE NOT NULL,
    CONSTRAINT check_cp CHECK (length(cp) = 5)
);
CREATE TABLE persona (
    id_              INTEGER PRIMARY KEY AUTOINCREMENT,
    nif              TEXT COLLATE NOCASE NOT NULL UNIQUE,
    nombre           TEXT COLLATE NOCASE NOT NULL,
    ap1              TEXT COLLATE NOCASE NOT NULL,
    ap2              TEXT COLLATE NOCASE,
    fnac             TEXT NOT NULL,
    relacionado_con  INTEGER REFERENCES persona (id_),
    tipo_relacion_id INTEGER REFERENCES tipo_relacion (id_),
    observ           TEXT COLLATE NOCASE,
    foto             BLOB,
    sexo             TEXT NOT NULL,
    CONSTRAINT check_nif CHECK (length(nif) = 9),
    CONSTRAINT check_sexo CHECK (sexo in ('Hombre', 'Mujer'))
);
CREATE TABLE telefono (
    id_         INTEGER PRIMARY KEY AUTOINCREMENT,
    persona_id  INTEGER NOT NULL REFERENCES persona (id_),
    numero      TEXT COLLATE NOCASE NOT NULL,
    preferencia INTEGER NOT NULL,
    observ      TEXT COLLATE NOCASE,
    CONSTRAINT check_preferencia CHECK (preferencia in (0,1))
);
CREATE TABLE mail (
    id_         INTEGER PRIMARY KEY AUTOINCREMENT,
    persona_id  INTEGER NOT NULL REFERENCES persona (id_),
    mail        TEXT COLLATE NOCASE NOT NULL,
    preferencia INTEGER NOT NULL,
    observ      TEXT COLLATE NOCASE,
    CONSTRAINT check_preferencia CHECK (preferencia in (0,1))
);
CREATE TABLE direccion (
    id_         INTEGER PRIMARY KEY AUTOINCREMENT,
    persona_id  INTEGER NOT NULL REFERENCES persona (id_),
    direccion   TEXT COLLATE NOCASE NOT NULL,
    cp_id       INTEGER NOT NULL REFERENCES codigo_postal (id_),
    preferencia INTEGER NOT NULL,
    observ      TEXT COLLATE NOCASE,
    CONSTRAINT check_preferencia CHECK (preferencia in (0,1))
);

INSERT INTO tipo_relacion (id_, relacion) VALUES (1, 'hermana');
INSERT INTO codigo_postal (id_, cp, localidad, provincia)
    VALUES (1, '28001', 'Madrid', 'Madrid');
INSERT INTO persona (id_, nif, nombre, ap1, fnac, sexo)
    VALUES (1, '12345678A', 'Ana', 'Gómez', '1990-01-01', 'Mujer');
INSERT INTO persona (id_, nif, nombre, ap1, fnac, relacionado_con, tipo_relacion_id, sexo)
    VALUES (2, '87654321B', 'Eva', 'Gómez', '1992-05-03', 1, 1, 'Mujer');
INSERT INTO telefono (persona_id, numero, preferencia) VALUES (1, '600000001', 1);
INSERT INTO mail (persona_id, mail, preferencia) VALUES (1, 'ana@example.com', 1);
INSERT INTO direccion (persona_id, direccion, cp_id, preferencia)
    VALUES (1, 'Calle Mayor 1', 1, 1);
";

/// Write a desktop-era file to `dir`, run `extra` against it with foreign
/// keys off, and return its path.
fn legacy_file(dir: &tempfile::TempDir, extra: &str) -> std::path::PathBuf {
  let path = dir.path().join("legacy.db");
  let conn = rusqlite::Connection::open(&path).unwrap();
  conn.execute_batch("PRAGMA foreign_keys = OFF;").unwrap();
  conn.execute_batch(LEGACY_SCHEMA).unwrap();
  conn.execute_batch(extra).unwrap();
  path
}

#[tokio::test]
async fn legacy_delete_person_removes_contacts_and_relations() {
  let dir = tempfile::tempdir().unwrap();
  let s = SqliteStore::open(legacy_file(&dir, "")).await.unwrap();
  let (ana_id, eva_id) = (PersonId(1), PersonId(2));
  assert_eq!(s.list_phones(ana_id).await.unwrap().len(), 1);

  s.delete_person(ana_id).await.unwrap();

  assert!(s.get_person(ana_id).await.unwrap().is_none());
  assert!(s.list_phones(ana_id).await.unwrap().is_empty());
  assert!(s.list_emails(ana_id).await.unwrap().is_empty());
  assert!(s.list_addresses(ana_id).await.unwrap().is_empty());
  let eva = s.get_person(eva_id).await.unwrap().unwrap();
  assert_eq!(eva.related_to, None);
  assert_eq!(eva.relationship_type, Some(RelationshipTypeId(1)));
}

#[tokio::test]
async fn legacy_delete_relationship_type_clears_references() {
  let dir = tempfile::tempdir().unwrap();
  let s = SqliteStore::open(legacy_file(&dir, "")).await.unwrap();

  s.delete_relationship_type(RelationshipTypeId(1)).await.unwrap();

  let eva = s.get_person(PersonId(2)).await.unwrap().unwrap();
  assert_eq!(eva.relationship_type, None);
  assert_eq!(eva.related_to, Some(PersonId(1)));
}

#[tokio::test]
async fn legacy_dangling_references_are_cleared_on_open() {
  let dir = tempfile::tempdir().unwrap();
  // Deletes the desktop application made without touching referrers.
  let path = legacy_file(
    &dir,
    "DELETE FROM persona WHERE id_ = 1;
     DELETE FROM tipo_relacion WHERE id_ = 1;",
  );
  let s = SqliteStore::open(&path).await.unwrap();
  let eva_id = PersonId(2);

  let eva = s.get_person(eva_id).await.unwrap().unwrap();
  assert_eq!(eva.related_to, None);
  assert_eq!(eva.relationship_type, None);

  let mut update = PersonUpdate::from_person(eva);
  update.details.notes = Some("still editable".into());
  assert_eq!(s.update_person(eva_id, update).await.unwrap(), eva_id);
  assert_eq!(
    s.get_person(eva_id).await.unwrap().unwrap().notes.as_deref(),
    Some("still editable")
  );
}

#[tokio::test]
async fn opened_legacy_file_is_stamped_with_schema_version() {
  let dir = tempfile::tempdir().unwrap();
  let path = legacy_file(&dir, "");
  drop(SqliteStore::open(&path).await.unwrap());

  let conn = rusqlite::Connection::open(&path).unwrap();
  let version: i64 = conn
    .query_row("PRAGMA user_version", [], |row| row.get(0))
    .unwrap();
  assert_eq!(version, crate::schema::SCHEMA_VERSION);
}
