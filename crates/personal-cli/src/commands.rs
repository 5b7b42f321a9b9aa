//! Command handlers. Person edits go through [`Workflow`]; everything else
//! calls the store directly.

use std::path::Path;

use anyhow::{Context as _, bail};
use personal_core::{
  contact::{AddressInput, ContactInput},
  id::{
    AddressId, EmailId, PersonId, PhoneId, PostalCodeId, RelationshipTypeId,
  },
  person::{NationalId, NewPerson, PersonUpdate},
  postal::NewPostalCode,
  report::PersonReport,
  store::PersonalStore,
  workflow::{Action, EditContext, Workflow},
};

use crate::{
  AddressCommand, AddressFields, Command, ContactCommand, NewPersonArgs,
  PersonCommand, PersonFields, PostalCodeCommand, RelationshipCommand,
  output::{self, Output},
  settings::CliConfig,
};

pub async fn run<S: PersonalStore>(
  command: Command,
  store: &S,
  cfg: &CliConfig,
  out: &Output,
) -> anyhow::Result<()> {
  match command {
    Command::Person(cmd) => person(cmd, store, out).await,
    Command::Phone(cmd) => phone(cmd, store, out).await,
    Command::Email(cmd) => email(cmd, store, out).await,
    Command::Address(cmd) => address(cmd, store, out).await,
    Command::PostalCode(cmd) => postal_code(cmd, store, out).await,
    Command::Relationship(cmd) => relationship(cmd, store, out).await,
    Command::Report { person_id, out: file } => {
      let path = file.unwrap_or_else(|| cfg.report_path.clone());
      report(PersonId(person_id), &path, store, out).await
    }
  }
}

// ─── People ──────────────────────────────────────────────────────────────────

async fn person<S: PersonalStore>(
  cmd: PersonCommand,
  store: &S,
  out: &Output,
) -> anyhow::Result<()> {
  let wf = Workflow::new(store);

  match cmd {
    PersonCommand::Add(args) => {
      let form = PersonUpdate {
        details:           new_person(args).await?,
        related_to:        None,
        relationship_type: None,
      };
      let ctx = wf.apply(EditContext::Idle, Action::Create).await?;
      let ctx = wf.apply(ctx, Action::Save(form)).await?;
      let id = ctx.person_id().context("person was not saved")?;
      tracing::info!(%id, "person created");
      out.created("person", id.get())
    }

    PersonCommand::Edit { id, fields } => {
      let id = PersonId(id);
      let mut form = load_form(store, id).await?;
      apply_fields(&mut form, fields).await?;
      let ctx = wf.apply(EditContext::Idle, Action::Open(id)).await?;
      wf.apply(ctx, Action::Save(form)).await?;
      out.updated("person", id.get())
    }

    PersonCommand::Show { id } => {
      let id = PersonId(id);
      let person = store
        .get_person(id)
        .await?
        .with_context(|| format!("person {id} not found"))?;
      let phones = store.list_phones(id).await?;
      let emails = store.list_emails(id).await?;
      let addresses = store.list_addresses(id).await?;

      let card = output::person_card(&person, &phones, &emails, &addresses);
      out.emit(
        &serde_json::json!({
          "person":    person,
          "phones":    phones,
          "emails":    emails,
          "addresses": addresses,
        }),
        |_| card,
      )
    }

    PersonCommand::List { search } => {
      let people = match search {
        Some(text) => store.search_people(text).await?,
        None => store.list_people().await?,
      };
      out.list(&people, output::person_line)
    }

    PersonCommand::Delete { id } => {
      let id = PersonId(id);
      let ctx = wf.apply(EditContext::Idle, Action::Open(id)).await?;
      wf.apply(ctx, Action::Delete).await?;
      tracing::info!(%id, "person deleted");
      out.deleted("person", id.get())
    }

    PersonCommand::Relate { id, target, kind } => {
      let id = PersonId(id);
      let target = PersonId(target);
      if store.get_person(target).await?.is_none() {
        bail!("person {target} not found");
      }
      let mut form = load_form(store, id).await?;
      if let Some(kind) = kind {
        let kind = RelationshipTypeId(kind);
        if store.get_relationship_type(kind).await?.is_none() {
          bail!("relationship type {kind} not found");
        }
        form.relationship_type = Some(kind);
      }

      let mut ctx = wf.apply(EditContext::Idle, Action::Open(id)).await?;
      for action in [Action::BeginRelate, Action::PickRelation(target), Action::Save(form)] {
        ctx = wf.apply(ctx, action).await?;
      }
      tracing::debug!(?ctx, %target, "relation saved");
      out.updated("person", id.get())
    }

    PersonCommand::Unrelate { id } => {
      let id = PersonId(id);
      let mut form = load_form(store, id).await?;
      form.related_to = None;
      form.relationship_type = None;
      let ctx = wf.apply(EditContext::Idle, Action::Open(id)).await?;
      wf.apply(ctx, Action::Save(form)).await?;
      out.updated("person", id.get())
    }
  }
}

async fn new_person(args: NewPersonArgs) -> anyhow::Result<NewPerson> {
  let mut person = NewPerson::new(
    NationalId::new(args.nif)?,
    args.name,
    args.surname,
    args.birth_date,
    args.sex,
  );
  person.second_surname = args.second_surname;
  person.notes = args.notes;
  if let Some(path) = args.photo {
    person.photo = read_photo(&path).await;
  }
  Ok(person)
}

async fn load_form<S: PersonalStore>(store: &S, id: PersonId) -> anyhow::Result<PersonUpdate> {
  let person = store
    .get_person(id)
    .await?
    .with_context(|| format!("person {id} not found"))?;
  Ok(PersonUpdate::from_person(person))
}

/// Overwrite the fields that were given on the command line.
async fn apply_fields(form: &mut PersonUpdate, fields: PersonFields) -> anyhow::Result<()> {
  let d = &mut form.details;
  if let Some(nif) = fields.nif {
    d.national_id = NationalId::new(nif)?;
  }
  if let Some(name) = fields.name {
    d.given_name = name;
  }
  if let Some(surname) = fields.surname {
    d.first_surname = surname;
  }
  if let Some(second) = fields.second_surname {
    d.second_surname = Some(second);
  }
  if let Some(date) = fields.birth_date {
    d.birth_date = date;
  }
  if let Some(sex) = fields.sex {
    d.sex = sex;
  }
  if let Some(notes) = fields.notes {
    d.notes = Some(notes);
  }
  if fields.clear_photo {
    d.photo = None;
  } else if let Some(path) = fields.photo
    && let Some(bytes) = read_photo(&path).await
  {
    d.photo = Some(bytes);
  }
  Ok(())
}

/// Read a photo file. An unreadable file is logged and skipped.
async fn read_photo(path: &Path) -> Option<Vec<u8>> {
  match tokio::fs::read(path).await {
    Ok(bytes) => Some(bytes),
    Err(e) => {
      tracing::warn!(path = %path.display(), error = %e, "photo not loaded");
      None
    }
  }
}

// ─── Phones and emails ───────────────────────────────────────────────────────

async fn phone<S: PersonalStore>(
  cmd: ContactCommand,
  store: &S,
  out: &Output,
) -> anyhow::Result<()> {
  match cmd {
    ContactCommand::Add { person_id, value, preferred, notes } => {
      let input = ContactInput { value, preferred, notes };
      let id = store.add_phone(PersonId(person_id), input).await?;
      out.created("phone", id.get())
    }
    ContactCommand::Edit { id, value, preferred, notes } => {
      let input = ContactInput { value, preferred, notes };
      let id = store.update_phone(PhoneId(id), input).await?;
      out.updated("phone", id.get())
    }
    ContactCommand::Delete { id } => {
      store.delete_phone(PhoneId(id)).await?;
      out.deleted("phone", id)
    }
    ContactCommand::Prefer { id } => {
      store.set_preferred_phone(PhoneId(id)).await?;
      out.updated("phone", id)
    }
    ContactCommand::List { person_id } => {
      let phones = store.list_phones(PersonId(person_id)).await?;
      out.list(&phones, output::phone_line)
    }
  }
}

async fn email<S: PersonalStore>(
  cmd: ContactCommand,
  store: &S,
  out: &Output,
) -> anyhow::Result<()> {
  match cmd {
    ContactCommand::Add { person_id, value, preferred, notes } => {
      let input = ContactInput { value, preferred, notes };
      let id = store.add_email(PersonId(person_id), input).await?;
      out.created("email", id.get())
    }
    ContactCommand::Edit { id, value, preferred, notes } => {
      let input = ContactInput { value, preferred, notes };
      let id = store.update_email(EmailId(id), input).await?;
      out.updated("email", id.get())
    }
    ContactCommand::Delete { id } => {
      store.delete_email(EmailId(id)).await?;
      out.deleted("email", id)
    }
    ContactCommand::Prefer { id } => {
      store.set_preferred_email(EmailId(id)).await?;
      out.updated("email", id)
    }
    ContactCommand::List { person_id } => {
      let emails = store.list_emails(PersonId(person_id)).await?;
      out.list(&emails, output::email_line)
    }
  }
}

// ─── Addresses ───────────────────────────────────────────────────────────────

async fn address<S: PersonalStore>(
  cmd: AddressCommand,
  store: &S,
  out: &Output,
) -> anyhow::Result<()> {
  match cmd {
    AddressCommand::Add { person_id, fields } => {
      let input = address_input(store, fields).await?;
      let id = store.add_address(PersonId(person_id), input).await?;
      out.created("address", id.get())
    }
    AddressCommand::Edit { id, fields } => {
      let input = address_input(store, fields).await?;
      let id = store.update_address(AddressId(id), input).await?;
      out.updated("address", id.get())
    }
    AddressCommand::Delete { id } => {
      store.delete_address(AddressId(id)).await?;
      out.deleted("address", id)
    }
    AddressCommand::Prefer { id } => {
      store.set_preferred_address(AddressId(id)).await?;
      out.updated("address", id)
    }
    AddressCommand::List { person_id } => {
      let views = store.list_addresses(PersonId(person_id)).await?;
      out.list(&views, output::address_line)
    }
  }
}

/// Turn CLI fields into an [`AddressInput`], resolving the postal code by
/// value. With locality and province an unknown code is created.
async fn address_input<S: PersonalStore>(
  store: &S,
  fields: AddressFields,
) -> anyhow::Result<AddressInput> {
  let postal_code_id = match (fields.locality, fields.province) {
    (Some(locality), Some(province)) => {
      store
        .resolve_postal_code(NewPostalCode::new(fields.postal_code, locality, province))
        .await?
    }
    _ => {
      store
        .find_postal_code(fields.postal_code.clone())
        .await?
        .with_context(|| {
          format!(
            "unknown postal code {}; pass --locality and --province to create it",
            fields.postal_code
          )
        })?
        .postal_code_id
    }
  };

  Ok(AddressInput {
    street: fields.street,
    postal_code_id,
    preferred: fields.preferred,
    notes: fields.notes,
  })
}

// ─── Postal codes ────────────────────────────────────────────────────────────

async fn postal_code<S: PersonalStore>(
  cmd: PostalCodeCommand,
  store: &S,
  out: &Output,
) -> anyhow::Result<()> {
  match cmd {
    PostalCodeCommand::Add { code, locality, province } => {
      let id = store
        .create_postal_code(NewPostalCode::new(code, locality, province))
        .await?;
      out.created("postal code", id.get())
    }
    PostalCodeCommand::Edit { id, code, locality, province } => {
      let id = store
        .update_postal_code(PostalCodeId(id), NewPostalCode::new(code, locality, province))
        .await?;
      out.updated("postal code", id.get())
    }
    PostalCodeCommand::Delete { id } => {
      store.delete_postal_code(PostalCodeId(id)).await?;
      out.deleted("postal code", id)
    }
    PostalCodeCommand::Show { code } => {
      let found = store
        .find_postal_code(code.clone())
        .await?
        .with_context(|| format!("postal code {code} not found"))?;
      out.emit(&found, output::postal_code_line)
    }
    PostalCodeCommand::List => {
      let codes = store.list_postal_codes().await?;
      out.list(&codes, output::postal_code_line)
    }
  }
}

// ─── Relationship types ──────────────────────────────────────────────────────

async fn relationship<S: PersonalStore>(
  cmd: RelationshipCommand,
  store: &S,
  out: &Output,
) -> anyhow::Result<()> {
  match cmd {
    RelationshipCommand::Add { label } => {
      let id = store.create_relationship_type(label).await?;
      out.created("relationship type", id.get())
    }
    RelationshipCommand::Rename { id, label } => {
      let id = store
        .update_relationship_type(RelationshipTypeId(id), label)
        .await?;
      out.updated("relationship type", id.get())
    }
    RelationshipCommand::Delete { id } => {
      store.delete_relationship_type(RelationshipTypeId(id)).await?;
      out.deleted("relationship type", id)
    }
    RelationshipCommand::List => {
      let types = store.list_relationship_types().await?;
      out.list(&types, output::relationship_line)
    }
  }
}

// ─── Report ──────────────────────────────────────────────────────────────────

async fn report<S: PersonalStore>(
  id: PersonId,
  path: &Path,
  store: &S,
  out: &Output,
) -> anyhow::Result<()> {
  let report = PersonReport::load(store, id)
    .await?
    .with_context(|| format!("person {id} not found"))?;

  if let Some(parent) = path.parent()
    && !parent.as_os_str().is_empty()
  {
    tokio::fs::create_dir_all(parent)
      .await
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }
  tokio::fs::write(path, report.render_text())
    .await
    .with_context(|| format!("failed to write report to {}", path.display()))?;
  tracing::info!(%id, path = %path.display(), "report written");

  out.emit(&report, |_| format!("wrote {}", path.display()))
}
