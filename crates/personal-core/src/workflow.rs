//! Person edit workflow.
//!
//! A front end holds one [`EditContext`] describing the record it is working
//! on. Every user action consumes the current context and yields the next
//! one; nothing is kept in mutable controller fields.
//!
//! ```text
//!  Idle ──Create──▶ New ──Save──▶ Saved ──Open/Save──▶ Editing ──Save──▶ Saved
//!                                   │                    │
//!                                   └────BeginRelate─────┴──▶ Relating
//!                                                              │  PickRelation
//!                                                              └──Save──▶ Saved
//! ```
//!
//! [`EditContext::plan`] is pure and decides which store call an action needs;
//! [`Workflow::apply`] performs it.

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  id::PersonId,
  person::{NewPerson, PersonUpdate},
  store::PersonalStore,
};

// ─── Context ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum EditContext {
  /// No person selected.
  #[default]
  Idle,
  /// Filling in a person that does not exist yet.
  New,
  /// The person was just written to the store.
  Saved { id: PersonId },
  /// An existing person is loaded for editing.
  Editing { id: PersonId },
  /// Picking another person as the relation target of `id`.
  Relating {
    id:     PersonId,
    target: Option<PersonId>,
  },
}

impl EditContext {
  /// The person this context refers to, if any.
  pub fn person_id(&self) -> Option<PersonId> {
    match *self {
      Self::Idle | Self::New => None,
      Self::Saved { id } | Self::Editing { id } | Self::Relating { id, .. } => {
        Some(id)
      }
    }
  }

  fn name(&self) -> &'static str {
    match self {
      Self::Idle => "idle",
      Self::New => "creating a person",
      Self::Saved { .. } => "saved",
      Self::Editing { .. } => "editing",
      Self::Relating { .. } => "relating",
    }
  }

  /// Decide what `action` does from this context without touching a store.
  pub fn plan(self, action: Action) -> Result<Effect> {
    let invalid = |action: &Action| Error::InvalidTransition {
      from:   self.name(),
      action: action.name(),
    };

    match (self, action) {
      (Self::New | Self::Relating { .. }, action @ Action::Create) => {
        Err(invalid(&action))
      }
      (_, Action::Create) => Ok(Effect::Stay(Self::New)),

      (Self::New, action @ Action::Open(_)) => Err(invalid(&action)),
      (Self::Relating { id, .. }, Action::Open(target)) => {
        // Selecting someone from the list while relating picks the target.
        Self::Relating { id, target: None }.plan(Action::PickRelation(target))
      }
      (_, Action::Open(id)) => Ok(Effect::Load(id)),

      (Self::Idle, action @ Action::Save(_)) => Err(invalid(&action)),
      (Self::New, Action::Save(update)) => Ok(Effect::Create(update.details)),
      (Self::Saved { id } | Self::Editing { id }, Action::Save(update)) => {
        Ok(Effect::Update(id, update.normalized(id)?))
      }
      (Self::Relating { id, target }, Action::Save(mut update)) => {
        if target.is_some() {
          update.related_to = target;
        }
        Ok(Effect::Update(id, update.normalized(id)?))
      }

      (Self::Saved { id } | Self::Editing { id }, Action::BeginRelate) => {
        Ok(Effect::Stay(Self::Relating { id, target: None }))
      }
      (_, action @ Action::BeginRelate) => Err(invalid(&action)),

      (Self::Relating { id, .. }, Action::PickRelation(target)) => {
        if target == id {
          return Err(Error::SelfRelation);
        }
        Ok(Effect::Stay(Self::Relating { id, target: Some(target) }))
      }
      (_, action @ Action::PickRelation(_)) => Err(invalid(&action)),

      (Self::Idle | Self::New, Action::Cancel) => Ok(Effect::Stay(Self::Idle)),
      (Self::Saved { id } | Self::Editing { id } | Self::Relating { id, .. }, Action::Cancel) => {
        Ok(Effect::Load(id))
      }

      (Self::Idle | Self::New, action @ Action::Delete) => Err(invalid(&action)),
      (Self::Saved { id } | Self::Editing { id } | Self::Relating { id, .. }, Action::Delete) => {
        Ok(Effect::Delete(id))
      }
    }
  }
}

// ─── Actions ─────────────────────────────────────────────────────────────────

/// A user action on the person form.
#[derive(Debug, Clone)]
pub enum Action {
  /// Start a blank person.
  Create,
  /// Load an existing person (or pick them as relation target).
  Open(PersonId),
  /// Persist the form. For a new person only `details` is used.
  Save(PersonUpdate),
  /// Start picking a relation target.
  BeginRelate,
  PickRelation(PersonId),
  /// Drop unsaved changes.
  Cancel,
  Delete,
}

impl Action {
  fn name(&self) -> &'static str {
    match self {
      Self::Create => "create",
      Self::Open(_) => "open",
      Self::Save(_) => "save",
      Self::BeginRelate => "relate",
      Self::PickRelation(_) => "pick a relation",
      Self::Cancel => "cancel",
      Self::Delete => "delete",
    }
  }
}

/// The store work an action requires.
#[derive(Debug, Clone)]
pub enum Effect {
  /// No store call; move to the given context.
  Stay(EditContext),
  /// Load (or reload) a person, then edit them.
  Load(PersonId),
  Create(NewPerson),
  Update(PersonId, PersonUpdate),
  Delete(PersonId),
}

// ─── Executor ────────────────────────────────────────────────────────────────

/// Runs edit actions against a [`PersonalStore`].
pub struct Workflow<'a, S> {
  store: &'a S,
}

impl<'a, S: PersonalStore> Workflow<'a, S> {
  pub fn new(store: &'a S) -> Self { Self { store } }

  /// Apply `action` to `ctx`, returning the next context.
  ///
  /// On error the caller keeps its previous context.
  pub async fn apply(&self, ctx: EditContext, action: Action) -> Result<EditContext> {
    match ctx.plan(action)? {
      Effect::Stay(next) => Ok(next),
      Effect::Load(id) => {
        self
          .store
          .get_person(id)
          .await
          .map_err(Error::store)?
          .ok_or(Error::NotFound { entity: "person", id: id.get() })?;
        Ok(EditContext::Editing { id })
      }
      Effect::Create(details) => {
        let id = self
          .store
          .create_person(details.normalized()?)
          .await
          .map_err(Error::store)?;
        Ok(EditContext::Saved { id })
      }
      Effect::Update(id, update) => {
        let id = self
          .store
          .update_person(id, update)
          .await
          .map_err(Error::store)?;
        Ok(EditContext::Saved { id })
      }
      Effect::Delete(id) => {
        self.store.delete_person(id).await.map_err(Error::store)?;
        Ok(EditContext::Idle)
      }
    }
  }
}
