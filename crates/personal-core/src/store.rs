//! The `PersonalStore` trait — the data-access boundary.
//!
//! The trait is implemented by storage backends (e.g. `personal-store-sqlite`).
//! Front ends and the edit workflow depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use crate::{
  contact::{AddressInput, AddressView, ContactInput, Email, Phone},
  id::{
    AddressId, EmailId, PersonId, PhoneId, PostalCodeId, RelationshipTypeId,
  },
  person::{NewPerson, Person, PersonUpdate},
  postal::{NewPostalCode, PostalCode},
  relationship::RelationshipType,
};

/// Abstraction over a personal-records backend.
///
/// Every method is a single unit of work: it either commits completely or
/// leaves the store untouched and returns `Err`.
///
/// Conventions:
/// - `create_*`/`add_*` return the new id.
/// - `update_*` overwrite every field and return the same id; they fail when
///   the id does not exist.
/// - `delete_*` fail when the id does not exist.
/// - `get_*`/`find_*` return `None` when nothing matches.
/// - `list_*` return every matching row; there is no pagination.
///
/// Writing a contact method with `preferred = true` clears the flag on every
/// other method of the same kind belonging to the same person, atomically.
pub trait PersonalStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Relationship types ────────────────────────────────────────────────

  fn create_relationship_type(
    &self,
    label: String,
  ) -> impl Future<Output = Result<RelationshipTypeId, Self::Error>> + Send + '_;

  fn update_relationship_type(
    &self,
    id: RelationshipTypeId,
    label: String,
  ) -> impl Future<Output = Result<RelationshipTypeId, Self::Error>> + Send + '_;

  /// Delete a relationship type. People pointing at it keep existing with
  /// the reference cleared.
  fn delete_relationship_type(
    &self,
    id: RelationshipTypeId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn get_relationship_type(
    &self,
    id: RelationshipTypeId,
  ) -> impl Future<Output = Result<Option<RelationshipType>, Self::Error>> + Send + '_;

  fn list_relationship_types(
    &self,
  ) -> impl Future<Output = Result<Vec<RelationshipType>, Self::Error>> + Send + '_;

  // ── Phones ────────────────────────────────────────────────────────────

  fn add_phone(
    &self,
    person_id: PersonId,
    input: ContactInput,
  ) -> impl Future<Output = Result<PhoneId, Self::Error>> + Send + '_;

  fn update_phone(
    &self,
    id: PhoneId,
    input: ContactInput,
  ) -> impl Future<Output = Result<PhoneId, Self::Error>> + Send + '_;

  fn delete_phone(
    &self,
    id: PhoneId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Make `id` the only preferred phone of its owner.
  fn set_preferred_phone(
    &self,
    id: PhoneId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn list_phones(
    &self,
    person_id: PersonId,
  ) -> impl Future<Output = Result<Vec<Phone>, Self::Error>> + Send + '_;

  // ── Emails ────────────────────────────────────────────────────────────

  fn add_email(
    &self,
    person_id: PersonId,
    input: ContactInput,
  ) -> impl Future<Output = Result<EmailId, Self::Error>> + Send + '_;

  fn update_email(
    &self,
    id: EmailId,
    input: ContactInput,
  ) -> impl Future<Output = Result<EmailId, Self::Error>> + Send + '_;

  fn delete_email(
    &self,
    id: EmailId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Make `id` the only preferred email of its owner.
  fn set_preferred_email(
    &self,
    id: EmailId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn list_emails(
    &self,
    person_id: PersonId,
  ) -> impl Future<Output = Result<Vec<Email>, Self::Error>> + Send + '_;

  // ── Addresses ─────────────────────────────────────────────────────────

  fn add_address(
    &self,
    person_id: PersonId,
    input: AddressInput,
  ) -> impl Future<Output = Result<AddressId, Self::Error>> + Send + '_;

  fn update_address(
    &self,
    id: AddressId,
    input: AddressInput,
  ) -> impl Future<Output = Result<AddressId, Self::Error>> + Send + '_;

  fn delete_address(
    &self,
    id: AddressId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Make `id` the only preferred address of its owner.
  fn set_preferred_address(
    &self,
    id: AddressId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// List a person's addresses with their postal codes joined in.
  fn list_addresses(
    &self,
    person_id: PersonId,
  ) -> impl Future<Output = Result<Vec<AddressView>, Self::Error>> + Send + '_;

  // ── Postal codes ──────────────────────────────────────────────────────

  fn create_postal_code(
    &self,
    input: NewPostalCode,
  ) -> impl Future<Output = Result<PostalCodeId, Self::Error>> + Send + '_;

  fn update_postal_code(
    &self,
    id: PostalCodeId,
    input: NewPostalCode,
  ) -> impl Future<Output = Result<PostalCodeId, Self::Error>> + Send + '_;

  /// Delete a postal code. Fails while any address still references it.
  fn delete_postal_code(
    &self,
    id: PostalCodeId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn get_postal_code(
    &self,
    id: PostalCodeId,
  ) -> impl Future<Output = Result<Option<PostalCode>, Self::Error>> + Send + '_;

  /// Look a postal code up by its code value.
  fn find_postal_code(
    &self,
    code: String,
  ) -> impl Future<Output = Result<Option<PostalCode>, Self::Error>> + Send + '_;

  fn list_postal_codes(
    &self,
  ) -> impl Future<Output = Result<Vec<PostalCode>, Self::Error>> + Send + '_;

  /// Return the id of the postal code with `input.code`, creating it from
  /// `input` when it does not exist yet. An existing row is reused as is.
  fn resolve_postal_code(
    &self,
    input: NewPostalCode,
  ) -> impl Future<Output = Result<PostalCodeId, Self::Error>> + Send + '_;

  // ── People ────────────────────────────────────────────────────────────

  fn create_person(
    &self,
    input: NewPerson,
  ) -> impl Future<Output = Result<PersonId, Self::Error>> + Send + '_;

  fn update_person(
    &self,
    id: PersonId,
    input: PersonUpdate,
  ) -> impl Future<Output = Result<PersonId, Self::Error>> + Send + '_;

  /// Delete a person together with their phones, emails and addresses.
  /// Other people related to them keep existing with `related_to` cleared.
  fn delete_person(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn get_person(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// All people, ordered by id.
  fn list_people(
    &self,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// People whose full name contains `text`, case-insensitively.
  fn search_people(
    &self,
    text: String,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;
}
