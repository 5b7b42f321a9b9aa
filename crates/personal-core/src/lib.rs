//! Core types and trait definitions for the personal records store.
//!
//! This crate is deliberately free of database dependencies. Backends
//! implement [`store::PersonalStore`]; front ends drive it through
//! [`workflow::Workflow`].

pub mod contact;
pub mod error;
pub mod id;
pub mod person;
pub mod postal;
pub mod relationship;
pub mod report;
pub mod store;
pub mod workflow;

pub use error::{Error, Result};
