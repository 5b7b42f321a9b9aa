//! `personal` — command-line front end for the personal records store.
//!
//! # Usage
//!
//! ```text
//! personal person add --nif 12345678A --name Ana --surname Gómez \
//!   --birth-date 1990-01-01 --sex female
//! personal postal-code add 28001 Madrid Madrid
//! personal address add 1 "Calle Mayor 1" --postal-code 28001 --preferred
//! personal report 1
//! ```
//!
//! Settings come from `personal.toml` (or `--config FILE`) and `PERSONAL_*`
//! environment variables; `--db` overrides the store path.

mod commands;
mod output;
mod settings;

use std::path::PathBuf;

use anyhow::Context as _;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use personal_core::person::Sex;
use personal_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::{output::Output, settings::CliConfig};

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "personal", author, version, about = "Personal contact records")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, value_name = "FILE", default_value = "personal.toml")]
  config: PathBuf,

  /// SQLite database file; overrides `store_path` from the config.
  #[arg(long, value_name = "FILE")]
  db: Option<PathBuf>,

  /// Print results as JSON.
  #[arg(long, global = true)]
  json: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Create, edit, relate and delete people.
  #[command(subcommand)]
  Person(PersonCommand),
  /// Manage a person's phone numbers.
  #[command(subcommand)]
  Phone(ContactCommand),
  /// Manage a person's email addresses.
  #[command(subcommand)]
  Email(ContactCommand),
  /// Manage a person's postal addresses.
  #[command(subcommand)]
  Address(AddressCommand),
  /// Manage the shared postal code table.
  #[command(subcommand)]
  PostalCode(PostalCodeCommand),
  /// Manage relationship type labels.
  #[command(subcommand)]
  Relationship(RelationshipCommand),
  /// Write the plain-text report for one person.
  Report {
    person_id: i64,
    /// Output file; defaults to `report_path` from the config.
    #[arg(long, value_name = "FILE")]
    out:       Option<PathBuf>,
  },
}

#[derive(Subcommand, Debug)]
pub enum PersonCommand {
  Add(NewPersonArgs),
  /// Change some fields of an existing person.
  Edit {
    id:     i64,
    #[command(flatten)]
    fields: PersonFields,
  },
  Show {
    id: i64,
  },
  List {
    /// Only people whose full name contains this text.
    #[arg(long)]
    search: Option<String>,
  },
  Delete {
    id: i64,
  },
  /// Relate a person to another one.
  Relate {
    id:     i64,
    target: i64,
    /// Relationship type id.
    #[arg(long)]
    kind:   Option<i64>,
  },
  /// Clear a person's relation.
  Unrelate {
    id: i64,
  },
}

#[derive(Args, Debug)]
pub struct NewPersonArgs {
  #[arg(long)]
  pub nif:            String,
  #[arg(long)]
  pub name:           String,
  #[arg(long)]
  pub surname:        String,
  #[arg(long)]
  pub second_surname: Option<String>,
  #[arg(long, value_name = "YYYY-MM-DD")]
  pub birth_date:     NaiveDate,
  /// male or female
  #[arg(long)]
  pub sex:            Sex,
  #[arg(long)]
  pub notes:          Option<String>,
  /// Image file to store as the person's photo.
  #[arg(long, value_name = "FILE")]
  pub photo:          Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct PersonFields {
  #[arg(long)]
  pub nif:            Option<String>,
  #[arg(long)]
  pub name:           Option<String>,
  #[arg(long)]
  pub surname:        Option<String>,
  /// Pass an empty string to clear.
  #[arg(long)]
  pub second_surname: Option<String>,
  #[arg(long, value_name = "YYYY-MM-DD")]
  pub birth_date:     Option<NaiveDate>,
  #[arg(long)]
  pub sex:            Option<Sex>,
  /// Pass an empty string to clear.
  #[arg(long)]
  pub notes:          Option<String>,
  #[arg(long, value_name = "FILE")]
  pub photo:          Option<PathBuf>,
  /// Remove the stored photo.
  #[arg(long, conflicts_with = "photo")]
  pub clear_photo:    bool,
}

/// Phone and email subcommands. `edit` overwrites every field, so the
/// preferred flag is cleared unless `--preferred` is passed again.
#[derive(Subcommand, Debug)]
pub enum ContactCommand {
  Add {
    person_id: i64,
    value:     String,
    #[arg(long)]
    preferred: bool,
    #[arg(long)]
    notes:     Option<String>,
  },
  Edit {
    id:        i64,
    value:     String,
    #[arg(long)]
    preferred: bool,
    #[arg(long)]
    notes:     Option<String>,
  },
  Delete {
    id: i64,
  },
  /// Make this the person's only preferred entry.
  Prefer {
    id: i64,
  },
  List {
    person_id: i64,
  },
}

#[derive(Subcommand, Debug)]
pub enum AddressCommand {
  Add {
    person_id: i64,
    #[command(flatten)]
    fields:    AddressFields,
  },
  Edit {
    id:     i64,
    #[command(flatten)]
    fields: AddressFields,
  },
  Delete {
    id: i64,
  },
  Prefer {
    id: i64,
  },
  List {
    person_id: i64,
  },
}

#[derive(Args, Debug)]
pub struct AddressFields {
  pub street:      String,
  #[arg(long)]
  pub postal_code: String,
  /// Locality and province create the postal code when it is unknown.
  #[arg(long, requires = "province")]
  pub locality:    Option<String>,
  #[arg(long, requires = "locality")]
  pub province:    Option<String>,
  #[arg(long)]
  pub preferred:   bool,
  #[arg(long)]
  pub notes:       Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum PostalCodeCommand {
  Add {
    code:     String,
    locality: String,
    province: String,
  },
  Edit {
    id:       i64,
    code:     String,
    locality: String,
    province: String,
  },
  Delete {
    id: i64,
  },
  /// Look a postal code up by its code.
  Show {
    code: String,
  },
  List,
}

#[derive(Subcommand, Debug)]
pub enum RelationshipCommand {
  Add { label: String },
  Rename { id: i64, label: String },
  Delete { id: i64 },
  List,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let mut cfg = CliConfig::load(&cli.config)?;
  if let Some(db) = &cli.db {
    cfg.store_path = settings::expand_tilde(db);
  }

  if let Some(parent) = cfg.store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }

  let store = SqliteStore::open(&cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.store_path))?;
  tracing::debug!(path = %cfg.store_path.display(), "store opened");

  let out = Output::new(cli.json);
  commands::run(cli.command, &store, &cfg, &out).await
}
