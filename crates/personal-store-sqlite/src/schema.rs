//! SQL schema for the personal SQLite store.
//!
//! Table and column names match the files written by the earlier desktop
//! application, so those files open unchanged. Executed once at connection
//! startup; `PRAGMA user_version` gates the one-off repair of older files.

use personal_core::contact::ContactKind;

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS tipo_relacion (
    id_      INTEGER PRIMARY KEY,
    relacion TEXT COLLATE NOCASE NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS codigo_postal (
    id_       INTEGER PRIMARY KEY,
    cp        TEXT NOT NULL UNIQUE,
    localidad TEXT COLLATE NOCASE NOT NULL,
    provincia TEXT COLLATE NOCASE NOT NULL,
    CONSTRAINT check_cp CHECK (length(cp) = 5)
);

CREATE TABLE IF NOT EXISTS persona (
    id_              INTEGER PRIMARY KEY,
    nif              TEXT COLLATE NOCASE NOT NULL UNIQUE,
    nombre           TEXT COLLATE NOCASE NOT NULL,
    ap1              TEXT COLLATE NOCASE NOT NULL,
    ap2              TEXT COLLATE NOCASE,
    fnac             TEXT NOT NULL,                -- YYYY-MM-DD
    relacionado_con  INTEGER REFERENCES persona(id_) ON DELETE SET NULL,
    tipo_relacion_id INTEGER REFERENCES tipo_relacion(id_) ON DELETE SET NULL,
    observ           TEXT COLLATE NOCASE,
    foto             BLOB,
    sexo             TEXT NOT NULL,                -- 'Hombre' | 'Mujer'
    CONSTRAINT check_nif  CHECK (length(nif) = 9),
    CONSTRAINT check_sexo CHECK (sexo IN ('Hombre', 'Mujer'))
);

-- At most one row per persona_id has preferencia = 1; the store keeps this
-- inside each write transaction.
CREATE TABLE IF NOT EXISTS telefono (
    id_         INTEGER PRIMARY KEY,
    persona_id  INTEGER NOT NULL REFERENCES persona(id_) ON DELETE CASCADE,
    numero      TEXT COLLATE NOCASE NOT NULL,
    preferencia INTEGER NOT NULL,
    observ      TEXT COLLATE NOCASE,
    CONSTRAINT check_preferencia CHECK (preferencia IN (0, 1))
);

CREATE TABLE IF NOT EXISTS mail (
    id_         INTEGER PRIMARY KEY,
    persona_id  INTEGER NOT NULL REFERENCES persona(id_) ON DELETE CASCADE,
    mail        TEXT COLLATE NOCASE NOT NULL,
    preferencia INTEGER NOT NULL,
    observ      TEXT COLLATE NOCASE,
    CONSTRAINT check_preferencia CHECK (preferencia IN (0, 1))
);

CREATE TABLE IF NOT EXISTS direccion (
    id_         INTEGER PRIMARY KEY,
    persona_id  INTEGER NOT NULL REFERENCES persona(id_) ON DELETE CASCADE,
    direccion   TEXT COLLATE NOCASE NOT NULL,
    cp_id       INTEGER NOT NULL REFERENCES codigo_postal(id_),
    preferencia INTEGER NOT NULL,
    observ      TEXT COLLATE NOCASE,
    CONSTRAINT check_preferencia CHECK (preferencia IN (0, 1))
);

CREATE INDEX IF NOT EXISTS telefono_persona_idx  ON telefono(persona_id);
CREATE INDEX IF NOT EXISTS mail_persona_idx      ON mail(persona_id);
CREATE INDEX IF NOT EXISTS direccion_persona_idx ON direccion(persona_id);
";

/// Value stored in `PRAGMA user_version` once a file has been brought up to
/// date.
pub const SCHEMA_VERSION: i64 = 1;

/// Files written before `user_version` was set may hold references to rows
/// that were deleted while foreign keys were not enforced. Rewriting such a
/// row with foreign keys on would fail, so they are cleared once on open.
pub const CLEAR_DANGLING_RELATIONS: &str = "
UPDATE persona SET relacionado_con = NULL
WHERE relacionado_con IS NOT NULL
  AND relacionado_con NOT IN (SELECT id_ FROM persona)";

pub const CLEAR_DANGLING_RELATIONSHIP_TYPES: &str = "
UPDATE persona SET tipo_relacion_id = NULL
WHERE tipo_relacion_id IS NOT NULL
  AND tipo_relacion_id NOT IN (SELECT id_ FROM tipo_relacion)";

/// Table holding contact methods of `kind`.
pub fn contact_table(kind: ContactKind) -> &'static str {
  match kind {
    ContactKind::Phone => "telefono",
    ContactKind::Email => "mail",
    ContactKind::Address => "direccion",
  }
}

/// Column holding the value of a phone or email row.
pub fn contact_value_column(kind: ContactKind) -> &'static str {
  match kind {
    ContactKind::Phone => "numero",
    ContactKind::Email => "mail",
    ContactKind::Address => "direccion",
  }
}
