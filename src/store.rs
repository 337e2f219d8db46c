//! SQLite persistence for everything the CLI keeps between runs: the saved
//! profile, pasted text with its parsed fields, and fill cursors.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::fill::FillCursor;
use crate::parser::ParsedField;
use crate::profile::Profile;

pub type Result<T> = std::result::Result<T, StoreError>;

pub fn connect(path: &Path) -> Result<Connection> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS profile (
            key        TEXT PRIMARY KEY,
            value      TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- Pasted text blocks and what the parser made of them
        CREATE TABLE IF NOT EXISTS clips (
            id         INTEGER PRIMARY KEY,
            text       TEXT NOT NULL,
            saved_at   TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS parsed_fields (
            id         INTEGER PRIMARY KEY,
            clip_id    INTEGER NOT NULL REFERENCES clips(id),
            seq        INTEGER NOT NULL,
            label      TEXT NOT NULL,
            value      TEXT NOT NULL,
            category   TEXT,
            UNIQUE(clip_id, seq)
        );
        CREATE INDEX IF NOT EXISTS idx_parsed_clip ON parsed_fields(clip_id);

        CREATE TABLE IF NOT EXISTS fill_cursors (
            queue      TEXT PRIMARY KEY,
            position   INTEGER NOT NULL DEFAULT 0,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        ",
    )?;
    Ok(())
}

// ── Profile ──

/// Replace the stored profile with the non-empty values of `profile`.
/// The profile queue changes with it, so its cursor starts over.
pub fn save_profile(conn: &Connection, profile: &Profile) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let mut count = 0;
    tx.execute("DELETE FROM profile", [])?;
    {
        let mut stmt = tx.prepare("INSERT INTO profile (key, value) VALUES (?1, ?2)")?;
        for (key, value) in profile.entries() {
            count += stmt.execute(params![key, value])?;
        }
    }
    save_cursor_in(&tx, PROFILE_QUEUE, &FillCursor::default())?;
    tx.commit()?;
    debug!(keys = count, "saved profile");
    Ok(count)
}

/// Replace the stored profile with a JSON object using the camelCase keys.
pub fn import_profile(conn: &Connection, json: &str) -> Result<usize> {
    let profile: Profile = serde_json::from_str(json)?;
    save_profile(conn, &profile.normalized())
}

pub fn export_profile(conn: &Connection) -> Result<String> {
    Ok(serde_json::to_string_pretty(&load_profile(conn)?)?)
}

pub fn load_profile(conn: &Connection) -> Result<Profile> {
    let mut stmt = conn.prepare("SELECT key, value FROM profile ORDER BY key")?;
    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut profile = Profile::default();
    for (key, value) in rows {
        if !profile.set(&key, &value) {
            warn!(key = %key, "ignoring unknown stored profile key");
        }
    }
    Ok(profile)
}

/// Set one key. An empty value clears it. Restarts the profile queue.
pub fn set_profile_value(conn: &Connection, key: &str, value: &str) -> Result<()> {
    let mut scratch = Profile::default();
    if !scratch.set(key, value) {
        return Err(StoreError::UnknownKey(key.to_string()));
    }
    let normalized = scratch.get(key).unwrap_or_default();
    let tx = conn.unchecked_transaction()?;
    if normalized.is_empty() {
        tx.execute("DELETE FROM profile WHERE key = ?1", params![key])?;
    } else {
        tx.execute(
            "INSERT INTO profile (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
            params![key, normalized],
        )?;
    }
    save_cursor_in(&tx, PROFILE_QUEUE, &FillCursor::default())?;
    tx.commit()?;
    Ok(())
}

// ── Parsed text ──

/// Store a pasted block and its fields. A new block starts the parsed-text
/// queue over.
pub fn save_clip(conn: &Connection, text: &str, fields: &[ParsedField]) -> Result<i64> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("INSERT INTO clips (text) VALUES (?1)", params![text])?;
    let clip_id = tx.last_insert_rowid();
    {
        let mut stmt = tx.prepare(
            "INSERT INTO parsed_fields (clip_id, seq, label, value, category)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for f in fields {
            stmt.execute(params![
                clip_id,
                f.index as i64,
                f.label,
                f.value,
                f.category().map(|c| c.key()),
            ])?;
        }
    }
    save_cursor_in(&tx, PARSED_QUEUE, &FillCursor::default())?;
    tx.commit()?;
    debug!(clip_id, fields = fields.len(), "saved pasted text");
    Ok(clip_id)
}

/// Fields of the most recently saved block, in parse order.
pub fn latest_fields(conn: &Connection) -> Result<Vec<ParsedField>> {
    let clip_id: Option<i64> = conn
        .query_row("SELECT MAX(id) FROM clips", [], |row| row.get(0))
        .optional()?
        .flatten();
    let Some(clip_id) = clip_id else {
        return Ok(Vec::new());
    };
    let mut stmt = conn.prepare(
        "SELECT seq, label, value FROM parsed_fields WHERE clip_id = ?1 ORDER BY seq",
    )?;
    let rows = stmt
        .query_map(params![clip_id], |row| {
            Ok(ParsedField {
                index: row.get::<_, i64>(0)? as usize,
                label: row.get(1)?,
                value: row.get(2)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Fill cursors ──

pub const PROFILE_QUEUE: &str = "profile";
pub const PARSED_QUEUE: &str = "parsed";

pub fn load_cursor(conn: &Connection, queue: &str) -> Result<FillCursor> {
    let position: Option<i64> = conn
        .query_row(
            "SELECT position FROM fill_cursors WHERE queue = ?1",
            params![queue],
            |row| row.get(0),
        )
        .optional()?;
    Ok(FillCursor::at(position.unwrap_or(0).max(0) as usize))
}

pub fn save_cursor(conn: &Connection, queue: &str, cursor: &FillCursor) -> Result<()> {
    save_cursor_in(conn, queue, cursor)
}

fn save_cursor_in(conn: &Connection, queue: &str, cursor: &FillCursor) -> Result<()> {
    conn.execute(
        "INSERT INTO fill_cursors (queue, position) VALUES (?1, ?2)
         ON CONFLICT(queue) DO UPDATE SET position = excluded.position, updated_at = datetime('now')",
        params![queue, cursor.index as i64],
    )?;
    Ok(())
}

pub fn reset_cursors(conn: &Connection) -> Result<usize> {
    Ok(conn.execute(
        "UPDATE fill_cursors SET position = 0, updated_at = datetime('now')",
        [],
    )?)
}

// ── Stats ──

pub struct Stats {
    pub profile_keys: i64,
    pub clips: i64,
    pub parsed_fields: i64,
    pub latest_fields: i64,
    pub profile_cursor: usize,
    pub parsed_cursor: usize,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let count = |sql: &str| -> Result<i64> { Ok(conn.query_row(sql, [], |row| row.get(0))?) };
    Ok(Stats {
        profile_keys: count("SELECT COUNT(*) FROM profile")?,
        clips: count("SELECT COUNT(*) FROM clips")?,
        parsed_fields: count("SELECT COUNT(*) FROM parsed_fields")?,
        latest_fields: count(
            "SELECT COUNT(*) FROM parsed_fields WHERE clip_id = (SELECT MAX(id) FROM clips)",
        )?,
        profile_cursor: load_cursor(conn, PROFILE_QUEUE)?.index,
        parsed_cursor: load_cursor(conn, PARSED_QUEUE)?.index,
    })
}
