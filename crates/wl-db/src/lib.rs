//! Storage layer for the work log.
//!
//! Provides persistence for staff records, work sessions, categories and
//! running timers using `rusqlite`. This is the single owner of that data;
//! nothing else keeps a mutable copy.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! A `Database` instance can be moved between threads but cannot be shared
//! across threads without external synchronization.
//!
//! # Schema
//!
//! ## Date and Time Format
//!
//! Session dates are stored as TEXT `YYYY-MM-DD` and session times as TEXT
//! `HH:MM` (24-hour, `24:00` allowed, no timezone). Both sort lexicographically
//! in chronological order, so range queries and `ORDER BY` work on the raw
//! columns. Row bookkeeping (`created_at`, `updated_at`) uses RFC 3339 UTC.
//!
//! ## Categories
//!
//! Categories are keyed by [`Category::key`], the Unicode lowercase form of the
//! name. The first spelling inserted wins and is what sessions store.

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

use wl_core::clock::{format_date, parse_date};
use wl_core::{Category, HourlyRate, SessionId, StaffId, ValidationError, WallTime, WorkSession};

const INSERT_SESSION_SQL: &str = "
    INSERT INTO work_sessions
    (id, staff_id, date, start_time, end_time, description, project, category, created_at, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
";

/// Format of a timer's local start timestamp.
const TIMER_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A stored row no longer satisfies domain validation.
    #[error("invalid {table} row {id}: {source}")]
    InvalidRow {
        table: &'static str,
        id: String,
        #[source]
        source: ValidationError,
    },
    /// Failed to parse a stored timer timestamp.
    #[error("invalid timer timestamp for {staff_id}: {timestamp}")]
    TimestampParse {
        staff_id: String,
        timestamp: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

/// A staff member and their pay rate.
#[derive(Debug, Clone, PartialEq)]
pub struct StaffRecord {
    pub id: StaffId,
    pub name: String,
    pub hourly_rate: HourlyRate,
}

/// A timer that has been started but not yet stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningTimer {
    pub staff_id: StaffId,
    /// Local wall-clock start.
    pub started_at: NaiveDateTime,
    pub description: String,
    pub project: String,
    pub category: String,
}

/// Session columns as stored, before validation.
struct SessionRow {
    id: String,
    staff_id: String,
    date: String,
    start_time: String,
    end_time: String,
    description: String,
    project: String,
    category: String,
}

const SESSION_COLUMNS: &str =
    "id, staff_id, date, start_time, end_time, description, project, category";

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        tracing::debug!(path = %path.display(), "opened database");
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS staff (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                hourly_rate REAL NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            -- Work sessions: one row per recorded span
            -- date: 'YYYY-MM-DD'; start_time/end_time: 'HH:MM' (24:00 allowed)
            -- staff_id is a grouping key only, deliberately not a foreign key
            CREATE TABLE IF NOT EXISTS work_sessions (
                id TEXT PRIMARY KEY,
                staff_id TEXT NOT NULL,
                date TEXT NOT NULL,
                start_time TEXT NOT NULL,
                end_time TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                project TEXT NOT NULL DEFAULT '',
                category TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_work_sessions_staff_date
                ON work_sessions(staff_id, date);

            CREATE TABLE IF NOT EXISTS categories (
                name_key TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            -- At most one running timer per staff member
            CREATE TABLE IF NOT EXISTS timers (
                staff_id TEXT PRIMARY KEY,
                started_at TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                project TEXT NOT NULL DEFAULT '',
                category TEXT NOT NULL DEFAULT ''
            );
            ",
        )?;
        Ok(())
    }

    // ========== Staff ==========

    /// Inserts a staff member, or updates name and rate if the ID exists.
    pub fn upsert_staff(&mut self, staff: &StaffRecord) -> Result<(), DbError> {
        let now = now_timestamp();
        self.conn.execute(
            "
            INSERT INTO staff (id, name, hourly_rate, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                hourly_rate = excluded.hourly_rate,
                updated_at = excluded.updated_at
            ",
            params![
                staff.id.as_str(),
                staff.name,
                staff.hourly_rate.value(),
                now
            ],
        )?;
        tracing::info!(staff_id = %staff.id, "saved staff record");
        Ok(())
    }

    /// Looks up a staff member by ID.
    pub fn get_staff(&self, id: &StaffId) -> Result<Option<StaffRecord>, DbError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name, hourly_rate FROM staff WHERE id = ?",
                [id.as_str()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, f64>(2)?,
                    ))
                },
            )
            .optional()?;
        row.map(|(id, name, rate)| staff_from_parts(id, name, rate))
            .transpose()
    }

    /// Lists staff members ordered by ID.
    pub fn list_staff(&self) -> Result<Vec<StaffRecord>, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, hourly_rate FROM staff ORDER BY id ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, f64>(2)?,
            ))
        })?;
        let mut staff = Vec::new();
        for row in rows {
            let (id, name, rate) = row?;
            staff.push(staff_from_parts(id, name, rate)?);
        }
        Ok(staff)
    }

    // ========== Sessions ==========

    /// Inserts a new session. Fails if the ID already exists.
    pub fn insert_session(&mut self, session: &WorkSession) -> Result<(), DbError> {
        insert_session_row(&self.conn, session, &now_timestamp())?;
        tracing::info!(session_id = %session.id, staff_id = %session.staff_id, "inserted session");
        Ok(())
    }

    /// Inserts a batch of sessions, ignoring duplicates by ID.
    ///
    /// Returns the number of rows actually inserted.
    pub fn insert_sessions(&mut self, sessions: &[WorkSession]) -> Result<usize, DbError> {
        if sessions.is_empty() {
            return Ok(0);
        }
        let now = now_timestamp();
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "
                INSERT OR IGNORE INTO work_sessions
                (id, staff_id, date, start_time, end_time, description, project, category, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
                ",
            )?;
            for session in sessions {
                inserted += stmt.execute(params![
                    session.id.as_str(),
                    session.staff_id.as_str(),
                    format_date(session.date),
                    session.start_time.to_string(),
                    session.end_time.to_string(),
                    session.description,
                    session.project,
                    session.category,
                    now,
                ])?;
            }
        }
        tx.commit()?;
        tracing::info!(inserted, total = sessions.len(), "inserted session batch");
        Ok(inserted)
    }

    /// Replaces a stored session in place.
    ///
    /// Returns `false` if no session has that ID.
    pub fn update_session(&mut self, session: &WorkSession) -> Result<bool, DbError> {
        let changed = self.conn.execute(
            "
            UPDATE work_sessions
            SET staff_id = ?2, date = ?3, start_time = ?4, end_time = ?5,
                description = ?6, project = ?7, category = ?8, updated_at = ?9
            WHERE id = ?1
            ",
            params![
                session.id.as_str(),
                session.staff_id.as_str(),
                format_date(session.date),
                session.start_time.to_string(),
                session.end_time.to_string(),
                session.description,
                session.project,
                session.category,
                now_timestamp(),
            ],
        )?;
        Ok(changed > 0)
    }

    /// Deletes a session. Returns `false` if no session has that ID.
    pub fn delete_session(&mut self, id: &SessionId) -> Result<bool, DbError> {
        let changed = self
            .conn
            .execute("DELETE FROM work_sessions WHERE id = ?", [id.as_str()])?;
        if changed > 0 {
            tracing::info!(session_id = %id, "deleted session");
        }
        Ok(changed > 0)
    }

    /// Looks up a session by ID.
    pub fn get_session(&self, id: &SessionId) -> Result<Option<WorkSession>, DbError> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {SESSION_COLUMNS} FROM work_sessions WHERE id = ?"),
                [id.as_str()],
                read_session_row,
            )
            .optional()?;
        row.map(session_from_row).transpose()
    }

    /// Lists one staff member's sessions on a day, ordered by start time then ID.
    pub fn list_sessions_for_day(
        &self,
        staff_id: &StaffId,
        date: NaiveDate,
    ) -> Result<Vec<WorkSession>, DbError> {
        self.list_sessions_in_range(staff_id, date, date)
    }

    /// Lists one staff member's sessions between two dates, both inclusive.
    ///
    /// Ordered by date, start time, then ID.
    pub fn list_sessions_in_range(
        &self,
        staff_id: &StaffId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<WorkSession>, DbError> {
        let mut stmt = self.conn.prepare(&format!(
            "
            SELECT {SESSION_COLUMNS}
            FROM work_sessions
            WHERE staff_id = ?1 AND date >= ?2 AND date <= ?3
            ORDER BY date ASC, start_time ASC, id ASC
            "
        ))?;
        let rows = stmt.query_map(
            params![staff_id.as_str(), format_date(from), format_date(to)],
            read_session_row,
        )?;
        let mut sessions = Vec::new();
        for row in rows {
            sessions.push(session_from_row(row?)?);
        }
        Ok(sessions)
    }

    // ========== Categories ==========

    /// Registers a category, ignoring case-insensitive duplicates.
    ///
    /// Returns the stored spelling and whether the category was new.
    pub fn add_category(&mut self, category: &Category) -> Result<(Category, bool), DbError> {
        let key = category.key();
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO categories (name_key, name, created_at) VALUES (?, ?, ?)",
            params![key, category.as_str(), now_timestamp()],
        )?;
        if inserted > 0 {
            tracing::info!(category = %category, "registered category");
            return Ok((category.clone(), true));
        }

        let name: String = self.conn.query_row(
            "SELECT name FROM categories WHERE name_key = ?",
            [&key],
            |row| row.get(0),
        )?;
        let stored = Category::new(&name).map_err(|source| DbError::InvalidRow {
            table: "categories",
            id: key,
            source,
        })?;
        Ok((stored, false))
    }

    /// Lists categories alphabetically, ignoring case.
    pub fn list_categories(&self) -> Result<Vec<Category>, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM categories ORDER BY name_key ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut categories = Vec::new();
        for row in rows {
            let name = row?;
            let category = Category::new(&name).map_err(|source| DbError::InvalidRow {
                table: "categories",
                id: name.clone(),
                source,
            })?;
            categories.push(category);
        }
        Ok(categories)
    }

    // ========== Timers ==========

    /// Starts a timer. Returns `false` if one is already running for that staff member.
    pub fn start_timer(&mut self, timer: &RunningTimer) -> Result<bool, DbError> {
        let inserted = self.conn.execute(
            "
            INSERT OR IGNORE INTO timers (staff_id, started_at, description, project, category)
            VALUES (?, ?, ?, ?, ?)
            ",
            params![
                timer.staff_id.as_str(),
                timer.started_at.format(TIMER_TIMESTAMP_FORMAT).to_string(),
                timer.description,
                timer.project,
                timer.category,
            ],
        )?;
        Ok(inserted > 0)
    }

    /// Returns the running timer for a staff member, if any.
    pub fn running_timer(&self, staff_id: &StaffId) -> Result<Option<RunningTimer>, DbError> {
        read_timer(&self.conn, staff_id)
    }

    /// Removes and returns the running timer for a staff member.
    pub fn take_timer(&mut self, staff_id: &StaffId) -> Result<Option<RunningTimer>, DbError> {
        let tx = self.conn.transaction()?;
        let timer = read_timer(&tx, staff_id)?;
        if timer.is_some() {
            tx.execute("DELETE FROM timers WHERE staff_id = ?", [staff_id.as_str()])?;
        }
        tx.commit()?;
        Ok(timer)
    }

    /// Stops the staff member's timer and records `session` in one transaction.
    ///
    /// Returns `false`, changing nothing, if no timer is running. If the insert
    /// fails the timer is left running.
    pub fn finish_timer(&mut self, session: &WorkSession) -> Result<bool, DbError> {
        let tx = self.conn.transaction()?;
        let removed = tx.execute(
            "DELETE FROM timers WHERE staff_id = ?",
            [session.staff_id.as_str()],
        )?;
        if removed == 0 {
            return Ok(false);
        }
        insert_session_row(&tx, session, &now_timestamp())?;
        tx.commit()?;
        tracing::info!(session_id = %session.id, staff_id = %session.staff_id, "timer recorded as session");
        Ok(true)
    }
}

fn insert_session_row(
    conn: &Connection,
    session: &WorkSession,
    now: &str,
) -> rusqlite::Result<usize> {
    conn.execute(
        INSERT_SESSION_SQL,
        params![
            session.id.as_str(),
            session.staff_id.as_str(),
            format_date(session.date),
            session.start_time.to_string(),
            session.end_time.to_string(),
            session.description,
            session.project,
            session.category,
            now,
        ],
    )
}

fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn staff_from_parts(id: String, name: String, rate: f64) -> Result<StaffRecord, DbError> {
    let invalid = |source| DbError::InvalidRow {
        table: "staff",
        id: id.clone(),
        source,
    };
    let hourly_rate = HourlyRate::new(rate).map_err(invalid)?;
    let staff_id = StaffId::new(id.clone()).map_err(invalid)?;
    Ok(StaffRecord {
        id: staff_id,
        name,
        hourly_rate,
    })
}

fn read_session_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<SessionRow> {
    Ok(SessionRow {
        id: row.get(0)?,
        staff_id: row.get(1)?,
        date: row.get(2)?,
        start_time: row.get(3)?,
        end_time: row.get(4)?,
        description: row.get(5)?,
        project: row.get(6)?,
        category: row.get(7)?,
    })
}

fn session_from_row(row: SessionRow) -> Result<WorkSession, DbError> {
    let parsed = (|| {
        let id = SessionId::new(row.id.clone())?;
        let staff_id = StaffId::new(row.staff_id)?;
        let date = parse_date(&row.date)?;
        let start = WallTime::parse(&row.start_time)?;
        let end = WallTime::parse(&row.end_time)?;
        let session = WorkSession::new(id, staff_id, date, start, end)?
            .with_description(row.description)
            .with_project(row.project)
            .with_category(row.category);
        Ok::<_, ValidationError>(session)
    })();
    parsed.map_err(|source| DbError::InvalidRow {
        table: "work_sessions",
        id: row.id,
        source,
    })
}

fn read_timer(conn: &Connection, staff_id: &StaffId) -> Result<Option<RunningTimer>, DbError> {
    let row = conn
        .query_row(
            "
            SELECT started_at, description, project, category
            FROM timers
            WHERE staff_id = ?
            ",
            [staff_id.as_str()],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            },
        )
        .optional()?;

    let Some((started_at, description, project, category)) = row else {
        return Ok(None);
    };
    let started_at = NaiveDateTime::parse_from_str(&started_at, TIMER_TIMESTAMP_FORMAT)
        .map_err(|source| DbError::TimestampParse {
            staff_id: staff_id.to_string(),
            timestamp: started_at.clone(),
            source,
        })?;
    Ok(Some(RunningTimer {
        staff_id: staff_id.clone(),
        started_at,
        description,
        project,
        category,
    }))
}
