//! SQLite-based plan storage.
//!
//! Provides persistent storage for:
//! - Generated study plans, keyed by owner and creation time
//! - Per-item completion flags
//!
//! The "current plan" of an owner is the most recently created one.

use std::path::Path;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::DatabaseError;
use crate::plan::{PlanItem, PlanSummary, StudyPlan};

const INSTANT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A plan item together with its storage identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredItem {
    pub id: String,
    #[serde(flatten)]
    pub item: PlanItem,
}

/// A persisted planning run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredPlan {
    pub id: String,
    pub owner: String,
    pub created_at: DateTime<Utc>,
    pub items: Vec<StoredItem>,
}

impl StoredPlan {
    pub fn summary(&self) -> PlanSummary {
        PlanSummary::from_items(self.items.iter().map(|stored| &stored.item))
    }

    pub fn to_plan(&self) -> StudyPlan {
        StudyPlan::new(self.items.iter().map(|stored| stored.item.clone()).collect())
    }
}

/// SQLite database for plan storage.
pub struct PlanDb {
    conn: Connection,
}

impl PlanDb {
    /// Open the database at `~/.config/studyplan/studyplan.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, DatabaseError> {
        let dir = data_dir().map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
        Self::open_at(&dir.join("studyplan.db"))
    }

    pub fn open_at(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS plans (
                id          TEXT PRIMARY KEY,
                owner       TEXT NOT NULL,
                created_at  TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS plan_items (
                id          TEXT PRIMARY KEY,
                plan_id     TEXT NOT NULL REFERENCES plans(id) ON DELETE CASCADE,
                position    INTEGER NOT NULL,
                subject     TEXT,
                title       TEXT NOT NULL,
                start_at    TEXT NOT NULL,
                end_at      TEXT NOT NULL,
                completed   INTEGER NOT NULL DEFAULT 0
            );

            CREATE INDEX IF NOT EXISTS idx_plans_owner_created ON plans(owner, created_at);
            CREATE INDEX IF NOT EXISTS idx_plan_items_plan ON plan_items(plan_id, position);",
        )?;
        Ok(())
    }

    /// Store `plan` as the newest plan of `owner`.
    pub fn save_plan(&mut self, owner: &str, plan: &StudyPlan) -> Result<StoredPlan, DatabaseError> {
        self.save_plan_at(owner, plan, Utc::now())
    }

    /// Store `plan` with an explicit creation time.
    pub fn save_plan_at(
        &mut self,
        owner: &str,
        plan: &StudyPlan,
        created_at: DateTime<Utc>,
    ) -> Result<StoredPlan, DatabaseError> {
        let plan_id = uuid::Uuid::new_v4().to_string();
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO plans (id, owner, created_at) VALUES (?1, ?2, ?3)",
            params![
                plan_id,
                owner,
                created_at.to_rfc3339_opts(SecondsFormat::Micros, true)
            ],
        )?;

        let mut items = Vec::with_capacity(plan.len());
        {
            let mut stmt = tx.prepare(
                "INSERT INTO plan_items (id, plan_id, position, subject, title, start_at, end_at, completed)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for (position, item) in plan.items.iter().enumerate() {
                let id = uuid::Uuid::new_v4().to_string();
                stmt.execute(params![
                    id,
                    plan_id,
                    position as i64,
                    item.subject,
                    item.title,
                    item.start.format(INSTANT_FORMAT).to_string(),
                    item.end.format(INSTANT_FORMAT).to_string(),
                    item.completed,
                ])?;
                items.push(StoredItem {
                    id,
                    item: item.clone(),
                });
            }
        }
        tx.commit()?;

        tracing::info!(owner, plan_id = %plan_id, items = items.len(), "plan saved");
        Ok(StoredPlan {
            id: plan_id,
            owner: owner.to_string(),
            created_at,
            items,
        })
    }

    fn latest_plan_row(&self, owner: &str) -> Result<Option<(String, String)>, DatabaseError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, created_at FROM plans
                 WHERE owner = ?1
                 ORDER BY created_at DESC, rowid DESC
                 LIMIT 1",
                params![owner],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;
        Ok(row)
    }

    /// The owner's current plan, if any.
    pub fn latest_plan(&self, owner: &str) -> Result<Option<StoredPlan>, DatabaseError> {
        let Some((plan_id, created_at)) = self.latest_plan_row(owner)? else {
            return Ok(None);
        };
        let created_at = DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| DatabaseError::Corrupt(format!("plan {plan_id} created_at: {e}")))?
            .with_timezone(&Utc);

        let mut stmt = self.conn.prepare(
            "SELECT id, subject, title, start_at, end_at, completed
             FROM plan_items
             WHERE plan_id = ?1
             ORDER BY position",
        )?;
        let rows = stmt.query_map(params![plan_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, bool>(5)?,
            ))
        })?;

        let mut items = Vec::new();
        for row in rows {
            let (id, subject, title, start_at, end_at, completed) = row?;
            items.push(StoredItem {
                item: PlanItem {
                    subject,
                    title,
                    start: parse_instant(&id, &start_at)?,
                    end: parse_instant(&id, &end_at)?,
                    completed,
                },
                id,
            });
        }

        Ok(Some(StoredPlan {
            id: plan_id,
            owner: owner.to_string(),
            created_at,
            items,
        }))
    }

    /// Set the completion flag of one item of the owner's current plan.
    pub fn set_item_completed(
        &self,
        owner: &str,
        item_id: &str,
        completed: bool,
    ) -> Result<(), DatabaseError> {
        let (plan_id, _) = self.latest_plan_row(owner)?.ok_or_else(|| DatabaseError::NoPlan {
            owner: owner.to_string(),
        })?;
        let changed = self.conn.execute(
            "UPDATE plan_items SET completed = ?1 WHERE id = ?2 AND plan_id = ?3",
            params![completed, item_id, plan_id],
        )?;
        if changed == 0 {
            return Err(DatabaseError::ItemNotFound {
                item_id: item_id.to_string(),
            });
        }
        Ok(())
    }

    /// Flip the completion flag of one item of the owner's current plan.
    /// Returns the new value.
    pub fn toggle_item(&self, owner: &str, item_id: &str) -> Result<bool, DatabaseError> {
        let (plan_id, _) = self.latest_plan_row(owner)?.ok_or_else(|| DatabaseError::NoPlan {
            owner: owner.to_string(),
        })?;
        let current: Option<bool> = self
            .conn
            .query_row(
                "SELECT completed FROM plan_items WHERE id = ?1 AND plan_id = ?2",
                params![item_id, plan_id],
                |row| row.get(0),
            )
            .optional()?;
        let current = current.ok_or_else(|| DatabaseError::ItemNotFound {
            item_id: item_id.to_string(),
        })?;
        self.set_item_completed(owner, item_id, !current)?;
        Ok(!current)
    }
}

fn parse_instant(item_id: &str, value: &str) -> Result<NaiveDateTime, DatabaseError> {
    NaiveDateTime::parse_from_str(value, INSTANT_FORMAT)
        .map_err(|e| DatabaseError::Corrupt(format!("item {item_id} time '{value}': {e}")))
}
