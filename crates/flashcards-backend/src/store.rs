//! SQLite-backed card store.
//!
//! Holds the persistence contract the scheduler relies on: cards are read,
//! the scheduler computes a new memory state, and `apply_review` writes it
//! back in a single UPDATE. SQLite's single-writer semantics plus the busy
//! timeout serialize concurrent read-modify-write cycles on the same card.

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use flashcard_algo::MemoryState;

const SCHEMA: &str = include_str!("../sql/schema.sql");

/// A stored flashcard: content plus the scheduler's memory state.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Card {
    pub id: String,
    pub front: String,
    pub back: String,
    pub due_date: NaiveDate,
    pub difficulty: Option<f64>,
    pub stability: Option<f64>,
    pub last_review_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Card {
    pub fn memory_state(&self) -> MemoryState {
        MemoryState {
            difficulty: self.difficulty,
            stability: self.stability,
            due_date: self.due_date,
            last_review_date: self.last_review_date,
        }
    }
}

#[derive(Clone)]
pub struct CardStore {
    pool: SqlitePool,
}

impl CardStore {
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(30));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.apply_schema().await?;
        Ok(store)
    }

    async fn apply_schema(&self) -> Result<(), sqlx::Error> {
        for statement in SCHEMA.split(';') {
            let statement = statement.trim();
            if statement.is_empty() {
                continue;
            }
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Creates a card that is immediately due, with the memory state unset
    /// until the first review.
    pub async fn create(
        &self,
        front: &str,
        back: &str,
        today: NaiveDate,
    ) -> Result<Card, sqlx::Error> {
        let card = Card {
            id: Uuid::new_v4().to_string(),
            front: front.to_string(),
            back: back.to_string(),
            due_date: today,
            difficulty: None,
            stability: None,
            last_review_date: None,
            created_at: Utc::now(),
        };
        self.insert(&card).await?;
        Ok(card)
    }

    async fn insert(&self, card: &Card) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO "cards"
                ("id", "front", "back", "due_date", "difficulty", "stability", "last_review_date", "created_at")
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&card.id)
        .bind(&card.front)
        .bind(&card.back)
        .bind(card.due_date)
        .bind(card.difficulty)
        .bind(card.stability)
        .bind(card.last_review_date)
        .bind(card.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get(&self, id: &str) -> Result<Option<Card>, sqlx::Error> {
        sqlx::query_as::<_, Card>(r#"SELECT * FROM "cards" WHERE "id" = ?1"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn list(&self) -> Result<Vec<Card>, sqlx::Error> {
        sqlx::query_as::<_, Card>(r#"SELECT * FROM "cards" ORDER BY "created_at" ASC, "id" ASC"#)
            .fetch_all(&self.pool)
            .await
    }

    /// Cards due on or before `as_of`, most overdue first; same-day ties
    /// ordered by id so selection is deterministic.
    pub async fn list_due(&self, as_of: NaiveDate) -> Result<Vec<Card>, sqlx::Error> {
        sqlx::query_as::<_, Card>(
            r#"
            SELECT * FROM "cards"
            WHERE "due_date" <= ?1
            ORDER BY "due_date" ASC, "id" ASC
            "#,
        )
        .bind(as_of)
        .fetch_all(&self.pool)
        .await
    }

    /// Partial content edit. Returns the updated card, or `None` when the
    /// id is unknown. Single UPDATE, so a concurrent delete cannot produce
    /// a phantom edit.
    pub async fn update_content(
        &self,
        id: &str,
        front: Option<&str>,
        back: Option<&str>,
    ) -> Result<Option<Card>, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE "cards"
            SET "front" = COALESCE(?2, "front"), "back" = COALESCE(?3, "back")
            WHERE "id" = ?1
            "#,
        )
        .bind(id)
        .bind(front)
        .bind(back)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get(id).await
    }

    /// Persists the scheduler's output for one review. Single UPDATE, so a
    /// concurrent review of the same card cannot interleave partial state.
    /// Returns `false` when the card vanished between read and write.
    pub async fn apply_review(&self, id: &str, state: &MemoryState) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE "cards"
            SET "due_date" = ?2, "difficulty" = ?3, "stability" = ?4, "last_review_date" = ?5
            WHERE "id" = ?1
            "#,
        )
        .bind(id)
        .bind(state.due_date)
        .bind(state.difficulty)
        .bind(state.stability)
        .bind(state.last_review_date)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Returns `true` when a row was deleted.
    pub async fn delete(&self, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(r#"DELETE FROM "cards" WHERE "id" = ?1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn clear(&self) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(r#"DELETE FROM "cards""#)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Bulk insert for archive imports. All-or-nothing: one failed insert
    /// rolls the whole batch back.
    pub async fn import(
        &self,
        pairs: &[(String, String)],
        today: NaiveDate,
    ) -> Result<usize, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        for (front, back) in pairs {
            sqlx::query(
                r#"
                INSERT INTO "cards"
                    ("id", "front", "back", "due_date", "difficulty", "stability", "last_review_date", "created_at")
                VALUES (?1, ?2, ?3, ?4, NULL, NULL, NULL, ?5)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(front)
            .bind(back)
            .bind(today)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(pairs.len())
    }
}
