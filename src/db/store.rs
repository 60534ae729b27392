use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Error as SqlxError, FromRow};
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

/// Seed content for the file every new room starts with.
const DEFAULT_FILE_NAME: &str = "main.py";
const DEFAULT_FILE_CONTENT: &str =
    "# Welcome to Pair Programming!\n# Start coding together...\n\nprint('Hello World')";

/// Idempotent schema, applied at startup.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS rooms (
        id UUID PRIMARY KEY,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS users (
        id SERIAL PRIMARY KEY,
        username TEXT NOT NULL,
        room_id UUID NOT NULL REFERENCES rooms(id) ON DELETE CASCADE,
        joined_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        is_online BOOLEAN NOT NULL DEFAULT TRUE,
        last_seen TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS files (
        id SERIAL PRIMARY KEY,
        filename TEXT NOT NULL,
        content TEXT NOT NULL DEFAULT '',
        room_id UUID NOT NULL REFERENCES rooms(id) ON DELETE CASCADE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS code_executions (
        id SERIAL PRIMARY KEY,
        room_id UUID NOT NULL REFERENCES rooms(id) ON DELETE CASCADE,
        code TEXT NOT NULL,
        output TEXT NOT NULL,
        executed_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
];

/// Room row from the database
#[derive(Debug, Clone, FromRow)]
pub struct RoomRow {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// File row from the database
#[derive(Debug, Clone, FromRow)]
pub struct FileRow {
    pub id: i32,
    pub filename: String,
    pub content: String,
    pub room_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Execution row from the database
#[derive(Debug, Clone, FromRow)]
pub struct ExecutionRow {
    pub id: i32,
    pub code: String,
    pub output: String,
    pub executed_at: DateTime<Utc>,
}

/// Database connection pool
pub struct Store {
    pool: PgPool,
}

impl Store {
    /// Create a new database connection pool
    ///
    /// # Arguments
    /// * `database_url` - PostgreSQL connection string
    pub async fn connect(database_url: &str) -> Result<Self, SqlxError> {
        info!("Connecting to database...");

        let pool = PgPoolOptions::new()
            .max_connections(20)
            .min_connections(2)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .connect(database_url)
            .await?;

        info!("Database connection pool created successfully");

        Ok(Self { pool })
    }

    /// Apply the schema. Safe to run on every startup.
    pub async fn ensure_schema(&self) -> Result<(), SqlxError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Cheap connectivity probe for the health endpoint.
    pub async fn ping(&self) -> Result<(), SqlxError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Create a room together with its seeded default file.
    pub async fn create_room(&self) -> Result<Uuid, SqlxError> {
        let room_id = Uuid::new_v4();
        let mut tx = self.pool.begin().await?;
        sqlx::query("INSERT INTO rooms (id) VALUES ($1)")
            .bind(room_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("INSERT INTO files (filename, content, room_id) VALUES ($1, $2, $3)")
            .bind(DEFAULT_FILE_NAME)
            .bind(DEFAULT_FILE_CONTENT)
            .bind(room_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(room_id)
    }

    pub async fn get_room(&self, room_id: Uuid) -> Result<Option<RoomRow>, SqlxError> {
        sqlx::query_as::<_, RoomRow>("SELECT id, created_at FROM rooms WHERE id = $1")
            .bind(room_id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn room_exists(&self, room_id: Uuid) -> Result<bool, SqlxError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM rooms WHERE id = $1)")
            .bind(room_id)
            .fetch_one(&self.pool)
            .await
    }

    pub async fn list_files(&self, room_id: Uuid) -> Result<Vec<FileRow>, SqlxError> {
        sqlx::query_as::<_, FileRow>(
            "SELECT id, filename, content, room_id, created_at, updated_at
             FROM files WHERE room_id = $1 ORDER BY id",
        )
        .bind(room_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn create_file(&self, room_id: Uuid, filename: &str) -> Result<FileRow, SqlxError> {
        sqlx::query_as::<_, FileRow>(
            "INSERT INTO files (filename, room_id) VALUES ($1, $2)
             RETURNING id, filename, content, room_id, created_at, updated_at",
        )
        .bind(filename)
        .bind(room_id)
        .fetch_one(&self.pool)
        .await
    }

    /// Replace a file's content. Returns false when the file does not exist.
    pub async fn update_file(&self, file_id: i32, content: &str) -> Result<bool, SqlxError> {
        let result = sqlx::query("UPDATE files SET content = $2, updated_at = now() WHERE id = $1")
            .bind(file_id)
            .bind(content)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a file. Returns false when the file does not exist.
    pub async fn delete_file(&self, file_id: i32) -> Result<bool, SqlxError> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(file_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count_files(&self, room_id: Uuid) -> Result<i64, SqlxError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM files WHERE room_id = $1")
            .bind(room_id)
            .fetch_one(&self.pool)
            .await
    }

    /// Store one execution record and return its id.
    pub async fn insert_execution(
        &self,
        room_id: Uuid,
        code: &str,
        output: &str,
    ) -> Result<i32, SqlxError> {
        sqlx::query_scalar::<_, i32>(
            "INSERT INTO code_executions (room_id, code, output) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(room_id)
        .bind(code)
        .bind(output)
        .fetch_one(&self.pool)
        .await
    }

    /// Most recent executions for a room, newest first.
    pub async fn list_executions(
        &self,
        room_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ExecutionRow>, SqlxError> {
        sqlx::query_as::<_, ExecutionRow>(
            "SELECT id, code, output, executed_at
             FROM code_executions WHERE room_id = $1
             ORDER BY executed_at DESC LIMIT $2",
        )
        .bind(room_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    /// Record that a participant came online in a room.
    pub async fn record_session_start(&self, username: &str, room_id: Uuid) -> Result<(), SqlxError> {
        sqlx::query("INSERT INTO users (username, room_id, is_online) VALUES ($1, $2, TRUE)")
            .bind(username)
            .bind(room_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Flip the participant's most recent open session to offline. A missing
    /// row is not an error; the live registry already forgot the connection.
    pub async fn record_session_end(&self, username: &str, room_id: Uuid) -> Result<(), SqlxError> {
        sqlx::query(
            "UPDATE users SET is_online = FALSE, last_seen = now()
             WHERE id = (
                 SELECT id FROM users
                 WHERE username = $1 AND room_id = $2 AND is_online
                 ORDER BY joined_at DESC
                 LIMIT 1
             )",
        )
        .bind(username)
        .bind(room_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
