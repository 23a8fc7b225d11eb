//! Database operations for the tracks table.

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// A stored track row from the database.
#[derive(Debug, Clone)]
pub struct TrackRow {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl<'r> sqlx::FromRow<'r, sqlx::sqlite::SqliteRow> for TrackRow {
    fn from_row(row: &'r sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(TrackRow {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            artist: row.try_get("artist")?,
            album: row.try_get("album")?,
            genre: row.try_get("genre")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Partial field replacement for a track. `None` fields keep their stored
/// value.
#[derive(Debug, Clone, Default)]
pub struct TrackPatch {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
}

/// Get all tracks, newest first.
pub async fn list_tracks(pool: &SqlitePool) -> Result<Vec<TrackRow>, sqlx::Error> {
    sqlx::query_as::<_, TrackRow>(
        r#"
        SELECT id, title, artist, album, genre, created_at, updated_at
        FROM tracks
        ORDER BY created_at DESC, rowid DESC
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Get a track by id.
pub async fn find_track(pool: &SqlitePool, id: &str) -> Result<Option<TrackRow>, sqlx::Error> {
    sqlx::query_as::<_, TrackRow>(
        r#"
        SELECT id, title, artist, album, genre, created_at, updated_at
        FROM tracks
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Insert a new track. The store assigns the id and both timestamps.
pub async fn insert_track(
    pool: &SqlitePool,
    title: &str,
    artist: &str,
    album: &str,
    genre: &str,
) -> Result<TrackRow, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().timestamp_millis();

    sqlx::query_as::<_, TrackRow>(
        r#"
        INSERT INTO tracks (id, title, artist, album, genre, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING id, title, artist, album, genre, created_at, updated_at
        "#,
    )
    .bind(&id)
    .bind(title)
    .bind(artist)
    .bind(album)
    .bind(genre)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Apply a partial update and refresh `updated_at`.
///
/// Returns the post-update row, or `None` when no row matched.
pub async fn update_track(
    pool: &SqlitePool,
    id: &str,
    patch: &TrackPatch,
) -> Result<Option<TrackRow>, sqlx::Error> {
    let now = Utc::now().timestamp_millis();

    sqlx::query_as::<_, TrackRow>(
        r#"
        UPDATE tracks
        SET title      = COALESCE(?, title),
            artist     = COALESCE(?, artist),
            album      = COALESCE(?, album),
            genre      = COALESCE(?, genre),
            updated_at = ?
        WHERE id = ?
        RETURNING id, title, artist, album, genre, created_at, updated_at
        "#,
    )
    .bind(&patch.title)
    .bind(&patch.artist)
    .bind(&patch.album)
    .bind(&patch.genre)
    .bind(now)
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Remove a track permanently.
///
/// Returns the removed row, or `None` when no row matched.
pub async fn delete_track(pool: &SqlitePool, id: &str) -> Result<Option<TrackRow>, sqlx::Error> {
    sqlx::query_as::<_, TrackRow>(
        r#"
        DELETE FROM tracks
        WHERE id = ?
        RETURNING id, title, artist, album, genre, created_at, updated_at
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}
