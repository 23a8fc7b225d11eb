//! Aggregation queries for the statistics snapshot.

use serde::Serialize;
use sqlx::{Row, SqlitePool};

/// One `{_id, count}` breakdown entry.
#[derive(Debug, Clone, Serialize)]
pub struct KeyedCount {
    /// Group key: a genre, artist or album name
    #[serde(rename = "_id")]
    pub key: String,
    pub count: i64,
}

impl<'r> sqlx::FromRow<'r, sqlx::sqlite::SqliteRow> for KeyedCount {
    fn from_row(row: &'r sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(KeyedCount {
            key: row.try_get("label")?,
            count: row.try_get("count")?,
        })
    }
}

/// Distinct-album count for one artist.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistAlbums {
    pub artist: String,
    pub album_count: i64,
}

impl<'r> sqlx::FromRow<'r, sqlx::sqlite::SqliteRow> for ArtistAlbums {
    fn from_row(row: &'r sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(ArtistAlbums {
            artist: row.try_get("artist")?,
            album_count: row.try_get("album_count")?,
        })
    }
}

/// The derived statistics view over the whole catalog.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub total_songs: i64,
    pub total_artists: i64,
    pub total_albums: i64,
    pub total_genres: i64,
    pub songs_per_genre: Vec<KeyedCount>,
    pub songs_per_artist: Vec<KeyedCount>,
    pub albums_per_artist: Vec<ArtistAlbums>,
    pub songs_per_album: Vec<KeyedCount>,
}

/// Compute the statistics snapshot for the current catalog.
///
/// Five independent queries over the full table, no filtering or time
/// bounds. An empty table yields zero counts and empty breakdowns.
pub async fn compute_stats(pool: &SqlitePool) -> Result<StatsSnapshot, sqlx::Error> {
    let totals = sqlx::query(
        r#"
        SELECT COUNT(*)               AS total_songs,
               COUNT(DISTINCT artist) AS total_artists,
               COUNT(DISTINCT album)  AS total_albums,
               COUNT(DISTINCT genre)  AS total_genres
        FROM tracks
        "#,
    )
    .fetch_one(pool)
    .await?;

    let songs_per_genre = sqlx::query_as::<_, KeyedCount>(
        r#"
        SELECT genre AS label, COUNT(*) AS count
        FROM tracks
        GROUP BY genre
        "#,
    )
    .fetch_all(pool)
    .await?;

    let songs_per_artist = sqlx::query_as::<_, KeyedCount>(
        r#"
        SELECT artist AS label, COUNT(*) AS count
        FROM tracks
        GROUP BY artist
        "#,
    )
    .fetch_all(pool)
    .await?;

    let albums_per_artist = sqlx::query_as::<_, ArtistAlbums>(
        r#"
        SELECT artist, COUNT(DISTINCT album) AS album_count
        FROM tracks
        GROUP BY artist
        "#,
    )
    .fetch_all(pool)
    .await?;

    let songs_per_album = sqlx::query_as::<_, KeyedCount>(
        r#"
        SELECT album AS label, COUNT(*) AS count
        FROM tracks
        GROUP BY album
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(StatsSnapshot {
        total_songs: totals.try_get("total_songs")?,
        total_artists: totals.try_get("total_artists")?,
        total_albums: totals.try_get("total_albums")?,
        total_genres: totals.try_get("total_genres")?,
        songs_per_genre,
        songs_per_artist,
        albums_per_artist,
        songs_per_album,
    })
}
