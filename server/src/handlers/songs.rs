//! Song handlers - request validation and store orchestration.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{self, Pool, TrackPatch, TrackRow};
use crate::error::{AppError, Result};

/// A track record as it appears on the wire.
#[derive(Debug, Serialize)]
pub struct Song {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    #[serde(rename = "createdAt")]
    pub created_at: i64,
    #[serde(rename = "updatedAt")]
    pub updated_at: i64,
}

impl From<TrackRow> for Song {
    fn from(row: TrackRow) -> Self {
        Song {
            id: row.id,
            title: row.title,
            artist: row.artist,
            album: row.album,
            genre: row.genre,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Request body for creating a song.
///
/// Every field is optional at the parsing layer so validation can collect
/// all missing fields at once instead of rejecting on the first.
#[derive(Debug, Default, Deserialize)]
pub struct CreateSong {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
}

/// Request body for a partial update. Absent fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateSong {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
}

/// List the full catalog, newest first.
pub async fn handle_list(pool: &Pool) -> Result<Vec<Song>> {
    let rows = db::list_tracks(pool).await?;
    Ok(rows.into_iter().map(Song::from).collect())
}

/// Fetch one song by its path id.
pub async fn handle_get(pool: &Pool, id: &str) -> Result<Song> {
    let id = parse_song_id(id)?;
    let row = db::find_track(pool, &id).await?.ok_or(AppError::NoSuchSong)?;
    Ok(row.into())
}

/// Create a song after checking that all four fields are filled in.
pub async fn handle_create(pool: &Pool, request: CreateSong) -> Result<Song> {
    let empty_fields = collect_empty_fields(&request);
    if !empty_fields.is_empty() {
        return Err(AppError::EmptyFields(empty_fields));
    }

    // Validation above guarantees every field is present.
    let row = db::insert_track(
        pool,
        request.title.as_deref().unwrap_or_default(),
        request.artist.as_deref().unwrap_or_default(),
        request.album.as_deref().unwrap_or_default(),
        request.genre.as_deref().unwrap_or_default(),
    )
    .await?;
    Ok(row.into())
}

/// Apply a partial update; returns the post-update record.
pub async fn handle_update(pool: &Pool, id: &str, request: UpdateSong) -> Result<Song> {
    let id = parse_song_id(id)?;
    let patch = TrackPatch {
        title: request.title,
        artist: request.artist,
        album: request.album,
        genre: request.genre,
    };
    let row = db::update_track(pool, &id, &patch)
        .await?
        .ok_or(AppError::NoSuchSong)?;
    Ok(row.into())
}

/// Delete a song; returns the removed record's last snapshot.
pub async fn handle_delete(pool: &Pool, id: &str) -> Result<Song> {
    let id = parse_song_id(id)?;
    let row = db::delete_track(pool, &id)
        .await?
        .ok_or(AppError::NoSuchSong)?;
    Ok(row.into())
}

/// Names of the required fields that are missing or whitespace-only, in
/// declaration order.
fn collect_empty_fields(request: &CreateSong) -> Vec<String> {
    let fields = [
        ("title", &request.title),
        ("artist", &request.artist),
        ("album", &request.album),
        ("genre", &request.genre),
    ];

    fields
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_none_or(|v| v.trim().is_empty()))
        .map(|(name, _)| name.to_string())
        .collect()
}

/// Validate a path id.
///
/// Malformed ids get the same answer as unknown ones; the caller cannot
/// tell them apart. Well-formed ids are normalized to the stored
/// hyphenated-lowercase form.
fn parse_song_id(id: &str) -> Result<String> {
    let parsed = Uuid::parse_str(id).map_err(|_| AppError::NoSuchSong)?;
    Ok(parsed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_fields_are_collected_in_declaration_order() {
        let request = CreateSong {
            title: None,
            artist: Some("Queen".to_string()),
            album: Some("   ".to_string()),
            genre: Some(String::new()),
        };

        assert_eq!(collect_empty_fields(&request), vec!["title", "album", "genre"]);
    }

    #[test]
    fn a_fully_filled_request_has_no_empty_fields() {
        let request = CreateSong {
            title: Some("Bohemian Rhapsody".to_string()),
            artist: Some("Queen".to_string()),
            album: Some("A Night at the Opera".to_string()),
            genre: Some("Rock".to_string()),
        };

        assert!(collect_empty_fields(&request).is_empty());
    }

    #[test]
    fn an_empty_body_reports_all_four_fields() {
        assert_eq!(
            collect_empty_fields(&CreateSong::default()),
            vec!["title", "artist", "album", "genre"]
        );
    }

    #[test]
    fn malformed_ids_are_rejected_as_no_such_song() {
        assert!(matches!(
            parse_song_id("not-a-uuid"),
            Err(AppError::NoSuchSong)
        ));
        assert!(matches!(parse_song_id(""), Err(AppError::NoSuchSong)));
    }

    #[test]
    fn well_formed_ids_are_normalized() {
        let id = parse_song_id("9F1C7E1A-0000-4000-8000-000000000001").unwrap();
        assert_eq!(id, "9f1c7e1a-0000-4000-8000-000000000001");
    }

    #[test]
    fn songs_serialize_with_the_wire_field_names() {
        let song = Song {
            id: "9f1c7e1a-0000-4000-8000-000000000001".to_string(),
            title: "Paranoid".to_string(),
            artist: "Black Sabbath".to_string(),
            album: "Paranoid".to_string(),
            genre: "Metal".to_string(),
            created_at: 1_706_745_600_000,
            updated_at: 1_706_832_000_000,
        };

        let value = serde_json::to_value(&song).unwrap();
        assert_eq!(value["_id"], "9f1c7e1a-0000-4000-8000-000000000001");
        assert_eq!(value["createdAt"], 1_706_745_600_000i64);
        assert_eq!(value["updatedAt"], 1_706_832_000_000i64);
        assert!(value.get("id").is_none());
    }

    #[test]
    fn update_bodies_tolerate_partial_json() {
        let request: UpdateSong = serde_json::from_str(r#"{"genre": "Jazz"}"#).unwrap();
        assert_eq!(request.genre.as_deref(), Some("Jazz"));
        assert!(request.title.is_none());

        let empty: UpdateSong = serde_json::from_str("{}").unwrap();
        assert!(empty.title.is_none() && empty.genre.is_none());
    }
}
