//! Track and statistics types mirroring the server wire shapes.

use serde::{Deserialize, Serialize};

use crate::{Timestamp, TrackId};

/// A track in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Server-assigned identifier, absent on optimistic entries
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TrackId>,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    /// When the record was created (milliseconds since epoch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    /// When the record was last updated (milliseconds since epoch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

impl Track {
    /// Build the optimistic list entry for a submitted draft.
    ///
    /// The entry has no id and no timestamps; the next full fetch replaces
    /// it with the server's record.
    pub fn from_draft(draft: &TrackDraft) -> Self {
        Self {
            id: None,
            title: draft.title.clone(),
            artist: draft.artist.clone(),
            album: draft.album.clone(),
            genre: draft.genre.clone(),
            created_at: None,
            updated_at: None,
        }
    }
}

/// A fully filled-in track submitted by the add form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackDraft {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
}

/// Partial field replacement for an edit. `None` fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
}

impl TrackPatch {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.artist.is_none() && self.album.is_none() && self.genre.is_none()
    }
}

/// One `{_id, count}` breakdown entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyedCount {
    /// Group key (a genre, artist or album name)
    #[serde(rename = "_id")]
    pub key: String,
    pub count: u64,
}

/// Distinct-album count for one artist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistAlbums {
    pub artist: String,
    pub album_count: u64,
}

/// Aggregated catalog statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub total_songs: u64,
    pub total_artists: u64,
    pub total_albums: u64,
    pub total_genres: u64,
    pub songs_per_genre: Vec<KeyedCount>,
    pub songs_per_artist: Vec<KeyedCount>,
    pub albums_per_artist: Vec<ArtistAlbums>,
    pub songs_per_album: Vec<KeyedCount>,
}
