//! Actions dispatched through the store.

use crate::model::{StatsSnapshot, Track, TrackDraft, TrackPatch};
use crate::TrackId;

/// Which effect family an action triggers.
///
/// Latest-wins sequencing is tracked per kind: a new trigger of the same
/// kind supersedes the results of any older in-flight call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    FetchTracks,
    AddTrack,
    UpdateTrack,
    DeleteTrack,
    FetchStats,
}

/// The reducer's entire input alphabet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Load the full track list from the server
    FetchTracks,
    /// The full list arrived; replaces the local list wholesale
    TracksLoaded(Vec<Track>),
    /// A track flow failed; message lands in the tracks error slot
    TracksFailed(String),
    /// Create a track; the draft is appended optimistically
    AddTrack(TrackDraft),
    /// Apply a partial edit. Pure trigger: the state change arrives later
    /// as [`Action::TrackUpdated`]
    UpdateTrack { id: TrackId, patch: TrackPatch },
    /// Authoritative post-update record echoed by the server
    TrackUpdated(Track),
    /// Remove a track; the local removal is immediate, with no rollback
    DeleteTrack(TrackId),
    /// Load the stats snapshot from the server
    FetchStats,
    /// The stats snapshot arrived
    StatsLoaded(StatsSnapshot),
    /// The stats fetch failed
    StatsFailed(String),
}

impl Action {
    /// The effect this action triggers, if any.
    pub fn effect_kind(&self) -> Option<EffectKind> {
        match self {
            Action::FetchTracks => Some(EffectKind::FetchTracks),
            Action::AddTrack(_) => Some(EffectKind::AddTrack),
            Action::UpdateTrack { .. } => Some(EffectKind::UpdateTrack),
            Action::DeleteTrack(_) => Some(EffectKind::DeleteTrack),
            Action::FetchStats => Some(EffectKind::FetchStats),
            Action::TracksLoaded(_)
            | Action::TracksFailed(_)
            | Action::TrackUpdated(_)
            | Action::StatsLoaded(_)
            | Action::StatsFailed(_) => None,
        }
    }
}
