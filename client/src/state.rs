//! Client state slices and the pure reducer.

use crate::action::Action;
use crate::model::{StatsSnapshot, Track};

/// The track list slice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TracksState {
    /// All loaded tracks, newest first (server ordering)
    pub tracks: Vec<Track>,
    /// A list fetch is in flight
    pub loading: bool,
    /// Message from the most recent failed track flow
    pub error: Option<String>,
}

/// The statistics slice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsState {
    pub stats: StatsSnapshot,
    /// A stats fetch is in flight
    pub loading: bool,
    /// Message from the most recent failed stats fetch
    pub error: Option<String>,
}

/// The whole client state: both slices together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub tracks: TracksState,
    pub stats: StatsState,
}

impl AppState {
    /// Apply one action to the state.
    ///
    /// Pure and synchronous: no IO here. Effects are launched by the runner
    /// after reduction, never from inside it.
    pub fn reduce(&mut self, action: &Action) {
        match action {
            Action::FetchTracks => {
                self.tracks.loading = true;
                self.tracks.error = None;
            }
            Action::TracksLoaded(tracks) => {
                self.tracks.tracks = tracks.clone();
                self.tracks.loading = false;
            }
            Action::TracksFailed(message) => {
                self.tracks.error = Some(message.clone());
                self.tracks.loading = false;
            }
            Action::AddTrack(draft) => {
                self.tracks.tracks.push(Track::from_draft(draft));
            }
            // Pure trigger; the authoritative record arrives as TrackUpdated.
            Action::UpdateTrack { .. } => {}
            Action::TrackUpdated(track) => {
                let updated = self
                    .tracks
                    .tracks
                    .iter_mut()
                    .find(|t| t.id.is_some() && t.id == track.id);
                if let Some(existing) = updated {
                    *existing = track.clone();
                }
            }
            Action::DeleteTrack(id) => {
                self.tracks.tracks.retain(|t| t.id.as_deref() != Some(id));
            }
            Action::FetchStats => {
                self.stats.loading = true;
                self.stats.error = None;
            }
            Action::StatsLoaded(stats) => {
                self.stats.stats = stats.clone();
                self.stats.loading = false;
            }
            Action::StatsFailed(message) => {
                self.stats.error = Some(message.clone());
                self.stats.loading = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TrackDraft;

    fn track(id: &str, title: &str, genre: &str) -> Track {
        Track {
            id: Some(id.to_string()),
            title: title.to_string(),
            artist: "Artist".to_string(),
            album: "Album".to_string(),
            genre: genre.to_string(),
            created_at: Some(1_700_000_000_000),
            updated_at: Some(1_700_000_000_000),
        }
    }

    fn draft(title: &str) -> TrackDraft {
        TrackDraft {
            title: title.to_string(),
            artist: "Artist".to_string(),
            album: "Album".to_string(),
            genre: "Rock".to_string(),
        }
    }

    #[test]
    fn fetch_sets_loading_and_clears_error() {
        let mut state = AppState::default();
        state.tracks.error = Some("old failure".to_string());

        state.reduce(&Action::FetchTracks);

        assert!(state.tracks.loading);
        assert_eq!(state.tracks.error, None);
    }

    #[test]
    fn loaded_replaces_the_list_wholesale() {
        let mut state = AppState::default();
        state.reduce(&Action::AddTrack(draft("Optimistic")));
        state.reduce(&Action::FetchTracks);

        state.reduce(&Action::TracksLoaded(vec![track("a", "One", "Rock")]));

        assert!(!state.tracks.loading);
        assert_eq!(state.tracks.tracks.len(), 1);
        assert_eq!(state.tracks.tracks[0].title, "One");
    }

    #[test]
    fn failed_stores_the_message_and_stops_loading() {
        let mut state = AppState::default();
        state.reduce(&Action::FetchTracks);

        state.reduce(&Action::TracksFailed("Database error".to_string()));

        assert!(!state.tracks.loading);
        assert_eq!(state.tracks.error.as_deref(), Some("Database error"));
    }

    #[test]
    fn add_appends_an_optimistic_entry_without_id() {
        let mut state = AppState::default();
        state.reduce(&Action::TracksLoaded(vec![track("a", "One", "Rock")]));

        state.reduce(&Action::AddTrack(draft("Two")));

        assert_eq!(state.tracks.tracks.len(), 2);
        let added = &state.tracks.tracks[1];
        assert_eq!(added.id, None);
        assert_eq!(added.title, "Two");
        assert_eq!(added.created_at, None);
    }

    #[test]
    fn update_trigger_changes_nothing() {
        let mut state = AppState::default();
        state.reduce(&Action::TracksLoaded(vec![track("a", "One", "Rock")]));
        let before = state.clone();

        state.reduce(&Action::UpdateTrack {
            id: "a".to_string(),
            patch: Default::default(),
        });

        assert_eq!(state, before);
    }

    #[test]
    fn updated_replaces_the_matching_record_in_place() {
        let mut state = AppState::default();
        state.reduce(&Action::TracksLoaded(vec![
            track("a", "One", "Rock"),
            track("b", "Two", "Jazz"),
        ]));

        let mut echo = track("b", "Two (remastered)", "Jazz");
        echo.updated_at = Some(1_700_000_100_000);
        state.reduce(&Action::TrackUpdated(echo));

        assert_eq!(state.tracks.tracks.len(), 2);
        assert_eq!(state.tracks.tracks[0].title, "One");
        assert_eq!(state.tracks.tracks[1].title, "Two (remastered)");
        assert_eq!(state.tracks.tracks[1].updated_at, Some(1_700_000_100_000));
    }

    #[test]
    fn updated_with_unknown_id_is_a_no_op() {
        let mut state = AppState::default();
        state.reduce(&Action::TracksLoaded(vec![track("a", "One", "Rock")]));
        let before = state.clone();

        state.reduce(&Action::TrackUpdated(track("missing", "Ghost", "Rock")));

        assert_eq!(state, before);
    }

    #[test]
    fn updated_never_touches_optimistic_entries() {
        let mut state = AppState::default();
        state.reduce(&Action::AddTrack(draft("Pending")));

        let mut echo = track("a", "Other", "Rock");
        echo.id = None;
        state.reduce(&Action::TrackUpdated(echo));

        assert_eq!(state.tracks.tracks[0].title, "Pending");
    }

    #[test]
    fn delete_removes_the_matching_record_immediately() {
        let mut state = AppState::default();
        state.reduce(&Action::TracksLoaded(vec![
            track("a", "One", "Rock"),
            track("b", "Two", "Jazz"),
        ]));

        state.reduce(&Action::DeleteTrack("a".to_string()));

        assert_eq!(state.tracks.tracks.len(), 1);
        assert_eq!(state.tracks.tracks[0].id.as_deref(), Some("b"));
    }

    #[test]
    fn delete_with_unknown_id_is_a_no_op() {
        let mut state = AppState::default();
        state.reduce(&Action::TracksLoaded(vec![track("a", "One", "Rock")]));

        state.reduce(&Action::DeleteTrack("missing".to_string()));

        assert_eq!(state.tracks.tracks.len(), 1);
    }

    #[test]
    fn stats_fetch_load_and_fail_mirror_the_tracks_slice() {
        let mut state = AppState::default();
        state.stats.error = Some("old".to_string());

        state.reduce(&Action::FetchStats);
        assert!(state.stats.loading);
        assert_eq!(state.stats.error, None);

        let snapshot = StatsSnapshot {
            total_songs: 3,
            ..Default::default()
        };
        state.reduce(&Action::StatsLoaded(snapshot));
        assert!(!state.stats.loading);
        assert_eq!(state.stats.stats.total_songs, 3);

        state.reduce(&Action::FetchStats);
        state.reduce(&Action::StatsFailed("unreachable".to_string()));
        assert!(!state.stats.loading);
        assert_eq!(state.stats.error.as_deref(), Some("unreachable"));
        // The last good snapshot stays visible behind the error.
        assert_eq!(state.stats.stats.total_songs, 3);
    }
}
