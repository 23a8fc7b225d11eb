//! View-model and text rendering for the track list and stats dashboard.
//!
//! Everything here is pure over a state snapshot. Pagination and the genre
//! filter are view concerns: they live in [`TrackListView`], not in shared
//! state, and are recomputed against whatever snapshot is rendered.

use crate::model::{Track, TrackDraft};
use crate::state::{StatsState, TracksState};
use crate::Timestamp;

/// Fixed number of tracks per page.
pub const PAGE_SIZE: usize = 3;

/// Pagination and genre-filter state for the track list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackListView {
    page: usize,
    genre: Option<String>,
}

impl Default for TrackListView {
    fn default() -> Self {
        Self {
            page: 1,
            genre: None,
        }
    }
}

impl TrackListView {
    /// Current 1-based page.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Currently selected genre, `None` for all genres.
    pub fn genre(&self) -> Option<&str> {
        self.genre.as_deref()
    }

    /// Distinct genres of the loaded list, in first-seen order.
    pub fn genre_options(&self, tracks: &[Track]) -> Vec<String> {
        let mut options: Vec<String> = Vec::new();
        for track in tracks {
            if !options.iter().any(|genre| genre == &track.genre) {
                options.push(track.genre.clone());
            }
        }
        options
    }

    /// Select a genre (`None` clears the filter). Always resets to page 1.
    pub fn set_genre(&mut self, genre: Option<String>) {
        self.genre = genre;
        self.page = 1;
    }

    /// Tracks passing the current genre filter, in list order.
    pub fn filtered<'a>(&self, tracks: &'a [Track]) -> Vec<&'a Track> {
        tracks
            .iter()
            .filter(|track| match &self.genre {
                Some(genre) => &track.genre == genre,
                None => true,
            })
            .collect()
    }

    /// Number of pages for the current filter. Zero for an empty list.
    pub fn total_pages(&self, tracks: &[Track]) -> usize {
        self.filtered(tracks).len().div_ceil(PAGE_SIZE)
    }

    /// Jump to a page. A no-op when the page is 0 or past the last page.
    pub fn set_page(&mut self, page: usize, tracks: &[Track]) {
        if page > 0 && page <= self.total_pages(tracks) {
            self.page = page;
        }
    }

    /// Tracks visible on the current page.
    pub fn page_items<'a>(&self, tracks: &'a [Track]) -> Vec<&'a Track> {
        let start = (self.page - 1) * PAGE_SIZE;
        self.filtered(tracks)
            .into_iter()
            .skip(start)
            .take(PAGE_SIZE)
            .collect()
    }

    /// Adjust the page for a row about to be deleted.
    ///
    /// Call with the list as it is before the removal: when the current page
    /// holds exactly that one row and we are past page 1, step back a page.
    pub fn after_delete(&mut self, tracks: &[Track]) {
        if self.page_items(tracks).len() == 1 && self.page > 1 {
            self.page -= 1;
        }
    }
}

/// Raw add-form input, validated before anything is dispatched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
}

impl FormData {
    /// Check every field and build the draft to submit.
    ///
    /// Whitespace-only input counts as missing. On failure every missing
    /// field gets its own message, in field order; nothing is dispatched for
    /// an invalid form.
    pub fn validate(&self) -> Result<TrackDraft, Vec<String>> {
        let mut errors = Vec::new();
        if self.title.trim().is_empty() {
            errors.push("Title is required".to_string());
        }
        if self.artist.trim().is_empty() {
            errors.push("Artist is required".to_string());
        }
        if self.album.trim().is_empty() {
            errors.push("Album is required".to_string());
        }
        if self.genre.trim().is_empty() {
            errors.push("Genre is required".to_string());
        }

        if errors.is_empty() {
            Ok(TrackDraft {
                title: self.title.clone(),
                artist: self.artist.clone(),
                album: self.album.clone(),
                genre: self.genre.clone(),
            })
        } else {
            Err(errors)
        }
    }
}

/// Human-readable distance between two instants, like `3 minutes ago`.
pub fn relative_time(then: Timestamp, now: Timestamp) -> String {
    let delta = now - then;
    let (magnitude, future) = if delta < 0 { (-delta, true) } else { (delta, false) };
    let seconds = magnitude / 1000;
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    let phrase = if seconds < 45 {
        "less than a minute".to_string()
    } else if minutes < 2 {
        "1 minute".to_string()
    } else if minutes < 60 {
        format!("{minutes} minutes")
    } else if hours < 2 {
        "1 hour".to_string()
    } else if hours < 24 {
        format!("{hours} hours")
    } else if days < 2 {
        "1 day".to_string()
    } else {
        format!("{days} days")
    };

    if future {
        format!("in {phrase}")
    } else {
        format!("{phrase} ago")
    }
}

fn timestamp_line(label: &str, value: Option<Timestamp>, now: Timestamp) -> String {
    match value {
        Some(at) => format!("  {label}: {}", relative_time(at, now)),
        None => format!("  {label}: Unknown"),
    }
}

/// Render the current page of the track list as text cards.
pub fn render_track_page(state: &TracksState, view: &TrackListView, now: Timestamp) -> String {
    let mut out = String::new();
    out.push_str("Songs List\n");

    if let Some(error) = &state.error {
        out.push_str(&format!("Error: {error}\n"));
    }
    if state.loading && state.tracks.is_empty() {
        out.push_str("Loading...\n");
        return out;
    }

    match view.genre() {
        Some(genre) => out.push_str(&format!("Filter by Genre: {genre}\n")),
        None => out.push_str("Filter by Genre: All Genres\n"),
    }

    let items = view.page_items(&state.tracks);
    if items.is_empty() {
        out.push_str("\nNo songs available at the moment\n");
        return out;
    }

    for track in items {
        out.push('\n');
        out.push_str(&format!("{}\n", track.title));
        out.push_str(&format!("  by {}\n", track.artist));
        if !track.album.is_empty() {
            out.push_str(&format!("  Album: {}\n", track.album));
        }
        if !track.genre.is_empty() {
            out.push_str(&format!("  Genre: {}\n", track.genre));
        }
        out.push_str(&timestamp_line("Created At", track.created_at, now));
        out.push('\n');
        out.push_str(&timestamp_line("Updated At", track.updated_at, now));
        out.push('\n');
        match &track.id {
            Some(id) => out.push_str(&format!("  id: {id}\n")),
            None => out.push_str("  id: (pending)\n"),
        }
    }

    out.push_str(&format!(
        "\npage {} of {}\n",
        view.page(),
        view.total_pages(&state.tracks)
    ));
    out
}

fn count_section(out: &mut String, title: &str, entries: &[(String, u64)]) {
    out.push_str(&format!("\n{title}\n"));
    for (key, count) in entries {
        out.push_str(&format!("  {key}: {count}\n"));
    }
}

/// Render the stats dashboard: four scalar cards, four breakdown lists.
pub fn render_stats(state: &StatsState) -> String {
    if state.loading {
        return "Loading...\n".to_string();
    }
    if let Some(error) = &state.error {
        return format!("Error: {error}\n");
    }

    let stats = &state.stats;
    let mut out = String::new();
    out.push_str(&format!("Total Songs: {}\n", stats.total_songs));
    out.push_str(&format!("Total Artists: {}\n", stats.total_artists));
    out.push_str(&format!("Total Albums: {}\n", stats.total_albums));
    out.push_str(&format!("Total Genres: {}\n", stats.total_genres));

    let keyed = |entries: &[crate::model::KeyedCount]| {
        entries
            .iter()
            .map(|entry| (entry.key.clone(), entry.count))
            .collect::<Vec<_>>()
    };
    count_section(&mut out, "Songs Per Genre", &keyed(&stats.songs_per_genre));
    count_section(&mut out, "Songs Per Artist", &keyed(&stats.songs_per_artist));
    count_section(
        &mut out,
        "Albums Per Artist",
        &stats
            .albums_per_artist
            .iter()
            .map(|entry| (entry.artist.clone(), entry.album_count))
            .collect::<Vec<_>>(),
    );
    count_section(&mut out, "Songs Per Album", &keyed(&stats.songs_per_album));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{KeyedCount, StatsSnapshot};

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

    fn tracks_with_genres(genres: &[&str]) -> Vec<Track> {
        genres
            .iter()
            .enumerate()
            .map(|(i, genre)| track(&format!("id-{i}"), &format!("Song {i}"), genre))
            .collect()
    }

    #[test]
    fn seven_records_paginate_as_three_three_one() {
        let tracks = tracks_with_genres(&["Rock"; 7]);
        let mut view = TrackListView::default();

        assert_eq!(view.total_pages(&tracks), 3);
        assert_eq!(view.page_items(&tracks).len(), 3);

        view.set_page(2, &tracks);
        assert_eq!(view.page_items(&tracks).len(), 3);

        view.set_page(3, &tracks);
        let last = view.page_items(&tracks);
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].title, "Song 6");
    }

    #[test]
    fn page_zero_and_past_end_are_no_ops() {
        let tracks = tracks_with_genres(&["Rock"; 7]);
        let mut view = TrackListView::default();
        view.set_page(2, &tracks);

        view.set_page(0, &tracks);
        assert_eq!(view.page(), 2);

        view.set_page(4, &tracks);
        assert_eq!(view.page(), 2);
    }

    #[test]
    fn genre_options_keep_first_seen_order() {
        let tracks = tracks_with_genres(&["Rock", "Jazz", "Rock", "Pop", "Jazz"]);
        let view = TrackListView::default();

        assert_eq!(view.genre_options(&tracks), vec!["Rock", "Jazz", "Pop"]);
    }

    #[test]
    fn selecting_a_genre_filters_and_resets_the_page() {
        let tracks = tracks_with_genres(&["Rock", "Jazz", "Rock", "Pop", "Rock", "Rock"]);
        let mut view = TrackListView::default();
        view.set_page(2, &tracks);

        view.set_genre(Some("Rock".to_string()));

        assert_eq!(view.page(), 1);
        assert_eq!(view.filtered(&tracks).len(), 4);
        assert!(view.page_items(&tracks).iter().all(|t| t.genre == "Rock"));

        view.set_genre(None);
        assert_eq!(view.filtered(&tracks).len(), 6);
    }

    #[test]
    fn filter_with_no_matches_shows_nothing() {
        let tracks = tracks_with_genres(&["Rock", "Jazz"]);
        let mut view = TrackListView::default();

        view.set_genre(Some("Metal".to_string()));

        assert_eq!(view.total_pages(&tracks), 0);
        assert!(view.page_items(&tracks).is_empty());
    }

    #[test]
    fn deleting_the_last_row_of_a_later_page_steps_back() {
        let tracks = tracks_with_genres(&["Rock"; 4]);
        let mut view = TrackListView::default();
        view.set_page(2, &tracks);
        assert_eq!(view.page_items(&tracks).len(), 1);

        view.after_delete(&tracks);

        assert_eq!(view.page(), 1);
    }

    #[test]
    fn deleting_from_a_full_page_stays_put() {
        let tracks = tracks_with_genres(&["Rock"; 5]);
        let mut view = TrackListView::default();
        view.set_page(2, &tracks);
        assert_eq!(view.page_items(&tracks).len(), 2);

        view.after_delete(&tracks);
        assert_eq!(view.page(), 2);

        view.set_page(1, &tracks);
        view.after_delete(&tracks);
        assert_eq!(view.page(), 1);
    }

    #[test]
    fn form_validation_reports_each_missing_field_in_order() {
        let form = FormData {
            title: "  ".to_string(),
            artist: "Queen".to_string(),
            album: String::new(),
            genre: "\t".to_string(),
        };

        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors,
            vec!["Title is required", "Album is required", "Genre is required"]
        );
    }

    #[test]
    fn valid_form_becomes_a_draft_with_raw_values() {
        let form = FormData {
            title: "Bohemian Rhapsody".to_string(),
            artist: "Queen".to_string(),
            album: "A Night at the Opera".to_string(),
            genre: "Rock".to_string(),
        };

        let draft = form.validate().unwrap();
        assert_eq!(draft.title, "Bohemian Rhapsody");
        assert_eq!(draft.genre, "Rock");
    }

    #[test]
    fn empty_list_renders_the_placeholder_message() {
        let state = TracksState::default();
        let view = TrackListView::default();

        let text = render_track_page(&state, &view, 1_700_000_000_000);
        assert!(text.contains("No songs available at the moment"));
    }

    #[test]
    fn page_footer_shows_position() {
        let mut state = TracksState::default();
        state.tracks = tracks_with_genres(&["Rock"; 7]);
        let mut view = TrackListView::default();
        view.set_page(2, &state.tracks);

        let text = render_track_page(&state, &view, 1_700_000_000_000);
        assert!(text.contains("page 2 of 3"));
    }

    #[test]
    fn optimistic_entries_render_with_pending_id_and_unknown_times() {
        let mut state = TracksState::default();
        let mut pending = track("x", "Pending", "Rock");
        pending.id = None;
        pending.created_at = None;
        pending.updated_at = None;
        state.tracks = vec![pending];

        let text = render_track_page(&state, &TrackListView::default(), 1_700_000_000_000);
        assert!(text.contains("id: (pending)"));
        assert!(text.contains("Created At: Unknown"));
    }

    #[test]
    fn relative_time_covers_the_ranges() {
        let now = 1_700_000_000_000;
        assert_eq!(relative_time(now - 5_000, now), "less than a minute ago");
        assert_eq!(relative_time(now - 70_000, now), "1 minute ago");
        assert_eq!(relative_time(now - 10 * 60 * 1000, now), "10 minutes ago");
        assert_eq!(relative_time(now - 90 * 60 * 1000, now), "1 hour ago");
        assert_eq!(relative_time(now - 5 * 3600 * 1000, now), "5 hours ago");
        assert_eq!(relative_time(now - 3 * 86_400 * 1000, now), "3 days ago");
        assert_eq!(relative_time(now + 3600 * 1000, now), "in 1 hour");
    }

    #[test]
    fn stats_render_cards_then_breakdowns() {
        let state = StatsState {
            stats: StatsSnapshot {
                total_songs: 4,
                total_artists: 3,
                total_albums: 3,
                total_genres: 3,
                songs_per_genre: vec![
                    KeyedCount {
                        key: "Rock".to_string(),
                        count: 2,
                    },
                    KeyedCount {
                        key: "Jazz".to_string(),
                        count: 1,
                    },
                ],
                ..Default::default()
            },
            loading: false,
            error: None,
        };

        let text = render_stats(&state);
        assert!(text.contains("Total Songs: 4"));
        assert!(text.contains("Songs Per Genre"));
        assert!(text.contains("  Rock: 2"));
    }

    #[test]
    fn stats_loading_and_error_short_circuit() {
        let loading = StatsState {
            loading: true,
            ..Default::default()
        };
        assert_eq!(render_stats(&loading), "Loading...\n");

        let failed = StatsState {
            error: Some("Database error".to_string()),
            ..Default::default()
        };
        assert_eq!(render_stats(&failed), "Error: Database error\n");
    }

    // Property-based tests using proptest
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_genres() -> impl Strategy<Value = Vec<&'static str>> {
            prop::collection::vec(
                prop_oneof![Just("Rock"), Just("Jazz"), Just("Pop"), Just("Metal")],
                0..30,
            )
        }

        proptest! {
            #[test]
            fn prop_pages_partition_the_filtered_list(genres in arb_genres()) {
                let tracks = tracks_with_genres(&genres);
                let mut view = TrackListView::default();
                let filtered: Vec<String> = view
                    .filtered(&tracks)
                    .iter()
                    .map(|t| t.title.clone())
                    .collect();

                let mut walked = Vec::new();
                let total = view.total_pages(&tracks);
                for page in 1..=total {
                    view.set_page(page, &tracks);
                    let items = view.page_items(&tracks);
                    prop_assert!(!items.is_empty());
                    prop_assert!(items.len() <= PAGE_SIZE);
                    if page < total {
                        prop_assert_eq!(items.len(), PAGE_SIZE);
                    }
                    walked.extend(items.iter().map(|t| t.title.clone()));
                }

                prop_assert_eq!(walked, filtered);
            }

            #[test]
            fn prop_set_page_respects_bounds(genres in arb_genres(), target in 0usize..12) {
                let tracks = tracks_with_genres(&genres);
                let mut view = TrackListView::default();
                let before = view.page();
                let total = view.total_pages(&tracks);

                view.set_page(target, &tracks);

                if target >= 1 && target <= total {
                    prop_assert_eq!(view.page(), target);
                } else {
                    prop_assert_eq!(view.page(), before);
                }
            }

            #[test]
            fn prop_filtered_matches_only_the_selected_genre(genres in arb_genres()) {
                let tracks = tracks_with_genres(&genres);
                let mut view = TrackListView::default();
                view.set_genre(Some("Rock".to_string()));

                let filtered = view.filtered(&tracks);
                prop_assert!(filtered.iter().all(|t| t.genre == "Rock"));
                let expected = tracks.iter().filter(|t| t.genre == "Rock").count();
                prop_assert_eq!(filtered.len(), expected);
            }
        }
    }
}
