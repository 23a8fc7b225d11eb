//! # Songbook Client
//!
//! Data layer and view layer for the Songbook catalog.
//!
//! This crate holds everything the terminal frontend needs except the
//! terminal itself: the data model, a pure reducer over client state, an
//! effect runner that talks to the HTTP API, and a view-model for the
//! paginated, genre-filtered track list.
//!
//! ## Design Principles
//!
//! - **One state owner**: all client state lives inside a single runner task;
//!   everything else sees immutable snapshots
//! - **Pure reducer**: state transitions are synchronous and side-effect
//!   free, so they are trivially testable
//! - **Effects at the edge**: network calls run as fire-and-forget tasks
//!   whose results re-enter the store as plain actions
//! - **Latest wins**: when the same flow is triggered twice, only the most
//!   recent trigger's results are ever applied
//!
//! ## Core Concepts
//!
//! ### Actions
//!
//! Every state change is expressed as an [`Action`] dispatched through a
//! [`StoreHandle`]. Actions that need the server (fetching, creating,
//! editing, deleting) also launch an effect; the effect's outcome comes back
//! as follow-up actions.
//!
//! ### State
//!
//! [`AppState`] holds two slices: the track list and the stats snapshot,
//! each with its own `loading`/`error` bookkeeping. [`AppState::reduce`] is
//! the only place state changes.
//!
//! ### Views
//!
//! [`TrackListView`] turns a state snapshot into the paginated,
//! genre-filtered page the terminal renders. It is pure over the snapshot;
//! pagination and filter selection live in the view, not in shared state.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use songbook_client::{Action, ApiClient, StoreHandle};
//!
//! # async fn run() {
//! let api = ApiClient::new("http://127.0.0.1:5000/api");
//! let store = StoreHandle::spawn(api);
//!
//! // Kick off the initial load; results arrive as state changes.
//! store.dispatch(Action::FetchTracks);
//! store.dispatch(Action::FetchStats);
//!
//! let mut changes = store.subscribe();
//! changes.changed().await.unwrap();
//! println!("{} tracks", store.state().tracks.tracks.len());
//! # }
//! ```

pub mod action;
pub mod api;
pub mod effects;
pub mod model;
pub mod state;
pub mod view;

// Re-export main types at crate root
pub use action::{Action, EffectKind};
pub use api::{ApiClient, ApiError};
pub use effects::StoreHandle;
pub use model::{ArtistAlbums, KeyedCount, StatsSnapshot, Track, TrackDraft, TrackPatch};
pub use state::{AppState, StatsState, TracksState};
pub use view::{FormData, TrackListView, PAGE_SIZE};

/// Type aliases for clarity
pub type TrackId = String;
pub type Timestamp = i64;
