//! The store: one runner task owning state, effects launched per action.

use std::collections::HashMap;

use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use crate::action::{Action, EffectKind};
use crate::api::ApiClient;
use crate::state::AppState;

/// Message consumed by the runner task.
enum Envelope {
    /// A fresh action from a handle
    Dispatch(Action),
    /// Results of a completed effect, tagged with the sequence number the
    /// effect was launched under
    Followup {
        kind: EffectKind,
        seq: u64,
        actions: Vec<Action>,
    },
}

/// Cloneable handle to the store task.
///
/// Dispatching never blocks; state is observed through snapshots or a watch
/// subscription.
#[derive(Clone)]
pub struct StoreHandle {
    sender: mpsc::UnboundedSender<Envelope>,
    state: watch::Receiver<AppState>,
}

impl StoreHandle {
    /// Spawn the runner task and return a handle to it.
    ///
    /// The runner owns the state for the life of the process; handles are
    /// cheap clones over the same task.
    pub fn spawn(api: ApiClient) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let (publisher, state) = watch::channel(AppState::default());
        let runner = Runner {
            api,
            state: AppState::default(),
            publisher,
            sender: sender.clone(),
            sequences: HashMap::new(),
        };
        tokio::spawn(runner.run(receiver));
        Self { sender, state }
    }

    /// Queue an action for the runner.
    pub fn dispatch(&self, action: Action) {
        // Send fails only when the runner is gone, i.e. at shutdown.
        let _ = self.sender.send(Envelope::Dispatch(action));
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> AppState {
        self.state.borrow().clone()
    }

    /// Watch channel that yields on every state change.
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.state.clone()
    }
}

struct Runner {
    api: ApiClient,
    state: AppState,
    publisher: watch::Sender<AppState>,
    sender: mpsc::UnboundedSender<Envelope>,
    /// Latest launched sequence per effect kind; older results are stale
    sequences: HashMap<EffectKind, u64>,
}

impl Runner {
    async fn run(mut self, mut receiver: mpsc::UnboundedReceiver<Envelope>) {
        while let Some(envelope) = receiver.recv().await {
            match envelope {
                Envelope::Dispatch(action) => self.apply(action),
                Envelope::Followup { kind, seq, actions } => {
                    if self.sequences.get(&kind) != Some(&seq) {
                        debug!(?kind, seq, "discarding results of superseded effect");
                        continue;
                    }
                    for action in actions {
                        self.apply(action);
                    }
                }
            }
        }
    }

    /// Reduce the action, publish the new state, then launch its effect.
    fn apply(&mut self, action: Action) {
        self.state.reduce(&action);
        self.publisher.send_replace(self.state.clone());

        let Some(kind) = action.effect_kind() else {
            return;
        };
        let seq = {
            let counter = self.sequences.entry(kind).or_insert(0);
            *counter += 1;
            *counter
        };

        let api = self.api.clone();
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let actions = run_flow(&api, &action).await;
            let _ = sender.send(Envelope::Followup { kind, seq, actions });
        });
    }
}

/// Execute the API call behind a trigger action and produce its follow-ups.
///
/// Mirrors for each flow what the state needs next: a list fetch lands the
/// list, a mutation re-fetches what it invalidated, failures land a message
/// in the matching error slot.
async fn run_flow(api: &ApiClient, trigger: &Action) -> Vec<Action> {
    match trigger {
        Action::FetchTracks => match api.list_tracks().await {
            Ok(tracks) => vec![Action::TracksLoaded(tracks)],
            Err(err) => {
                warn!(error = %err, "track list fetch failed");
                vec![Action::TracksFailed(err.to_string())]
            }
        },
        Action::AddTrack(draft) => match api.create_track(draft).await {
            // The full re-fetch reconciles the optimistic entry.
            Ok(_) => vec![Action::FetchTracks, Action::FetchStats],
            Err(err) => {
                warn!(error = %err, "track creation failed");
                vec![Action::TracksFailed(err.to_string())]
            }
        },
        Action::UpdateTrack { id, patch } => match api.update_track(id, patch).await {
            Ok(track) => vec![Action::TrackUpdated(track), Action::FetchStats],
            Err(err) => {
                warn!(error = %err, track = %id, "track update failed");
                vec![Action::TracksFailed(err.to_string())]
            }
        },
        Action::DeleteTrack(id) => match api.delete_track(id).await {
            // The local removal already happened; this reconciles the rest.
            Ok(_) => vec![Action::FetchTracks, Action::FetchStats],
            Err(err) => {
                warn!(error = %err, track = %id, "track deletion failed");
                vec![Action::TracksFailed(err.to_string())]
            }
        },
        Action::FetchStats => match api.fetch_stats().await {
            Ok(stats) => vec![Action::StatsLoaded(stats)],
            Err(err) => {
                warn!(error = %err, "stats fetch failed");
                vec![Action::StatsFailed(err.to_string())]
            }
        },
        _ => Vec::new(),
    }
}
