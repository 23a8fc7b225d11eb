//! Songbook REPL - terminal frontend for the track catalog.
//!
//! Each input line is parsed as a subcommand and dispatched into the store;
//! the resulting state snapshot is rendered as text.

use std::time::Duration;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use rustyline::{
    completion::Completer,
    highlight::Highlighter,
    history::FileHistory,
    validate::Validator,
    CompletionType, Config, Editor, Helper,
};
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use songbook_client::view::{render_stats, render_track_page};
use songbook_client::{
    Action, ApiClient, AppState, FormData, StoreHandle, TrackListView, TrackPatch,
};

const PROMPT: &str = ">> ";

/// The server round trip after a mutation gets this long to land before the
/// snapshot is rendered anyway.
const ECHO_WAIT: Duration = Duration::from_secs(5);

#[derive(Parser, Debug)]
struct CliArgs {
    /// Base URL of the Songbook API.
    #[arg(long, default_value = "http://127.0.0.1:5000/api")]
    api_url: String,
}

#[derive(Parser)]
#[command(name = "")]
struct InnerCli {
    #[command(subcommand)]
    command: InnerCommand,
}

#[derive(Subcommand)]
enum InnerCommand {
    /// Shows the current page of the track list.
    List,

    /// Jumps to a page of the track list.
    Page { number: usize },

    /// Moves to the next page.
    Next,

    /// Moves to the previous page.
    Prev,

    /// Filters the list by genre; without an argument the filter is cleared.
    Filter { genre: Option<String> },

    /// Adds a track to the catalog.
    Add {
        title: String,
        artist: String,
        album: String,
        genre: String,
    },

    /// Edits fields of an existing track.
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        artist: Option<String>,
        #[arg(long)]
        album: Option<String>,
        #[arg(long)]
        genre: Option<String>,
    },

    /// Deletes a track.
    Delete { id: String },

    /// Shows the statistics dashboard.
    Stats,

    /// Re-fetches the track list and the statistics.
    Refresh,

    /// Close this program.
    Exit,
}

enum CommandExecutionResult {
    Ok,
    Exit,
    Error(String),
}

/// Everything a command needs: the store, the view state and a runtime to
/// wait on fetches with.
struct Session {
    runtime: tokio::runtime::Runtime,
    store: StoreHandle,
    view: TrackListView,
}

impl Session {
    fn now_ms() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    fn state(&self) -> AppState {
        self.store.state()
    }

    fn print_list(&self) {
        let state = self.state();
        print!(
            "{}",
            render_track_page(&state.tracks, &self.view, Self::now_ms())
        );
    }

    fn print_stats(&self) {
        print!("{}", render_stats(&self.state().stats));
    }

    /// Dispatch and wait for the next quiescent snapshot (no fetch in
    /// flight). Fetch flows always pass through a loading phase, so this
    /// resolves exactly when they land.
    fn dispatch_and_settle(&self, actions: Vec<Action>) {
        let mut changes = self.store.subscribe();
        changes.borrow_and_update();
        for action in actions {
            self.store.dispatch(action);
        }
        self.runtime.block_on(next_settled(&mut changes));
    }

    /// Dispatch a mutation: render-worthy state appears twice, first the
    /// immediate local change, then the server echo or failure. Wait for
    /// both, but give the round trip a bounded window.
    fn dispatch_mutation(&self, action: Action) {
        let mut changes = self.store.subscribe();
        changes.borrow_and_update();
        self.store.dispatch(action);
        self.runtime.block_on(async {
            next_settled(&mut changes).await;
            let _ = tokio::time::timeout(ECHO_WAIT, next_settled(&mut changes)).await;
        });
    }
}

/// Wait until the store publishes a snapshot with no fetch in flight.
async fn next_settled(changes: &mut watch::Receiver<AppState>) {
    while changes.changed().await.is_ok() {
        let state = changes.borrow_and_update();
        if !state.tracks.loading && !state.stats.loading {
            return;
        }
    }
}

fn execute_command(line: String, session: &mut Session) -> CommandExecutionResult {
    if line.is_empty() {
        return CommandExecutionResult::Ok;
    }

    let args =
        shlex::split(&line).unwrap_or_else(|| line.split_whitespace().map(String::from).collect());

    let cli = InnerCli::try_parse_from(std::iter::once(" ").chain(args.iter().map(String::as_str)));

    match cli {
        Ok(cli) => {
            println!("{} {}", PROMPT, &line);
            match cli.command {
                InnerCommand::List => {
                    session.print_list();
                }
                InnerCommand::Page { number } => {
                    let tracks = session.state().tracks.tracks;
                    session.view.set_page(number, &tracks);
                    session.print_list();
                }
                InnerCommand::Next => {
                    let tracks = session.state().tracks.tracks;
                    let page = session.view.page();
                    session.view.set_page(page + 1, &tracks);
                    session.print_list();
                }
                InnerCommand::Prev => {
                    let tracks = session.state().tracks.tracks;
                    let page = session.view.page();
                    session.view.set_page(page.saturating_sub(1), &tracks);
                    session.print_list();
                }
                InnerCommand::Filter { genre } => {
                    session.view.set_genre(genre);
                    session.print_list();
                }
                InnerCommand::Add {
                    title,
                    artist,
                    album,
                    genre,
                } => {
                    let form = FormData {
                        title,
                        artist,
                        album,
                        genre,
                    };
                    match form.validate() {
                        Ok(draft) => {
                            session.dispatch_mutation(Action::AddTrack(draft));
                            session.print_list();
                        }
                        Err(errors) => {
                            return CommandExecutionResult::Error(errors.join(", "));
                        }
                    }
                }
                InnerCommand::Edit {
                    id,
                    title,
                    artist,
                    album,
                    genre,
                } => {
                    let patch = TrackPatch {
                        title,
                        artist,
                        album,
                        genre,
                    };
                    if patch.is_empty() {
                        return CommandExecutionResult::Error(
                            "nothing to change; pass at least one of --title, --artist, --album, --genre"
                                .to_string(),
                        );
                    }
                    session.dispatch_mutation(Action::UpdateTrack { id, patch });
                    session.print_list();
                }
                InnerCommand::Delete { id } => {
                    let tracks = session.state().tracks.tracks;
                    session.view.after_delete(&tracks);
                    session.dispatch_mutation(Action::DeleteTrack(id));
                    session.print_list();
                }
                InnerCommand::Stats => {
                    session.dispatch_and_settle(vec![Action::FetchStats]);
                    session.print_stats();
                }
                InnerCommand::Refresh => {
                    session.dispatch_and_settle(vec![Action::FetchTracks, Action::FetchStats]);
                    session.print_list();
                }
                InnerCommand::Exit => return CommandExecutionResult::Exit,
            }
        }

        Err(e) => {
            if e.print().is_err() {
                println!("{}", e);
            }
        }
    }
    CommandExecutionResult::Ok
}

#[derive(rustyline_derive::Hinter)]
struct MyHelper {
    commands_names: Vec<String>,
}

impl MyHelper {
    pub fn new() -> Self {
        let commands_names: Vec<String> = InnerCli::command()
            .get_subcommands()
            .map(|sc| sc.get_name().to_string())
            .collect();

        MyHelper { commands_names }
    }
}

impl Completer for MyHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        _pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        if line.contains(" ") {
            return Ok((0, Vec::with_capacity(0)));
        }
        let matches = self
            .commands_names
            .iter()
            .filter(|c| c.starts_with(line))
            .map(|c| c.to_string())
            .collect::<Vec<_>>();

        Ok((0, matches))
    }
}

impl Highlighter for MyHelper {}
impl Validator for MyHelper {}
impl Helper for MyHelper {}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "songbook_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let runtime = tokio::runtime::Runtime::new()?;
    let store = {
        let _guard = runtime.enter();
        StoreHandle::spawn(ApiClient::new(&cli_args.api_url))
    };
    let mut session = Session {
        runtime,
        store,
        view: TrackListView::default(),
    };

    InnerCli::command().print_long_help()?;

    // The page-load fetch: list and stats together.
    println!("\nLoading catalog from {} ...", cli_args.api_url);
    session.dispatch_and_settle(vec![Action::FetchTracks, Action::FetchStats]);
    session.print_list();

    let config = Config::builder()
        .completion_type(CompletionType::List)
        .build();

    let mut rl = Editor::<MyHelper, FileHistory>::with_config(config)?;

    let helper = MyHelper::new();
    rl.set_helper(Some(helper));

    loop {
        let readline = rl.readline(PROMPT);

        match readline {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);
                match execute_command(line, &mut session) {
                    CommandExecutionResult::Ok => {}
                    CommandExecutionResult::Exit => {
                        break;
                    }
                    CommandExecutionResult::Error(err) => {
                        eprintln!("Error: {}", err);
                        continue;
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("CTRL-D: exiting.");
                break;
            }
            Err(e) => {
                println!("Error: {:?}", e);
                break;
            }
        }
    }
    Ok(())
}
