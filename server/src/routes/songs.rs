//! Song catalog routes.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::error::Result;
use crate::handlers::{
    handle_create, handle_delete, handle_get, handle_list, handle_update, CreateSong, Song,
    UpdateSong,
};
use crate::AppState;

/// Create song routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/songs", get(list_songs).post(create_song))
        .route(
            "/api/songs/{id}",
            get(get_song).patch(update_song).delete(delete_song),
        )
}

/// GET /api/songs - The full catalog, newest first.
async fn list_songs(State(state): State<AppState>) -> Result<Json<Vec<Song>>> {
    let songs = handle_list(&state.pool).await?;
    Ok(Json(songs))
}

/// GET /api/songs/{id} - A single song.
async fn get_song(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Song>> {
    let song = handle_get(&state.pool, &id).await?;
    Ok(Json(song))
}

/// POST /api/songs - Create a song.
async fn create_song(
    State(state): State<AppState>,
    Json(request): Json<CreateSong>,
) -> Result<Json<Song>> {
    let song = handle_create(&state.pool, request).await?;
    Ok(Json(song))
}

/// PATCH /api/songs/{id} - Partial update; responds with the post-update record.
async fn update_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateSong>,
) -> Result<Json<Song>> {
    let song = handle_update(&state.pool, &id, request).await?;
    Ok(Json(song))
}

/// DELETE /api/songs/{id} - Remove a song; responds with its last snapshot.
async fn delete_song(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Song>> {
    let song = handle_delete(&state.pool, &id).await?;
    Ok(Json(song))
}
