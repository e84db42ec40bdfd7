use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use songsketch_shared::{
    EntryRequest, ErrorResponse, GalleryEntry, GalleryIndexData, HistoryResponse, PaintifyRequest,
    SongResponse,
};

use crate::data_url::decode_data_url;
use crate::gallery::{new_entry_id, normalize_entry_id};
use crate::state::{AppState, MAX_GALLERY_ENTRIES, MAX_IMAGE_BYTES};

fn error_response(status: StatusCode, description: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            description: description.to_string(),
        }),
    )
        .into_response()
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

async fn persist_index(state: &AppState) {
    let entries = state.gallery.read().await.entries().to_vec();
    state.storage.save_index(&GalleryIndexData { entries }).await;
}

pub async fn paintify_handler(
    State(state): State<AppState>,
    Json(request): Json<PaintifyRequest>,
) -> Response {
    let bytes = match decode_data_url(&request.data) {
        Ok(bytes) => bytes,
        Err(description) => return error_response(StatusCode::BAD_REQUEST, &description),
    };
    if bytes.is_empty() || bytes.len() > MAX_IMAGE_BYTES {
        return error_response(
            StatusCode::BAD_REQUEST,
            "The drawing payload is empty or too large",
        );
    }
    if image::guess_format(&bytes).is_err() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "The drawing is not a recognizable image",
        );
    }

    let song = match state.generator.generate(&bytes).await {
        Ok(song) => song,
        Err(description) => return error_response(StatusCode::BAD_GATEWAY, &description),
    };

    let entry = GalleryEntry {
        id: new_entry_id(),
        track_id: song.track_id.clone(),
        description: song.description.clone(),
        created_at_ms: now_ms(),
    };
    eprintln!("Gallery add entry={} track={}", entry.id, entry.track_id);
    let evicted = {
        let mut gallery = state.gallery.write().await;
        gallery.insert(entry.clone(), MAX_GALLERY_ENTRIES)
    };
    state.storage.save_image(&entry.id, &bytes).await;
    for old in &evicted {
        state.storage.remove_image(&old.id).await;
    }
    persist_index(&state).await;

    (
        StatusCode::OK,
        Json(SongResponse {
            id: song.track_id,
            description: song.description,
        }),
    )
        .into_response()
}

pub async fn musify_handler(
    State(state): State<AppState>,
    Json(request): Json<EntryRequest>,
) -> Response {
    let Some(id) = normalize_entry_id(&request.id) else {
        return error_response(StatusCode::NOT_FOUND, "Unknown drawing");
    };
    if !state.gallery.read().await.contains(&id) {
        return error_response(
            StatusCode::NOT_FOUND,
            "That drawing is no longer in the gallery",
        );
    }
    let bytes = match state.storage.load_image(&id).await {
        Ok(bytes) => bytes,
        Err(description) => return error_response(StatusCode::NOT_FOUND, &description),
    };

    let song = match state.generator.generate(&bytes).await {
        Ok(song) => song,
        Err(description) => return error_response(StatusCode::BAD_GATEWAY, &description),
    };

    {
        let mut gallery = state.gallery.write().await;
        gallery.set_track(&id, &song.track_id, &song.description);
    }
    persist_index(&state).await;

    (
        StatusCode::OK,
        Json(SongResponse {
            id: song.track_id,
            description: song.description,
        }),
    )
        .into_response()
}

pub async fn remove_handler(
    State(state): State<AppState>,
    Json(request): Json<EntryRequest>,
) -> Response {
    let Some(id) = normalize_entry_id(&request.id) else {
        return error_response(StatusCode::NOT_FOUND, "Unknown drawing");
    };
    let removed = {
        let mut gallery = state.gallery.write().await;
        gallery.remove(&id)
    };
    match removed {
        Some(entry) => {
            eprintln!("Gallery remove entry={}", entry.id);
            state.storage.remove_image(&entry.id).await;
            persist_index(&state).await;
            StatusCode::NO_CONTENT.into_response()
        }
        None => error_response(
            StatusCode::NOT_FOUND,
            "That drawing is no longer in the gallery",
        ),
    }
}

pub async fn history_handler(State(state): State<AppState>) -> Response {
    let entries = state.gallery.read().await.newest_first();
    Json(HistoryResponse { entries }).into_response()
}

pub async fn image_handler(
    Path(file): Path<String>,
    State(state): State<AppState>,
) -> Response {
    let Some(id) = file
        .strip_suffix(".png")
        .and_then(|value| normalize_entry_id(value))
    else {
        return error_response(StatusCode::NOT_FOUND, "Unknown drawing");
    };
    match state.storage.load_image(&id).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, "image/png")], bytes).into_response(),
        Err(_) => error_response(StatusCode::NOT_FOUND, "Unknown drawing"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn error_responses_carry_a_description_body() {
        let response = error_response(StatusCode::BAD_REQUEST, "bad payload");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let error: ErrorResponse = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(error.description, "bad payload");
    }

    #[test]
    fn timestamps_are_unix_milliseconds() {
        // 2020-01-01 in ms; anything earlier means the clock math regressed.
        assert!(now_ms() > 1_577_836_800_000);
    }
}
