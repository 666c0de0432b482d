use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::pipeline;
use crate::state::AppState;

pub(crate) async fn serve(State(state): State<AppState>, multipart: Multipart) -> Response {
    let Some((filename, bytes)) = file_field(multipart).await else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "No file uploaded"})),
        )
            .into_response();
    };

    let result =
        tokio::task::spawn_blocking(move || pipeline::analyze_clip(&state, &filename, &bytes))
            .await;

    match result {
        Ok(reply) => Json(reply).into_response(),
        Err(err) => {
            log::error!("analysis task failed: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "analysis failed"})),
            )
                .into_response()
        }
    }
}

/// Pulls the `file` field out of the multipart form, if present.
async fn file_field(mut multipart: Multipart) -> Option<(String, Vec<u8>)> {
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload").to_string();
        match field.bytes().await {
            Ok(bytes) => return Some((filename, bytes.to_vec())),
            Err(err) => {
                log::warn!("failed to read upload body: {err}");
                return None;
            }
        }
    }
    None
}
