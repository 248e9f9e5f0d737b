use super::AppState;
use crate::dispatcher::success_message;
use crate::extract::{combine_requirement, extract_text};
use crate::types::{GenerateRequest, GenerateResponse};
use crate::{Error, ErrorKind};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use serde_json::json;
use tracing::{error, warn};

pub const LIVENESS_MESSAGE: &str = "QA Test Generation API is running";

/// HTTP status for a failed generation.
pub fn status_for(err: &Error) -> StatusCode {
    match err.kind() {
        ErrorKind::Timeout => StatusCode::REQUEST_TIMEOUT,
        ErrorKind::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorKind::Validation | ErrorKind::Routing | ErrorKind::Upstream | ErrorKind::Io => {
            StatusCode::BAD_REQUEST
        }
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(GenerateResponse::error(message))).into_response()
}

pub(super) async fn root() -> impl IntoResponse {
    Json(json!({ "message": LIVENESS_MESSAGE }))
}

pub(super) async fn generate(
    State(state): State<AppState>,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> Response {
    match body {
        Ok(Json(request)) => run_with_timeout(&state, request).await,
        Err(rejection) => {
            warn!(error = %rejection, "rejected request body");
            error_response(StatusCode::BAD_REQUEST, rejection.body_text())
        }
    }
}

pub(super) async fn generate_with_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Response {
    let mut request = GenerateRequest::default();
    let mut upload: Option<(String, Bytes)> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return error_response(StatusCode::BAD_REQUEST, e.body_text()),
        };
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            let file_name = field.file_name().unwrap_or("upload").to_string();
            match field.bytes().await {
                Ok(bytes) => upload = Some((file_name, bytes)),
                Err(e) => return error_response(StatusCode::BAD_REQUEST, e.body_text()),
            }
            continue;
        }

        let value = match field.text().await {
            Ok(value) => value,
            Err(e) => return error_response(StatusCode::BAD_REQUEST, e.body_text()),
        };
        match name.as_str() {
            "requirement" => request.requirement = Some(value),
            "agentType" => request.agent_type = value,
            "featureName" => request.feature_name = Some(value),
            "testName" => request.test_name = Some(value),
            "language" => request.language = Some(value),
            "iterations" => request.iterations = value.trim().parse().ok(),
            other => warn!(field = other, "ignoring unknown form field"),
        }
    }

    let Some((file_name, bytes)) = upload else {
        return error_response(StatusCode::BAD_REQUEST, "No file uploaded");
    };
    if let Err(e) = state.dispatcher.store().save_upload(&file_name, &bytes) {
        warn!(file = %file_name, error = %e, "could not keep a copy of the upload");
    }
    let file_text = match extract_text(&file_name, &bytes) {
        Ok(text) => text,
        Err(e) => return error_response(status_for(&e), e.to_string()),
    };
    request.requirement = Some(combine_requirement(
        request.requirement.as_deref(),
        &file_text,
    ));
    request.text = None;

    run_with_timeout(&state, request).await
}

pub(super) async fn download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Response {
    let Some(path) = state.dispatcher.store().locate(&filename) else {
        return error_response(StatusCode::NOT_FOUND, "File not found");
    };
    match tokio::fs::read(&path).await {
        Ok(body) => (
            [
                (header::CONTENT_TYPE, "text/plain".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename={}", filename),
                ),
                (
                    header::ACCESS_CONTROL_EXPOSE_HEADERS,
                    "Content-Disposition".to_string(),
                ),
            ],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(path = %path.display(), error = %e, "download read failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

async fn run_with_timeout(state: &AppState, request: GenerateRequest) -> Response {
    let dispatcher = state.dispatcher.clone();
    let mut task = tokio::spawn(async move { dispatcher.dispatch(&request).await });

    match tokio::time::timeout(state.timeout, &mut task).await {
        Ok(Ok(Ok(artifact))) => (
            StatusCode::OK,
            Json(GenerateResponse::success(
                &artifact,
                success_message(&artifact.kind),
            )),
        )
            .into_response(),
        Ok(Ok(Err(e))) => error_response(status_for(&e), e.to_string()),
        Ok(Err(join_error)) => {
            error!(error = %join_error, "generation task failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Unexpected error: {}", join_error),
            )
        }
        Err(_) => {
            task.abort();
            let err = Error::Timeout(state.timeout);
            warn!(timeout_secs = state.timeout.as_secs(), "generation timed out");
            error_response(status_for(&err), err.to_string())
        }
    }
}
