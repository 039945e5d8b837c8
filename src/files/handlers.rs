use anyhow::Context;
use axum::{
    extract::{Path, State},
    http::{header, HeaderName, HeaderValue},
    response::Html,
    routing::get,
    Router,
};
use bytes::Bytes;
use tracing::{info, instrument, warn};

use super::{
    format::FileFormat,
    keys::JsonKeys,
    normalize::{self, NormalizeError},
    render,
    view::TableView,
};
use crate::{error::AppError, state::FilesState};

pub fn file_routes() -> Router<FilesState> {
    Router::new()
        .route("/", get(index))
        .route("/view/*filename", get(view_file))
        .route("/json_keys/*filename", get(json_keys))
        .route("/download/*filename", get(download_file))
}

#[instrument(skip(state))]
pub async fn index(State(state): State<FilesState>) -> Result<Html<String>, AppError> {
    let files = state.data_dir.list().await?;
    Ok(Html(render::index_page(&files)))
}

#[instrument(skip(state))]
pub async fn view_file(
    State(state): State<FilesState>,
    Path(filename): Path<String>,
) -> Result<Html<String>, AppError> {
    let path = state.data_dir.resolve(&filename).await?;

    let result = tokio::task::spawn_blocking(move || normalize::read_file(&path))
        .await
        .context("normalizer task panicked")?;

    match result {
        Ok(value) => {
            let view = TableView::from_value(value);
            Ok(Html(render::table_page(&filename, &view)))
        }
        Err(e) => {
            warn!(file = %filename, error = %e, "failed to normalize file");
            Ok(Html(render::table_error_page(&filename, &e.to_string())))
        }
    }
}

#[instrument(skip(state))]
pub async fn json_keys(
    State(state): State<FilesState>,
    Path(filename): Path<String>,
) -> Result<Html<String>, AppError> {
    let path = state.data_dir.resolve(&filename).await?;

    if FileFormat::from_path(std::path::Path::new(&filename)) != Some(FileFormat::Json) {
        return Ok(Html(render::keys_error_page(&filename, "not a JSON file")));
    }

    let parsed = match tokio::fs::read(&path).await {
        Ok(bytes) => serde_json::from_slice::<serde_json::Value>(&bytes).map_err(NormalizeError::from),
        Err(e) => Err(NormalizeError::from(e)),
    };

    match parsed {
        Ok(doc) => {
            let keys = JsonKeys::inspect(&doc);
            Ok(Html(render::keys_page(&filename, &keys.labels())))
        }
        Err(e) => {
            warn!(file = %filename, error = %e, "failed to read JSON keys");
            Ok(Html(render::keys_error_page(&filename, &e.to_string())))
        }
    }
}

#[instrument(skip(state))]
pub async fn download_file(
    State(state): State<FilesState>,
    Path(filename): Path<String>,
) -> Result<([(HeaderName, HeaderValue); 2], Bytes), AppError> {
    let path = state.data_dir.resolve(&filename).await?;
    let body = tokio::fs::read(&path)
        .await
        .with_context(|| format!("read {}", path.display()))?;

    let content_type = FileFormat::from_path(&path)
        .map(|f| f.content_type(&path))
        .unwrap_or("application/octet-stream");

    let headers = [
        (header::CONTENT_TYPE, HeaderValue::from_static(content_type)),
        (header::CONTENT_DISPOSITION, attachment_header(&filename)?),
    ];

    info!(file = %filename, bytes = body.len(), "download");
    Ok((headers, Bytes::from(body)))
}

/// Plain `filename` carries an ASCII fallback; `filename*` carries the exact name
/// whenever the fallback had to change it.
fn attachment_header(filename: &str) -> Result<HeaderValue, AppError> {
    let fallback: String = filename
        .chars()
        .map(|c| if c.is_ascii_graphic() || c == ' ' { c } else { '_' })
        .filter(|c| *c != '"' && *c != '\\')
        .collect();
    let value = if fallback == filename {
        format!("attachment; filename=\"{fallback}\"")
    } else {
        format!(
            "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
            render::encode_segment(filename)
        )
    };
    HeaderValue::from_str(&value)
        .context("build content-disposition header")
        .map_err(AppError::from)
}
