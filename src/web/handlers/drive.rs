//! Drive handlers for Web API.
//!
//! `:entry` is the first path segment after `/api/drive`. Depending on the
//! method it names an entry under the root (GET, DELETE) or the parent
//! folder a new entry goes into (POST, PUT).

use axum::{
    body::Body,
    extract::{multipart::MultipartError, Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures::TryStreamExt;
use std::sync::Arc;
use tokio_util::io::ReaderStream;

use crate::drive::{Download, Entry, EntryName, Lookup, Segment, UPLOAD_FIELD};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::DriveError;

/// Query parameters for folder creation.
#[derive(Debug, serde::Deserialize)]
pub struct NameQuery {
    /// Name of the folder to create.
    pub name: Option<String>,
}

impl NameQuery {
    fn require(self) -> Result<EntryName, DriveError> {
        let name = self
            .name
            .filter(|n| !n.is_empty())
            .ok_or_else(|| DriveError::MissingParameter("name".to_string()))?;
        EntryName::parse(&name)
    }
}

/// Generate a safe Content-Disposition header value for file downloads.
///
/// Control characters are dropped, quotes and backslashes replaced in the
/// ASCII fallback, and non-ASCII names sent with RFC 5987 encoding.
fn content_disposition_header(filename: &str) -> String {
    if filename.is_ascii() && !filename.chars().any(|c| c.is_control() || c == '"' || c == '\\') {
        return format!("attachment; filename=\"{}\"", filename);
    }

    let sanitized: String = filename
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            '"' | '\\' => '_',
            _ => c,
        })
        .collect();

    let encoded = urlencoding::encode(filename);

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        sanitized, encoded
    )
}

/// Parent folder from the URL. A name that cannot be a folder under the root
/// is reported as a missing parent.
fn parent_segment(raw: &str) -> Result<Segment, DriveError> {
    Segment::parse(raw).map_err(|_| DriveError::ParentNotFound(raw.to_string()))
}

fn multipart_error(e: MultipartError) -> DriveError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        DriveError::PayloadTooLarge
    } else {
        DriveError::Multipart(e.body_text())
    }
}

fn stream_file(download: Download) -> Result<Response, ApiError> {
    let Download { name, size, file } = download;

    Response::builder()
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(header::CONTENT_DISPOSITION, content_disposition_header(&name))
        .header(header::CONTENT_LENGTH, size)
        .body(Body::from_stream(ReaderStream::new(file)))
        .map_err(|e| {
            tracing::error!("Failed to build response: {}", e);
            ApiError::internal("Failed to build response")
        })
}

/// GET /api/drive - List the entries under the root.
pub async fn list_root(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Entry>>, ApiError> {
    let entries = state.drive.list_root().await?;
    Ok(Json(entries))
}

/// GET /api/drive/:entry - List a folder, or stream a file as an octet stream.
pub async fn get_entry(
    State(state): State<Arc<AppState>>,
    Path(entry): Path<String>,
) -> Result<Response, ApiError> {
    let name = Segment::parse(&entry).map_err(|_| DriveError::NotFound(entry.clone()))?;

    match state.drive.lookup(&name).await? {
        Lookup::Folder(entries) => Ok(Json(entries).into_response()),
        Lookup::File(download) => stream_file(download),
    }
}

/// POST /api/drive?name= - Create a folder under the root.
pub async fn create_folder(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NameQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let name = query.require()?;
    state.drive.create_folder(None, &name).await?;
    Ok((StatusCode::CREATED, "Folder created"))
}

/// POST /api/drive/:entry?name= - Create a folder under an existing parent.
pub async fn create_child_folder(
    State(state): State<Arc<AppState>>,
    Path(entry): Path<String>,
    Query(query): Query<NameQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let name = query.require()?;
    let parent = parent_segment(&entry)?;
    state.drive.create_folder(Some(&parent), &name).await?;
    Ok((StatusCode::CREATED, "Folder created"))
}

/// DELETE /api/drive/:entry - Delete a file or folder under the root.
pub async fn delete_entry(
    State(state): State<Arc<AppState>>,
    Path(entry): Path<String>,
) -> Result<StatusCode, ApiError> {
    let name = EntryName::parse(&entry)?;
    state.drive.delete(None, &name).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/drive/:entry/:child - Delete a file or folder under a parent.
pub async fn delete_child_entry(
    State(state): State<Arc<AppState>>,
    Path((entry, child)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let name = EntryName::parse(&child)?;
    let parent =
        Segment::parse(&entry).map_err(|_| DriveError::NotFound(format!("{entry}/{child}")))?;
    state.drive.delete(Some(&parent), &name).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/drive - Upload a file into the root.
///
/// Request body: multipart/form-data with a "file" field.
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    receive_upload(&state, None, multipart).await
}

/// PUT /api/drive/:entry - Upload a file into an existing parent folder.
///
/// Request body: multipart/form-data with a "file" field.
pub async fn upload_child_file(
    State(state): State<Arc<AppState>>,
    Path(entry): Path<String>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let parent = parent_segment(&entry)?;
    receive_upload(&state, Some(parent), multipart).await
}

/// Store the first `file` part carrying a filename.
///
/// The destination is checked when that part's headers arrive, before any of
/// its bytes are written.
async fn receive_upload(
    state: &AppState,
    parent: Option<Segment>,
    mut multipart: Multipart,
) -> Result<(StatusCode, &'static str), ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let Some(file_name) = field.file_name().map(str::to_owned) else {
            continue;
        };
        let file_name =
            Segment::parse(&file_name).map_err(|_| DriveError::InvalidFileName(file_name))?;

        state
            .drive
            .upload(parent.as_ref(), &file_name, field.map_err(multipart_error))
            .await?;

        return Ok((StatusCode::CREATED, "File uploaded"));
    }

    Err(DriveError::NoFileProvided.into())
}
