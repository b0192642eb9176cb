//! Image uploads: shared multipart reading plus the admin upload endpoint.

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use linkumkm_core::uploads::{normalize_mime, stored_name, validate_upload, UploadKind};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::extract::AppQuery;
use crate::middleware::rbac::RequireAdmin;
use crate::query::UploadParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// A file accepted by the upload store.
#[derive(Debug, Serialize)]
pub struct StoredUpload {
    /// Public reference to persist (`/uploads/...` or a bucket URL).
    pub url: String,
    /// Path relative to the upload root.
    pub path: String,
    pub size: usize,
    pub mime: String,
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::BadRequest(e.body_text())
    }
}

/// Read the `file` field of a multipart form, validate it for `kind` and
/// write it to the upload store.
pub(crate) async fn receive_upload(
    state: &AppState,
    kind: UploadKind,
    multipart: &mut Multipart,
) -> AppResult<StoredUpload> {
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }
        let mime = field
            .content_type()
            .map(normalize_mime)
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let data = field.bytes().await.map_err(multipart_error)?;
        file = Some((mime, data.to_vec()));
    }

    let (mime, data) =
        file.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;
    validate_upload(kind, &mime, data.len())?;

    let path = stored_name(kind, &mime);
    let size = data.len();
    let url = state.store.put(&path, &mime, data).await?;

    tracing::info!(kind = kind.dir(), path = %path, size, "Stored upload");

    Ok(StoredUpload {
        url,
        path,
        size,
        mime,
    })
}

/// POST /api/admin/uploads?kind={article-image|category-icon}
///
/// Stores an article image or category icon and returns its public URL.
/// Linktree photos go through `POST /api/linktree/photo` instead.
pub async fn upload(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<UploadParams>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    if !matches!(
        params.kind,
        UploadKind::ArticleImage | UploadKind::CategoryIcon
    ) {
        return Err(AppError::BadRequest(
            "kind must be 'article-image' or 'category-icon'".into(),
        ));
    }

    let stored = receive_upload(&state, params.kind, &mut multipart).await?;
    tracing::info!(user_id = admin.user_id, url = %stored.url, "Admin upload");

    Ok((StatusCode::CREATED, Json(DataResponse { data: stored })))
}
