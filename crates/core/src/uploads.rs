//! Upload kinds, MIME allow-lists, size ceilings and stored-path conventions.
//!
//! Uploaded files are stored under `{kind_dir}/{uuid}.{ext}` relative to the
//! upload root, and referenced from database rows by their public path
//! (`/uploads/{kind_dir}/{uuid}.{ext}` for local storage, or the bucket URL).

use serde::{Deserialize, Serialize};

/// Public URL prefix under which the local upload directory is served.
pub const PUBLIC_PREFIX: &str = "/uploads";

const MB: usize = 1024 * 1024;

const RASTER_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp", "image/gif"];
const ICON_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/webp",
    "image/gif",
    "image/svg+xml",
];

/// What an uploaded file is for. Determines size ceiling, allowed types and directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UploadKind {
    LinktreePhoto,
    UserAvatar,
    CategoryIcon,
    ArticleImage,
}

impl UploadKind {
    /// Sub-directory of the upload root.
    pub fn dir(self) -> &'static str {
        match self {
            Self::LinktreePhoto => "linktree",
            Self::UserAvatar => "avatar",
            Self::CategoryIcon => "category",
            Self::ArticleImage => "article",
        }
    }

    pub fn max_bytes(self) -> usize {
        match self {
            Self::ArticleImage => 5 * MB,
            Self::LinktreePhoto | Self::UserAvatar | Self::CategoryIcon => 2 * MB,
        }
    }

    pub fn allowed_types(self) -> &'static [&'static str] {
        match self {
            Self::CategoryIcon => ICON_TYPES,
            _ => RASTER_IMAGE_TYPES,
        }
    }
}

/// The largest ceiling of any kind; request bodies above this are refused early.
pub fn max_upload_bytes() -> usize {
    [
        UploadKind::LinktreePhoto,
        UploadKind::UserAvatar,
        UploadKind::CategoryIcon,
        UploadKind::ArticleImage,
    ]
    .into_iter()
    .map(UploadKind::max_bytes)
    .max()
    .unwrap_or(5 * MB)
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("File is empty")]
    Empty,

    #[error("File is {actual} bytes; the limit is {limit} bytes")]
    TooLarge { limit: usize, actual: usize },

    #[error("Unsupported file type '{mime}'. Allowed: {allowed}")]
    UnsupportedType { mime: String, allowed: String },
}

/// Check an uploaded file's declared MIME type and size against its kind.
pub fn validate_upload(kind: UploadKind, mime: &str, size: usize) -> Result<(), UploadError> {
    let mime = normalize_mime(mime);
    if !kind.allowed_types().contains(&mime.as_str()) {
        return Err(UploadError::UnsupportedType {
            mime,
            allowed: kind.allowed_types().join(", "),
        });
    }
    if size == 0 {
        return Err(UploadError::Empty);
    }
    if size > kind.max_bytes() {
        return Err(UploadError::TooLarge {
            limit: kind.max_bytes(),
            actual: size,
        });
    }
    Ok(())
}

/// Lowercase and drop parameters (`image/PNG; charset=x` -> `image/png`).
pub fn normalize_mime(mime: &str) -> String {
    mime.split(';').next().unwrap_or("").trim().to_ascii_lowercase()
}

pub fn extension_for(mime: &str) -> Option<&'static str> {
    match normalize_mime(mime).as_str() {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        "image/svg+xml" => Some("svg"),
        _ => None,
    }
}

/// Fresh relative storage path for a new upload: `{dir}/{uuid}.{ext}`.
pub fn stored_name(kind: UploadKind, mime: &str) -> String {
    let ext = extension_for(mime).unwrap_or("bin");
    format!("{}/{}.{}", kind.dir(), uuid::Uuid::now_v7(), ext)
}

/// Reference persisted for a stored file: `{prefix}/{relative}`.
///
/// `prefix` is a path such as [`PUBLIC_PREFIX`] or a bucket URL.
pub fn public_path(prefix: &str, relative: &str) -> String {
    format!(
        "{}/{}",
        prefix.trim_end_matches('/'),
        relative.trim_start_matches('/')
    )
}

/// Map a stored reference (public path or bucket URL) back to a path relative
/// to the upload root.
///
/// `prefixes` are the public URL prefixes uploads are served under. An
/// absolute `http(s)` URL whose path falls under a path-style prefix also
/// matches, whatever its host. Returns `None` for references outside every
/// prefix and for anything that tries to climb out of the root.
pub fn relative_upload_path(reference: &str, prefixes: &[&str]) -> Option<String> {
    let reference = reference.trim();
    let without_query = reference.split(['?', '#']).next().unwrap_or("");

    let rest = strip_any_prefix(without_query, prefixes)
        .map(str::to_string)
        .or_else(|| {
            let url = url::Url::parse(reference).ok()?;
            if !matches!(url.scheme(), "http" | "https") {
                return None;
            }
            let path_prefixes: Vec<&str> = prefixes
                .iter()
                .copied()
                .filter(|p| p.starts_with('/'))
                .collect();
            strip_any_prefix(url.path(), &path_prefixes).map(str::to_string)
        })?;

    let relative = rest.trim_start_matches('/');
    if relative.is_empty()
        || relative
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return None;
    }
    Some(relative.to_string())
}

fn strip_any_prefix<'a>(value: &'a str, prefixes: &[&str]) -> Option<&'a str> {
    prefixes.iter().find_map(|prefix| {
        let prefix = prefix.trim_end_matches('/');
        if prefix.is_empty() {
            return None;
        }
        value.strip_prefix(prefix).and_then(|r| r.strip_prefix('/'))
    })
}
