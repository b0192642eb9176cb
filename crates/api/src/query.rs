//! Shared query parameter types for API handlers.

use linkumkm_core::uploads::UploadKind;
use serde::Deserialize;

/// `?days=` window for daily analytics series.
#[derive(Debug, Deserialize)]
pub struct StatsParams {
    pub days: Option<i32>,
}

impl StatsParams {
    pub const DEFAULT_DAYS: i32 = 30;

    pub fn days(&self) -> i32 {
        self.days.unwrap_or(Self::DEFAULT_DAYS)
    }
}

/// `?kind=` for the admin upload endpoint.
#[derive(Debug, Deserialize)]
pub struct UploadParams {
    pub kind: UploadKind,
}
