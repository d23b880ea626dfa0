//! Background removal with optional remote segmentation.
//!
//! When a remote service is configured, the whole image is delegated to it
//! first; any failure (connect error, timeout, non-success status,
//! undecodable response) falls back to the local corner-sampling heuristic
//! without surfacing to the caller. Removal therefore never fails a
//! request — worst case the bitmap comes back with its background intact.

use std::time::Duration;

use brand_palette::{detect_background, remove_background, Bitmap, BACKGROUND_TOLERANCE};
use thiserror::Error;

use crate::models::RemoteRemovalConfig;
use crate::services::ingest;

/// Internal error for the remote delegation attempt. Logged, never
/// propagated.
#[derive(Debug, Error)]
enum RemoteRemovalError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("unusable service response: {0}")]
    Response(String),
}

/// Background removal service.
pub struct BackgroundService {
    remote: Option<(RemoteRemovalConfig, reqwest::blocking::Client)>,
}

impl BackgroundService {
    /// Create the service, building the HTTP client for the optional
    /// remote endpoint. A client that cannot be built disables remote
    /// removal (logged) rather than failing startup.
    pub fn new(remote: Option<RemoteRemovalConfig>) -> Self {
        let remote = remote.and_then(|config| {
            let client = reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build();
            match client {
                Ok(client) => Some((config, client)),
                Err(e) => {
                    tracing::warn!(%e, "Failed to build HTTP client, remote background removal disabled");
                    None
                }
            }
        });
        Self { remote }
    }

    /// Remove the background from `bitmap`.
    ///
    /// Tries the remote segmentation service when configured, falling back
    /// to the local heuristic on any failure — unconditionally and
    /// silently from the caller's perspective (the failure is logged).
    /// The returned bitmap always has an alpha plane.
    pub fn remove(&self, bitmap: Bitmap) -> Bitmap {
        let bitmap = bitmap.into_rgba();

        if let Some((config, client)) = &self.remote {
            match request_remote(config, client, &bitmap) {
                Ok(cut_out) => {
                    tracing::debug!(endpoint = %config.endpoint, "Remote background removal succeeded");
                    return cut_out.into_rgba();
                }
                Err(e) => {
                    tracing::warn!(
                        endpoint = %config.endpoint,
                        error = %e,
                        "Remote background removal failed, falling back to local heuristic"
                    );
                }
            }
        }

        remove_local(bitmap)
    }
}

/// Corner-sampling heuristic removal.
fn remove_local(mut bitmap: Bitmap) -> Bitmap {
    let background = detect_background(&bitmap);
    let cleared = remove_background(&mut bitmap, background, BACKGROUND_TOLERANCE);
    tracing::debug!(
        background = %background,
        cleared,
        "Removed background with local heuristic"
    );
    bitmap
}

fn request_remote(
    config: &RemoteRemovalConfig,
    client: &reqwest::blocking::Client,
    bitmap: &Bitmap,
) -> Result<Bitmap, RemoteRemovalError> {
    let png = ingest::encode_png(bitmap).map_err(|e| RemoteRemovalError::Response(e.to_string()))?;

    let mut request = client
        .post(&config.endpoint)
        .header(reqwest::header::CONTENT_TYPE, "image/png")
        .body(png);
    if let Some(api_key) = &config.api_key {
        request = request.header("X-Api-Key", api_key);
    }

    let response = request.send()?;
    if !response.status().is_success() {
        return Err(RemoteRemovalError::Status(response.status()));
    }

    let bytes = response.bytes()?;
    ingest::decode_to_bitmap(&bytes).map_err(|e| RemoteRemovalError::Response(e.to_string()))
}
