use serde::Deserialize;
use std::path::Path;

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    /// Optional third-party segmentation service for background removal.
    /// When absent (the default), removal always uses the local heuristic.
    pub remote_removal: Option<RemoteRemovalConfig>,

    /// Soft end-to-end latency budget in milliseconds. Exceeding it only
    /// logs a warning; the request still completes.
    pub latency_budget_ms: u64,

    /// Side length of the square thumbnail used for color sampling.
    pub sample_resolution: u32,

    /// Longest side the bitmap is resized to before tracing.
    pub trace_resolution: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            remote_removal: None,
            latency_budget_ms: 8_000,
            sample_resolution: 100,
            trace_resolution: 512,
        }
    }
}

/// Configuration for the remote background-removal service
#[derive(Debug, Deserialize, Clone)]
pub struct RemoteRemovalConfig {
    /// Endpoint accepting a PNG body and returning a cut-out PNG.
    pub endpoint: String,

    /// Optional API key sent as the `X-Api-Key` header.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds. The call must never block the pipeline
    /// indefinitely; on timeout the local heuristic takes over.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl AppConfig {
    /// Load configuration from a YAML file, falling back to defaults.
    ///
    /// A missing or unparseable file is not an error: the pipeline runs
    /// fine without remote removal or custom budgets, so both cases log a
    /// warning and return [`AppConfig::default`].
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str::<Self>(&content) {
                Ok(config) => {
                    tracing::info!(
                        path = %path.display(),
                        remote_removal = config.remote_removal.is_some(),
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }
}
