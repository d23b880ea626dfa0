pub mod config;
pub mod mode;
pub mod trace_params;

pub use config::{AppConfig, RemoteRemovalConfig};
pub use mode::{ModeConfig, OutputMode, ViewBoxPolicy};
pub use trace_params::{PosterizeParams, TraceParams};
