pub mod background;
pub mod ingest;
pub mod naming;
pub mod pipeline;
pub mod vectorizer;

pub use background::BackgroundService;
pub use ingest::IngestedAsset;
pub use pipeline::{AssetPipeline, ProcessRequest, ProcessingResult};
pub use vectorizer::Vectorizer;
