pub mod config;
pub mod error;
pub mod gallery;
pub mod model_id;
pub mod schema;
pub mod sentiment;

pub use config::{AppConfig, ModelRegistry};
pub use error::CoreError;
pub use gallery::Visualization;
pub use model_id::ModelId;
pub use schema::tweets;
pub use sentiment::Sentiment;
