use topomap_graph::GraphError;

pub type Result<T> = std::result::Result<T, Error>;

/// Hard failures only. Data-quality problems in rows and paths are logged and dropped instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("layout failed: {0}")]
    Layout(#[from] narwhal::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {message}")]
    Config { message: String },
}
