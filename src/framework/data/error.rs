#[derive(Debug, thiserror::Error, thisslime::TracingError)]
pub enum Error {
    #[error("error reading or writing data file: {0}")]
    #[event(level = ERROR)]
    Io(#[from] std::io::Error),

    #[error("malformed data file: {0}")]
    #[event(level = ERROR)]
    Json(#[from] serde_json::Error),
}
