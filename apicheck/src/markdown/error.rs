use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IoError: {0}")]
    IoError(#[from] io::Error),
    #[error("Markdown format is invalid")]
    InvalidMarkdownFormat,
    #[error("Couldn't parse interaction number from the markdown file")]
    InvalidInteractionNumber,
    #[error("The status code is invalid")]
    InvalidStatusCode,
}
