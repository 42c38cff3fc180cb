use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown station: {0}")]
    UnknownStation(String),
    #[error("Unknown line: {0}")]
    UnknownLine(String),
    #[error("Invalid topology: {0}")]
    InvalidTopology(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
