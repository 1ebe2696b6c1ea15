use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid username {name:?}: {reason}")]
    InvalidUsername { name: String, reason: &'static str },

    #[error("Field `{field}` contains a reserved character: {value:?}")]
    ReservedCharacter { field: &'static str, value: String },

    #[error("Invalid elapsed time: {0}")]
    InvalidElapsed(f64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error is a "file not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}
