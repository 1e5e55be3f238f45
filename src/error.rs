use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a run.
///
/// A write that is answered with something other than `204 No Content` but is
/// not an error status is not represented here, see
/// [`BatchOutcome::UnexpectedStatus`](crate::BatchOutcome::UnexpectedStatus).
#[derive(Error, Debug)]
pub enum Error {
    /// The endpoint could not be reached.
    #[error("Error connecting to InfluxDB: {0}")]
    Transport(#[from] ureq::Error),

    /// The endpoint answered with an error status but its body could not be
    /// read.
    #[error("Error reading InfluxDB response (HTTP {status}): {source}")]
    Response {
        status: u16,
        #[source]
        source: ureq::Error,
    },

    /// The endpoint rejected the batch.
    #[error("Error inserting data: HTTP {status}")]
    Endpoint { status: u16, body: String },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Response body returned alongside a rejected batch.
    pub fn body(&self) -> Option<&str> {
        match self {
            Error::Endpoint { body, .. } => Some(body),
            _ => None,
        }
    }
}
