use std::{error, fmt};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    WebApiError(String),
    UnexpectedResponse(String),
    InvalidBulkCount(String),
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WebApiError(err) => f.write_str(err),
            Self::UnexpectedResponse(msg) => write!(f, "Unexpected server response: {msg}"),
            Self::InvalidBulkCount(input) => write!(f, "Invalid row count: {input:?}"),
        }
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        Error::WebApiError(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::UnexpectedResponse(err.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::WebApiError(err.to_string())
    }
}
