use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("GFW_API_TOKEN is not set (add it to the environment or to .env)")]
    MissingToken,

    #[error("invalid GFW configuration: {0}")]
    Env(#[from] envy::Error),
}

/// A row of provider data that does not match the expected record shape.
#[derive(Error, Debug, PartialEq)]
pub enum SchemaError {
    #[error("missing required column `{0}`")]
    MissingColumn(&'static str),

    #[error("row {row}: missing required field `{field}`")]
    MissingField { row: usize, field: &'static str },

    #[error("row {row}: field `{field}` should be {expected}, found {found}")]
    InvalidField {
        row: usize,
        field: &'static str,
        expected: &'static str,
        found: String,
    },
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("end date {end} is before start date {start}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("GFW API responded with {status}: {message}")]
    Api {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("response schema mismatch: {0}")]
    Schema(#[from] SchemaError),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("nothing to render: the record table is empty")]
    EmptyTable,

    #[error("IO error {0}")]
    Io(#[from] std::io::Error),

    #[error("could not embed map data: {0}")]
    Json(#[from] serde_json::Error),
}
