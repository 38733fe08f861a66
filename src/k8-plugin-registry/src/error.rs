use std::io::Error as IoError;

use thiserror::Error;

use k8_schema::SchemaError;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("bundle not found: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    IoError(#[from] IoError),
    #[error("{0}")]
    Other(String),
}

/// failure of one bundle source, never fatal to the registry
#[derive(Error, Debug)]
pub enum BundleError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("parse failed: {0}")]
    Parse(#[from] SchemaError),
}
