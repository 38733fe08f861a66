use serde_json::Error as SerdeJsonError;
use serde_yaml::Error as SerdeYamlError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Yaml error: {0}")]
    SerdeYaml(#[from] SerdeYamlError),
    #[error("Json error: {0}")]
    SerdeJson(#[from] SerdeJsonError),
    #[error("expected document of kind {expected}, found '{found}'")]
    UnexpectedKind { expected: &'static str, found: String },
    #[error("{kind}: no version is flagged as the storage version")]
    NoStorageVersion { kind: String },
    #[error("{kind}: storage version {version} has no openAPIV3Schema")]
    MissingSchema { kind: String, version: String },
    #[error("schema at '{at}' is not a mapping")]
    NotAMapping { at: String },
    #[error("schema at '{at}' must be an object")]
    NotAnObject { at: String },
    #[error("unsupported schema type '{type_name}' at '{at}'")]
    UnsupportedType { type_name: String, at: String },
    #[error("resource kind {0} is defined more than once")]
    DuplicateKind(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("empty path expression")]
    Empty,
    #[error("empty segment in '{0}'")]
    EmptySegment(String),
    #[error("malformed filter in '{0}'")]
    MalformedFilter(String),
    #[error("only one filter segment is allowed in '{0}'")]
    MultipleFilters(String),
}
