use std::path::PathBuf;

use thiserror::Error;

/// Reasons a dissolve run stops. None of them leave an output file behind.
#[derive(Error, Debug)]
pub enum DissolveError {
    #[error("{0:?} not found")]
    MissingInput(PathBuf),

    #[error("'{0}' attribute not found in the input features")]
    MissingField(String),

    #[error("Feature {index} has no value for the '{field}' attribute")]
    MissingGroupKey { index: usize, field: String },

    #[error("Feature {index} has a '{field}' value {value} that is not a string or a number")]
    InvalidGroupKey {
        index: usize,
        field: String,
        value: serde_json::Value,
    },

    #[error("Feature {index} has a {geometry_type} geometry, only polygons can be dissolved")]
    UnsupportedGeometry {
        index: usize,
        geometry_type: &'static str,
    },

    #[error("Could not load features")]
    Load(#[source] anyhow::Error),

    #[error("Could not save features")]
    Save(#[source] anyhow::Error),
}
