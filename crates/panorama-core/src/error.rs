use thiserror::Error;

/// Failure while loading or decoding a scene asset.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("request for {path} failed: {reason}")]
    Fetch { path: String, reason: String },
    #[error("{path} returned HTTP {status}")]
    Status { path: String, status: u16 },
    #[error("invalid glTF: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("glTF has no scene to instantiate")]
    NoScene,
    #[error("image decode failed: {0}")]
    Image(String),
}

/// Failure of the platform permission request itself (as opposed to a
/// denial, which is a regular answer).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PermissionError {
    #[error("permission API unavailable")]
    Unavailable,
    #[error("permission request rejected: {0}")]
    Rejected(String),
}
