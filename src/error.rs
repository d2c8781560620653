use thiserror::Error;

/// Failures reported by the transform and optics functions.
///
/// Both variants are deterministic: calling again with the same input fails
/// the same way.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    /// A malformed coordinate or orientation, eg an out of range latitude or
    /// a NaN component.
    #[error("InvalidInput: {0}")]
    InvalidInput(String),

    /// A non-physical camera, lens or aperture value.
    #[error("InvalidHardwareParameters: {0}")]
    InvalidHardwareParameters(String),
}

impl Error {
    pub(crate) fn input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    pub(crate) fn hardware(msg: impl Into<String>) -> Self {
        Error::InvalidHardwareParameters(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Fails with [`Error::InvalidInput`] unless every component is finite.
pub(crate) fn ensure_finite(what: &str, components: &[(&str, f64)]) -> Result<()> {
    match components.iter().find(|(_, value)| !value.is_finite()) {
        Some((name, value)) => Err(Error::input(format!(
            "{what} component `{name}` must be finite but got: {value}"
        ))),
        None => Ok(()),
    }
}
