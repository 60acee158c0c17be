pub use crate::types::TrackerError;

pub type Result<T> = std::result::Result<T, TrackerError>;

/// Context helpers that pick the error variant at the call site, so a
/// failure is classified where its cause is known: startup wiring maps
/// to `ConfigError`, remote-service failures to `Upstream`.
pub trait ErrorContext<T> {
    fn config_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;

    fn upstream_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::fmt::Display,
{
    fn config_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| TrackerError::ConfigError(format!("{}: {}", f(), e)))
    }

    fn upstream_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| TrackerError::Upstream(format!("{}: {}", f(), e)))
    }
}
