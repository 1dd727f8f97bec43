/// Domain-level error type shared by the validation helpers in this crate.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A request or parameter failed client-side validation.
    #[error("Validation failed: {0}")]
    Validation(String),
}
