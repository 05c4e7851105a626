//! Error types

use thiserror::Error;

/// Structural errors a caller can hit at runtime.
///
/// Programmer-misuse faults that would interpolate garbage (mismatched
/// value kinds, tweening a property the target does not expose) panic
/// instead; see the crate docs.
#[derive(Debug, Error)]
pub enum TweenError {
    /// A label-relative timeline position referenced a label that was
    /// never added.
    #[error("unknown timeline label `{0}`")]
    UnknownLabel(String),

    /// A timeline position string did not match the
    /// `label`, `label+=offset`, `label-=offset` grammar.
    #[error("unparseable timeline position `{0}`")]
    BadPosition(String),
}
