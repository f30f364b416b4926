/// Result alias that carries the custom [`GroogieError`] type.
pub type Result<T> = std::result::Result<T, GroogieError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum GroogieError {
    /// Free-form failure reported by a collaborator (actor, CLI plumbing).
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Malformed store or configuration JSON.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    /// The requested clip is absent from the actor's animation catalog.
    #[error("animation clip `{clip}` not found")]
    AnimationNotFound { clip: String },
    /// The actor has not finished initialising.
    #[error("actor is not available yet")]
    ActorUnavailable,
    /// A block could not be interpreted.
    #[error("invalid block at index {index}: {reason}")]
    InvalidBlock { index: usize, reason: String },
    #[error("unknown dancer `{0}`")]
    UnknownDancer(String),
    #[error("block index {index} out of range for choreography of length {len}")]
    BlockIndexOutOfRange { index: usize, len: usize },
}

impl GroogieError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

impl From<&str> for GroogieError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for GroogieError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_structured_variants() {
        let err = GroogieError::BlockIndexOutOfRange { index: 4, len: 2 };
        assert_eq!(
            err.to_string(),
            "block index 4 out of range for choreography of length 2"
        );

        let err = GroogieError::AnimationNotFound {
            clip: "salsa9".to_string(),
        };
        assert!(err.to_string().contains("salsa9"));
    }

    #[test]
    fn converts_plain_messages() {
        let err: GroogieError = "mixer exploded".into();
        assert!(matches!(err, GroogieError::Message(ref m) if m == "mixer exploded"));
    }
}
