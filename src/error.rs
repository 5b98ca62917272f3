//! Crate-level error types.

use std::fmt;

use crate::animation::MorphId;
use crate::gpu::render_context::RenderContextError;

/// Errors produced by the morpho crate.
#[derive(Debug)]
pub enum MorphError {
    /// A shape source was unreadable or malformed. Fatal to scene setup.
    ShapeLoad {
        /// Name of the shape whose source failed.
        name: String,
        /// What went wrong, including the offending line when known.
        reason: String,
    },
    /// Start and end shapes of a morph have different instance counts.
    ShapeMismatch {
        /// Start shape name.
        start: String,
        /// End shape name.
        end: String,
        /// Instance count of the start shape.
        start_len: usize,
        /// Instance count of the end shape.
        end_len: usize,
    },
    /// A morph referenced a shape the store does not hold.
    UnknownShape(String),
    /// A superseded morph's tick fired after cancellation.
    StaleTick(MorphId),
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// Failed to spawn a background thread.
    ThreadSpawn(std::io::Error),
    /// TOML options parsing/serialization or validation failure.
    OptionsParse(String),
    /// Frame presentation failure.
    Render(String),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl MorphError {
    pub(crate) fn shape_load(
        name: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::ShapeLoad {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for MorphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShapeLoad { name, reason } => {
                write!(f, "failed to load shape '{name}': {reason}")
            }
            Self::ShapeMismatch {
                start,
                end,
                start_len,
                end_len,
            } => write!(
                f,
                "cannot morph '{start}' ({start_len} instances) into '{end}' \
                 ({end_len} instances)"
            ),
            Self::UnknownShape(name) => write!(f, "unknown shape '{name}'"),
            Self::StaleTick(id) => write!(f, "stale tick for morph {id}"),
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::ThreadSpawn(e) => {
                write!(f, "failed to spawn thread: {e}")
            }
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Render(msg) => write!(f, "render error: {msg}"),
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for MorphError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Io(e) | Self::ThreadSpawn(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for MorphError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<std::io::Error> for MorphError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_message_names_both_shapes() {
        let err = MorphError::ShapeMismatch {
            start: "teapot".to_owned(),
            end: "brain".to_owned(),
            start_len: 3,
            end_len: 4,
        };
        let msg = err.to_string();
        assert!(msg.contains("teapot"));
        assert!(msg.contains("brain"));
        assert!(msg.contains('3'));
    }

    #[test]
    fn io_errors_keep_their_source() {
        use std::error::Error;

        let err = MorphError::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        assert!(err.source().is_some());
    }
}
