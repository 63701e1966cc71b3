use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Configuration,
    Startup,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Configuration => "configuration",
            Self::Startup => "startup",
        }
    }

    pub fn exit_code(self) -> u8 {
        match self {
            Self::Validation => 3,
            Self::Configuration => 4,
            Self::Startup => 5,
        }
    }
}

/// Failure classes of the scoring pipeline.
///
/// Validation errors are caused by the submitted observation and can be fixed
/// by the user. Configuration errors mean the loaded artifacts and the feature
/// assembler disagree. Startup errors mean the artifacts could not be loaded.
#[derive(Debug, Error)]
pub enum CkdError {
    #[error("invalid input: {}", .0.join("; "))]
    Validation(Vec<String>),
    #[error("artifact/assembler mismatch: {0}")]
    Configuration(String),
    #[error("failed to load artifact {artifact}: {reason}")]
    Startup { artifact: String, reason: String },
}

impl CkdError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(vec![message.into()])
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn startup(artifact: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Startup {
            artifact: artifact.into(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Startup { .. } => ErrorKind::Startup,
        }
    }
}

/// Finds the taxonomy kind anywhere in an `anyhow` chain.
pub fn classify(err: &anyhow::Error) -> Option<ErrorKind> {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<CkdError>())
        .map(CkdError::kind)
}
