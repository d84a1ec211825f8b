use crate::model::ValueError;
use std::path::Path;
use thiserror::Error;

/// Result type alias using the canonical ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// This taxonomy provides a stable, structured classification of all errors
/// raised by the parameter tree and the checkpoint engine. Each kind maps to a
/// stable error code that can be used for programmatic handling and testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Resolution
    NotFound,
    InvalidPath,
    NotAList,
    TypeMismatch,

    // Tree structure
    DuplicateName,
    CapacityExceeded,
    DanglingNode,
    RootExists,
    NoRoot,

    // Values
    InvalidInput,
    UnknownChoice,
    OutOfRange,

    // Checkpoint format
    /// A checkpoint line or value could not be parsed
    Format,

    // Integration/IO
    Io,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::InvalidPath => "ERR_INVALID_PATH",
            ExErrorKind::NotAList => "ERR_NOT_A_LIST",
            ExErrorKind::TypeMismatch => "ERR_TYPE_MISMATCH",
            ExErrorKind::DuplicateName => "ERR_DUPLICATE_NAME",
            ExErrorKind::CapacityExceeded => "ERR_CAPACITY_EXCEEDED",
            ExErrorKind::DanglingNode => "ERR_DANGLING_NODE",
            ExErrorKind::RootExists => "ERR_ROOT_EXISTS",
            ExErrorKind::NoRoot => "ERR_NO_ROOT",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::UnknownChoice => "ERR_UNKNOWN_CHOICE",
            ExErrorKind::OutOfRange => "ERR_OUT_OF_RANGE",
            ExErrorKind::Format => "ERR_FORMAT",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind plus optional context: the operation that
/// failed, the dotted parameter path involved and the checkpoint file touched.
#[derive(Debug, Clone, PartialEq)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<String>,
    file: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            file: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add parameter path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add file context
    pub fn with_file(mut self, file: &Path) -> Self {
        self.file = Some(file.display().to_string());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the parameter path context, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get the file context, if any
    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (param: {})", path)?;
        }
        if let Some(file) = &self.file {
            write!(f, " (file: {})", file)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|s| s as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain errors raised by the parameter tree
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamError {
    // ===== Resolution Errors =====
    /// No parameter exists at the given path
    #[error("Parameter not found: {path}")]
    NotFound { path: String },

    /// A dotted path contained an empty component
    #[error("Empty component in parameter path: {path:?}")]
    EmptyComponent { path: String },

    /// A path descended through a node that is not a list
    #[error("Parameter {path} is not a list")]
    NotAList { path: String },

    /// The resolved node has a different kind than requested
    #[error("Parameter {path} is a {actual} parameter, expected {expected}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        actual: &'static str,
    },

    // ===== Structural Errors =====
    /// A sibling with the same name already exists
    #[error("List {list} already has a child named {name}")]
    DuplicateName { list: String, name: String },

    /// The list is at its fixed capacity
    #[error("List {list} is full (capacity {capacity})")]
    CapacityExceeded { list: String, capacity: usize },

    /// A node id no longer refers to a live node
    #[error("Node id {id} does not refer to a live parameter")]
    DanglingNode { id: usize },

    /// create_root was called twice
    #[error("Root list already exists")]
    RootExists,

    /// An operation needed the root list before create_root was called
    #[error("Root list has not been created")]
    NoRoot,

    // ===== Value Errors =====
    /// A node rejected the value it was given
    #[error("Parameter {path}: {source}")]
    InvalidValue {
        path: String,
        #[source]
        source: ValueError,
    },

    /// A parameter name is empty or contains the path separator
    #[error("Invalid parameter name: {name:?}")]
    InvalidName { name: String },
}

/// Conversion from ParamError to ExError
impl From<ParamError> for ExError {
    fn from(err: ParamError) -> Self {
        let message = err.to_string();
        match err {
            ParamError::NotFound { path } => ExError::new(ExErrorKind::NotFound)
                .with_path(path)
                .with_message(message),

            ParamError::EmptyComponent { path } => ExError::new(ExErrorKind::InvalidPath)
                .with_path(path)
                .with_message(message),

            ParamError::NotAList { path } => ExError::new(ExErrorKind::NotAList)
                .with_path(path)
                .with_message(message),

            ParamError::TypeMismatch { path, .. } => ExError::new(ExErrorKind::TypeMismatch)
                .with_path(path)
                .with_message(message),

            ParamError::DuplicateName { list, .. } => ExError::new(ExErrorKind::DuplicateName)
                .with_path(list)
                .with_message(message),

            ParamError::CapacityExceeded { list, .. } => {
                ExError::new(ExErrorKind::CapacityExceeded)
                    .with_path(list)
                    .with_message(message)
            }

            ParamError::DanglingNode { .. } => {
                ExError::new(ExErrorKind::DanglingNode).with_message(message)
            }

            ParamError::RootExists => ExError::new(ExErrorKind::RootExists).with_message(message),

            ParamError::NoRoot => ExError::new(ExErrorKind::NoRoot).with_message(message),

            ParamError::InvalidValue { path, source } => {
                let kind = match source {
                    ValueError::UnknownChoice { .. } => ExErrorKind::UnknownChoice,
                    ValueError::OutOfRange { .. } => ExErrorKind::OutOfRange,
                    ValueError::LengthMismatch { .. } | ValueError::BackingExists => {
                        ExErrorKind::InvalidInput
                    }
                };
                ExError::new(kind).with_path(path).with_message(message)
            }

            ParamError::InvalidName { .. } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(message)
            }
        }
    }
}
