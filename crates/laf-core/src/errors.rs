use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers (and the process
/// supervisor reading startup failures) can match on without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input/Config
    InvalidInput,
    InvalidConfig,

    // Lifecycle
    /// A resource was requested before the resource it depends on exists
    Precondition,
    /// A mutation was attempted on a registry that already reached `Ready`
    Frozen,
    /// A write-once slot is already populated
    AlreadyExists,
    NotFound,

    // Integration/IO
    /// Opening or handshaking a connection pool failed
    Connection,
    Persistence,
    Timeout,
    Io,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::Precondition => "ERR_PRECONDITION",
            ExErrorKind::Frozen => "ERR_FROZEN",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Connection => "ERR_CONNECTION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Timeout => "ERR_TIMEOUT",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification (`kind`) for programmatic handling plus the
/// operation and entity context needed to read a failure out of the logs.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity context (database name, slot name)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
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

    /// Get the entity context, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
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
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Failure taxonomy of the resource lifecycle manager
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResourceError {
    /// A store handle was requested before its accessor was created
    #[error("{slot} is empty, run init() first")]
    AccessorEmpty { slot: &'static str },

    /// Establishing a connection pool failed
    #[error("failed to connect to database {database}: {message}")]
    Connection { database: String, message: String },

    /// The registry is `Ready` and no longer accepts mutation
    #[error("registry is frozen, cannot replace {slot}")]
    Frozen { slot: &'static str },

    /// A write-once slot already holds a value
    #[error("{slot} is already populated")]
    SlotOccupied { slot: &'static str },

    /// Settings failed validation
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl From<ResourceError> for ExError {
    fn from(err: ResourceError) -> Self {
        let message = err.to_string();
        match err {
            ResourceError::AccessorEmpty { slot } => ExError::new(ExErrorKind::Precondition)
                .with_entity_id(slot)
                .with_message(message),

            ResourceError::Connection { database, .. } => ExError::new(ExErrorKind::Connection)
                .with_op("connect")
                .with_entity_id(database)
                .with_message(message),

            ResourceError::Frozen { slot } => ExError::new(ExErrorKind::Frozen)
                .with_entity_id(slot)
                .with_message(message),

            ResourceError::SlotOccupied { slot } => ExError::new(ExErrorKind::AlreadyExists)
                .with_entity_id(slot)
                .with_message(message),

            ResourceError::InvalidConfig { .. } => ExError::new(ExErrorKind::InvalidConfig)
                .with_op("load_settings")
                .with_message(message),
        }
    }
}

impl From<serde_json::Error> for ExError {
    fn from(err: serde_json::Error) -> Self {
        ExError::new(ExErrorKind::Serialization).with_message(err.to_string())
    }
}
