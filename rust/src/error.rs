//! Error handling and result types for OrderedTree operations.
//!
//! Every operation reports its status directly to the caller. There is no
//! global error state and nothing here panics.

/// Error type for ordered tree operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// A node allocation failed.
    NoMemory(String),
    /// An element comparing equal to the inserted one is already stored.
    AlreadyExists,
    /// No stored element compares equal to the target.
    NotFound,
    /// An argument was rejected (for example an unusable node capacity).
    BadArgument(String),
    /// Structural damage found by validation or by a dangling node id.
    CorruptedTree(String),
}

impl TreeError {
    /// Create a BadArgument error for an unusable capacity
    pub fn invalid_capacity(capacity: usize, min_required: usize) -> Self {
        Self::BadArgument(format!(
            "Capacity {} is invalid (minimum required: {})",
            capacity, min_required
        ))
    }

    /// Create a NoMemory error with context
    pub fn no_memory(resource: &str, reason: &str) -> Self {
        Self::NoMemory(format!("Failed to allocate {}: {}", resource, reason))
    }

    /// Create a CorruptedTree error with context
    pub fn corrupted_tree(component: &str, details: &str) -> Self {
        Self::CorruptedTree(format!("{} corruption: {}", component, details))
    }

    /// Create a CorruptedTree error for a node id that does not resolve
    pub(crate) fn missing_node(id: crate::types::NodeId) -> Self {
        Self::corrupted_tree("Arena", &format!("node {} is not allocated", id))
    }

    /// Check if this error is an allocation failure
    pub fn is_no_memory(&self) -> bool {
        matches!(self, Self::NoMemory(_))
    }

    /// Check if this error is a logical miss rather than a failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

impl std::fmt::Display for TreeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TreeError::NoMemory(msg) => write!(f, "Out of memory: {}", msg),
            TreeError::AlreadyExists => write!(f, "Element already exists in tree"),
            TreeError::NotFound => write!(f, "Element not found in tree"),
            TreeError::BadArgument(msg) => write!(f, "Bad argument: {}", msg),
            TreeError::CorruptedTree(msg) => write!(f, "Corrupted tree: {}", msg),
        }
    }
}

impl std::error::Error for TreeError {}

impl From<std::collections::TryReserveError> for TreeError {
    fn from(e: std::collections::TryReserveError) -> Self {
        TreeError::no_memory("storage", &e.to_string())
    }
}

/// Public result type for tree operations that may fail
pub type TreeResult<T> = Result<T, TreeError>;

/// Result type for lookup operations
pub type KeyResult<T> = Result<T, TreeError>;

/// Result type for tree modification operations
pub type ModifyResult<T> = Result<T, TreeError>;

/// Result type for tree construction and validation
pub type InitResult<T> = Result<T, TreeError>;

/// Result extension trait for attaching context to failures
pub trait TreeResultExt<T> {
    /// Prefix the message of a failure with additional context
    fn with_context(self, context: &str) -> TreeResult<T>;

    /// Prefix the message of a failure with an operation name
    fn with_operation(self, operation: &str) -> TreeResult<T>;
}

impl<T> TreeResultExt<T> for Result<T, TreeError> {
    fn with_context(self, context: &str) -> TreeResult<T> {
        self.map_err(|e| match e {
            TreeError::NoMemory(msg) => TreeError::NoMemory(format!("{}: {}", context, msg)),
            TreeError::BadArgument(msg) => TreeError::BadArgument(format!("{}: {}", context, msg)),
            TreeError::CorruptedTree(msg) => TreeError::corrupted_tree(context, &msg),
            // Logical outcomes carry no message
            other => other,
        })
    }

    fn with_operation(self, operation: &str) -> TreeResult<T> {
        self.with_context(&format!("Operation '{}'", operation))
    }
}
