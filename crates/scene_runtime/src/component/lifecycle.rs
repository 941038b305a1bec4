//! Component lifecycle state machine
//!
//! Every node moves through a fixed set of states. Transitions are
//! monotonic except that `Disposed` is terminal and may be requested
//! repeatedly without effect. Violations surface as errors at the call
//! site; they are never silently ignored or retried.

use thiserror::Error;

/// Current lifecycle state of a component node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Constructed by the factory, not yet configured
    Created,
    /// Template fields copied in, ready to activate
    Configured,
    /// Participating in update traversals and rendering
    Active,
    /// Deactivated; may be reactivated
    Inactive,
    /// Torn down permanently; terminal state
    Disposed,
}

impl LifecycleState {
    /// Whether the node participates in update traversals
    pub fn is_active(self) -> bool {
        self == LifecycleState::Active
    }

    /// Whether the node has been permanently torn down
    pub fn is_disposed(self) -> bool {
        self == LifecycleState::Disposed
    }

    /// Whether configuration is legal from this state
    ///
    /// Configure is idempotent before activation and remains legal on an
    /// Active or Inactive node, though it does not re-run activation-time
    /// setup there.
    pub fn can_configure(self) -> bool {
        !self.is_disposed()
    }

    /// Whether activation is legal from this state
    pub fn can_activate(self) -> bool {
        matches!(self, LifecycleState::Configured | LifecycleState::Inactive)
    }

    /// Whether deactivation is legal from this state
    pub fn can_deactivate(self) -> bool {
        self.is_active()
    }

    /// Ensure `self` is one of `allowed`, otherwise report `InvalidState`
    pub(crate) fn require(
        self,
        allowed: &[LifecycleState],
        operation: &'static str,
        node: &str,
    ) -> Result<(), LifecycleError> {
        if allowed.contains(&self) {
            Ok(())
        } else {
            Err(LifecycleError::InvalidState {
                operation,
                node: node.to_string(),
                state: self,
            })
        }
    }
}

/// Errors produced by lifecycle transitions and property mutation
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// The operation is illegal for the node's current state
    #[error("`{operation}` is not valid while node `{node}` is {state:?}")]
    InvalidState {
        /// Name of the rejected operation
        operation: &'static str,
        /// Name of the node the operation targeted
        node: String,
        /// State the node was in when the operation was rejected
        state: LifecycleState,
    },

    /// A caller-supplied value was rejected
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
