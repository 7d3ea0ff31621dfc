//! Operation context tracking
//!
//! Problems are stamped with the unit of work they occurred in. The
//! [`CurrentOperation`] handle tracks which operation is in flight: callers
//! mark a scope with [`CurrentOperation::enter`] and the returned guard keeps
//! the operation active until it drops. Outside any scope the handle resolves
//! to [`OperationId::root`], so lookups never fail.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Identifier of one unit of work in the build-operation tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationId(Uuid);

impl OperationId {
    /// Mint a fresh operation identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The root context that exists outside any explicit unit of work.
    #[must_use]
    pub const fn root() -> Self {
        Self(Uuid::nil())
    }

    /// Whether this is the root context.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for OperationId {
    fn default() -> Self {
        Self::root()
    }
}

impl std::fmt::Display for OperationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Cloneable handle resolving the operation currently in flight.
///
/// Clones share state, so the handle can be distributed to producers at
/// construction time while scopes are entered elsewhere.
#[derive(Debug, Clone, Default)]
pub struct CurrentOperation {
    stack: Arc<Mutex<Vec<OperationId>>>,
}

impl CurrentOperation {
    /// Create a handle with no operation in flight.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The active operation, or the root id when no scope was entered.
    #[must_use]
    pub fn current(&self) -> OperationId {
        let Ok(stack) = self.stack.lock() else {
            return OperationId::root();
        };
        stack.last().copied().unwrap_or_else(OperationId::root)
    }

    /// Mark `id` as the active operation until the returned guard drops.
    #[must_use = "the operation stays active only while the guard is held"]
    pub fn enter(&self, id: OperationId) -> OperationGuard {
        if let Ok(mut stack) = self.stack.lock() {
            stack.push(id);
        }
        OperationGuard {
            stack: Arc::clone(&self.stack),
            id,
        }
    }
}

/// Scope guard produced by [`CurrentOperation::enter`].
#[derive(Debug)]
pub struct OperationGuard {
    stack: Arc<Mutex<Vec<OperationId>>>,
    id: OperationId,
}

impl Drop for OperationGuard {
    fn drop(&mut self) {
        let Ok(mut stack) = self.stack.lock() else {
            return;
        };
        // Remove the most recent occurrence; tolerates out-of-order drops.
        if let Some(index) = stack.iter().rposition(|op| *op == self.id) {
            stack.remove(index);
        }
    }
}
