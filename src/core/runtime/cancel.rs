//=========================================================================
// Cancel Token
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::Cell;
use std::rc::Rc;

//=== Internal Dependencies ===============================================

use crate::core::error::TransitionError;

//=== CancelToken =========================================================

/// Cloneable cancellation flag for an in-flight transition.
///
/// Checked on every load poll, after the fade-out/load join, and on both
/// sides of the pre-reveal hook. Fades are never checked, so a token
/// triggered during fade-in leaves the transition to finish normally.
/// Triggering the token does not interrupt work already in progress; the
/// next checkpoint returns [`TransitionError::Cancelled`].
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }

    /// Clears the flag so the token can guard the next transition.
    pub fn reset(&self) {
        self.cancelled.set(false);
    }

    /// Returns `Err(Cancelled)` once the token has been triggered.
    pub fn check(&self) -> Result<(), TransitionError> {
        if self.is_cancelled() {
            Err(TransitionError::Cancelled)
        } else {
            Ok(())
        }
    }
}

//=== Tests ===============================================================
