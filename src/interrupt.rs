//! Ctrl+C handling.
//!
//! The handler only raises a flag. Both stages poll it between files, so a
//! mask is never half written and the result table is never written from a
//! partial run.

use crate::error::{Error, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Install the Ctrl+C handler. Failure is logged, not fatal.
pub fn install_handler() {
    if let Err(e) = ctrlc::set_handler(|| {
        INTERRUPTED.store(true, Ordering::SeqCst);
    }) {
        warn!("Failed to install Ctrl+C handler: {e}");
    }
}

/// True once Ctrl+C was pressed.
pub fn is_interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

/// `Err(Error::Interrupted)` once Ctrl+C was pressed.
pub fn check() -> Result<()> {
    if is_interrupted() {
        Err(Error::Interrupted)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_passes_without_interrupt() {
        assert!(!is_interrupted());
        assert!(check().is_ok());
    }
}
