//! Cancellation: a shared abort token and a scoped SIGINT handler.
//!
//! The pipeline checks the token between stages and from inside the curl
//! callbacks; when set, the transfer in progress stops and returns
//! [`Error::Interrupted`]. Bytes already written stay on disk.

use crate::error::Error;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Shared abort flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// `Err(Interrupted)` once cancelled.
    pub fn check(&self) -> Result<(), Error> {
        if self.is_cancelled() {
            Err(Error::Interrupted)
        } else {
            Ok(())
        }
    }
}

static SIGINT_TOKEN: OnceLock<CancelToken> = OnceLock::new();

/// Token tripped by Ctrl+C while a [`SigintGuard`] is alive.
pub fn sigint_token() -> CancelToken {
    SIGINT_TOKEN.get_or_init(CancelToken::new).clone()
}

#[cfg(unix)]
extern "C" fn on_sigint(_signum: libc::c_int) {
    if let Some(token) = SIGINT_TOKEN.get() {
        token.cancel();
    }
}

/// Routes SIGINT to [`sigint_token`] until dropped, then restores the previous
/// disposition. Without `SA_RESTART`, so a blocked syscall sees the interrupt.
/// On non-Unix targets this is a no-op and Ctrl+C keeps its default behavior.
pub struct SigintGuard {
    #[cfg(unix)]
    previous: libc::sigaction,
}

impl SigintGuard {
    pub fn install() -> std::io::Result<Self> {
        // Initialize before the handler can possibly run.
        let _ = sigint_token();
        install_handler()
    }
}

#[cfg(unix)]
fn install_handler() -> std::io::Result<SigintGuard> {
    // SAFETY: zeroed sigaction is a valid "no flags, empty mask" value;
    // the handler only performs an atomic store.
    unsafe {
        let mut action: libc::sigaction = std::mem::zeroed();
        action.sa_sigaction = on_sigint as extern "C" fn(libc::c_int) as libc::sighandler_t;
        libc::sigemptyset(&mut action.sa_mask);
        let mut previous: libc::sigaction = std::mem::zeroed();
        if libc::sigaction(libc::SIGINT, &action, &mut previous) != 0 {
            return Err(std::io::Error::last_os_error());
        }
        Ok(SigintGuard { previous })
    }
}

#[cfg(not(unix))]
fn install_handler() -> std::io::Result<SigintGuard> {
    Ok(SigintGuard {})
}

#[cfg(unix)]
impl Drop for SigintGuard {
    fn drop(&mut self) {
        // SAFETY: restores the action captured in `install_handler`.
        unsafe {
            libc::sigaction(libc::SIGINT, &self.previous, std::ptr::null_mut());
        }
    }
}
