//! Scoped process umask changes
//!
//! The umask is process-global state. `UmaskGuard` swaps it for the lifetime
//! of the guard and restores the previous mask on drop, including during
//! unwinding. Guards are serialized through a process-wide lock so two
//! guards never interleave their save/restore pairs.

use parking_lot::{const_mutex, Mutex, MutexGuard};

static UMASK_LOCK: Mutex<()> = const_mutex(());

/// Restores the previous umask when dropped
pub struct UmaskGuard {
    #[cfg(unix)]
    previous: libc::mode_t,
    _lock: MutexGuard<'static, ()>,
}

impl UmaskGuard {
    /// Replace the process umask with `mask` until the guard is dropped
    pub fn set(mask: u32) -> Self {
        let lock = UMASK_LOCK.lock();

        #[cfg(unix)]
        {
            // SAFETY: umask(2) cannot fail and only swaps an integer.
            let previous = unsafe { libc::umask(mask as libc::mode_t) };
            Self {
                previous,
                _lock: lock,
            }
        }

        #[cfg(not(unix))]
        {
            let _ = mask;
            Self { _lock: lock }
        }
    }
}

impl Drop for UmaskGuard {
    fn drop(&mut self) {
        #[cfg(unix)]
        {
            // SAFETY: see `UmaskGuard::set`.
            unsafe {
                libc::umask(self.previous);
            }
        }
    }
}

/// Run `f` with the process umask set to `mask`, restoring it afterwards
pub fn with_umask<T>(mask: u32, f: impl FnOnce() -> T) -> T {
    let _guard = UmaskGuard::set(mask);
    f()
}
