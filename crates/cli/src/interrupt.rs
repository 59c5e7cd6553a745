//! Cooperative Ctrl+C handling.
//!
//! The handler only flips an atomic flag; the monitor loop observes it
//! between poll ticks, so cancellation never needs to preempt a read.

use std::sync::atomic::AtomicBool;

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Flag the monitor loop polls between ticks.
pub fn flag() -> &'static AtomicBool {
    &INTERRUPTED
}

/// Install the SIGINT handler. A no-op on non-unix targets, where the
/// default Ctrl+C behavior terminates the process.
pub fn install() {
    #[cfg(unix)]
    {
        // SAFETY: the handler is async-signal-safe; it only stores to an
        // atomic and touches no locks or allocations.
        unsafe {
            libc::signal(
                libc::SIGINT,
                on_sigint as extern "C" fn(libc::c_int) as libc::sighandler_t,
            );
        }
    }
}

#[cfg(unix)]
extern "C" fn on_sigint(_signum: libc::c_int) {
    INTERRUPTED.store(true, std::sync::atomic::Ordering::SeqCst);
}
