//! Panic-site diagnostics for recovered pipeline faults.
//!
//! By the time `catch_unwind` returns, the stack that panicked is gone. A
//! process-wide hook records the location and backtrace on the panicking
//! thread, and the recovery point picks them up from there.

use std::{backtrace::Backtrace, cell::RefCell, panic, sync::Once};

/// Where a panic happened, captured before unwinding.
#[derive(Debug)]
pub struct PanicTrace {
    /// `file:line:column` of the panic, when known.
    pub location: Option<String>,
    pub backtrace: Backtrace,
}

thread_local! {
    static LAST_PANIC: RefCell<Option<PanicTrace>> = const { RefCell::new(None) };
}

static INSTALL: Once = Once::new();

/// Chain a hook that records every panic on the thread it happens on.
///
/// The previously installed hook still runs. Safe to call repeatedly.
pub fn install_hook() {
    INSTALL.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let trace = PanicTrace {
                location: info.location().map(ToString::to_string),
                backtrace: Backtrace::force_capture(),
            };
            let _ = LAST_PANIC.try_with(|slot| *slot.borrow_mut() = Some(trace));
            previous(info);
        }));
    });
}

/// Take the trace of the most recent panic on this thread.
pub fn take_last() -> Option<PanicTrace> {
    LAST_PANIC
        .try_with(|slot| slot.borrow_mut().take())
        .ok()
        .flatten()
}
