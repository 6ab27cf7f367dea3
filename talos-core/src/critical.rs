//! Scoped global-interrupt disable
//!
//! Compound register operations that both foreground code and interrupt
//! handlers touch run inside a critical section. The chip crate supplies
//! the actual disable/restore implementation through the `critical-section`
//! crate's `set_impl` hook; this module wraps it in the guard shape the
//! rest of the framework uses.
//!
//! Guards are strictly LIFO and must not be held across long operations.

pub use critical_section::CriticalSection;

/// Run `f` with global interrupts disabled.
///
/// The token passed to `f` proves the section is active for its lifetime.
/// Sections nest; the outermost one restores the interrupt state sampled
/// on entry.
pub fn with<R>(f: impl FnOnce(CriticalSection<'_>) -> R) -> R {
    critical_section::with(f)
}

/// An entered critical section.
///
/// `enter` samples the current global-interrupt enable state and disables
/// interrupts; `leave` (or drop) restores the sampled state rather than
/// unconditionally re-enabling.
#[must_use = "dropping the guard immediately ends the critical section"]
pub struct Critical {
    restore: critical_section::RestoreState,
}

impl Critical {
    pub fn enter() -> Critical {
        // SAFETY: the matching release happens exactly once, in Drop.
        let restore = unsafe { critical_section::acquire() };
        Critical { restore }
    }

    pub fn leave(self) {
        drop(self);
    }
}

impl Drop for Critical {
    fn drop(&mut self) {
        // SAFETY: `restore` came from the acquire in `enter`, and guards
        // are released in LIFO order.
        unsafe { critical_section::release(self.restore) }
    }
}
