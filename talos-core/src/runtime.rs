//! Post-reset startup sequence
//!
//! The chip crate's reset handler owns the vector table and RAM
//! initialisation (copying `.data`, zeroing `.bss`). Once RAM is live it
//! calls [`run`], which sequences the remaining bring-up and never
//! returns.

use core::sync::atomic::{compiler_fence, Ordering};

/// Run the framework startup sequence: chip init, user init, `main`, then
/// [`hang`].
///
/// A `main` that returns an error panics with that error, which routes
/// through the application's panic handler.
pub fn run<E: core::fmt::Debug>(
    chip_init: impl FnOnce(),
    user_init: impl FnOnce(),
    main: impl FnOnce() -> Result<(), E>,
) -> ! {
    chip_init();
    user_init();
    match main() {
        Ok(()) => hang(),
        Err(error) => panic!("main returned {:?}", error),
    }
}

/// Spin forever. The fence keeps the loop observable so the optimiser
/// cannot delete it.
pub fn hang() -> ! {
    loop {
        compiler_fence(Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    enum BootError {
        ConfigInvalid,
    }

    #[test]
    #[should_panic(expected = "ConfigInvalid")]
    fn test_failing_main_panics_with_error_name() {
        run(|| (), || (), || Err(BootError::ConfigInvalid));
    }

    #[test]
    #[should_panic(expected = "user init")]
    fn test_init_hooks_run_in_order() {
        // chip init must run before user init; the user hook observes it.
        let chip_ready = core::cell::Cell::new(false);
        run(
            || chip_ready.set(true),
            || {
                assert!(chip_ready.get());
                panic!("user init reached");
            },
            || Ok::<(), BootError>(()),
        );
    }
}
