//! Terminal error signalling
//!
//! Every seal failure ends in [`ErrorSignal::raise`], which never returns
//! control to the verification flow.

use crate::integrity::error::SealError;

/// Receives the first failure of a verification run and ends the flow
pub trait ErrorSignal: Send + Sync {
    fn raise(&self, error: SealError) -> !;
}

/// Panics with the failure reason
#[derive(Debug, Clone, Copy, Default)]
pub struct PanicSignal;

impl ErrorSignal for PanicSignal {
    fn raise(&self, error: SealError) -> ! {
        error.log_if_security_critical();
        panic!("{error}");
    }
}

/// Logs the failure reason and exits the process with `code`
#[derive(Debug, Clone, Copy)]
pub struct ExitSignal {
    pub code: i32,
}

impl Default for ExitSignal {
    fn default() -> Self {
        ExitSignal { code: 1 }
    }
}

impl ErrorSignal for ExitSignal {
    fn raise(&self, error: SealError) -> ! {
        error.log_if_security_critical();
        eprintln!("Error: {error}");
        std::process::exit(self.code);
    }
}
