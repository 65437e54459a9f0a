use std::ops::Deref;

use tracing::{debug, error};

use super::{Terminal, TerminalError};

/// A connected terminal, shut down when the guard goes out of scope.
///
/// Shutdown happens on every exit path, including early returns with `?`. A failing
/// shutdown is logged and swallowed so it never replaces the error that is already
/// propagating.
pub struct TerminalSession<'a, T: Terminal + ?Sized> {
    terminal: &'a T,
}

impl<'a, T: Terminal + ?Sized> TerminalSession<'a, T> {
    /// Initializes `terminal`. Nothing needs releasing if this fails.
    pub fn open(terminal: &'a T) -> Result<Self, TerminalError> {
        terminal.initialize()?;
        debug!("terminal session opened");
        Ok(Self { terminal })
    }
}

impl<T: Terminal + ?Sized> Deref for TerminalSession<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.terminal
    }
}

impl<T: Terminal + ?Sized> Drop for TerminalSession<'_, T> {
    fn drop(&mut self) {
        match self.terminal.shutdown() {
            Ok(()) => debug!("terminal session closed"),
            Err(err) => error!(error = %err, "failed to shut down terminal session"),
        }
    }
}
