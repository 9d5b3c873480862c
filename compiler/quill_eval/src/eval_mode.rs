//! Evaluation modes for a program.
//!
//! An [`EvalMode`] selects where `DebugPrint` output goes by default and how
//! deep interpreted calls may nest. Policies are exposed as methods so call
//! sites never match on the mode directly.

use crate::print_handler::{buffer_handler, silent_handler, stdout_handler, SharedPrintHandler};

/// Evaluation mode.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum EvalMode {
    /// Standard execution: output to stdout, call depth bounded only by memory.
    #[default]
    Interpret,
    /// Output captured in a buffer, generous but bounded call depth.
    Capture,
    /// Output discarded, tight call depth.
    Silent,
}

impl EvalMode {
    /// Maximum nesting of interpreted calls, or `None` for unlimited
    /// (native `stacker` growth).
    ///
    /// - `Interpret`: `None` on native, 200 on WASM
    /// - `Capture`: 500
    /// - `Silent`: 64
    #[inline]
    pub fn max_call_depth(&self) -> Option<usize> {
        match self {
            Self::Interpret => {
                #[cfg(target_arch = "wasm32")]
                {
                    Some(200)
                }
                #[cfg(not(target_arch = "wasm32"))]
                {
                    None
                }
            }
            Self::Capture => Some(500),
            Self::Silent => Some(64),
        }
    }

    /// Print handler used when the builder is not given one.
    pub fn default_print_handler(&self) -> SharedPrintHandler {
        match self {
            Self::Interpret => stdout_handler(),
            Self::Capture => buffer_handler(),
            Self::Silent => silent_handler(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_mode_buffers_output() {
        let handler = EvalMode::Capture.default_print_handler();
        handler.println("captured");
        assert_eq!(handler.get_output(), "captured\n");
    }

    #[test]
    fn bounded_modes_have_limits() {
        assert_eq!(EvalMode::Capture.max_call_depth(), Some(500));
        assert_eq!(EvalMode::Silent.max_call_depth(), Some(64));
    }
}
