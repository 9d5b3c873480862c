//! Destinations for `DebugPrint` output.
//!
//! A program holds one shared handler. Interpret mode writes each line to
//! stdout, Capture mode keeps lines for later inspection, and Silent mode
//! drops them. The destinations are a closed set, so dispatch is a `match`
//! rather than a trait object.

use std::sync::Arc;

use parking_lot::Mutex;

/// Where printed lines go.
pub enum PrintHandler {
    Stdout,
    /// Lines kept in print order, without trailing newlines.
    Buffer(Mutex<Vec<String>>),
    Silent,
}

impl PrintHandler {
    /// Emit one line.
    pub fn println(&self, line: &str) {
        match self {
            Self::Stdout => println!("{line}"),
            Self::Buffer(lines) => lines.lock().push(line.to_owned()),
            Self::Silent => {}
        }
    }

    /// Captured lines, each terminated by `\n`. Empty for handlers that do
    /// not capture.
    pub fn get_output(&self) -> String {
        match self {
            Self::Buffer(lines) => lines.lock().iter().fold(String::new(), |mut out, line| {
                out.push_str(line);
                out.push('\n');
                out
            }),
            Self::Stdout | Self::Silent => String::new(),
        }
    }
}

/// Handler shared between a program and whoever reads its output.
pub type SharedPrintHandler = Arc<PrintHandler>;

pub fn stdout_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Stdout)
}

pub fn buffer_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Buffer(Mutex::new(Vec::new())))
}

pub fn silent_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Silent)
}
