// One small error type for the whole program.
// Every variant states *where* things went wrong.
use std::fmt::{self, Display};

#[derive(Debug)]
pub enum Error {
    WindowInit(String),   // Creating the window failed
    WindowUpdate(String), // Presenting the screen buffer failed
    TargetAlloc(String),  // Allocating frame target storage failed
    Config(String),       // Reading/parsing the settings file failed
    Snapshot(String),     // Writing a canvas snapshot failed
}

impl Display for Error {
    // This decides how the error is printed to your console.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::WindowInit(s) => write!(f, "Window init error: {s}"),
            Error::WindowUpdate(s) => write!(f, "Window update error: {s}"),
            Error::TargetAlloc(s) => write!(f, "Frame target allocation error: {s}"),
            Error::Config(s) => write!(f, "Config error: {s}"),
            Error::Snapshot(s) => write!(f, "Snapshot error: {s}"),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_failing_stage() {
        let e = Error::TargetAlloc("0x0".into());
        assert_eq!(e.to_string(), "Frame target allocation error: 0x0");
        let e = Error::Config("bad json".into());
        assert!(e.to_string().starts_with("Config error"));
    }
}
