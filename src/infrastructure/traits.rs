//! I/O boundary traits for testability
//!
//! These traits abstract the clock and script input, allowing the
//! interpreter and recorder to be tested with deterministic implementations.

use std::io::{self, Read};
use std::path::Path;

use chrono::{DateTime, Utc};

/// Time source for history timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Where scripts come from.
pub trait ScriptSource: Send + Sync {
    /// Read a script file to string.
    fn read_file(&self, path: &Path) -> io::Result<String>;

    /// Read a script from standard input until EOF.
    fn read_stdin(&self) -> io::Result<String>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Wall clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Scripts from the real filesystem and process stdin.
pub struct RealScriptSource;

impl ScriptSource for RealScriptSource {
    fn read_file(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn read_stdin(&self) -> io::Result<String> {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn given_script_file_when_reading_then_returns_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("demo.ds");
        std::fs::write(&path, "create stack\n").unwrap();

        let source = RealScriptSource;
        assert!(source.exists(&path));
        assert_eq!(source.read_file(&path).unwrap(), "create stack\n");
        assert!(source.read_file(&dir.path().join("missing.ds")).is_err());
    }

    #[test]
    fn given_system_clock_when_sampled_twice_then_monotonic_enough() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
