//! Service container for dependency injection
//!
//! Wires settings and I/O boundaries into interpreter instances.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::application::services::Interpreter;
use crate::config::Settings;
use crate::infrastructure::traits::{Clock, RealScriptSource, ScriptSource, SystemClock};
use crate::infrastructure::{InfraError, InfraResult};

/// Container holding settings and boundary implementations.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Timestamp source for history
    pub clock: Arc<dyn Clock>,

    /// Script input
    pub scripts: Arc<dyn ScriptSource>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(SystemClock), Arc::new(RealScriptSource))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        clock: Arc<dyn Clock>,
        scripts: Arc<dyn ScriptSource>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            clock,
            scripts,
        }
    }

    /// A fresh interpreter with an empty workspace and history.
    pub fn interpreter(&self) -> Interpreter {
        Interpreter::new(
            Arc::clone(&self.clock),
            self.settings.on_error,
            self.settings.record_failures,
        )
    }

    /// Read a script from `path`, or from stdin when `path` is `-`.
    pub fn read_script(&self, path: &Path) -> InfraResult<String> {
        if path == Path::new("-") {
            debug!("reading script from stdin");
            return self
                .scripts
                .read_stdin()
                .map_err(|e| InfraError::io("reading script from stdin", e));
        }
        if !self.scripts.exists(path) {
            return Err(InfraError::io(
                format!("script {}", path.display()),
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            ));
        }
        debug!(path = %path.display(), "reading script");
        self.scripts
            .read_file(path)
            .map_err(|e| InfraError::io(format!("reading script {}", path.display()), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::FailurePolicy;
    use crate::util::testing::ManualClock;
    use tempfile::TempDir;

    #[test]
    fn given_settings_when_building_interpreter_then_policy_applied() {
        let settings = Settings {
            on_error: FailurePolicy::Continue,
            ..Settings::default()
        };
        let container = ServiceContainer::with_deps(
            settings,
            Arc::new(ManualClock::new()),
            Arc::new(RealScriptSource),
        );
        assert_eq!(container.interpreter().policy(), FailurePolicy::Continue);
    }

    #[test]
    fn given_missing_script_when_reading_then_io_error() {
        let dir = TempDir::new().unwrap();
        let container = ServiceContainer::new(Settings::default());

        let err = container
            .read_script(&dir.path().join("none.ds"))
            .unwrap_err();
        assert!(matches!(err, InfraError::Io { .. }));
    }
}
