use std::ffi::OsString;
use std::process::Command;

use crate::config::CiConfig;

/// Best-effort build-title update for AppVeyor-style CI tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CiNotifier {
    program: String,
}

impl CiNotifier {
    /// A notifier when `cfg.env_var` is set to anything, `None` otherwise.
    pub fn detect(cfg: &CiConfig, lookup: impl Fn(&str) -> Option<OsString>) -> Option<Self> {
        lookup(cfg.env_var.as_str()).map(|_| {
            tracing::debug!(env_var = %cfg.env_var, "CI environment detected");
            Self {
                program: cfg.program.clone(),
            }
        })
    }

    pub fn from_env(cfg: &CiConfig) -> Option<Self> {
        Self::detect(cfg, |name| std::env::var_os(name))
    }

    pub fn args(title: &str) -> [&str; 3] {
        ["UpdateBuild", "-Message", title]
    }

    /// Run the update command. Failures are logged and swallowed.
    pub fn notify(&self, title: &str) {
        match Command::new(&self.program).args(Self::args(title)).output() {
            Ok(out) if out.status.success() => {
                tracing::info!(program = %self.program, "build title sent to CI");
            }
            Ok(out) => {
                tracing::warn!(
                    program = %self.program,
                    status = %out.status,
                    stderr = %String::from_utf8_lossy(&out.stderr).trim(),
                    "CI build update failed"
                );
            }
            Err(e) => {
                tracing::warn!(program = %self.program, error = %e, "could not run CI tool");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_when_set() {
        let cfg = CiConfig::default();
        let notifier = CiNotifier::detect(&cfg, |name| {
            (name == "APPVEYOR").then(|| OsString::from("True"))
        });
        assert_eq!(
            notifier,
            Some(CiNotifier {
                program: "appveyor".into()
            })
        );
    }

    #[test]
    fn test_detect_empty_value_still_counts() {
        let cfg = CiConfig::default();
        assert!(CiNotifier::detect(&cfg, |_| Some(OsString::new())).is_some());
    }

    #[test]
    fn test_detect_unset() {
        let cfg = CiConfig::default();
        assert_eq!(CiNotifier::detect(&cfg, |_| None), None);
    }

    #[test]
    fn test_args_carry_title() {
        let title = "ruby 2.7.1dev (2020-03-05 trunk) [x64-mingw32]";
        assert_eq!(CiNotifier::args(title), ["UpdateBuild", "-Message", title]);
    }

    #[test]
    fn test_notify_missing_program_does_not_panic() {
        let notifier = CiNotifier {
            program: "definitely-not-a-ci-tool-4f1c".into(),
        };
        notifier.notify("ruby 2.7.1dev (2020-03-05 trunk) [x64-mingw32]");
    }
}
