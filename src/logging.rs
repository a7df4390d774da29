//! Logging setup
//!
//! The log level can come from the settings file, so settings are loaded
//! under a bootstrap subscriber built from the command-line flags alone.
//! The global subscriber is installed once settings are known.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::instrument::WithSubscriber;
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use droidconf_core::Settings;

/// Level from the command-line flags, if they pick one
pub fn flag_level(verbose: bool, quiet: bool) -> Option<&'static str> {
    if verbose {
        Some("debug")
    } else if quiet {
        Some("error")
    } else {
        None
    }
}

/// `RUST_LOG` when set, otherwise the given level
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Formatting subscriber writing to `writer`
pub fn subscriber<W>(filter: EnvFilter, writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(writer)
        .finish()
}

/// Load settings from `path`, or the default location, with their own
/// log events routed to `bootstrap`
pub async fn load_settings<S>(path: Option<&Path>, bootstrap: S) -> Result<Settings>
where
    S: Subscriber + Send + Sync + 'static,
{
    let load = async {
        match path {
            Some(path) => Settings::load_from(path)
                .await
                .with_context(|| format!("Failed to load settings from {}", path.display())),
            None => Settings::load().await.context("Failed to load settings"),
        }
    };
    load.with_subscriber(bootstrap).await
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins, then the command-line flags, then the settings file.
pub fn init(verbose: bool, quiet: bool, settings: &Settings) -> Result<()> {
    let level = flag_level(verbose, quiet)
        .or(settings.log_level.as_deref())
        .unwrap_or("info");

    tracing::subscriber::set_global_default(subscriber(env_filter(level), std::io::stderr))
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_flag_level() {
        assert_eq!(flag_level(true, false), Some("debug"));
        assert_eq!(flag_level(false, true), Some("error"));
        assert_eq!(flag_level(false, false), None);
    }

    #[tokio::test]
    async fn test_settings_load_is_logged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        tokio::fs::write(&path, "log_level = \"warn\"\n").await.unwrap();

        let captured = Captured::default();
        let bootstrap = subscriber(EnvFilter::new("debug"), captured.clone());
        let settings = load_settings(Some(&path), bootstrap).await.unwrap();

        assert_eq!(settings.log_level.as_deref(), Some("warn"));
        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Loading settings from"), "{output}");
    }
}
