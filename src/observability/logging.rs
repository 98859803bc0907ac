//! Structured logging.
//!
//! The subscriber is installed once, by the binary. Library code only emits
//! `tracing` events; account context travels in spans.
//!
//! Two sinks receive identical events: a colored console layer and a
//! plain-text file layer (appended, created on demand).

use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;
use thiserror::Error;
use tracing_subscriber::filter::{EnvFilter, ParseError};
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ObservabilityConfig;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),

    #[error("cannot open log file {path}: {source}")]
    File {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("logging already initialized: {0}")]
    Init(#[from] TryInitError),
}

/// Build the filter: `RUST_LOG` wins, otherwise the configured level.
pub fn build_filter(config: &ObservabilityConfig) -> Result<EnvFilter, ParseError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.log_level),
    }
}

/// Install the global subscriber with console and file sinks.
pub fn init_logging(config: &ObservabilityConfig) -> Result<(), LoggingError> {
    let filter = build_filter(config)?;

    let file_layer = if config.log_file.is_empty() {
        None
    } else {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_file)
            .map_err(|source| LoggingError::File {
                path: config.log_file.clone(),
                source,
            })?;
        Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .try_init()?;

    Ok(())
}

pub mod capture {
    //! In-memory sink for asserting on log output, shared by unit and
    //! integration tests.

    use std::io;
    use std::sync::{Arc, Mutex, PoisonError};
    use tracing::subscriber::DefaultGuard;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl LogBuffer {
        pub fn contents(&self) -> String {
            let bytes = self.0.lock().unwrap_or_else(PoisonError::into_inner);
            String::from_utf8_lossy(&bytes).into_owned()
        }
    }

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogBuffer {
        type Writer = LogBuffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    /// Capture events on the current thread until the guard drops.
    pub fn capture_logs() -> (DefaultGuard, LogBuffer) {
        let buffer = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(buffer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        (tracing::subscriber::set_default(subscriber), buffer)
    }
}
