//! Leveled, non-blocking logger handed to every request context.
//!
//! Each call goes to the [`log`] facade. A logger built with [`Logger::channel`]
//! or [`Logger::with_writer`] additionally fans the [`Event`] out over an
//! unbounded channel, so logging from a handler never waits on I/O.


use std::backtrace::Backtrace;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

const TARGET: &str = "microroute";

/// Severity of a log event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
    Debug,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Debug => "DEBUG",
        }
    }
}

impl From<Level> for log::Level {
    fn from(level: Level) -> Self {
        match level {
            Level::Info => log::Level::Info,
            Level::Warning => log::Level::Warn,
            Level::Error => log::Level::Error,
            Level::Debug => log::Level::Debug,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single log record.
#[derive(Debug, Clone)]
pub struct Event {
    pub timestamp: SystemTime,
    pub level: Level,
    pub message: String,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let since_epoch = self.timestamp.duration_since(UNIX_EPOCH).unwrap_or_default();
        write!(
            f,
            "[{}.{:03}] {} {}",
            since_epoch.as_secs(),
            since_epoch.subsec_millis(),
            self.level,
            self.message
        )
    }
}

/// Cheap-to-clone logging handle.
#[derive(Debug, Clone, Default)]
pub struct Logger {
    sink: Option<mpsc::UnboundedSender<Event>>,
}

impl Logger {
    /// A logger that only forwards to the `log` facade.
    pub fn new() -> Self {
        Self::default()
    }

    /// A logger that also delivers every event to the returned receiver.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { sink: Some(tx) }, rx)
    }

    /// A logger whose events are written, one line each, to `writer` by a
    /// background task.
    ///
    /// The task ends once every clone of the logger has been dropped.
    ///
    /// # Panics
    ///
    /// Panics when called outside of a Tokio runtime.
    pub fn with_writer<W>(mut writer: W) -> (Self, JoinHandle<()>)
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (logger, mut rx) = Self::channel();
        let task = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                let line = format!("{event}\n");
                if let Err(e) = writer.write_all(line.as_bytes()).await {
                    log::error!(target: TARGET, "log writer failed: {e}");
                    break;
                }
            }
            let _ = writer.flush().await;
        });
        (logger, task)
    }

    /// Record `message` at `level`.
    pub fn log(&self, level: Level, message: impl Into<String>) {
        let message = message.into();
        log::log!(target: TARGET, log::Level::from(level), "{message}");

        if let Some(sink) = &self.sink {
            // A closed receiver just means nobody is listening anymore.
            let _ = sink.send(Event {
                timestamp: SystemTime::now(),
                level,
                message,
            });
        }
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(Level::Info, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.log(Level::Warning, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(Level::Error, message);
    }

    /// Record `message` together with the current backtrace.
    pub fn debug(&self, message: impl Into<String>) {
        let message = message.into();
        let backtrace = Backtrace::force_capture();
        self.log(Level::Debug, format!("{message}\n{backtrace}"));
    }
}
