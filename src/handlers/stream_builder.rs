//! Builder for [`FemtoStreamHandler`].
//!
//! Allows configuration of stream based handlers writing to `stdout` or
//! `stderr`. `default` targets `stderr`, the usual home of diagnostics.

use crate::{
    formatter::SharedFormatter,
    level::FemtoLevel,
    stream_handler::FemtoStreamHandler,
};

use super::{HandlerBuildError, HandlerBuilderTrait};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum StreamTarget {
    Stdout,
    #[default]
    Stderr,
}

/// Builder for constructing [`FemtoStreamHandler`] instances.
#[derive(Clone, Debug, Default)]
pub struct StreamHandlerBuilder {
    target: StreamTarget,
    min_level: Option<FemtoLevel>,
    formatter: Option<SharedFormatter>,
}

impl StreamHandlerBuilder {
    /// Create a builder targeting `stdout`.
    pub fn stdout() -> Self {
        Self {
            target: StreamTarget::Stdout,
            ..Self::default()
        }
    }

    /// Create a builder targeting `stderr`.
    pub fn stderr() -> Self {
        Self::default()
    }

    /// Drop records below `level`. Defaults to accepting every level.
    pub fn with_min_level(mut self, level: FemtoLevel) -> Self {
        self.min_level = Some(level);
        self
    }

    /// Replace the default line formatter.
    pub fn with_formatter(mut self, formatter: SharedFormatter) -> Self {
        self.formatter = Some(formatter);
        self
    }
}

impl HandlerBuilderTrait for StreamHandlerBuilder {
    type Handler = FemtoStreamHandler;

    fn build_inner(&self) -> Result<Self::Handler, HandlerBuildError> {
        let formatter = self.formatter.clone().unwrap_or_default();
        let handler = match self.target {
            StreamTarget::Stdout => FemtoStreamHandler::new(std::io::stdout(), formatter),
            StreamTarget::Stderr => FemtoStreamHandler::new(std::io::stderr(), formatter),
        };
        Ok(match self.min_level {
            Some(level) => handler.with_min_level(level),
            None => handler,
        })
    }
}
