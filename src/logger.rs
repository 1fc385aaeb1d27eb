/// Sink for the album client's diagnostics.
pub trait ClientLogger: Send + Sync {
    fn error(&self, message: &str);
}

/// Forwards diagnostics to `tracing` at error level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl ClientLogger for TracingLogger {
    fn error(&self, message: &str) {
        tracing::error!(target: "flickr_connect::client", "{message}");
    }
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;

    #[test]
    #[traced_test]
    fn tracing_logger_emits_error_events() {
        TracingLogger.error("Bad response from Flickr:\nStatus: 404, Content: \"not found\"");
        assert!(logs_contain("ERROR"));
        assert!(logs_contain("Bad response from Flickr"));
    }
}
