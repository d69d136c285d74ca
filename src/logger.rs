use tracing::info;

/*------------------------------------------------------------------------------
Progress reporting
------------------------------------------------------------------------------*/

/// Sink for the linker's status and progress side channel. Reporting is
/// observable but carries no correctness weight; implementations should be
/// cheap and must tolerate being called from multiple linkers at once.
pub trait ProgressLogger: Send + Sync {
    fn status(&self, message: &str);
    fn progress(&self, fraction: f64);
}

/// Discards everything; the default sink when the caller supplies none.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogger;

impl ProgressLogger for NullLogger {
    fn status(&self, _message: &str) {}
    fn progress(&self, _fraction: f64) {}
}

/// Forwards status and progress to `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl ProgressLogger for TracingLogger {
    fn status(&self, message: &str) {
        info!(status = message, "linker status");
    }

    fn progress(&self, fraction: f64) {
        info!(progress = fraction, "linker progress");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drive(logger: &dyn ProgressLogger) {
        logger.status("Solving the cost matrix...");
        logger.progress(0.5);
        logger.status("");
        logger.progress(1.0);
    }

    #[test]
    fn test_sinks_accept_status_and_progress() {
        drive(&NullLogger);
        drive(&TracingLogger);
    }
}
