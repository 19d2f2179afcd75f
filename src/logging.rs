//! Environment-gated debug logging.
//!
//! Components log through the `log` facade. Verbose payload dumps go through a
//! [`DebugLog`], which is handed the deployment flags from
//! [`SyncConfig`](crate::config::SyncConfig) instead of reading global state:
//!
//! * in the live environment nothing is emitted;
//! * elsewhere a `debug!` line `<component>=><method> : <payload>` is written;
//! * with extra debugging on, the payload is also passed to a [`DebugSink`].

use crate::config::SyncConfig;
use log::{debug, trace};
use std::fmt;
use std::sync::Arc;

/// Secondary destination for debug payloads.
pub trait DebugSink: Send + Sync {
    /// Receive a payload dumped by `method`.
    fn dump(&self, method: &str, payload: &str);
}

/// Default sink: pretty-printed payload at trace level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceSink;

impl DebugSink for TraceSink {
    fn dump(&self, method: &str, payload: &str) {
        trace!(target: "crm_contact_sync::dump", "{}: {}", method, payload);
    }
}

/// Debug logger bound to a component name and deployment flags.
#[derive(Clone)]
pub struct DebugLog {
    component: &'static str,
    live: bool,
    extra_debugging: bool,
    sink: Arc<dyn DebugSink>,
}

impl DebugLog {
    /// Create a logger for `component` using the default [`TraceSink`].
    pub fn new(component: &'static str, config: &SyncConfig) -> Self {
        Self::with_sink(component, config, Arc::new(TraceSink))
    }

    /// Create a logger with a custom secondary sink.
    pub fn with_sink(
        component: &'static str,
        config: &SyncConfig,
        sink: Arc<dyn DebugSink>,
    ) -> Self {
        Self {
            component,
            live: config.is_live_environment,
            extra_debugging: config.extra_debugging,
            sink,
        }
    }

    /// Whether payloads are logged at all.
    pub fn enabled(&self) -> bool {
        !self.live
    }

    /// Log `data` on behalf of `method`.
    pub fn record<T: fmt::Debug + ?Sized>(&self, method: &str, data: &T) {
        if self.live {
            return;
        }

        debug!("{}=>{} : {:?}", self.component, method, data);

        if self.extra_debugging {
            self.sink.dump(method, &format!("{:#?}", data));
        }
    }
}

impl fmt::Debug for DebugLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebugLog")
            .field("component", &self.component)
            .field("live", &self.live)
            .field("extra_debugging", &self.extra_debugging)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        dumps: Mutex<Vec<(String, String)>>,
    }

    impl DebugSink for RecordingSink {
        fn dump(&self, method: &str, payload: &str) {
            self.dumps
                .lock()
                .unwrap()
                .push((method.to_string(), payload.to_string()));
        }
    }

    #[test]
    fn test_live_environment_suppresses_everything() {
        let sink = Arc::new(RecordingSink::default());
        let config = SyncConfig::for_environment("live").with_extra_debugging(true);
        let log = DebugLog::with_sink("ContactSync", &config, sink.clone());

        assert!(!log.enabled());
        log.record("get_contact", &"payload");
        assert!(sink.dumps.lock().unwrap().is_empty());
    }

    #[test]
    fn test_extra_debugging_mirrors_payload() {
        let sink = Arc::new(RecordingSink::default());
        let config = SyncConfig::default().with_extra_debugging(true);
        let log = DebugLog::with_sink("ContactSync", &config, sink.clone());

        log.record("get_contact", &vec!["a", "b"]);

        let dumps = sink.dumps.lock().unwrap();
        assert_eq!(dumps.len(), 1);
        assert_eq!(dumps[0].0, "get_contact");
        assert!(dumps[0].1.contains("\"a\""));
    }

    #[test]
    fn test_sink_untouched_without_extra_debugging() {
        let sink = Arc::new(RecordingSink::default());
        let log = DebugLog::with_sink("ContactSync", &SyncConfig::default(), sink.clone());

        assert!(log.enabled());
        log.record("get_account", &42);
        assert!(sink.dumps.lock().unwrap().is_empty());
    }
}
