//! Remote log batcher
//!
//! Collects diagnostic lines in memory and ships them to a collector as a
//! single envelope per flush. Delivery is best effort: the batch is cleared
//! before the network attempt, nothing is retried, and no failure reaches the
//! caller. Failures are still reported through `tracing`.

use relaylog_client::{LogTransport, TransportError, WebSocketTransport};
use relaylog_core::domain::batch::LogBatch;
use relaylog_core::domain::envelope::{LogEnvelope, LogMode};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::{ConfigError, DEFAULT_SEND_TIMEOUT, SinkConfig};
use crate::encoder::{EnvelopeEncoder, JsonEncoder};
use crate::wait::{WaitOutcome, completion};

/// Buffers log lines and flushes them to a remote collector
///
/// Record operations take `&mut self`; share a batcher between threads by
/// wrapping it in `Arc<Mutex<_>>`.
pub struct RemoteLogBatcher {
    endpoint: String,
    mode: LogMode,
    send_timeout: Duration,
    batch: LogBatch,
    transport: Arc<dyn LogTransport>,
    encoder: Box<dyn EnvelopeEncoder>,
}

impl RemoteLogBatcher {
    /// Creates a batcher for `endpoint` using the WebSocket transport and
    /// default settings
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::builder(endpoint).build()
    }

    /// Creates a batcher from a validated configuration
    pub fn from_config(config: SinkConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::builder(config.endpoint)
            .mode(config.mode)
            .send_timeout(config.send_timeout)
            .build())
    }

    pub fn builder(endpoint: impl Into<String>) -> RemoteLogBatcherBuilder {
        RemoteLogBatcherBuilder::new(endpoint)
    }

    /// Records an error as a description line followed by its indented
    /// stack trace
    pub fn record_error<S: AsRef<str>>(&mut self, description: impl Into<String>, frames: &[S]) {
        self.batch.push_error(description, frames);
    }

    /// Records a single free-text line
    pub fn record_message(&mut self, text: impl Into<String>) {
        self.batch.push_message(text);
    }

    /// Sends every pending entry as one envelope and blocks until the send
    /// completes or the send timeout elapses
    ///
    /// The batch is always empty when this returns. The send runs on its own
    /// thread; if it outlives the timeout it keeps running detached and its
    /// result is discarded.
    pub fn flush(&mut self) {
        let Some(payload) = self.take_payload() else {
            return;
        };

        let transport = Arc::clone(&self.transport);
        let endpoint = self.endpoint.clone();
        let (done, waiter) = completion();

        let spawned = thread::Builder::new()
            .name("relaylog-flush".to_string())
            .spawn(move || {
                let result = match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(rt) => rt.block_on(transport.send_text(&endpoint, payload)),
                    Err(e) => Err(TransportError::Runtime(e)),
                };
                done.complete(result);
            });

        if let Err(e) = spawned {
            debug!("Failed to spawn flush thread: {}", e);
            return;
        }

        match waiter.wait(self.send_timeout) {
            WaitOutcome::Completed(result) => self.report(result),
            WaitOutcome::Abandoned => debug!("Log send to {} aborted", self.endpoint),
            WaitOutcome::TimedOut => self.report_timeout(),
        }
    }

    /// Async counterpart of [`flush`](Self::flush) for callers already inside
    /// a tokio runtime
    ///
    /// The send is spawned as a task and is not aborted on timeout.
    pub async fn flush_async(&mut self) {
        let Some(payload) = self.take_payload() else {
            return;
        };

        let transport = Arc::clone(&self.transport);
        let endpoint = self.endpoint.clone();
        let task = tokio::spawn(async move { transport.send_text(&endpoint, payload).await });

        match tokio::time::timeout(self.send_timeout, task).await {
            Ok(Ok(result)) => self.report(result),
            Ok(Err(e)) => debug!("Log send to {} aborted: {}", self.endpoint, e),
            Err(_) => self.report_timeout(),
        }
    }

    /// Number of entries waiting for the next flush
    pub fn pending(&self) -> usize {
        self.batch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batch.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        self.batch.entries()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn send_timeout(&self) -> Duration {
        self.send_timeout
    }

    /// Builds and encodes the envelope, then clears the batch
    ///
    /// Returns `None` when encoding failed; the batch is cleared either way.
    fn take_payload(&mut self) -> Option<String> {
        let envelope = LogEnvelope::error(self.mode, self.batch.joined());
        let encoded = self.encoder.encode(&envelope);
        let dropped = self.batch.len();
        self.batch.clear();

        match encoded {
            Ok(payload) => Some(payload),
            Err(e) => {
                warn!("Dropping {} log entries: {}", dropped, e);
                None
            }
        }
    }

    fn report(&self, result: Result<(), TransportError>) {
        match result {
            Ok(()) => debug!("Delivered log batch to {}", self.endpoint),
            Err(e) => debug!("Log send to {} failed: {}", self.endpoint, e),
        }
    }

    fn report_timeout(&self) {
        debug!(
            "Log send to {} did not complete within {:?}",
            self.endpoint, self.send_timeout
        );
    }
}

/// Builder for [`RemoteLogBatcher`]
pub struct RemoteLogBatcherBuilder {
    endpoint: String,
    mode: LogMode,
    send_timeout: Duration,
    transport: Option<Arc<dyn LogTransport>>,
    encoder: Option<Box<dyn EnvelopeEncoder>>,
}

impl RemoteLogBatcherBuilder {
    fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            mode: LogMode::default(),
            send_timeout: DEFAULT_SEND_TIMEOUT,
            transport: None,
            encoder: None,
        }
    }

    pub fn mode(mut self, mode: LogMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout = timeout;
        self
    }

    pub fn transport(mut self, transport: Arc<dyn LogTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn encoder(mut self, encoder: impl EnvelopeEncoder + 'static) -> Self {
        self.encoder = Some(Box::new(encoder));
        self
    }

    pub fn build(self) -> RemoteLogBatcher {
        RemoteLogBatcher {
            endpoint: self.endpoint,
            mode: self.mode,
            send_timeout: self.send_timeout,
            batch: LogBatch::new(),
            transport: self
                .transport
                .unwrap_or_else(|| Arc::new(WebSocketTransport::new())),
            encoder: self.encoder.unwrap_or_else(|| Box::new(JsonEncoder)),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use relaylog_client::Collector;
    use std::time::Instant;

    fn batcher_with(transport: Arc<dyn LogTransport>) -> RemoteLogBatcher {
        RemoteLogBatcher::builder("ws://collector.test")
            .transport(transport)
            .send_timeout(Duration::from_millis(300))
            .build()
    }

    fn decode(payload: &str) -> serde_json::Value {
        serde_json::from_str(payload).unwrap()
    }

    #[test]
    fn test_record_error_entries() {
        let mut batcher = RemoteLogBatcher::new("ws://collector.test");
        batcher.record_error("Boom", &["frame1", "frame2"]);

        assert_eq!(batcher.entries(), &["Boom", "  frame1\n  frame2"]);
        assert_eq!(batcher.pending(), 2);
    }

    #[test]
    fn test_flush_sends_entries_in_order() {
        let transport = Arc::new(RecordingTransport::default());
        let mut batcher = batcher_with(transport.clone());

        batcher.record_message("starting");
        batcher.record_error("Boom", &["frame1", "frame2"]);
        batcher.record_message("after");
        batcher.flush();

        assert!(batcher.is_empty());

        let sent = transport.sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "ws://collector.test");

        let value = decode(&sent[0].1);
        assert_eq!(value["type"], "log");
        assert_eq!(value["level"], "error");
        assert_eq!(value["mode"], "BRIDGE");
        assert_eq!(
            value["data"],
            serde_json::json!(["starting\nBoom\n  frame1\n  frame2\nafter"])
        );
    }

    #[test]
    fn test_flush_empty_batch_sends_empty_payload() {
        let transport = Arc::new(RecordingTransport::default());
        let mut batcher = batcher_with(transport.clone());

        batcher.flush();

        let payloads = transport.payloads();
        assert_eq!(payloads.len(), 1);
        assert_eq!(decode(&payloads[0])["data"], serde_json::json!([""]));
    }

    #[test]
    fn test_flush_does_not_resend_previous_batch() {
        let transport = Arc::new(RecordingTransport::default());
        let mut batcher = batcher_with(transport.clone());

        batcher.record_message("first");
        batcher.flush();
        batcher.record_message("second");
        batcher.flush();

        let payloads = transport.payloads();
        assert_eq!(decode(&payloads[0])["data"], serde_json::json!(["first"]));
        assert_eq!(decode(&payloads[1])["data"], serde_json::json!(["second"]));
    }

    #[test]
    fn test_flush_clears_batch_on_transport_failure() {
        let transport = Arc::new(FailingTransport::default());
        let mut batcher = batcher_with(transport.clone());

        batcher.record_message("lost");
        batcher.flush();

        assert!(batcher.is_empty());
        assert_eq!(*transport.attempts.lock().unwrap(), 1);
    }

    #[test]
    fn test_encode_failure_skips_delivery_and_clears_batch() {
        let transport = Arc::new(RecordingTransport::default());
        let mut batcher = RemoteLogBatcher::builder("ws://collector.test")
            .transport(transport.clone())
            .encoder(FailingEncoder)
            .build();

        batcher.record_error("Boom", &["frame1"]);
        batcher.flush();

        assert!(batcher.is_empty());
        assert!(transport.payloads().is_empty());
    }

    #[test]
    fn test_flush_returns_when_send_never_completes() {
        let transport = Arc::new(StalledTransport::default());
        let mut batcher = batcher_with(transport.clone());

        batcher.record_message("stuck");

        let start = Instant::now();
        batcher.flush();
        let elapsed = start.elapsed();

        assert!(batcher.is_empty());
        assert!(elapsed >= Duration::from_millis(300));
        assert!(elapsed < Duration::from_secs(2));
        assert_eq!(*transport.attempts.lock().unwrap(), 1);
    }

    #[test]
    fn test_flush_after_timeout_excludes_earlier_entries() {
        let transport = Arc::new(StallOnceTransport::default());
        let mut batcher = batcher_with(transport.clone());

        batcher.record_message("stuck one");
        batcher.record_error("stuck error", &["frame"]);
        batcher.flush();
        assert!(batcher.is_empty());

        batcher.record_message("next");
        batcher.flush();

        let payloads = transport.recorded.payloads();
        assert_eq!(payloads.len(), 1);
        assert_eq!(decode(&payloads[0])["data"], serde_json::json!(["next"]));
        assert!(!payloads[0].contains("stuck"));
    }

    #[test]
    fn test_default_timeout_bounds_flush() {
        let mut batcher = RemoteLogBatcher::builder("ws://collector.test")
            .transport(Arc::new(StalledTransport::default()))
            .build();
        assert_eq!(batcher.send_timeout(), Duration::from_secs(2));

        let start = Instant::now();
        batcher.flush();

        assert!(start.elapsed() < Duration::from_secs(3));
    }

    #[test]
    fn test_flush_unreachable_endpoint_is_silent() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut batcher = RemoteLogBatcher::new(format!("ws://{}", addr));
        batcher.record_message("nobody listening");
        batcher.flush();

        assert!(batcher.is_empty());
    }

    #[test]
    fn test_from_config() {
        let config = SinkConfig {
            endpoint: "ws://localhost:8081".to_string(),
            send_timeout: Duration::from_millis(750),
            mode: LogMode::NoBridge,
        };
        let batcher = RemoteLogBatcher::from_config(config).unwrap();

        assert_eq!(batcher.endpoint(), "ws://localhost:8081");
        assert_eq!(batcher.send_timeout(), Duration::from_millis(750));

        assert!(RemoteLogBatcher::from_config(SinkConfig::new("http://localhost")).is_err());
    }

    #[test]
    fn test_mode_is_written_into_envelope() {
        let transport = Arc::new(RecordingTransport::default());
        let mut batcher = RemoteLogBatcher::builder("ws://collector.test")
            .transport(transport.clone())
            .mode(LogMode::NoBridge)
            .build();

        batcher.record_message("native side");
        batcher.flush();

        assert_eq!(decode(&transport.payloads()[0])["mode"], "NOBRIDGE");
    }

    #[tokio::test]
    async fn test_flush_async_clears_batch_on_timeout() {
        let transport = Arc::new(StalledTransport::default());
        let mut batcher = batcher_with(transport.clone());

        batcher.record_message("stuck");

        let start = Instant::now();
        batcher.flush_async().await;

        assert!(batcher.is_empty());
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_flush_async_delivers_to_collector() {
        let (collector, mut rx) = Collector::bind("127.0.0.1:0").await.unwrap();
        let mut batcher = RemoteLogBatcher::new(collector.url());

        batcher.record_message("over the wire");
        batcher.record_error("Boom", &["frame1"]);
        batcher.flush_async().await;

        let collected = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(
            collected.envelope,
            LogEnvelope::error(LogMode::Bridge, "over the wire\nBoom\n  frame1")
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_blocking_flush_delivers_to_collector() {
        let (collector, mut rx) = Collector::bind("127.0.0.1:0").await.unwrap();
        let mut batcher = RemoteLogBatcher::new(collector.url());
        batcher.record_message("from a blocking caller");

        let batcher = tokio::task::spawn_blocking(move || {
            batcher.flush();
            batcher
        })
        .await
        .unwrap();
        assert!(batcher.is_empty());

        let collected = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(
            collected.envelope.data,
            vec!["from a blocking caller".to_string()]
        );
    }
}
