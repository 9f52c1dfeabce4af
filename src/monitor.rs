//! Receive loop over a program's log feed.
//!
//! Each notification is pre-filtered on its log lines, processed inline and
//! the resulting event handed to a consumer blocked in
//! [`EventReceiver::recv`]. Nothing is buffered: if no consumer takes the
//! event within the publish timeout it is dropped, and the loop never blocks
//! longer than that on delivery.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures::{Stream, StreamExt};
use serde::Serialize;
use solana_client::nonblocking::pubsub_client::PubsubClient;
use solana_client::rpc_config::{RpcTransactionLogsConfig, RpcTransactionLogsFilter};
use tokio::sync::{Mutex, mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::client::LedgerClient;
use crate::config::MonitorConfig;
use crate::error::Error;
use crate::processor::TransactionProcessor;
use crate::types::{InitializeEvent, LogNotification};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display, strum_macros::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum PublishOutcome {
    Delivered,
    DroppedTimeout,
    /// Every receiver was dropped.
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display, strum_macros::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum MonitorExit {
    Cancelled,
    FeedClosed,
}

/// Point-in-time copy of the monitor counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MonitorStats {
    pub received: u64,
    pub skipped_failed: u64,
    pub filtered_out: u64,
    pub processed: u64,
    pub not_applicable: u64,
    pub process_errors: u64,
    pub published: u64,
    pub dropped: u64,
    pub receive_errors: u64,
}

#[derive(Debug, Default)]
struct Counters {
    received: AtomicU64,
    skipped_failed: AtomicU64,
    filtered_out: AtomicU64,
    processed: AtomicU64,
    not_applicable: AtomicU64,
    process_errors: AtomicU64,
    published: AtomicU64,
    dropped: AtomicU64,
    receive_errors: AtomicU64,
}

impl Counters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> MonitorStats {
        let load = |counter: &AtomicU64| counter.load(Ordering::Relaxed);
        MonitorStats {
            received: load(&self.received),
            skipped_failed: load(&self.skipped_failed),
            filtered_out: load(&self.filtered_out),
            processed: load(&self.processed),
            not_applicable: load(&self.not_applicable),
            process_errors: load(&self.process_errors),
            published: load(&self.published),
            dropped: load(&self.dropped),
            receive_errors: load(&self.receive_errors),
        }
    }
}

/// A consumer waiting for exactly one event.
type Handoff = oneshot::Sender<InitializeEvent>;

/// Consuming end of a monitor's output. Clones share the monitor; each
/// event goes to one of them.
#[derive(Debug, Clone)]
pub struct EventReceiver {
    requests: mpsc::Sender<Handoff>,
}

impl EventReceiver {
    /// Wait for the next event. `None` once the monitor is dropped.
    ///
    /// The monitor only hands an event over while a call is pending, so an
    /// event published when no consumer is waiting is never seen here.
    pub async fn recv(&mut self) -> Option<InitializeEvent> {
        let (handoff, event) = oneshot::channel();
        self.requests.send(handoff).await.ok()?;
        event.await.ok()
    }
}

pub struct LogMonitor<C: ?Sized> {
    processor: TransactionProcessor<C>,
    consumers: Mutex<mpsc::Receiver<Handoff>>,
    publish_timeout: Duration,
    prefilter_keywords: Vec<String>,
    skip_failed_transactions: bool,
    counters: Counters,
}

impl<C: LedgerClient + ?Sized> LogMonitor<C> {
    /// Build a monitor and the receiving end of its unbuffered output.
    pub fn new(
        processor: TransactionProcessor<C>,
        config: &MonitorConfig,
    ) -> (Self, EventReceiver) {
        let (requests, consumers) = mpsc::channel(1);
        let monitor = Self {
            processor,
            consumers: Mutex::new(consumers),
            publish_timeout: config.publish_timeout(),
            prefilter_keywords: config.prefilter_keywords.clone(),
            skip_failed_transactions: config.skip_failed_transactions,
            counters: Counters::default(),
        };
        (monitor, EventReceiver { requests })
    }

    pub fn processor(&self) -> &TransactionProcessor<C> {
        &self.processor
    }

    pub fn stats(&self) -> MonitorStats {
        self.counters.snapshot()
    }

    /// Case-sensitive substring match of any keyword against any log line.
    /// An empty keyword list lets everything through.
    pub fn passes_prefilter(&self, logs: &[String]) -> bool {
        self.prefilter_keywords.is_empty()
            || logs.iter().any(|line| {
                self.prefilter_keywords
                    .iter()
                    .any(|keyword| line.contains(keyword.as_str()))
            })
    }

    /// Consume notifications until `cancel` fires or the feed ends.
    ///
    /// Receive errors are counted and logged; the loop keeps reading. The
    /// feed is not re-subscribed when it ends.
    pub async fn run<S>(&self, feed: S, cancel: &CancellationToken) -> MonitorExit
    where
        S: Stream<Item = Result<LogNotification, Error>>,
    {
        let mut feed = std::pin::pin!(feed);
        info!(
            program = %self.processor.matcher().program_id(),
            "log monitor started"
        );
        loop {
            if cancel.is_cancelled() {
                info!("log monitor cancelled");
                return MonitorExit::Cancelled;
            }
            let next = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    info!("log monitor cancelled");
                    return MonitorExit::Cancelled;
                }
                next = feed.next() => next,
            };
            match next {
                Some(Ok(notification)) => {
                    self.handle_notification(notification).await;
                }
                Some(Err(e)) => {
                    Counters::bump(&self.counters.receive_errors);
                    error!(error = %e, "log feed receive failed");
                }
                None => {
                    warn!("log feed closed");
                    return MonitorExit::FeedClosed;
                }
            }
        }
    }

    /// Filter, process and publish one notification. Returns the publish
    /// outcome when an event was produced.
    pub async fn handle_notification(
        &self,
        notification: LogNotification,
    ) -> Option<PublishOutcome> {
        Counters::bump(&self.counters.received);
        let signature = notification.signature;

        if notification.failed && self.skip_failed_transactions {
            Counters::bump(&self.counters.skipped_failed);
            debug!(%signature, "skipping failed transaction");
            return None;
        }
        if !self.passes_prefilter(&notification.logs) {
            Counters::bump(&self.counters.filtered_out);
            return None;
        }

        let event = match self.processor.process(&signature).await {
            Ok(event) => event,
            Err(e) if e.is_not_applicable() => {
                Counters::bump(&self.counters.not_applicable);
                debug!(%signature, "no initialize instruction");
                return None;
            }
            Err(e) => {
                Counters::bump(&self.counters.process_errors);
                error!(%signature, error = %e, "transaction processing failed");
                return None;
            }
        };
        Counters::bump(&self.counters.processed);
        Some(self.publish(event).await)
    }

    /// Hand `event` to a waiting consumer, waiting at most the publish
    /// timeout for one to show up.
    pub async fn publish(&self, event: InitializeEvent) -> PublishOutcome {
        let signature = event.signature.clone();
        let mut consumers = self.consumers.lock().await;
        let handoff = async {
            let mut event = event;
            loop {
                let Some(consumer) = consumers.recv().await else {
                    return PublishOutcome::Closed;
                };
                // A consumer that gave up on its `recv` returns the event.
                match consumer.send(event) {
                    Ok(()) => return PublishOutcome::Delivered,
                    Err(returned) => event = returned,
                }
            }
        };
        let outcome = tokio::time::timeout(self.publish_timeout, handoff)
            .await
            .unwrap_or(PublishOutcome::DroppedTimeout);

        match outcome {
            PublishOutcome::Delivered => Counters::bump(&self.counters.published),
            PublishOutcome::DroppedTimeout => {
                Counters::bump(&self.counters.dropped);
                warn!(
                    %signature,
                    timeout_ms = self.publish_timeout.as_millis() as u64,
                    "no consumer took the event in time, event dropped"
                );
            }
            PublishOutcome::Closed => {
                Counters::bump(&self.counters.dropped);
                warn!(%signature, "every event receiver dropped, event dropped");
            }
        }
        outcome
    }

    /// Subscribe to the program's logs over `ws_url` and run until `cancel`
    /// fires or the subscription ends.
    pub async fn run_subscription(
        &self,
        ws_url: &str,
        cancel: &CancellationToken,
    ) -> Result<MonitorExit, Error> {
        let program = self.processor.matcher().program_id();
        let pubsub = PubsubClient::new(ws_url)
            .await
            .map_err(|e| Error::Subscription {
                reason: format!("connect {ws_url}: {e}"),
            })?;
        let (stream, unsubscribe) = pubsub
            .logs_subscribe(
                RpcTransactionLogsFilter::Mentions(vec![program.to_string()]),
                RpcTransactionLogsConfig {
                    commitment: Some(self.processor.commitment().into()),
                },
            )
            .await
            .map_err(|e| Error::Subscription {
                reason: format!("logs_subscribe {program}: {e}"),
            })?;
        info!(%program, ws_url, "subscribed to program logs");

        let feed = stream.map(|response| Ok::<_, Error>(LogNotification::from(response.value)));
        let exit = self.run(feed, cancel).await;
        unsubscribe().await;
        Ok(exit)
    }
}
