use crate::models::PricingHistoryEntry;
use crate::repositories::PricingHistoryWriter;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Sending half handed to the pricing service
pub type PricingEventSender = mpsc::Sender<PricingHistoryEntry>;

/// Counters reported when the recorder stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecorderStats {
    pub received: u64,
    pub written: u64,
    pub failed: u64,
}

/// Background task that persists pricing audit events.
///
/// Write failures are logged and dropped; the loop ends once every sender is gone.
/// The queue is bounded, so senders drop records rather than wait while the
/// writers are slow.
pub struct PricingHistoryRecorder {
    receiver: mpsc::Receiver<PricingHistoryEntry>,
    writers: Vec<Arc<dyn PricingHistoryWriter>>,
}

impl PricingHistoryRecorder {
    /// Create a recorder and the sender that feeds it, holding at most
    /// `buffer` pending records (at least one)
    pub fn channel(buffer: usize) -> (Self, PricingEventSender) {
        let (sender, receiver) = mpsc::channel(buffer.max(1));
        let recorder = Self {
            receiver,
            writers: Vec::new(),
        };
        (recorder, sender)
    }

    /// Add a destination for every received event
    pub fn with_writer(mut self, writer: Arc<dyn PricingHistoryWriter>) -> Self {
        self.writers.push(writer);
        self
    }

    /// Drain events until all senders are dropped
    pub async fn start(mut self) -> RecorderStats {
        let tags: Vec<&str> = self.writers.iter().map(|w| w.writer_tag()).collect();
        info!("Pricing history recorder started, writers: {:?}", tags);

        let mut stats = RecorderStats::default();
        while let Some(entry) = self.receiver.recv().await {
            stats.received += 1;
            self.record(&entry, &mut stats).await;
        }

        info!(
            "Pricing history recorder stopped: {} received, {} written, {} failed",
            stats.received, stats.written, stats.failed
        );
        stats
    }

    async fn record(&self, entry: &PricingHistoryEntry, stats: &mut RecorderStats) {
        for writer in &self.writers {
            match writer.append(entry).await {
                Ok(()) => {
                    stats.written += 1;
                    debug!(
                        "Recorded quote {} for model {} via {}",
                        entry.id,
                        entry.model_id,
                        writer.writer_tag()
                    );
                }
                Err(e) => {
                    stats.failed += 1;
                    warn!(
                        "Failed to record quote {} for model {} via {}: {}",
                        entry.id,
                        entry.model_id,
                        writer.writer_tag(),
                        e
                    );
                }
            }
        }
    }
}
