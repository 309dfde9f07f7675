use super::pagination::PaginationSignal;
use super::shuffle::shuffle;
use crate::feed::filter::{FilterConfig, FilterSettings};
use crate::feed::types::ArtworkRecord;
use crate::feed::ArtworkSource;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Whatever displays the feed: the TUI, stdout in headless mode, or a
/// recorder in tests.
pub trait FeedSink: Send {
    fn show_loading(&mut self);
    fn hide_loading(&mut self);
    /// Append records below what is already displayed, in the given order.
    fn append(&mut self, records: Vec<ArtworkRecord>);
    /// Drop everything displayed.
    fn clear(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedPhase {
    Idle,
    Loading,
}

/// How a load cycle ended. `Empty` and `Failed` display the same (nothing
/// appended) but are kept apart so callers can report failures.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    Rendered(usize),
    Empty,
    Failed(String),
}

/// Drives repeated fetches: owns the session, shuffles each batch into
/// display order, and re-arms pagination after every cycle.
pub struct FeedController<K: FeedSink> {
    source: Box<dyn ArtworkSource>,
    sink: K,
    session: FilterConfig,
    signal: PaginationSignal,
    rng: StdRng,
    phase: FeedPhase,
    fresh_session: bool,
}

impl<K: FeedSink> FeedController<K> {
    pub fn new(
        source: Box<dyn ArtworkSource>,
        sink: K,
        settings: FilterSettings,
        signal: PaginationSignal,
    ) -> Self {
        Self {
            source,
            sink,
            session: FilterConfig::new(settings),
            signal,
            rng: StdRng::from_entropy(),
            phase: FeedPhase::Idle,
            fresh_session: true,
        }
    }

    /// Replace the shuffle RNG (seeded runs in tests).
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn session(&self) -> &FilterConfig {
        &self.session
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn phase(&self) -> FeedPhase {
        self.phase
    }

    pub fn signal(&self) -> &PaginationSignal {
        &self.signal
    }

    /// Run one fetch-then-render cycle.
    ///
    /// The loading indicator is shown only for the first cycle of a session.
    /// Pagination stays disarmed while the fetch is in flight and is re-armed
    /// once it resolves, whatever the outcome.
    pub async fn load_next(&mut self) -> BatchOutcome {
        self.signal.disarm();
        self.phase = FeedPhase::Loading;

        let show_indicator = self.fresh_session;
        if show_indicator {
            self.sink.show_loading();
        }

        let outcome = match self.source.fetch_batch(&mut self.session).await {
            Ok(mut records) if !records.is_empty() => {
                shuffle(&mut records, &mut self.rng);
                let count = records.len();
                self.sink.append(records);
                BatchOutcome::Rendered(count)
            }
            Ok(_) => {
                tracing::info!(seen = self.session.seen_ids().len(), "no artworks left for current filters");
                BatchOutcome::Empty
            }
            Err(e) => {
                let reason = format!("{:#}", e);
                tracing::warn!(error = %reason, "artwork fetch failed");
                BatchOutcome::Failed(reason)
            }
        };

        if show_indicator {
            self.sink.hide_loading();
        }
        self.fresh_session = false;
        self.phase = FeedPhase::Idle;
        self.signal.arm();

        outcome
    }

    /// Load the next page if the pagination signal is armed. Returns `None`
    /// when the trigger was already consumed.
    pub async fn on_trigger(&mut self) -> Option<BatchOutcome> {
        if !self.signal.try_fire() {
            return None;
        }
        Some(self.load_next().await)
    }

    /// Apply edited filters. Unchanged settings are a no-op; otherwise the
    /// seen list and the display are cleared and a fresh session starts with
    /// the loading indicator.
    pub async fn apply_filters(&mut self, settings: FilterSettings) -> Option<BatchOutcome> {
        if !self.session.replace_settings(settings) {
            return None;
        }
        tracing::info!(settings = ?self.session.settings, "filters changed, restarting feed");

        self.signal.disarm();
        self.sink.clear();
        self.fresh_session = true;
        Some(self.load_next().await)
    }
}
