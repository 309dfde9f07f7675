use super::config_view::ConfigViewState;
use crate::card::{DetailLinks, PostCard};
use crate::engine::controller::FeedSink;
use crate::feed::filter::FilterSettings;
use crate::feed::types::ArtworkRecord;
use chrono::Datelike;
use std::collections::{HashSet, VecDeque};
use std::time::Instant;
use tokio::sync::watch;

const MAX_LOGS: usize = 200;

/// Engine-owned snapshot published to the TUI over a watch channel.
#[derive(Debug, Clone)]
pub struct AppState {
    pub posts: Vec<PostCard>,
    pub loading: bool,
    pub filters: FilterSettings,
    pub seen_count: usize,
    pub logs: VecDeque<LogEntry>,
    pub start_time: Instant,
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub message: String,
}

impl AppState {
    pub fn new(filters: FilterSettings) -> Self {
        Self {
            posts: Vec::new(),
            loading: false,
            filters,
            seen_count: 0,
            logs: VecDeque::with_capacity(MAX_LOGS),
            start_time: Instant::now(),
        }
    }

    pub fn push_log(&mut self, level: &str, message: String) {
        let time = chrono::Local::now().format("%H:%M:%S").to_string();
        if self.logs.len() >= MAX_LOGS {
            self.logs.pop_front();
        }
        self.logs.push_back(LogEntry {
            time,
            level: level.to_string(),
            message,
        });
    }

    pub fn uptime(&self) -> String {
        let secs = self.start_time.elapsed().as_secs();
        let h = secs / 3600;
        let m = (secs % 3600) / 60;
        format!("{}h {:02}m", h, m)
    }
}

/// Render collaborator for the TUI: turns records into cards and publishes
/// them through the watch channel.
pub struct TuiSink {
    tx: watch::Sender<AppState>,
}

impl TuiSink {
    pub fn new(tx: watch::Sender<AppState>) -> Self {
        Self { tx }
    }
}

impl FeedSink for TuiSink {
    fn show_loading(&mut self) {
        self.tx.send_modify(|s| s.loading = true);
    }

    fn hide_loading(&mut self) {
        self.tx.send_modify(|s| s.loading = false);
    }

    fn append(&mut self, records: Vec<ArtworkRecord>) {
        let year = chrono::Local::now().year();
        let mut rng = rand::thread_rng();
        let cards: Vec<PostCard> = records
            .iter()
            .map(|r| PostCard::from_record(r, year, &mut rng))
            .collect();
        self.tx.send_modify(|s| s.posts.extend(cards));
    }

    fn clear(&mut self) {
        self.tx.send_modify(|s| s.posts.clear());
    }
}

/// Overlays drawn on top of the feed.
#[derive(Debug, Clone)]
pub enum Modal {
    Details { title: String, links: DetailLinks },
    Config(ConfigViewState),
}

/// TUI-local view state: cursor, likes, open modal.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub selected: usize,
    pub liked: HashSet<u64>,
    pub modal: Option<Modal>,
}

impl ViewState {
    pub fn move_down(&mut self, len: usize) {
        if len > 0 && self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn jump_to_end(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
    }

    /// Keep the cursor in range after the list shrinks (filter reset).
    pub fn clamp(&mut self, len: usize) {
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    /// Whether the cursor is within `distance` cards of the last one.
    pub fn near_end(&self, len: usize, distance: usize) -> bool {
        len == 0 || self.selected + distance >= len - 1
    }

    /// Flip the like on a card. Returns the new liked state.
    pub fn toggle_like(&mut self, id: u64) -> bool {
        if !self.liked.remove(&id) {
            self.liked.insert(id);
            true
        } else {
            false
        }
    }

    pub fn like_count(&self, card: &PostCard) -> u32 {
        if self.liked.contains(&card.id) {
            card.likes + 1
        } else {
            card.likes
        }
    }
}
