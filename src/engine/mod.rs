pub mod controller;
pub mod pagination;
pub mod shuffle;

pub use controller::{BatchOutcome, FeedController, FeedPhase, FeedSink};
pub use pagination::PaginationSignal;
