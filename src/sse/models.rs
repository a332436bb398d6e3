use crate::tally::TallySnapshot;

/// SSE event name carried by every snapshot, initial or scheduled.
pub const CURRENT_VOTES_EVENT: &str = "current_votes";

pub type SseSender = tokio::sync::broadcast::Sender<TallySnapshot>;
pub type SseReceiver = tokio::sync::broadcast::Receiver<TallySnapshot>;
