use crate::sse::models::{CURRENT_VOTES_EVENT, SseReceiver};
use crate::startup::AppState;
use crate::tally::{TallySnapshot, TallySource, read_snapshot};
use axum::{
    extract::Extension,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{Stream, StreamExt};
use std::{sync::Arc, time::Duration};
use tokio::sync::broadcast::error::RecvError;

pub async fn current_votes_sse(
    Extension(app_state): Extension<AppState>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    info!("viewer connected");

    let rx = app_state.sse_tx.subscribe();
    let stream = snapshot_stream(app_state.source.clone(), rx)
        .map(|snapshot| Event::default().event(CURRENT_VOTES_EVENT).json_data(snapshot));

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(30))
            .text("keep-alive"),
    )
}

/// Snapshots for one viewer: the current tally first, then every broadcast.
///
/// `rx` must be subscribed before this is called so nothing published during
/// the initial read is missed.
pub fn snapshot_stream(
    source: Arc<dyn TallySource>,
    mut rx: SseReceiver,
) -> impl Stream<Item = TallySnapshot> {
    async_stream::stream! {
        match read_snapshot(source.as_ref()).await {
            Ok(snapshot) => {
                yield snapshot;
            }
            Err(e) => warn!("skipping initial snapshot: {e}"),
        }

        loop {
            match rx.recv().await {
                Ok(snapshot) => {
                    yield snapshot;
                }
                // every message is a full snapshot, dropped ones need no replay
                Err(RecvError::Lagged(skipped)) => {
                    debug!("viewer lagged, skipped {skipped} snapshot(s)");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }
}
