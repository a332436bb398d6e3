use crate::error::TallyError;
use crate::sse::models::SseSender;
use crate::tally::{TallySource, read_snapshot};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};

const BROADCAST_CAPACITY: usize = 16;

pub fn create_sse_broadcaster() -> SseSender {
    let (tx, _rx) = broadcast::channel(BROADCAST_CAPACITY);
    tx
}

/// One read + publish cycle. Returns how many viewers received the snapshot;
/// zero viewers is not an error.
pub async fn broadcast_once(source: &dyn TallySource, tx: &SseSender) -> Result<usize, TallyError> {
    let snapshot = read_snapshot(source).await?;
    let receivers = tx.send(snapshot).unwrap_or(0);
    debug!(
        "broadcast {} vote(s) to {} viewer(s)",
        snapshot.total(),
        receivers
    );
    Ok(receivers)
}

/// Publishes a fresh snapshot every `period`, starting one period from now.
///
/// Each tick runs in its own task so a slow or failing read never delays the
/// next tick. A failed read drops that tick's broadcast and nothing else.
pub fn spawn_broadcast_loop(
    source: Arc<dyn TallySource>,
    tx: SseSender,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        loop {
            ticker.tick().await;
            let source = Arc::clone(&source);
            let tx = tx.clone();
            tokio::spawn(async move {
                if let Err(e) = broadcast_once(source.as_ref(), &tx).await {
                    warn!("skipping broadcast: {e}");
                }
            });
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tally::TallySnapshot;
    use crate::tally::tests::{FakeSource, counts};
    use tokio::time::sleep;

    const PERIOD: Duration = Duration::from_secs(2);

    fn store_down() -> TallyError {
        TallyError::StoreUnavailable("connection refused".into())
    }

    #[tokio::test]
    async fn broadcast_with_no_viewers_is_a_noop() {
        let source = FakeSource::new(vec![Ok(counts(&[("dogs", 1)]))]);
        let tx = create_sse_broadcaster();
        assert_eq!(broadcast_once(&source, &tx).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn broadcast_reaches_every_viewer() {
        let source = FakeSource::new(vec![Ok(counts(&[("lizards", 4)]))]);
        let tx = create_sse_broadcaster();
        let mut first = tx.subscribe();
        let mut second = tx.subscribe();

        assert_eq!(broadcast_once(&source, &tx).await.unwrap(), 2);

        let expected = TallySnapshot {
            dogs: 0,
            cats: 0,
            lizards: 4,
        };
        assert_eq!(first.recv().await.unwrap(), expected);
        assert_eq!(second.recv().await.unwrap(), expected);
    }

    #[tokio::test]
    async fn failed_read_publishes_nothing() {
        let source = FakeSource::new(vec![Err(store_down())]);
        let tx = create_sse_broadcaster();
        let mut rx = tx.subscribe();

        assert!(broadcast_once(&source, &tx).await.is_err());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn first_tick_waits_one_period() {
        let source = Arc::new(FakeSource::new(vec![Ok(counts(&[]))]));
        let handle = spawn_broadcast_loop(source.clone(), create_sse_broadcaster(), PERIOD);

        sleep(PERIOD / 2).await;
        assert_eq!(source.reads(), 0);

        sleep(PERIOD).await;
        assert_eq!(source.reads(), 1);
        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn failed_tick_is_skipped_and_next_tick_resumes() {
        let source = Arc::new(FakeSource::new(vec![
            Err(store_down()),
            Ok(counts(&[("cats", 3)])),
        ]));
        let tx = create_sse_broadcaster();
        let mut rx = tx.subscribe();
        let start = Instant::now();
        let handle = spawn_broadcast_loop(source.clone(), tx, PERIOD);

        let snapshot = rx.recv().await.unwrap();
        assert_eq!(start.elapsed(), PERIOD * 2);
        assert_eq!(source.reads(), 2);
        assert_eq!(
            snapshot,
            TallySnapshot {
                dogs: 0,
                cats: 3,
                lizards: 0
            }
        );
        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn one_attempt_per_tick_despite_slow_reads() {
        let source = Arc::new(
            FakeSource::new(vec![Ok(counts(&[("dogs", 1)]))]).with_delay(PERIOD * 5),
        );
        let handle = spawn_broadcast_loop(source.clone(), create_sse_broadcaster(), PERIOD);

        sleep(PERIOD * 10 + PERIOD / 2).await;
        assert_eq!(source.reads(), 10);
        handle.abort();
    }
}
