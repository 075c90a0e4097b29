use super::*;
use async_trait::async_trait;
use host_integration::{RngSource, VirtualContainer};
use std::time::Duration;
use tokio::time::Instant;

use crate::test_support::{round_size, CONTAINER, FOOTPRINT};

type Notice = (Outcome, String, Instant);

#[derive(Clone, Default)]
struct RecordingNotifier {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl RecordingNotifier {
    async fn notices(&self) -> Vec<Notice> {
        self.notices.lock().await.clone()
    }
}

#[async_trait]
impl OutcomeNotifier for RecordingNotifier {
    async fn notify(&self, outcome: Outcome, message: &str) {
        self.notices
            .lock()
            .await
            .push((outcome, message.to_string(), Instant::now()));
    }
}

fn new_session() -> (Arc<GameSession>, VirtualContainer, RecordingNotifier) {
    let container = VirtualContainer::new(CONTAINER, FOOTPRINT);
    let controller = GameController::new(container.clone(), RngSource::seeded(99));
    let notifier = RecordingNotifier::default();
    let session = GameSession::new_with_dependencies(
        controller,
        RoundTiming::default(),
        Arc::new(notifier.clone()),
        Messages::default(),
    );
    (session, container, notifier)
}

fn secs(value: u64) -> Duration {
    Duration::from_secs(value)
}

/// Collects `(completed, elapsed)` for every scramble iteration and the elapsed time at which
/// Testing began.
async fn record_timeline(
    events: &mut broadcast::Receiver<RenderEvent>,
    began: Instant,
) -> (Vec<(u32, Duration)>, Duration) {
    let mut scrambles = Vec::new();
    loop {
        match events.recv().await.expect("event stream") {
            RenderEvent::PhaseChanged {
                phase: Phase::Scrambling { completed },
            } => scrambles.push((completed, began.elapsed())),
            RenderEvent::PhaseChanged {
                phase: Phase::Testing,
            } => return (scrambles, began.elapsed()),
            _ => {}
        }
    }
}

async fn click_in_order(session: &Arc<GameSession>, ids: &[u32]) -> Vec<ClickOutcome> {
    let mut outcomes = Vec::new();
    for id in ids {
        outcomes.push(session.click(TokenId(*id)).await);
    }
    outcomes
}

#[tokio::test(start_paused = true)]
async fn phases_follow_round_timeline() {
    let (session, _, _) = new_session();
    let mut events = session.subscribe_events();
    let began = Instant::now();

    let disposition = session.start(round_size(3)).await;
    assert_eq!(
        disposition,
        StartDisposition::Started {
            generation: RoundGeneration(1)
        }
    );
    assert_eq!(session.phase(), Phase::Waiting);

    let (scrambles, testing_at) = record_timeline(&mut events, began).await;
    assert_eq!(scrambles, vec![(1, secs(3)), (2, secs(5)), (3, secs(7))]);
    assert_eq!(testing_at, secs(9));
    assert_eq!(session.phase(), Phase::Testing);
}

#[tokio::test(start_paused = true)]
async fn every_token_moves_each_iteration() {
    let (session, _, _) = new_session();
    let mut events = session.subscribe_events();
    session.start(round_size(4)).await;
    session.wait_for_testing().await;

    let mut moves = 0;
    while let Ok(event) = events.try_recv() {
        if matches!(event, RenderEvent::TokenMoved { .. }) {
            moves += 1;
        }
    }
    assert_eq!(moves, 4 * 4);
}

#[tokio::test(start_paused = true)]
async fn win_is_announced_once_after_short_delay() {
    let (session, _, notifier) = new_session();
    let mut events = session.subscribe_events();
    session.start(round_size(3)).await;
    assert_eq!(session.wait_for_testing().await, Phase::Testing);

    let outcomes = click_in_order(&session, &[1, 2, 3]).await;
    assert_eq!(outcomes.last(), Some(&ClickOutcome::Won));
    let clicked_at = Instant::now();
    assert_eq!(session.phase(), Phase::Won);

    sleep(Duration::from_millis(50)).await;
    assert!(notifier.notices().await.is_empty());

    sleep(Duration::from_millis(100)).await;
    let notices = notifier.notices().await;
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].0, Outcome::Won);
    assert_eq!(notices[0].1, Messages::default().correct);
    assert_eq!(notices[0].2 - clicked_at, Duration::from_millis(100));

    let snapshot = session.snapshot().await;
    assert!(snapshot.tokens.iter().all(|token| token.label_visible));

    let mut finished = 0;
    while let Ok(event) = events.try_recv() {
        if let RenderEvent::RoundFinished { outcome, .. } = event {
            assert_eq!(outcome, Outcome::Won);
            finished += 1;
        }
    }
    assert_eq!(finished, 1);
}

#[tokio::test(start_paused = true)]
async fn mismatch_is_announced_immediately_and_freezes_round() {
    let (session, _, notifier) = new_session();
    session.start(round_size(3)).await;
    session.wait_for_testing().await;

    let outcomes = click_in_order(&session, &[1, 3]).await;
    assert!(matches!(outcomes[1], ClickOutcome::Failed(_)));
    assert_eq!(session.phase(), Phase::Failed);

    let notices = notifier.notices().await;
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].0, Outcome::Failed);
    assert_eq!(notices[0].1, Messages::default().wrong);

    let frozen = session.snapshot().await;
    assert!(frozen
        .tokens
        .iter()
        .all(|token| token.label_visible && !token.clickable));

    assert_eq!(session.click(TokenId(2)).await, ClickOutcome::Ignored);
    assert_eq!(session.snapshot().await, frozen);
    sleep(secs(1)).await;
    assert_eq!(notifier.notices().await.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn start_while_scrambling_is_ignored() {
    let (session, container, _) = new_session();
    session.start(round_size(3)).await;

    sleep(secs(4)).await;
    assert_eq!(session.phase(), Phase::Scrambling { completed: 1 });

    let before = session.snapshot().await;
    assert_eq!(
        session.start(round_size(5)).await,
        StartDisposition::Ignored
    );
    assert_eq!(session.snapshot().await, before);
    assert_eq!(container.children().len(), 3);

    assert_eq!(session.wait_for_testing().await, Phase::Testing);
    assert_eq!(session.snapshot().await.tokens.len(), 3);
}

#[tokio::test(start_paused = true)]
async fn start_while_waiting_supersedes_previous_round() {
    let (session, container, _) = new_session();
    let mut events = session.subscribe_events();
    let began = Instant::now();

    session.start(round_size(3)).await;
    sleep(secs(1)).await;
    assert_eq!(
        session.start(round_size(4)).await,
        StartDisposition::Started {
            generation: RoundGeneration(2)
        }
    );

    let (scrambles, testing_at) = record_timeline(&mut events, began).await;
    assert_eq!(
        scrambles,
        vec![(1, secs(5)), (2, secs(7)), (3, secs(9)), (4, secs(11))]
    );
    assert_eq!(testing_at, secs(13));
    assert_eq!(container.children().len(), 4);
}

#[tokio::test(start_paused = true)]
async fn reset_stops_in_flight_round() {
    let (session, container, _) = new_session();
    session.start(round_size(3)).await;
    sleep(secs(4)).await;

    session.reset().await;
    sleep(secs(30)).await;

    assert_eq!(session.phase(), Phase::Idle);
    let snapshot = session.snapshot().await;
    assert!(snapshot.tokens.is_empty());
    assert!(container.children().is_empty());

    session.reset().await;
    assert_eq!(session.snapshot().await, snapshot);
}

#[tokio::test(start_paused = true)]
async fn win_notice_survives_quick_restart() {
    let (session, _, notifier) = new_session();
    let mut events = session.subscribe_events();
    session.start(round_size(3)).await;
    session.wait_for_testing().await;
    click_in_order(&session, &[1, 2, 3]).await;

    assert_eq!(
        session.start(round_size(4)).await,
        StartDisposition::Started {
            generation: RoundGeneration(2)
        }
    );
    sleep(secs(1)).await;

    let notices = notifier.notices().await;
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].0, Outcome::Won);
    assert_eq!(session.snapshot().await.tokens.len(), 4);

    let mut finished = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let RenderEvent::RoundFinished {
            generation,
            outcome,
        } = event
        {
            finished.push((generation, outcome));
        }
    }
    assert_eq!(finished, vec![(RoundGeneration(1), Outcome::Won)]);
}

#[tokio::test(start_paused = true)]
async fn win_notice_is_dropped_after_reset() {
    let (session, _, notifier) = new_session();
    session.start(round_size(3)).await;
    session.wait_for_testing().await;
    click_in_order(&session, &[1, 2, 3]).await;

    session.reset().await;
    session.start(round_size(3)).await;
    sleep(secs(1)).await;
    assert!(notifier.notices().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn wait_for_testing_reports_finished_round() {
    let (session, _, _) = new_session();
    session.start(round_size(3)).await;
    assert_eq!(session.wait_for_testing().await, Phase::Testing);

    click_in_order(&session, &[2]).await;
    assert_eq!(session.wait_for_testing().await, Phase::Failed);
}
