//! Tests for the manual timer.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{ManualTimer, TimerError, TimerService, Timestamp, WakeHandler};

/// Test handler that counts fires and records the last fire time.
struct CountingHandler {
    fires: AtomicUsize,
    last_fired_at: std::sync::Mutex<Option<Timestamp>>,
}

impl CountingHandler {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            fires: AtomicUsize::new(0),
            last_fired_at: std::sync::Mutex::new(None),
        })
    }

    fn fires(&self) -> usize {
        self.fires.load(Ordering::SeqCst)
    }
}

impl WakeHandler for CountingHandler {
    fn wake(&self, fired_at: Timestamp) {
        self.fires.fetch_add(1, Ordering::SeqCst);
        *self.last_fired_at.lock().unwrap() = Some(fired_at);
    }
}

#[test]
fn does_not_fire_before_timestamp() {
    let timer = ManualTimer::default();
    let handler = CountingHandler::new();
    timer
        .schedule_wakeup(Timestamp::new(5), handler.clone())
        .unwrap();

    timer.advance_to(Timestamp::new(4)).unwrap();
    assert_eq!(handler.fires(), 0);
    assert_eq!(timer.pending_wakeups(), 1);
}

#[test]
fn fires_at_exact_timestamp() {
    let timer = ManualTimer::default();
    let handler = CountingHandler::new();
    timer
        .schedule_wakeup(Timestamp::new(5), handler.clone())
        .unwrap();

    timer.advance_to(Timestamp::new(5)).unwrap();
    assert_eq!(handler.fires(), 1);
    assert_eq!(
        *handler.last_fired_at.lock().unwrap(),
        Some(Timestamp::new(5))
    );
}

#[test]
fn fires_once_across_repeated_advances() {
    let timer = ManualTimer::default();
    let handler = CountingHandler::new();
    timer
        .schedule_wakeup(Timestamp::new(5), handler.clone())
        .unwrap();

    timer.advance_to(Timestamp::new(7)).unwrap();
    timer.advance_to(Timestamp::new(9)).unwrap();
    timer.advance(100).unwrap();
    assert_eq!(handler.fires(), 1);
    assert_eq!(timer.pending_wakeups(), 0);
}

#[test]
fn late_fire_reports_actual_time() {
    let timer = ManualTimer::default();
    let handler = CountingHandler::new();
    timer
        .schedule_wakeup(Timestamp::new(5), handler.clone())
        .unwrap();

    timer.advance_to(Timestamp::new(8)).unwrap();
    assert_eq!(
        *handler.last_fired_at.lock().unwrap(),
        Some(Timestamp::new(8))
    );
}

#[test]
fn past_due_wakeup_fires_on_next_advance_not_inline() {
    let timer = ManualTimer::default();
    timer.advance_to(Timestamp::new(10)).unwrap();

    let handler = CountingHandler::new();
    timer
        .schedule_wakeup(Timestamp::new(3), handler.clone())
        .unwrap();
    // Not fired by scheduling itself.
    assert_eq!(handler.fires(), 0);

    timer.advance(0).unwrap();
    assert_eq!(handler.fires(), 1);
}

#[test]
fn rejects_backwards_advance() {
    let timer = ManualTimer::default();
    timer.advance_to(Timestamp::new(10)).unwrap();
    let err = timer.advance_to(Timestamp::new(9)).unwrap_err();
    assert!(matches!(err, TimerError::AdvanceBackwards { .. }));
    assert_eq!(timer.current(), Timestamp::new(10));
}

#[test]
fn fires_multiple_wakeups_in_timestamp_order() {
    let timer = ManualTimer::default();
    let order = Arc::new(std::sync::Mutex::new(Vec::new()));

    struct OrderHandler {
        tag: u64,
        order: Arc<std::sync::Mutex<Vec<u64>>>,
    }
    impl WakeHandler for OrderHandler {
        fn wake(&self, _fired_at: Timestamp) {
            self.order.lock().unwrap().push(self.tag);
        }
    }

    for at in [7u64, 3, 5] {
        timer
            .schedule_wakeup(
                Timestamp::new(at),
                Arc::new(OrderHandler {
                    tag: at,
                    order: order.clone(),
                }),
            )
            .unwrap();
    }

    timer.advance_to(Timestamp::new(10)).unwrap();
    assert_eq!(*order.lock().unwrap(), vec![3, 5, 7]);
}
