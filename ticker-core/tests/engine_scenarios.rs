use std::time::Duration;

use ticker_core::{
    CycleMetrics, LoopExit, ScrollSpeed, ScrollingSignal, TickerEngine,
    TickerEvent,
};
use tokio::sync::broadcast::error::TryRecvError;
use tokio::time::sleep;

fn engine_with_widths(widths: &[(u32, f32)]) -> TickerEngine<u32> {
    let engine = TickerEngine::new(ScrollingSignal::new(false))
        .expect("engine inside runtime");
    engine.set_item_count(widths.len());
    for (id, width) in widths {
        engine.record_width(*id, *width);
    }
    engine
}

fn drain(rx: &mut tokio::sync::broadcast::Receiver<TickerEvent>) -> Vec<TickerEvent> {
    let mut events = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(event) => events.push(event),
            Err(TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }
    events
}

fn resumed_count(events: &[TickerEvent]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, TickerEvent::Resumed))
        .count()
}

#[tokio::test]
async fn three_item_scenario_cycle_width() {
    let engine = engine_with_widths(&[(1, 100.0), (2, 150.0), (3, 200.0)]);
    assert_eq!(engine.cycle_width(20.0, 3), Some(510.0));

    let speed = ScrollSpeed::new(5.0, 60);
    assert_eq!(speed.points_per_second(), 50.0);
    assert!((speed.increment() - 0.833_333).abs() < 1e-5);
}

#[test]
fn one_full_cycle_after_612_frames() {
    let metrics = CycleMetrics::new(510.0, ScrollSpeed::new(5.0, 60));
    let mut offset = 0.0_f32;
    let mut wraps = 0;
    for _ in 0..611 {
        let (next, wrapped) = metrics.advance(offset);
        offset = next;
        wraps += usize::from(wrapped);
    }
    assert_eq!(wraps, 0, "no wrap before a full cycle");
    assert!(offset > -510.0 && offset < -509.0, "{offset}");

    for _ in 0..2 {
        let (next, wrapped) = metrics.advance(offset);
        offset = next;
        wraps += usize::from(wrapped);
    }
    assert_eq!(wraps, 1, "exactly one wrap after crossing the cycle");
    assert!((offset + 0.833_333).abs() < 0.05, "{offset}");
}

#[tokio::test(start_paused = true)]
async fn loop_moves_at_configured_speed_and_stops_on_pause() {
    let engine = engine_with_widths(&[(1, 100.0), (2, 150.0), (3, 200.0)]);
    engine.resume();
    assert!(engine.scrolling().get());

    let runner = engine.clone();
    let task = tokio::spawn(async move { runner.run_animation(5.0, 20.0, 3).await });

    sleep(Duration::from_secs(1)).await;
    let offset = engine.offset();
    assert!(offset < -40.0 && offset > -55.0, "about 50 points after 1s, got {offset}");
    assert!(engine.is_animating());

    engine.pause(Duration::ZERO);
    let exit = task.await.expect("loop task");
    assert_eq!(exit, LoopExit::Paused);
    assert!(!engine.is_animating());

    let frozen = engine.offset();
    sleep(Duration::from_secs(1)).await;
    assert_eq!(engine.offset(), frozen);
}

#[tokio::test(start_paused = true)]
async fn offset_stays_within_cycle_while_wrapping() {
    let engine = engine_with_widths(&[(1, 10.0), (2, 10.0)]);
    let mut events = engine.subscribe();
    engine.resume();

    let runner = engine.clone();
    let task = tokio::spawn(async move { runner.run_animation(60.0, 0.0, 2).await });
    sleep(Duration::from_millis(200)).await;
    engine.pause(Duration::ZERO);
    assert_eq!(task.await.expect("loop task"), LoopExit::Paused);

    let events = drain(&mut events);
    let offsets: Vec<f32> = events
        .iter()
        .filter_map(|event| match event {
            TickerEvent::OffsetChanged { offset } => Some(*offset),
            _ => None,
        })
        .collect();
    assert!(offsets.len() > 5);
    assert!(
        offsets.iter().all(|offset| *offset <= 0.0 && *offset > -20.0),
        "{offsets:?}"
    );
    assert!(events.iter().any(|event| matches!(
        event,
        TickerEvent::Wrapped { cycle_width } if *cycle_width == 20.0
    )));
}

#[tokio::test(start_paused = true)]
async fn loop_waits_until_every_width_is_known() {
    let engine = engine_with_widths(&[(1, 100.0)]);
    engine.set_item_count(2);
    engine.resume();

    let runner = engine.clone();
    let task = tokio::spawn(async move { runner.run_animation(5.0, 20.0, 2).await });

    sleep(Duration::from_millis(500)).await;
    assert_eq!(engine.offset(), 0.0);
    assert!(engine.is_animating());

    engine.record_width(2, 60.0);
    sleep(Duration::from_millis(500)).await;
    assert!(engine.offset() < 0.0);

    engine.pause(Duration::ZERO);
    assert_eq!(task.await.expect("loop task"), LoopExit::Paused);
}

#[tokio::test(start_paused = true)]
async fn second_pause_replaces_first_timer() {
    let engine = engine_with_widths(&[(1, 100.0)]);
    let mut events = engine.subscribe();
    engine.resume();

    engine.pause(Duration::from_secs(5));
    sleep(Duration::from_secs(2)).await;
    engine.pause(Duration::from_secs(3));

    // The first timer would have fired at t=5s.
    sleep(Duration::from_millis(2_900)).await;
    assert!(!engine.scrolling().get());

    sleep(Duration::from_millis(200)).await;
    assert!(engine.scrolling().get());
    assert!(!engine.has_pending_resume());

    sleep(Duration::from_secs(10)).await;
    let events = drain(&mut events);
    // One from the initial resume, one from the surviving timer.
    assert_eq!(resumed_count(&events), 2, "{events:?}");
    assert!(events.contains(&TickerEvent::ResumeCancelled));
}

#[tokio::test(start_paused = true)]
async fn reset_cancels_pending_resume() {
    let engine = engine_with_widths(&[(1, 100.0), (2, 150.0), (3, 200.0)]);
    engine.resume();
    engine.pause(Duration::from_secs(5));

    sleep(Duration::from_secs(1)).await;
    let mut events = engine.subscribe();
    engine.reset();

    sleep(Duration::from_secs(10)).await;
    assert!(!engine.scrolling().get());
    let events = drain(&mut events);
    assert_eq!(resumed_count(&events), 0, "{events:?}");
    assert!(events.contains(&TickerEvent::Reset));

    engine.resume();
    assert!(engine.scrolling().get());
}

#[tokio::test(start_paused = true)]
async fn reset_stops_running_loop_without_further_writes() {
    let engine = engine_with_widths(&[(1, 100.0), (2, 150.0)]);
    engine.resume();

    let runner = engine.clone();
    let task = tokio::spawn(async move { runner.run_animation(5.0, 20.0, 2).await });
    sleep(Duration::from_millis(500)).await;
    assert!(engine.offset() < 0.0);

    engine.reset();
    assert_eq!(task.await.expect("loop task"), LoopExit::Cancelled);
    assert!(!engine.scrolling().get());
    assert_eq!(engine.offset(), 0.0);
    assert_eq!(engine.widths_len(), 0);

    sleep(Duration::from_secs(1)).await;
    assert_eq!(engine.offset(), 0.0);
}

#[tokio::test(start_paused = true)]
async fn newer_loop_supersedes_older_one() {
    let engine = engine_with_widths(&[(1, 100.0)]);
    engine.resume();

    let first = engine.clone();
    let first = tokio::spawn(async move { first.run_animation(5.0, 0.0, 1).await });
    sleep(Duration::from_millis(100)).await;

    let second = engine.clone();
    let second = tokio::spawn(async move { second.run_animation(5.0, 0.0, 1).await });
    sleep(Duration::from_millis(100)).await;

    assert!(first.is_finished());
    assert_eq!(first.await.expect("first loop"), LoopExit::Superseded);
    assert!(engine.scrolling().get(), "superseding must not stop scrolling");
    assert!(engine.is_animating());

    engine.pause(Duration::ZERO);
    assert_eq!(second.await.expect("second loop"), LoopExit::Paused);
}

#[tokio::test(start_paused = true)]
async fn shutdown_cancels_timer_and_loop() {
    let engine = engine_with_widths(&[(1, 100.0)]);
    engine.resume();
    let runner = engine.clone();
    let task = tokio::spawn(async move { runner.run_animation(5.0, 0.0, 1).await });
    sleep(Duration::from_millis(50)).await;

    engine.shutdown();
    assert_eq!(task.await.expect("loop task"), LoopExit::Cancelled);
    assert!(!engine.scrolling().get());

    engine.pause(Duration::from_secs(1));
    engine.shutdown();
    sleep(Duration::from_secs(2)).await;
    assert!(!engine.scrolling().get());
}

#[tokio::test(start_paused = true)]
async fn driver_follows_signal_transitions() {
    let engine = engine_with_widths(&[(1, 100.0), (2, 100.0)]);
    let driver = engine.spawn_driver(5.0, 10.0);

    sleep(Duration::from_millis(200)).await;
    assert_eq!(engine.offset(), 0.0, "idle until scrolling starts");

    engine.resume();
    sleep(Duration::from_secs(1)).await;
    let moved = engine.offset();
    assert!(moved < -40.0, "{moved}");

    engine.pause(Duration::from_millis(500));
    sleep(Duration::from_millis(100)).await;
    let paused_at = engine.offset();
    sleep(Duration::from_millis(100)).await;
    assert_eq!(engine.offset(), paused_at);

    // Auto-resume re-enters the loop through the driver.
    sleep(Duration::from_millis(600)).await;
    assert!(engine.scrolling().get());
    assert!(engine.offset() < paused_at);

    driver.abort();
}

#[tokio::test(start_paused = true)]
async fn reset_during_width_wait_cancels_loop() {
    let engine = engine_with_widths(&[(1, 100.0)]);
    engine.set_item_count(2);
    engine.resume();

    let runner = engine.clone();
    let task = tokio::spawn(async move { runner.run_animation(5.0, 20.0, 2).await });
    sleep(Duration::from_millis(200)).await;
    assert!(engine.is_animating(), "still waiting for the second width");

    engine.reset();
    assert_eq!(task.await.expect("loop task"), LoopExit::Cancelled);
    assert!(!engine.is_animating());
    assert!(!engine.scrolling().get());
    assert_eq!(engine.offset(), 0.0);
}

#[tokio::test(start_paused = true)]
async fn resume_right_after_reset_keeps_scrolling() {
    let engine = engine_with_widths(&[(1, 100.0), (2, 150.0)]);
    let _driver = engine.spawn_driver(5.0, 20.0);
    engine.resume();
    sleep(Duration::from_millis(200)).await;
    assert!(engine.offset() < 0.0);

    // Re-measure and restart before the old loop task is polled again.
    engine.reset();
    engine.record_width(1, 100.0);
    engine.record_width(2, 150.0);
    engine.resume();
    assert!(engine.scrolling().get());

    sleep(Duration::from_millis(500)).await;
    assert!(engine.scrolling().get(), "old loop must not switch scrolling off");
    assert!(engine.is_animating());
    let offset = engine.offset();
    assert!(offset < -15.0 && offset > -35.0, "about 25 points after 0.5s, got {offset}");
}

#[tokio::test(start_paused = true)]
async fn driver_restarts_after_reset_during_width_wait() {
    let engine = engine_with_widths(&[(1, 100.0)]);
    engine.set_item_count(2);
    let _driver = engine.spawn_driver(5.0, 20.0);
    engine.resume();

    sleep(Duration::from_millis(300)).await;
    assert!(engine.is_animating());
    assert_eq!(engine.offset(), 0.0);

    engine.reset();
    sleep(Duration::from_millis(100)).await;
    assert!(!engine.is_animating());
    assert!(!engine.scrolling().get());

    engine.record_width(1, 100.0);
    engine.record_width(2, 60.0);
    engine.resume();
    sleep(Duration::from_secs(1)).await;
    assert!(engine.scrolling().get());
    assert!(engine.offset() < -40.0, "{}", engine.offset());
}
