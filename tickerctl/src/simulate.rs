//! Simulated host session over the sample feed.

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use ticker_core::{ScrollingSignal, TickerConfig, TickerEvent, TickerHost};
use ticker_model::{Headline, sample_headlines};
use tokio::sync::broadcast::error::RecvError;
use tokio::time::{Instant, sleep_until};

use crate::RunArgs;

/// Monospace glyph width used for the headless measurement pass.
const CHAR_WIDTH: f32 = 7.5;
const LABEL_PADDING: f32 = 12.0;
/// Gap between simulated layout callbacks.
const MEASURE_STAGGER: Duration = Duration::from_millis(15);

#[derive(Debug, Clone, Copy, PartialEq)]
enum Step {
    Measure(usize),
    Tap,
    DragStart,
    DragEnd,
}

#[derive(Debug, Default)]
pub(crate) struct RunSummary {
    pub frames: u64,
    pub wraps: u64,
    pub pauses: u64,
    pub resumes: u64,
    pub lagged: u64,
    pub cycle_width: Option<f32>,
    pub final_offset: f32,
    pub selected: Vec<String>,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "frames observed: {}", self.frames)?;
        writeln!(f, "wraps:           {}", self.wraps)?;
        writeln!(f, "pauses:          {}", self.pauses)?;
        writeln!(f, "resumes:         {}", self.resumes)?;
        if self.lagged > 0 {
            writeln!(f, "events dropped:  {}", self.lagged)?;
        }
        match self.cycle_width {
            Some(width) => writeln!(f, "cycle width:     {width:.1}")?,
            None => writeln!(f, "cycle width:     unmeasured")?,
        }
        for label in &self.selected {
            writeln!(f, "selected:        {label}")?;
        }
        write!(f, "final offset:    {:.2}", self.final_offset)
    }
}

fn schedule(args: &RunArgs, slots: usize) -> Vec<(Duration, Step)> {
    // Both passes report, as a real layout would; the host keeps the primary.
    let mut steps: Vec<(Duration, Step)> = (0..slots)
        .map(|index| (MEASURE_STAGGER * (index as u32 + 1), Step::Measure(index)))
        .collect();
    if let Some(at) = args.tap_at {
        steps.push((at, Step::Tap));
    }
    if let Some(at) = args.drag_at {
        steps.push((at, Step::DragStart));
        steps.push((at + Duration::from_millis(250), Step::DragEnd));
    }
    steps.retain(|(at, _)| *at < args.duration);
    steps.sort_by_key(|(at, _)| *at);
    steps
}

pub(crate) async fn run(config: TickerConfig, args: &RunArgs) -> Result<RunSummary> {
    let (select_tx, mut select_rx) = tokio::sync::mpsc::unbounded_channel();
    let mut host = TickerHost::<Headline>::new(config, ScrollingSignal::new(false))
        .context("failed to create ticker host")?
        .with_select(move |headline: &Headline| {
            let _ = select_tx.send(headline.label());
        });

    let headlines = sample_headlines();
    let first = headlines.first().map(|headline| headline.id);
    host.set_items(headlines);

    let slots = host.render_slots().count();
    tracing::info!(
        target: "tickerctl",
        items = host.items().len(),
        slots,
        speed = host.config().speed,
        "starting simulated run"
    );

    let mut events = host.engine().subscribe();
    let driver = host.spawn_driver();
    host.start();

    let started = Instant::now();
    let deadline = started + args.duration;
    let mut summary = RunSummary::default();
    let mut steps = schedule(args, slots).into_iter().peekable();

    loop {
        let next_step = steps.peek().map(|(at, _)| started + *at);
        let wake = next_step.map_or(deadline, |at| at.min(deadline));

        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => record(&mut summary, &event),
                Err(RecvError::Lagged(skipped)) => summary.lagged += skipped,
                Err(RecvError::Closed) => break,
            },
            () = sleep_until(wake) => {
                if wake >= deadline {
                    break;
                }
                if let Some((_, step)) = steps.next() {
                    apply(&mut host, step, first.as_ref(), args.drag_by);
                }
            }
        }
    }

    driver.abort();
    host.stop();
    while let Ok(label) = select_rx.try_recv() {
        summary.selected.push(label);
    }
    summary.final_offset = host.engine().offset();
    summary.cycle_width = host
        .engine()
        .cycle_width(host.config().spacing, host.items().len());
    Ok(summary)
}

fn apply(
    host: &mut TickerHost<Headline>,
    step: Step,
    first: Option<&ticker_model::ItemId>,
    drag_by: f32,
) {
    match step {
        Step::Measure(index) => {
            if let Some(slot) = host.render_slots().nth(index) {
                let width = slot.item.estimate_width(CHAR_WIDTH, LABEL_PADDING);
                let accepted = host.report_width(&slot, width);
                tracing::debug!(target: "tickerctl", index, width, accepted, "measured slot");
            }
        }
        Step::Tap => {
            if let Some(id) = first {
                tracing::info!(target: "tickerctl", item = %id, "tap");
                host.tap(id);
            }
        }
        Step::DragStart => {
            tracing::info!(target: "tickerctl", "drag started");
            host.drag_changed(drag_by / 2.0);
        }
        Step::DragEnd => {
            host.drag_changed(drag_by);
            host.drag_ended(drag_by);
            tracing::info!(
                target: "tickerctl",
                translation = drag_by,
                offset = host.engine().offset(),
                "drag ended"
            );
        }
    }
}

fn record(summary: &mut RunSummary, event: &TickerEvent) {
    match event {
        TickerEvent::OffsetChanged { offset } => {
            summary.frames += 1;
            tracing::trace!(target: "tickerctl", offset, "frame");
        }
        TickerEvent::Wrapped { .. } => summary.wraps += 1,
        TickerEvent::Paused { .. } => summary.pauses += 1,
        TickerEvent::Resumed => summary.resumes += 1,
        TickerEvent::WidthRecorded { .. }
        | TickerEvent::Reset
        | TickerEvent::ResumeCancelled => {}
    }
}
