use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use colored::*;
use indicatif::ProgressStyle;
use tracing::Span;
use tracing_indicatif::span_ext::IndicatifSpanExt;

use crate::terminal::colors;

const TICK: Duration = Duration::from_millis(100);
const TIP_DURATION: Duration = Duration::from_secs(2);
const TIPS: &[&str] = &[
    "Cameras only show up in scan mode once the host shares their subnet",
    "Sniff mode needs root or CAP_NET_RAW",
    "A camera that stays silent cannot be sniffed, try power-cycling it",
];

fn style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&[
            "▁▁▁▁▁",
            "▁▂▂▂▁",
            "▁▄▂▄▁",
            "▂▄▆▄▂",
            "▄▆█▆▄",
            "▂▄▆▄▂",
            "▁▄▂▄▁",
            "▁▂▂▂▁",
        ])
}

/// Animates `span` until `running` is cleared, rotating tips underneath `label`.
pub fn start_discovery_spinner(
    span: Span,
    running: Arc<AtomicBool>,
    label: String,
) -> JoinHandle<()> {
    span.pb_set_style(&style());
    span.pb_set_message(&label);

    thread::spawn(move || {
        let started: Instant = Instant::now();
        let mut next_tip: Instant = started + TIP_DURATION;
        let mut tip_index: usize = 0;

        while running.load(Ordering::Relaxed) {
            if Instant::now() >= next_tip {
                let tip: &str = TIPS[tip_index % TIPS.len()];
                let seconds: f64 = started.elapsed().as_secs_f64();
                let elapsed: ColoredString = format!("{seconds:.0}s").yellow();
                span.pb_set_message(&format!(
                    "{label} {elapsed} {}",
                    tip.italic().color(colors::SEPARATOR)
                ));
                tip_index += 1;
                next_tip = Instant::now() + TIP_DURATION;
            }
            thread::sleep(TICK);
        }
    })
}
