//! Dispatch metrics: labelled counters and latency histograms.
//!
//! Each metric is a [`Family`] of cells keyed by a sorted label set and
//! stored in a `DashMap`, so hooks on many threads can record without a
//! shared lock. Rendering sorts rows, which keeps the text output stable.

use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;

/// Label pairs sorted by name.
type Labels = Vec<(String, String)>;

fn labels_of(pairs: &[(&str, &str)]) -> Labels {
    let mut labels: Labels = pairs
        .iter()
        .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
        .collect();
    labels.sort_unstable();
    labels
}

/// `a="1",b="2"` with Prometheus escaping applied to values.
fn format_labels(labels: &Labels) -> String {
    let mut out = String::new();
    for (i, (name, value)) in labels.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let _ = write!(out, "{name}=\"");
        for ch in value.chars() {
            match ch {
                '\\' => out.push_str("\\\\"),
                '"' => out.push_str("\\\""),
                '\n' => out.push_str("\\n"),
                c => out.push(c),
            }
        }
        out.push('"');
    }
    out
}

/// One time series worth of state.
pub trait Cell: Default + Send + Sync {
    const TYPE: &'static str;

    fn write_rows(&self, name: &str, labels: &str, out: &mut String);
}

/// A metric family: one cell per distinct label set.
pub struct Family<C> {
    cells: DashMap<Labels, C>,
}

impl<C: Cell> Default for Family<C> {
    fn default() -> Self {
        Self {
            cells: DashMap::new(),
        }
    }
}

impl<C: Cell> Family<C> {
    fn with<R>(&self, pairs: &[(&str, &str)], f: impl FnOnce(&C) -> R) -> R {
        let cell = self.cells.entry(labels_of(pairs)).or_default();
        f(cell.value())
    }

    fn peek<R>(&self, pairs: &[(&str, &str)], f: impl FnOnce(&C) -> R) -> Option<R> {
        self.cells.get(&labels_of(pairs)).map(|cell| f(cell.value()))
    }

    fn write(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {name} {}", C::TYPE);
        let mut rows: Vec<(String, String)> = self
            .cells
            .iter()
            .map(|entry| {
                let labels = format_labels(entry.key());
                let mut body = String::new();
                entry.value().write_rows(name, &labels, &mut body);
                (labels, body)
            })
            .collect();
        rows.sort_unstable();
        for (_, body) in rows {
            out.push_str(&body);
        }
    }
}

#[derive(Default)]
pub struct Counter(AtomicU64);

impl Cell for Counter {
    const TYPE: &'static str = "counter";

    fn write_rows(&self, name: &str, labels: &str, out: &mut String) {
        let _ = writeln!(out, "{name}{{{labels}}} {}", self.0.load(Ordering::Relaxed));
    }
}

pub type CounterVec = Family<Counter>;

impl Family<Counter> {
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    pub fn add(&self, labels: &[(&str, &str)], n: u64) {
        self.with(labels, |c| c.0.fetch_add(n, Ordering::Relaxed));
    }

    /// Current value; 0 for a label set never recorded.
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.peek(labels, |c| c.0.load(Ordering::Relaxed))
            .unwrap_or(0)
    }
}

/// Bucket upper bounds in microseconds.
const LATENCY_BOUNDS_MICROS: [u64; 10] = [1, 5, 10, 25, 50, 100, 250, 1_000, 10_000, 50_000];

#[derive(Default)]
pub struct Histogram {
    count: AtomicU64,
    sum_micros: AtomicU64,
    /// Non-cumulative; folded into `le` buckets when rendered.
    slots: [AtomicU64; LATENCY_BOUNDS_MICROS.len()],
}

impl Cell for Histogram {
    const TYPE: &'static str = "histogram";

    fn write_rows(&self, name: &str, labels: &str, out: &mut String) {
        let sep = if labels.is_empty() { "" } else { "," };
        let mut cumulative = 0;
        for (slot, le) in self.slots.iter().zip(LATENCY_BOUNDS_MICROS) {
            cumulative += slot.load(Ordering::Relaxed);
            let _ = writeln!(out, "{name}_bucket{{{labels}{sep}le=\"{le}\"}} {cumulative}");
        }
        let count = self.count.load(Ordering::Relaxed);
        let _ = writeln!(out, "{name}_bucket{{{labels}{sep}le=\"+Inf\"}} {count}");
        let _ = writeln!(
            out,
            "{name}_sum{{{labels}}} {}",
            self.sum_micros.load(Ordering::Relaxed)
        );
        let _ = writeln!(out, "{name}_count{{{labels}}} {count}");
    }
}

pub type HistogramVec = Family<Histogram>;

impl Family<Histogram> {
    pub fn observe(&self, labels: &[(&str, &str)], elapsed: Duration) {
        let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        self.with(labels, |h| {
            h.count.fetch_add(1, Ordering::Relaxed);
            h.sum_micros.fetch_add(micros, Ordering::Relaxed);
            if let Some(i) = LATENCY_BOUNDS_MICROS.iter().position(|&le| micros <= le) {
                h.slots[i].fetch_add(1, Ordering::Relaxed);
            }
        });
    }

    /// Number of observations for a label set.
    pub fn count(&self, labels: &[(&str, &str)]) -> u64 {
        self.peek(labels, |h| h.count.load(Ordering::Relaxed))
            .unwrap_or(0)
    }
}

#[derive(Default)]
pub struct DispatchMetrics {
    /// Validation attempts by action and outcome.
    pub attempts: CounterVec,
    /// Pre hook to post hook.
    pub validate_duration: HistogramVec,
    /// Frames seen by the replay loop, by kind.
    pub frames: CounterVec,
    /// Rejected frames by OCPP error code.
    pub rejections: CounterVec,
}

impl DispatchMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prometheus text exposition of every family.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.attempts.write("ocppj_validate_attempts_total", &mut out);
        self.validate_duration
            .write("ocppj_validate_duration_micros", &mut out);
        self.frames.write("ocppj_frames_total", &mut out);
        self.rejections.write("ocppj_rejections_total", &mut out);
        out
    }
}
