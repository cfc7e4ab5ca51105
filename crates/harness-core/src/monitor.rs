//! Periodic sampling of the GA's generation and distance counters.
//!
//! The firmware keeps a 16-bit generation index and a 16-bit
//! fitness-distance counter in zero page, each split across two bytes. The
//! monitor samples them every fixed number of executed instructions rather
//! than every step, which keeps the overhead of watching an opaque binary
//! negligible.

use crate::api::HarnessConfig;
use crate::map::{read_u16_split, DIST_HI, DIST_LO, GEN_HI, GEN_LO};

/// Distance value the firmware leaves in place before its first evaluation.
pub const DISTANCE_UNINITIALIZED: u16 = 0xFFFF;

/// Addresses of the four counter cells, configurable per firmware build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct GaCells {
    /// Low byte of the fitness-distance counter.
    pub distance_lo: u16,
    /// High byte of the fitness-distance counter.
    pub distance_hi: u16,
    /// Low byte of the generation counter.
    pub generation_lo: u16,
    /// High byte of the generation counter.
    pub generation_hi: u16,
}

impl Default for GaCells {
    fn default() -> Self {
        Self {
            distance_lo: DIST_LO,
            distance_hi: DIST_HI,
            generation_lo: GEN_LO,
            generation_hi: GEN_HI,
        }
    }
}

impl GaCells {
    /// Reads both counters from the shared memory image.
    #[must_use]
    pub fn sample(&self, memory: &[u8]) -> GaSample {
        GaSample {
            generation: read_u16_split(memory, self.generation_lo, self.generation_hi),
            distance: read_u16_split(memory, self.distance_lo, self.distance_hi),
        }
    }
}

/// One observation of the GA's progress counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct GaSample {
    /// Generation index.
    pub generation: u16,
    /// Fitness distance remaining to the target.
    pub distance: u16,
}

impl GaSample {
    /// Returns `true` when the GA has converged on the target.
    ///
    /// Distance zero alone is not enough: a freshly reset image reads zero
    /// in both counters before the firmware initializes them, so completion
    /// additionally requires at least one elapsed generation.
    #[must_use]
    pub const fn is_solved(self) -> bool {
        self.distance == 0 && self.generation > 0
    }
}

/// Event produced by a monitor sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum MonitorEvent {
    /// The GA converged: distance reached zero after at least one
    /// generation.
    Solved(GaSample),
    /// The generation counter crossed a reporting interval.
    Progress(GaSample),
}

/// Interval-sampled watcher over the GA counter cells.
///
/// Owns no notion of timeout: callers bound the run with a step budget and
/// decide what an exhausted budget means (see
/// [`crate::scenario::Harness::run_until_solved`]).
#[derive(Debug, Clone)]
pub struct ConvergenceMonitor {
    cells: GaCells,
    sample_interval: u64,
    report_interval: u16,
    steps: u64,
    last_generation: Option<u16>,
}

impl ConvergenceMonitor {
    /// Creates a monitor over `cells` with cadence taken from `config`.
    #[must_use]
    pub fn new(cells: GaCells, config: &HarnessConfig) -> Self {
        Self {
            cells,
            sample_interval: config.sample_interval.max(1),
            report_interval: config.report_generation_interval.max(1),
            steps: 0,
            last_generation: Some(0),
        }
    }

    /// Number of steps recorded so far.
    #[must_use]
    pub const fn steps(&self) -> u64 {
        self.steps
    }

    /// Records one executed instruction and samples on interval boundaries.
    ///
    /// Returns [`MonitorEvent::Solved`] as soon as a sample satisfies the
    /// completion condition, [`MonitorEvent::Progress`] when the generation
    /// counter changed, is a multiple of the reporting interval, and the
    /// distance is not the uninitialized sentinel, and `None` otherwise.
    pub fn record_step(&mut self, memory: &[u8]) -> Option<MonitorEvent> {
        self.steps += 1;
        if self.steps % self.sample_interval != 0 {
            return None;
        }

        let sample = self.cells.sample(memory);
        if sample.is_solved() {
            return Some(MonitorEvent::Solved(sample));
        }

        let changed = self.last_generation != Some(sample.generation);
        self.last_generation = Some(sample.generation);
        if changed
            && sample.generation % self.report_interval == 0
            && sample.distance != DISTANCE_UNINITIALIZED
        {
            return Some(MonitorEvent::Progress(sample));
        }
        None
    }
}
