//! Scenario driver composing the harness components into timed operations.
//!
//! Every macro-operation here is expressed purely in step counts over the
//! execution primitive: hold a button for N steps, key in a morse element,
//! wait out the firmware's auto-confirm window, run until an idle idiom or
//! a convergence event shows up. The driver holds no hardware knowledge of
//! its own — that lives in the components it composes — and each driver
//! instance owns its own component state, so independent scenario runs never
//! share anything.

use std::fmt;

use crate::api::{Cpu, HarnessConfig};
use crate::detect::IdleDetector;
use crate::input::inject_buttons;
use crate::lcd::LcdCapture;
use crate::map::{
    byte_at, BTN_MORSE, PHRASE_INDEX, TARGET_BUF, TARGET_BUF_LEN, TARGET_POS, VIA_T1_COUNTER,
};
use crate::monitor::{ConvergenceMonitor, GaCells, GaSample, MonitorEvent};
use crate::morse::{code_for, elements, MorseElement, MorseError};
use crate::patch::{apply_signatures, AppliedPatch, DELAY_SIGNATURES};
use crate::rom::{load_image, read_reset_vector, RomError};

/// Value seeded into the VIA timer counter the firmware reads as a PRNG
/// seed.
pub const DEFAULT_TIMER_SEED: u8 = 0x42;

/// Outcome of driving the GA toward convergence under a step budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum SolveOutcome {
    /// Distance reached zero after at least one generation.
    Solved {
        /// Generation index at which convergence was observed.
        generation: u16,
        /// Steps executed before the solving sample.
        steps: u64,
    },
    /// The step budget ran out first.
    TimedOut {
        /// Steps executed, equal to the budget.
        steps: u64,
    },
}

impl SolveOutcome {
    /// Returns `true` when the budget was exhausted without convergence.
    #[must_use]
    pub const fn timed_out(&self) -> bool {
        matches!(self, Self::TimedOut { .. })
    }

    /// Returns the solving generation, if any.
    #[must_use]
    pub const fn generation(&self) -> Option<u16> {
        match self {
            Self::Solved { generation, .. } => Some(*generation),
            Self::TimedOut { .. } => None,
        }
    }
}

/// Sink for progress events emitted while driving toward convergence.
pub trait ProgressSink {
    /// Receives a progress sample together with the current display line 1
    /// (the GA's best candidate so far).
    fn on_progress(&mut self, sample: GaSample, best: &str);
}

/// Sink that discards all progress events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn on_progress(&mut self, _sample: GaSample, _best: &str) {}
}

/// What `boot` did to the image before handing control to the firmware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootReport {
    /// Initial program counter taken from the reset vector.
    pub reset_vector: u16,
    /// Delay-routine patches that were found and applied.
    pub patches: Vec<AppliedPatch>,
}

/// Scenario driver over one execution primitive and one set of components.
#[derive(Debug)]
pub struct Harness<C> {
    cpu: C,
    lcd: LcdCapture,
    detector: IdleDetector,
    config: HarnessConfig,
    cells: GaCells,
}

impl<C: Cpu> Harness<C> {
    /// Creates a driver with the default configuration.
    #[must_use]
    pub fn new(cpu: C) -> Self {
        Self::with_config(cpu, HarnessConfig::default())
    }

    /// Creates a driver with an explicit configuration.
    #[must_use]
    pub fn with_config(cpu: C, config: HarnessConfig) -> Self {
        Self {
            cpu,
            lcd: LcdCapture::new(),
            detector: IdleDetector::new(&config),
            config,
            cells: GaCells::default(),
        }
    }

    /// Replaces the GA counter cell addresses watched by
    /// [`Self::run_until_solved`], for firmware builds that place them
    /// elsewhere.
    #[must_use]
    pub const fn with_ga_cells(mut self, cells: GaCells) -> Self {
        self.cells = cells;
        self
    }

    /// Returns the execution primitive.
    #[must_use]
    pub const fn cpu(&self) -> &C {
        &self.cpu
    }

    /// Returns the execution primitive for direct manipulation.
    #[must_use]
    pub fn cpu_mut(&mut self) -> &mut C {
        &mut self.cpu
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Returns the reconstructed display capture.
    #[must_use]
    pub const fn lcd(&self) -> &LcdCapture {
        &self.lcd
    }

    /// Returns both reconstructed display lines.
    #[must_use]
    pub fn display(&self) -> (String, String) {
        self.lcd.display()
    }

    /// Loads the firmware image, patches its delay routines, seeds the VIA
    /// timer, and points the CPU at the reset vector.
    ///
    /// # Errors
    ///
    /// Returns [`RomError`] when the image cannot be loaded; this is the
    /// only fatal path in a scenario and happens before any stepping.
    pub fn boot(&mut self, image: &[u8]) -> Result<BootReport, RomError> {
        let memory = self.cpu.memory_mut();
        load_image(memory, image)?;
        let patches = apply_signatures(memory, &DELAY_SIGNATURES);
        memory[usize::from(VIA_T1_COUNTER)] = DEFAULT_TIMER_SEED;
        let reset_vector = read_reset_vector(self.cpu.memory());
        self.cpu.set_pc(reset_vector);
        Ok(BootReport {
            reset_vector,
            patches,
        })
    }

    /// Executes one instruction with `buttons` held.
    ///
    /// Ordering is fixed: stimulus injection strictly before the
    /// instruction, display snooping strictly after it, so the edge
    /// detector can never miss or double-count a strobe.
    pub fn step_once(&mut self, buttons: u8) {
        inject_buttons(&mut self.cpu, buttons);
        self.cpu.step();
        self.lcd.observe_bus(self.cpu.memory());
    }

    /// Executes `n` instructions with `buttons` held throughout.
    pub fn run_steps(&mut self, n: u64, buttons: u8) {
        for _ in 0..n {
            self.step_once(buttons);
        }
    }

    /// Holds `buttons` for the configured brief-tap duration.
    pub fn tap_button(&mut self, buttons: u8) {
        self.run_steps(self.config.button_tap, buttons);
    }

    /// Runs until the firmware parks on a blocked idiom.
    ///
    /// Returns the number of steps executed before the blocked instruction,
    /// or `None` when `budget` steps pass without a match. Exhaustion is a
    /// sentinel, not an error: the caller decides whether it fails a check.
    pub fn run_until_blocked(&mut self, budget: u64, buttons: u8) -> Option<u64> {
        for step in 0..budget {
            inject_buttons(&mut self.cpu, buttons);
            if self.detector.is_blocked(self.cpu.memory(), self.cpu.pc()) {
                return Some(step);
            }
            self.cpu.step();
            self.lcd.observe_bus(self.cpu.memory());
        }
        None
    }

    /// Runs with no buttons held until the GA converges or `budget` runs
    /// out, reporting progress samples to `sink`.
    pub fn run_until_solved(&mut self, budget: u64, sink: &mut dyn ProgressSink) -> SolveOutcome {
        let mut monitor = ConvergenceMonitor::new(self.cells, &self.config);
        while monitor.steps() < budget {
            self.step_once(0);
            match monitor.record_step(self.cpu.memory()) {
                Some(MonitorEvent::Solved(sample)) => {
                    return SolveOutcome::Solved {
                        generation: sample.generation,
                        steps: monitor.steps(),
                    };
                }
                Some(MonitorEvent::Progress(sample)) => {
                    let (best, _) = self.lcd.display();
                    sink.on_progress(sample, &best);
                }
                None => {}
            }
        }
        SolveOutcome::TimedOut {
            steps: monitor.steps(),
        }
    }

    /// Keys in one morse element: hold, then the inter-element gap.
    pub fn morse_element(&mut self, element: MorseElement) {
        let hold = match element {
            MorseElement::Dot => self.config.dot_hold,
            MorseElement::Dash => self.config.dash_hold,
        };
        self.run_steps(hold, BTN_MORSE);
        self.run_steps(self.config.element_gap, 0);
    }

    /// Keys in a full character, then idles through the firmware's
    /// auto-confirm window so the character is committed.
    pub fn key_in_char(&mut self, sequence: &[MorseElement]) {
        for element in sequence {
            self.morse_element(*element);
        }
        self.run_steps(self.config.confirm_wait, 0);
    }

    /// Keys in `text` character by character via the morse table.
    ///
    /// # Errors
    ///
    /// Returns [`MorseError::UnmappedCharacter`] on the first character the
    /// table cannot encode; characters before it have already been keyed.
    pub fn key_in_text(&mut self, text: &str) -> Result<(), MorseError> {
        for ch in text.chars() {
            let code = code_for(ch).ok_or(MorseError::UnmappedCharacter(ch))?;
            let sequence = elements(code).ok_or(MorseError::UnmappedCharacter(ch))?;
            self.key_in_char(&sequence);
        }
        Ok(())
    }

    /// Forces execution to resume at `entry`.
    ///
    /// This is the one place the harness writes the program counter: when a
    /// known routine entry exists, jumping straight to it is faster than
    /// hunting for a synchronization point with the idle heuristics.
    pub fn force_resume(&mut self, entry: u16) {
        self.cpu.set_pc(entry);
    }

    /// Reads the 16-byte target text buffer as characters.
    #[must_use]
    pub fn read_target_buf(&self) -> String {
        let memory = self.cpu.memory();
        (0..TARGET_BUF_LEN)
            .map(|index| {
                #[allow(clippy::cast_possible_truncation)]
                let offset = index as u16;
                char::from(byte_at(memory, TARGET_BUF.wrapping_add(offset)))
            })
            .collect()
    }

    /// Reads the firmware's write position into the target buffer.
    #[must_use]
    pub fn target_write_pos(&self) -> u8 {
        byte_at(self.cpu.memory(), TARGET_POS)
    }

    /// Reads the index of the currently selected preset phrase.
    #[must_use]
    pub fn phrase_index(&self) -> u8 {
        byte_at(self.cpu.memory(), PHRASE_INDEX)
    }
}

/// One soft assertion and its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Check {
    /// Whether the condition held.
    pub passed: bool,
    /// Human-readable description of what was checked.
    pub message: String,
}

/// Pass/fail tally over a scenario's soft assertions.
///
/// A failed check never aborts the scenario: remaining checks still run, so
/// one broken expectation does not mask the rest of the report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckTally {
    checks: Vec<Check>,
}

impl CheckTally {
    /// Creates an empty tally.
    #[must_use]
    pub const fn new() -> Self {
        Self { checks: Vec::new() }
    }

    /// Records one soft assertion and returns the condition unchanged.
    pub fn check(&mut self, condition: bool, message: impl Into<String>) -> bool {
        self.checks.push(Check {
            passed: condition,
            message: message.into(),
        });
        condition
    }

    /// Number of passed checks.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.checks.iter().filter(|check| check.passed).count()
    }

    /// Number of failed checks.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.checks.len() - self.passed()
    }

    /// Total number of recorded checks.
    #[must_use]
    pub fn total(&self) -> usize {
        self.checks.len()
    }

    /// Returns `true` when every recorded check passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|check| check.passed)
    }

    /// Iterates the recorded checks in order.
    pub fn iter(&self) -> impl Iterator<Item = &Check> {
        self.checks.iter()
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.passed {
            write!(f, "PASS  {}", self.message)
        } else {
            write!(f, "FAIL  {}", self.message)
        }
    }
}

impl fmt::Display for CheckTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} passed, {} failed", self.passed(), self.failed())
    }
}
