//! Host-facing contracts: the external execution primitive and the tunable
//! harness configuration.

/// Cycle-stepped execution primitive consumed by the harness.
///
/// Implementations own the flat 64 KiB memory image and the architectural
/// registers. The harness only ever reads the program counter, reads/writes
/// the shared memory image, and — in one documented exception
/// ([`crate::scenario::Harness::force_resume`]) — writes the program counter
/// to resume at a known routine entry.
pub trait Cpu {
    /// Executes exactly one instruction, updating memory and registers.
    fn step(&mut self);

    /// Returns the shared 64 KiB memory image.
    ///
    /// The slice must cover the full 16-bit address space; the harness
    /// indexes it with addresses taken modulo that width.
    fn memory(&self) -> &[u8];

    /// Returns the shared memory image for writing.
    ///
    /// Harness writes are limited to memory-mapped I/O locations and the
    /// ROM window during load/patch; CPU-internal state is never touched.
    fn memory_mut(&mut self) -> &mut [u8];

    /// Returns the current program counter.
    fn pc(&self) -> u16;

    /// Forces the program counter to `pc`.
    fn set_pc(&mut self, pc: u16);
}

/// Default short-press hold duration in steps.
pub const DEFAULT_DOT_HOLD: u64 = 5_000;
/// Default long-press hold duration in steps.
pub const DEFAULT_DASH_HOLD: u64 = 90_000;
/// Default gap between morse elements in steps.
pub const DEFAULT_ELEMENT_GAP: u64 = 5_000;
/// Default wait for the firmware's auto-confirm timeout in steps.
pub const DEFAULT_CONFIRM_WAIT: u64 = 1_500_000;
/// Default brief button-tap duration in steps.
pub const DEFAULT_BUTTON_TAP: u64 = 100;
/// Default convergence-monitor sampling cadence in steps.
pub const DEFAULT_SAMPLE_INTERVAL: u64 = 1_000;
/// Default generation multiple at which progress is reported.
pub const DEFAULT_REPORT_GENERATION_INTERVAL: u16 = 100;
/// Default backward-branch distance bound for poll-loop detection, in bytes.
pub const DEFAULT_POLL_LOOP_SPAN: u16 = 100;

/// Tunable harness constants.
///
/// Every value here is empirical, tuned against one specific firmware build;
/// none of them is an invariant of the protocol. The defaults reproduce the
/// timing that firmware's debounce, morse-threshold, and auto-confirm logic
/// expects once the delay routines have been patched out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct HarnessConfig {
    /// Steps to hold the morse key for a dot.
    pub dot_hold: u64,
    /// Steps to hold the morse key for a dash.
    pub dash_hold: u64,
    /// Steps to idle between morse elements.
    pub element_gap: u64,
    /// Steps to idle after a character so the firmware auto-confirms it.
    pub confirm_wait: u64,
    /// Steps a button tap is held.
    pub button_tap: u64,
    /// Steps between convergence-monitor samples.
    pub sample_interval: u64,
    /// Generation multiple at which a progress event is emitted.
    pub report_generation_interval: u16,
    /// Maximum backward distance, in bytes, for a branch to count as a
    /// tight polling loop.
    pub poll_loop_span: u16,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            dot_hold: DEFAULT_DOT_HOLD,
            dash_hold: DEFAULT_DASH_HOLD,
            element_gap: DEFAULT_ELEMENT_GAP,
            confirm_wait: DEFAULT_CONFIRM_WAIT,
            button_tap: DEFAULT_BUTTON_TAP,
            sample_interval: DEFAULT_SAMPLE_INTERVAL,
            report_generation_interval: DEFAULT_REPORT_GENERATION_INTERVAL,
            poll_loop_span: DEFAULT_POLL_LOOP_SPAN,
        }
    }
}
