//! Passive reconstruction of the HD44780 character display.
//!
//! The firmware drives the display through two VIA ports: [`PORT_B`] carries
//! the 8-bit data bus and [`PORT_A`] carries the control lines. Real
//! hardware latches the data bus on the rising edge of the enable strobe, so
//! the capture keeps the previous control byte and acts only on a 0→1
//! transition of [`LCD_E`]. Everything here is a read-only tap on the shared
//! memory image; the capture never writes to the bus.

use crate::map::{byte_at, LCD_E, LCD_RS, PORT_A, PORT_B};

/// Visible width of each display line in characters.
pub const LINE_WIDTH: usize = 16;
/// First DDRAM address of line 2.
pub const LINE2_START: u16 = 64;
/// Exclusive end of line 2's visible DDRAM window.
pub const LINE2_END: u16 = 80;

/// Clear-display command byte.
const CMD_CLEAR: u8 = 0x01;
/// Set-DDRAM-address command flag bit.
const CMD_SET_ADDRESS: u8 = 0x80;
/// DDRAM address mask within a set-address command.
const DDRAM_ADDRESS_MASK: u8 = 0x7F;

/// Placeholder glyph for byte values outside printable ASCII.
const PLACEHOLDER: char = '?';

/// Reconstructed display state built from observed bus writes.
///
/// Characters land on line 1 only while the cursor is inside the first
/// visible window and on line 2 only inside the second; writes addressed
/// anywhere else map to DDRAM positions with no visible cell and are
/// dropped, matching the controller's addressing scheme.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LcdCapture {
    line1: String,
    line2: String,
    cursor: u16,
    last_ctrl: u8,
}

impl LcdCapture {
    /// Creates an empty capture with the cursor at DDRAM address zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Observes one bus snapshot of the control and data registers.
    ///
    /// Call once after every executed instruction. An action is taken only
    /// on a rising edge of the enable strobe relative to the previous call;
    /// steady-state and falling-edge values change nothing, so observing the
    /// same snapshot at finer granularity is idempotent.
    pub fn observe(&mut self, ctrl: u8, data: u8) {
        let rising = ctrl & LCD_E != 0 && self.last_ctrl & LCD_E == 0;
        if rising {
            if ctrl & LCD_RS != 0 {
                self.latch_character(data);
            } else {
                self.latch_command(data);
            }
        }
        self.last_ctrl = ctrl;
    }

    /// Observes the current control/data register values in `memory`.
    pub fn observe_bus(&mut self, memory: &[u8]) {
        self.observe(byte_at(memory, PORT_A), byte_at(memory, PORT_B));
    }

    /// Returns both lines, space-padded and truncated to exactly
    /// [`LINE_WIDTH`] characters.
    #[must_use]
    pub fn display(&self) -> (String, String) {
        (pad_line(&self.line1), pad_line(&self.line2))
    }

    /// Returns the current DDRAM cursor address.
    #[must_use]
    pub const fn cursor(&self) -> u16 {
        self.cursor
    }

    fn latch_character(&mut self, data: u8) {
        let ch = if (0x20..=0x7E).contains(&data) {
            char::from(data)
        } else {
            PLACEHOLDER
        };
        if usize::from(self.cursor) < LINE_WIDTH {
            self.line1.push(ch);
        } else if (LINE2_START..LINE2_END).contains(&self.cursor) {
            self.line2.push(ch);
        }
        self.cursor = self.cursor.wrapping_add(1);
    }

    fn latch_command(&mut self, data: u8) {
        if data == CMD_CLEAR {
            self.line1.clear();
            self.line2.clear();
            self.cursor = 0;
        } else if data & CMD_SET_ADDRESS != 0 {
            // The low seven bits become the cursor unconditionally; an
            // address outside both visible windows just makes subsequent
            // characters drop.
            self.cursor = u16::from(data & DDRAM_ADDRESS_MASK);
        }
    }
}

fn pad_line(line: &str) -> String {
    line.chars()
        .chain(std::iter::repeat(' '))
        .take(LINE_WIDTH)
        .collect()
}
