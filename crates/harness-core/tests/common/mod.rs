//! Shared execution-primitive doubles for the integration suites.
//!
//! None of these interpret machine code. They advance a scripted or
//! behavioral model of the firmware under test, and place real 6502 opcode
//! bytes in memory only where a harness component inspects the instruction
//! stream (the injector's port-read key, the detector's idle idioms).

// Each suite links only the doubles it drives.
#![allow(dead_code)]

use harness_core::{code_for, Cpu, MorseElement, BTN_MORSE, PORT_A, TARGET_BUF, TARGET_POS};

/// 6502 `LDA absolute` opcode, used to key the stimulus injector.
pub const OPCODE_LDA_ABS: u8 = 0xAD;

/// One scripted instruction's worth of memory side effects.
#[derive(Debug, Clone)]
pub enum ScriptOp {
    /// Write a byte to an absolute address.
    Write(u16, u8),
    /// Jump to an address.
    SetPc(u16),
    /// Do nothing for one instruction.
    Nop,
}

/// Replays a fixed per-instruction script against the shared memory image.
pub struct ScriptedCpu {
    memory: Vec<u8>,
    pc: u16,
    script: Vec<Vec<ScriptOp>>,
    cursor: usize,
}

impl ScriptedCpu {
    /// Creates a CPU that performs one script entry per step, then idles.
    #[must_use]
    pub fn new(script: Vec<Vec<ScriptOp>>) -> Self {
        Self {
            memory: vec![0u8; 0x1_0000],
            pc: 0x8000,
            script,
            cursor: 0,
        }
    }
}

impl Cpu for ScriptedCpu {
    fn step(&mut self) {
        if let Some(ops) = self.script.get(self.cursor) {
            for op in ops.clone() {
                match op {
                    ScriptOp::Write(addr, value) => self.memory[usize::from(addr)] = value,
                    ScriptOp::SetPc(pc) => self.pc = pc,
                    ScriptOp::Nop => {}
                }
            }
        }
        self.cursor += 1;
    }

    fn memory(&self) -> &[u8] {
        &self.memory
    }

    fn memory_mut(&mut self) -> &mut [u8] {
        &mut self.memory
    }

    fn pc(&self) -> u16 {
        self.pc
    }

    fn set_pc(&mut self, pc: u16) {
        self.pc = pc;
    }
}

/// Behavioral double of the firmware's morse input loop.
///
/// Every step it "executes" the same `LDA PORT_A` poll (real bytes live at
/// its fixed PC so the injector fires), measures how long the morse key is
/// held or released, and commits a decoded character to the target buffer
/// once the release outlasts the confirm window — the same externally
/// visible behavior the real input loop has, with none of its machine code.
pub struct MorseEchoCpu {
    memory: Vec<u8>,
    pc: u16,
    dash_threshold: u64,
    confirm_threshold: u64,
    held_steps: u64,
    idle_steps: u64,
    elements: Vec<MorseElement>,
}

impl MorseEchoCpu {
    /// Polling-loop address the double parks on.
    pub const POLL_PC: u16 = 0x8040;

    /// Creates the double with firmware-side thresholds in steps.
    #[must_use]
    pub fn new(dash_threshold: u64, confirm_threshold: u64) -> Self {
        let mut memory = vec![0u8; 0x1_0000];
        let [lo, hi] = PORT_A.to_le_bytes();
        let poll = usize::from(Self::POLL_PC);
        memory[poll] = OPCODE_LDA_ABS;
        memory[poll + 1] = lo;
        memory[poll + 2] = hi;
        Self {
            memory,
            pc: Self::POLL_PC,
            dash_threshold,
            confirm_threshold,
            held_steps: 0,
            idle_steps: 0,
            elements: Vec::new(),
        }
    }

    fn commit_character(&mut self) {
        let code: String = self
            .elements
            .iter()
            .map(|element| match element {
                MorseElement::Dot => '.',
                MorseElement::Dash => '-',
            })
            .collect();
        let decoded = ('A'..='Z')
            .chain('0'..='9')
            .find(|ch| code_for(*ch) == Some(code.as_str()))
            .unwrap_or('?');

        let pos = self.memory[usize::from(TARGET_POS)];
        let slot = usize::from(TARGET_BUF) + usize::from(pos);
        self.memory[slot] = u8::try_from(u32::from(decoded)).unwrap_or(b'?');
        self.memory[usize::from(TARGET_POS)] = pos + 1;
        self.elements.clear();
    }
}

impl Cpu for MorseEchoCpu {
    fn step(&mut self) {
        let pressed = self.memory[usize::from(PORT_A)] & BTN_MORSE != 0;
        if pressed {
            self.held_steps += 1;
            self.idle_steps = 0;
        } else {
            if self.held_steps > 0 {
                let element = if self.held_steps >= self.dash_threshold {
                    MorseElement::Dash
                } else {
                    MorseElement::Dot
                };
                self.elements.push(element);
                self.held_steps = 0;
            }
            self.idle_steps += 1;
            if self.idle_steps == self.confirm_threshold && !self.elements.is_empty() {
                self.commit_character();
            }
        }
    }

    fn memory(&self) -> &[u8] {
        &self.memory
    }

    fn memory_mut(&mut self) -> &mut [u8] {
        &mut self.memory
    }

    fn pc(&self) -> u16 {
        self.pc
    }

    fn set_pc(&mut self, pc: u16) {
        self.pc = pc;
    }
}

/// Behavioral double of the evolving GA: one generation per `gen_period`
/// steps, distance counting down to zero at `solve_generation`.
pub struct EvolvingGaCpu {
    memory: Vec<u8>,
    pc: u16,
    gen_period: u64,
    solve_generation: u16,
    steps: u64,
}

impl EvolvingGaCpu {
    /// Creates the double; counters in memory start at zero, exactly like a
    /// freshly loaded image.
    #[must_use]
    pub fn new(gen_period: u64, solve_generation: u16) -> Self {
        Self {
            memory: vec![0u8; 0x1_0000],
            pc: 0x8000,
            gen_period,
            solve_generation,
            steps: 0,
        }
    }

    fn write_counters(&mut self, generation: u16, distance: u16) {
        let [gen_lo, gen_hi] = generation.to_le_bytes();
        let [dist_lo, dist_hi] = distance.to_le_bytes();
        self.memory[usize::from(harness_core::GEN_LO)] = gen_lo;
        self.memory[usize::from(harness_core::GEN_HI)] = gen_hi;
        self.memory[usize::from(harness_core::DIST_LO)] = dist_lo;
        self.memory[usize::from(harness_core::DIST_HI)] = dist_hi;
    }
}

impl Cpu for EvolvingGaCpu {
    fn step(&mut self) {
        self.steps += 1;
        if self.steps % self.gen_period == 0 {
            let generation =
                u16::try_from(self.steps / self.gen_period).unwrap_or(u16::MAX);
            let distance = self.solve_generation.saturating_sub(generation);
            self.write_counters(generation, distance);
        }
    }

    fn memory(&self) -> &[u8] {
        &self.memory
    }

    fn memory_mut(&mut self) -> &mut [u8] {
        &mut self.memory
    }

    fn pc(&self) -> u16 {
        self.pc
    }

    fn set_pc(&mut self, pc: u16) {
        self.pc = pc;
    }
}
