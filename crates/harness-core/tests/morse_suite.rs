//! Scenarios keying morse text into a behavioral double of the input loop.

// Pulled in for other test targets.
use proptest as _;
use rstest as _;
use tempfile as _;
use thiserror as _;

mod common;

use common::MorseEchoCpu;
use harness_core::{Harness, HarnessConfig, MorseElement};

/// Firmware-side step count separating a dot from a dash.
const DASH_THRESHOLD: u64 = 100;
/// Firmware-side idle step count that commits the pending character.
const CONFIRM_THRESHOLD: u64 = 400;

/// Timing scaled down from the hardware defaults so the suites stay fast;
/// the ratios between hold, gap, and confirm windows are preserved.
fn scaled_config() -> HarnessConfig {
    HarnessConfig {
        dot_hold: 30,
        dash_hold: 200,
        element_gap: 50,
        confirm_wait: 1_000,
        button_tap: 5,
        ..HarnessConfig::default()
    }
}

fn scaled_harness() -> Harness<MorseEchoCpu> {
    Harness::with_config(
        MorseEchoCpu::new(DASH_THRESHOLD, CONFIRM_THRESHOLD),
        scaled_config(),
    )
}

#[test]
fn dot_then_dash_commits_one_character() {
    let mut harness = scaled_harness();

    harness.key_in_char(&[MorseElement::Dot, MorseElement::Dash]);

    assert_eq!(harness.target_write_pos(), 1);
    assert!(harness.read_target_buf().starts_with('A'));
}

#[test]
fn short_and_long_holds_map_to_distinct_characters() {
    let mut dot = scaled_harness();
    dot.key_in_char(&[MorseElement::Dot]);
    assert!(dot.read_target_buf().starts_with('E'));

    let mut dash = scaled_harness();
    dash.key_in_char(&[MorseElement::Dash]);
    assert!(dash.read_target_buf().starts_with('T'));
}

#[test]
fn element_gap_alone_does_not_commit() {
    let mut harness = scaled_harness();

    harness.morse_element(MorseElement::Dot);
    harness.morse_element(MorseElement::Dot);
    // Only inter-element gaps so far, well inside the confirm window.
    assert_eq!(harness.target_write_pos(), 0);

    harness.run_steps(harness.config().confirm_wait, 0);
    assert_eq!(harness.target_write_pos(), 1);
    assert!(harness.read_target_buf().starts_with('I'));
}

#[test]
fn keyed_text_lands_in_the_target_buffer_in_order() {
    let mut harness = scaled_harness();

    harness.key_in_text("HI").expect("both characters encode");

    assert_eq!(harness.target_write_pos(), 2);
    assert!(harness.read_target_buf().starts_with("HI"));
}

#[test]
fn lowercase_text_keys_like_uppercase() {
    let mut harness = scaled_harness();
    harness.key_in_text("sos").expect("letters encode");

    assert_eq!(harness.target_write_pos(), 3);
    assert!(harness.read_target_buf().starts_with("SOS"));
}

#[test]
fn unmapped_character_stops_mid_text() {
    let mut harness = scaled_harness();

    let result = harness.key_in_text("A B");

    assert!(result.is_err());
    // The character before the failure was already committed.
    assert_eq!(harness.target_write_pos(), 1);
    assert!(harness.read_target_buf().starts_with('A'));
}

#[test]
fn idle_run_without_elements_commits_nothing() {
    let mut harness = scaled_harness();
    harness.run_steps(5_000, 0);
    assert_eq!(harness.target_write_pos(), 0);
}
