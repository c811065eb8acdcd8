//! Busy-wait delays.
//!
//! Cycle counts assume the 84MHz core clock configured by
//! [clock::init][crate::clock::init].

use crate::clock;

const MILLIS_CYCLES: u32 = clock::SPEED / 1_000;
const MICROS_CYCLES: u32 = clock::SPEED / 1_000_000;

pub use cortex_m::asm::delay as cycles;

/// Blocks the program for *atleast* `count` milliseconds.
#[inline]
pub fn millis(count: u32) {
    cortex_m::asm::delay(MILLIS_CYCLES * count);
}

/// Blocks the program for *atleast* `count` microseconds.
#[inline]
pub fn micros(count: u32) {
    cortex_m::asm::delay(MICROS_CYCLES * count);
}
