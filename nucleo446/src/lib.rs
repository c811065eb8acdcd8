//! Minimal HAL crate for the STM32F446 microcontroller.
//!
//! Covers the peripherals used on the Nucleo-F446RE board: system clock,
//! GPIO, the SPI buses and the user led, without direct register
//! interaction at the call sites. Minimal in the sense that it does not
//! follow strict guidelines on HAL crate design, e.g. it is possible to
//! configure a gpio pin without the system clock running.

#![cfg_attr(not(test), no_std)]

pub mod clock;
pub mod delay;
pub mod gpio;
pub mod spi;

mod led;
mod rcc;
mod reg;

pub use led::Led;
