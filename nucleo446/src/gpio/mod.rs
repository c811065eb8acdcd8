//! GPIO peripheral.
//!
//! Example usage:
//!
//! ```ignore
//! gpio::enable();
//!
//! gpio::configure(gpio::PC13, gpio::Mode::Input(gpio::Pull::None));
//! let value: bool = gpio::read(gpio::PC13);
//! ```

mod mode;
mod pac;
mod pinout;

pub use mode::*;
pub use pac::{Pin, Port};
pub use pinout::*;

/// Enable GPIO ports.
///
/// Enables the clock for ports A, B and C.
#[inline]
pub fn enable() {
    Port::A.enable();
    Port::B.enable();
    Port::C.enable();
}

/// GPIO pin tuple struct.
///
/// Can be used to [configure][configure()], [read][read()] from or
/// [write][write()] to a pin.
#[derive(Clone, Copy, Debug)]
pub struct Gpio(pub Port, pub Pin);

/// Configure the given GPIO pin mode.
#[inline]
pub fn configure(pin: Gpio, mode: Mode) {
    pac::configure(pin.0.regs(), pin.1, mode);
}

/// Set the GPIO pin value.
///
/// Assumes the pin was [configured][configure] as [output][OutputMode]
/// before calling this.
#[inline]
pub fn write(pin: Gpio, value: bool) {
    pac::write(pin.0.regs(), pin.1, value)
}

/// Read the GPIO pin value.
#[inline]
pub fn read(pin: Gpio) -> bool {
    pac::read(pin.0.regs(), pin.1)
}
