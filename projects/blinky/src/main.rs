#![no_main]
#![no_std]

extern crate panic_halt;

use cortex_m_rt::entry;

use cortex_m_semihosting::hprintln;
use nucleo446::{clock, delay::millis, gpio, Led};

/// User led LD2 on the Nucleo-F446RE.
const LED: gpio::Gpio = gpio::PA5;

#[entry]
fn main() -> ! {
    if cfg!(debug_assertions) {
        hprintln!("Hello! This is the Blinky example.").unwrap();
    }

    // System setup.
    unsafe {
        clock::init();
    }
    gpio::enable();

    let mut led = Led::new(LED, gpio::OutputMode::PushPull(gpio::Speed::Low));

    loop {
        // Blink led.
        millis(100);
        led.toggle();
    }
}
