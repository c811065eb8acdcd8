#![no_main]
#![no_std]

extern crate panic_halt;

use cortex_m_rt::entry;

use nucleo446::{clock, delay::micros, gpio, spi, Led};

const SPI: spi::Spi = spi::Spi::Spi2;
const CSN: gpio::Gpio = gpio::PB12;

/// JEDEC read-identification command.
const READ_ID: u8 = 0x9F;

#[entry]
fn main() -> ! {
    // System setup.
    unsafe {
        clock::init();
    }
    gpio::enable();

    let mut led = Led::new(gpio::PA5, gpio::OutputMode::PushPull(gpio::Speed::Low));

    let mut bus = spi::Config {
        prescaler: spi::Prescaler::Div8,
        mode: spi::Mode::Mode0,
        byteorder: spi::ByteOrder::MsbFirst,
        retries: spi::DEFAULT_RETRIES,
    }
    .make(SPI);

    gpio::configure(
        CSN,
        gpio::Mode::Output(gpio::OutputType::PushPull, gpio::Speed::Fast),
    );
    gpio::write(CSN, true);

    loop {
        // Pull chip-select and ask the peer to identify itself.
        gpio::write(CSN, false);
        let result = bus.send(READ_ID).and_then(|_| bus.receive());
        gpio::write(CSN, true);

        // Led signals a responding peer; an all-zero or all-one answer
        // means a floating data line.
        match result {
            Ok(id) => led.write(id != 0x00 && id != 0xFF),
            Err(_) => led.off(),
        }
        micros(100);
    }
}
