use crate::clock;
use crate::gpio;
use crate::rcc;
use crate::reg::Reg;

const SPI1_BASE: usize = 0x4001_3000;
const SPI2_BASE: usize = 0x4000_3800;

/// SPI register block.
#[repr(C)]
#[allow(dead_code)]
pub(crate) struct RegisterBlock {
    cr1: Reg, // 0x00
    cr2: Reg, // 0x04
    sr: Reg,  // 0x08
    dr: Reg,  // 0x0C
}

// CR1 fields
pub(crate) const CR1_CPHA: u32 = 1 << 0;
pub(crate) const CR1_CPOL: u32 = 1 << 1;
pub(crate) const CR1_MSTR: u32 = 1 << 2;
pub(crate) const CR1_BR_SHIFT: u32 = 3;
pub(crate) const CR1_BR_MASK: u32 = 0b111 << CR1_BR_SHIFT;
pub(crate) const CR1_SPE: u32 = 1 << 6;
pub(crate) const CR1_LSBFIRST: u32 = 1 << 7;
pub(crate) const CR1_SSI: u32 = 1 << 8;
pub(crate) const CR1_SSM: u32 = 1 << 9;

// SR fields
pub(crate) const SR_RXNE: u32 = 1 << 0;
pub(crate) const SR_TXE: u32 = 1 << 1;
pub(crate) const SR_BSY: u32 = 1 << 7;

/// Register level access to an SPI peripheral.
///
/// The on-chip [instances][Spi] implement this over the memory mapped
/// register block; the test harness implements it over a scripted fake.
pub trait SpiRegs {
    fn read_cr1(&self) -> u32;
    fn write_cr1(&self, value: u32);
    fn read_sr(&self) -> u32;
    fn write_dr(&self, byte: u8);
    fn read_dr(&self) -> u8;

    /// The transmit buffer can accept a new byte.
    #[inline]
    fn tx_buffer_empty(&self) -> bool {
        self.read_sr() & SR_TXE != 0
    }

    /// A received byte is waiting in the data register.
    #[inline]
    fn rx_buffer_not_empty(&self) -> bool {
        self.read_sr() & SR_RXNE != 0
    }

    /// A shift operation is in progress.
    #[inline]
    fn busy(&self) -> bool {
        self.read_sr() & SR_BSY != 0
    }
}

/// SPI peripheral instance.
#[derive(Copy, Clone, Debug)]
pub enum Spi {
    Spi1,
    Spi2,
}

impl Spi {
    #[inline]
    fn regs(self) -> &'static RegisterBlock {
        let base = match self {
            Self::Spi1 => SPI1_BASE,
            Self::Spi2 => SPI2_BASE,
        };
        unsafe { &*(base as *const RegisterBlock) }
    }

    /// Enable the clock domains this instance depends on: the GPIO port
    /// carrying its pins and the peripheral's own APB bus.
    ///
    /// The hardware ignores register writes issued before this point.
    #[inline]
    pub fn enable_clocks(self) {
        match self {
            Self::Spi1 => {
                gpio::Port::A.enable();
                rcc::regs().apb2enr.modify(|r| r | rcc::APB2ENR_SPI1EN);
            }
            Self::Spi2 => {
                gpio::Port::B.enable();
                rcc::regs().apb1enr.modify(|r| r | rcc::APB1ENR_SPI2EN);
            }
        }
    }

    /// Route SCK, MISO and MOSI to this instance's alternate function.
    ///
    /// Calling this twice yields the same pin configuration.
    #[inline]
    pub fn route_pins(self) {
        let (sck, miso, mosi) = match self {
            Self::Spi1 => (gpio::PA5, gpio::PA6, gpio::PA7),
            Self::Spi2 => (gpio::PB13, gpio::PB14, gpio::PB15),
        };
        for &pin in &[sck, miso, mosi] {
            gpio::configure(
                pin,
                gpio::Mode::Alternate(
                    gpio::AlternateFunction::Af5,
                    gpio::OutputType::PushPull,
                    gpio::Speed::Fast,
                ),
            );
        }
    }

    /// Actual bus clock this instance is programmed for.
    #[inline]
    pub fn clock_speed(self) -> u32 {
        let code = (self.read_cr1() & CR1_BR_MASK) >> CR1_BR_SHIFT;
        self.input_clock() >> (code + 1)
    }

    /// Peripheral bus clock feeding this instance.
    #[inline]
    fn input_clock(self) -> u32 {
        match self {
            // SPI1 is clocked from APB2, SPI2 from APB1.
            Self::Spi1 => clock::apb2_speed(),
            Self::Spi2 => clock::apb1_speed(),
        }
    }
}

impl SpiRegs for Spi {
    #[inline]
    fn read_cr1(&self) -> u32 {
        self.regs().cr1.read()
    }

    #[inline]
    fn write_cr1(&self, value: u32) {
        self.regs().cr1.write(value)
    }

    #[inline]
    fn read_sr(&self) -> u32 {
        self.regs().sr.read()
    }

    #[inline]
    fn write_dr(&self, byte: u8) {
        self.regs().dr.write(byte as u32)
    }

    #[inline]
    fn read_dr(&self) -> u8 {
        self.regs().dr.read() as u8
    }
}
