use super::{Mode, OutputType, Pull};
use crate::rcc;
use crate::reg::Reg;

const GPIOA_BASE: usize = 0x4002_0000;
const GPIOB_BASE: usize = 0x4002_0400;
const GPIOC_BASE: usize = 0x4002_0800;

/// GPIO port register block.
#[repr(C)]
#[allow(dead_code)]
#[cfg_attr(test, derive(Default))]
pub(crate) struct RegisterBlock {
    moder: Reg,   // 0x00
    otyper: Reg,  // 0x04
    ospeedr: Reg, // 0x08
    pupdr: Reg,   // 0x0C
    idr: Reg,     // 0x10
    odr: Reg,     // 0x14
    bsrr: Reg,    // 0x18
    lckr: Reg,    // 0x1C
    afrl: Reg,    // 0x20
    afrh: Reg,    // 0x24
}

// MODER field values (2 bits per pin)
const MODER_INPUT: u32 = 0b00;
const MODER_OUTPUT: u32 = 0b01;
const MODER_ALTERNATE: u32 = 0b10;
const MODER_ANALOG: u32 = 0b11;

/// Available GPIO ports.
#[derive(Clone, Copy, Debug)]
pub enum Port {
    A,
    B,
    C,
}

/// Available GPIO pins.
#[repr(u8)]
#[rustfmt::skip]
#[derive(Clone, Copy, Debug)]
pub enum Pin {
    P0  = 0,
    P1  = 1,
    P2  = 2,
    P3  = 3,
    P4  = 4,
    P5  = 5,
    P6  = 6,
    P7  = 7,
    P8  = 8,
    P9  = 9,
    P10 = 10,
    P11 = 11,
    P12 = 12,
    P13 = 13,
    P14 = 14,
    P15 = 15,
}

impl Port {
    #[inline]
    fn base(self) -> usize {
        match self {
            Port::A => GPIOA_BASE,
            Port::B => GPIOB_BASE,
            Port::C => GPIOC_BASE,
        }
    }

    #[inline]
    pub(crate) fn regs(self) -> &'static RegisterBlock {
        unsafe { &*(self.base() as *const RegisterBlock) }
    }

    #[inline]
    pub(crate) fn enable(self) {
        let bit = match self {
            Port::A => rcc::AHB1ENR_GPIOAEN,
            Port::B => rcc::AHB1ENR_GPIOBEN,
            Port::C => rcc::AHB1ENR_GPIOCEN,
        };
        rcc::regs().ahb1enr.modify(|r| r | bit);
    }
}

// Clear a 2-bit pin field, then set it. The clear must come first: a stale
// pattern from a previous configuration would otherwise combine with the
// new bits.
fn set_field2(reg: &Reg, pin_nr: u32, value: u32) {
    let shift = pin_nr * 2;
    reg.modify(|r| (r & !(0b11 << shift)) | (value << shift));
}

fn set_bit(reg: &Reg, pin_nr: u32, value: bool) {
    reg.modify(|r| {
        if value {
            r | (1 << pin_nr)
        } else {
            r & !(1 << pin_nr)
        }
    });
}

// Clear the pin's 4-bit alternate function nibble, then set it.
fn set_alternate_function(regs: &RegisterBlock, pin_nr: u32, af: u32) {
    let reg = if pin_nr < 8 { &regs.afrl } else { &regs.afrh };
    let shift = (pin_nr % 8) * 4;
    reg.modify(|r| (r & !(0xF << shift)) | (af << shift));
}

/// Configure a pin of the given port register block.
pub(crate) fn configure(regs: &RegisterBlock, pin: Pin, mode: Mode) {
    let pin_nr = pin as u32;
    match mode {
        Mode::Input(pull) => {
            set_field2(&regs.moder, pin_nr, MODER_INPUT);
            set_field2(&regs.pupdr, pin_nr, pull as u32);
        }
        Mode::Output(otype, speed) => {
            set_field2(&regs.moder, pin_nr, MODER_OUTPUT);
            set_bit(&regs.otyper, pin_nr, open_drain(otype));
            set_field2(&regs.ospeedr, pin_nr, speed as u32);
            set_field2(&regs.pupdr, pin_nr, Pull::None as u32);
        }
        Mode::Alternate(af, otype, speed) => {
            set_field2(&regs.moder, pin_nr, MODER_ALTERNATE);
            set_bit(&regs.otyper, pin_nr, open_drain(otype));
            set_field2(&regs.ospeedr, pin_nr, speed as u32);
            set_field2(&regs.pupdr, pin_nr, Pull::None as u32);
            set_alternate_function(regs, pin_nr, af as u32);
        }
        Mode::Analog => {
            set_field2(&regs.moder, pin_nr, MODER_ANALOG);
            set_field2(&regs.pupdr, pin_nr, Pull::None as u32);
        }
    }
}

fn open_drain(otype: OutputType) -> bool {
    match otype {
        OutputType::OpenDrain => true,
        OutputType::PushPull => false,
    }
}

/// Sets the pin value.
///
/// Assumes the pin was configured as output mode.
#[inline]
pub(crate) fn write(regs: &RegisterBlock, pin: Pin, value: bool) {
    regs.odr.modify(|r| {
        if value {
            r | (1 << pin as u32)
        } else {
            r & !(1 << pin as u32)
        }
    });
}

/// Read the pin value.
#[inline]
pub(crate) fn read(regs: &RegisterBlock, pin: Pin) -> bool {
    (regs.idr.read() & (1 << pin as u32)) > 0
}
