//! System clock setup.

use crate::rcc;
use crate::reg::Reg;

/// System clock speed in Hertz.
pub const SPEED: u32 = 84_000_000;

const FLASH_ACR: usize = 0x4002_3C00;

// FLASH_ACR fields
const ACR_LATENCY_MASK: u32 = 0xF;
const ACR_LATENCY_WS2: u32 = 2;
const ACR_PRFTEN: u32 = 1 << 8;

// RCC_CR fields
const CR_PLLON: u32 = 1 << 24;
const CR_PLLRDY: u32 = 1 << 25;

// RCC_PLLCFGR fields
const PLLCFGR_PLLM_SHIFT: u32 = 0;
const PLLCFGR_PLLM_MASK: u32 = 0x3F;
const PLLCFGR_PLLN_SHIFT: u32 = 6;
const PLLCFGR_PLLN_MASK: u32 = 0x1FF << PLLCFGR_PLLN_SHIFT;
const PLLCFGR_PLLP_SHIFT: u32 = 16;
const PLLCFGR_PLLP_MASK: u32 = 0x3 << PLLCFGR_PLLP_SHIFT;
const PLLCFGR_PLLSRC_HSE: u32 = 1 << 22;

// PLL settings: 16MHz HSI / 8 * 84 / 2 = 84MHz.
const PLLM: u32 = 8;
const PLLN: u32 = 84;
const PLLP_DIV2: u32 = 0b00;

// RCC_CFGR fields
const CFGR_SW_MASK: u32 = 0x3;
const CFGR_SW_PLL: u32 = 0x2;
const CFGR_SWS_MASK: u32 = 0x3 << 2;
const CFGR_SWS_PLL: u32 = 0x2 << 2;
const CFGR_PPRE1_SHIFT: u32 = 10;
const CFGR_PPRE1_MASK: u32 = 0x7 << CFGR_PPRE1_SHIFT;
const CFGR_PPRE1_DIV2: u32 = 0x4 << CFGR_PPRE1_SHIFT;
const CFGR_PPRE2_SHIFT: u32 = 13;
const CFGR_PPRE2_MASK: u32 = 0x7 << CFGR_PPRE2_SHIFT;
const CFGR_PPRE2_DIV1: u32 = 0;

/// Setup of the system clock.
///
/// Runs the core at 84MHz from the internal 16MHz oscillator.
pub unsafe fn init() {
    let rcc = rcc::regs();
    let acr = &*(FLASH_ACR as *const Reg);

    // Two wait states are required above 64MHz; the prefetch buffer hides
    // most of the added latency.
    acr.modify(|r| (r & !ACR_LATENCY_MASK) | ACR_LATENCY_WS2 | ACR_PRFTEN);
    while acr.read() & ACR_LATENCY_MASK != ACR_LATENCY_WS2 {}

    // PLL input from the internal oscillator.
    rcc.pllcfgr.modify(|r| {
        let cleared = r
            & !(PLLCFGR_PLLM_MASK | PLLCFGR_PLLN_MASK | PLLCFGR_PLLP_MASK | PLLCFGR_PLLSRC_HSE);
        cleared
            | (PLLM << PLLCFGR_PLLM_SHIFT)
            | (PLLN << PLLCFGR_PLLN_SHIFT)
            | (PLLP_DIV2 << PLLCFGR_PLLP_SHIFT)
    });

    // APB low-speed prescaler: div 2 (45MHz domain limit).
    // APB high-speed prescaler: div 1.
    rcc.cfgr.modify(|r| {
        (r & !(CFGR_PPRE1_MASK | CFGR_PPRE2_MASK)) | CFGR_PPRE1_DIV2 | CFGR_PPRE2_DIV1
    });

    // Turn the PLL on and wait for lock.
    rcc.cr.modify(|r| r | CR_PLLON);
    while rcc.cr.read() & CR_PLLRDY == 0 {}

    // Switch to PLL as system clock.
    rcc.cfgr.modify(|r| (r & !CFGR_SW_MASK) | CFGR_SW_PLL);

    // Wait for switch to complete.
    while rcc.cfgr.read() & CFGR_SWS_MASK != CFGR_SWS_PLL {}
}

/// Clock speed for peripherals connected to APB1.
pub(crate) fn apb1_speed() -> u32 {
    let reg = (rcc::regs().cfgr.read() & CFGR_PPRE1_MASK) >> CFGR_PPRE1_SHIFT;
    if (reg & 4) > 0 {
        SPEED >> ((reg & 3) + 1)
    } else {
        SPEED
    }
}

/// Clock speed for peripherals connected to APB2.
pub(crate) fn apb2_speed() -> u32 {
    let reg = (rcc::regs().cfgr.read() & CFGR_PPRE2_MASK) >> CFGR_PPRE2_SHIFT;
    if (reg & 4) > 0 {
        SPEED >> ((reg & 3) + 1)
    } else {
        SPEED
    }
}
