//! Reset and clock control.
//!
//! A peripheral ignores register writes until its clock enable bit is set
//! here.

use crate::reg::Reg;

const RCC_BASE: usize = 0x4002_3800;

/// RCC register block, up to the clock enable registers.
#[repr(C)]
#[allow(dead_code)]
pub(crate) struct RegisterBlock {
    pub cr: Reg,           // 0x00
    pub pllcfgr: Reg,      // 0x04
    pub cfgr: Reg,         // 0x08
    pub cir: Reg,          // 0x0C
    _reserved0: [u32; 8],  // 0x10
    pub ahb1enr: Reg,      // 0x30
    pub ahb2enr: Reg,      // 0x34
    pub ahb3enr: Reg,      // 0x38
    _reserved1: u32,       // 0x3C
    pub apb1enr: Reg,      // 0x40
    pub apb2enr: Reg,      // 0x44
}

// AHB1ENR bits
pub(crate) const AHB1ENR_GPIOAEN: u32 = 1 << 0;
pub(crate) const AHB1ENR_GPIOBEN: u32 = 1 << 1;
pub(crate) const AHB1ENR_GPIOCEN: u32 = 1 << 2;

// APB1ENR bits
pub(crate) const APB1ENR_SPI2EN: u32 = 1 << 14;

// APB2ENR bits
pub(crate) const APB2ENR_SPI1EN: u32 = 1 << 12;

#[inline]
pub(crate) fn regs() -> &'static RegisterBlock {
    unsafe { &*(RCC_BASE as *const RegisterBlock) }
}
