use super::pac::{
    SpiRegs, CR1_BR_MASK, CR1_BR_SHIFT, CR1_MSTR, CR1_SPE, CR1_SSI, CR1_SSM, SR_BSY, SR_RXNE,
    SR_TXE,
};
use super::{Bus, ByteOrder, Config, Error, Flag, Mode, Prescaler, DUMMY_BYTE};

use std::cell::RefCell;
use std::collections::VecDeque;

/// Scripted stand-in for the SPI register block.
///
/// Models the externally observable behavior of the peripheral: a transfer
/// completes instantly on a data register write, unless one of the
/// `stuck_*` switches holds a status flag in its failure state. Every data
/// register write is recorded together with the status register value
/// observed at write time, so tests can check sequencing after the fact.
struct FakeSpi {
    state: RefCell<FakeState>,
}

#[derive(Default)]
struct FakeState {
    cr1: u32,
    sr: u32,
    rx_buffer: Option<u8>,
    /// Peer bytes shifted in on successive transfers.
    peer: VecDeque<u8>,
    /// Every CR1 write, in order.
    cr1_writes: Vec<u32>,
    /// Every DR write, with the SR value at write time.
    dr_writes: Vec<(u8, u32)>,
    stuck_tx: bool,
    stuck_busy: bool,
    stuck_rx: bool,
}

impl FakeSpi {
    fn new() -> Self {
        let fake = FakeSpi {
            state: RefCell::new(FakeState::default()),
        };
        fake.state.borrow_mut().sr = SR_TXE;
        fake
    }

    fn with_peer(bytes: &[u8]) -> Self {
        let fake = Self::new();
        fake.state.borrow_mut().peer.extend(bytes.iter().copied());
        fake
    }
}

impl SpiRegs for &FakeSpi {
    fn read_cr1(&self) -> u32 {
        self.state.borrow().cr1
    }

    fn write_cr1(&self, value: u32) {
        let mut state = self.state.borrow_mut();
        state.cr1 = value;
        state.cr1_writes.push(value);
    }

    fn read_sr(&self) -> u32 {
        self.state.borrow().sr
    }

    fn write_dr(&self, byte: u8) {
        let mut state = self.state.borrow_mut();
        let sr = state.sr;
        state.dr_writes.push((byte, sr));
        if sr & SR_TXE == 0 {
            // Real hardware would corrupt the in-flight byte here; the
            // model just refuses to progress.
            return;
        }
        let response = state.peer.pop_front().unwrap_or(0x00);
        state.rx_buffer = Some(response);
        state.sr = 0;
        if !state.stuck_tx {
            state.sr |= SR_TXE;
        }
        if state.stuck_busy {
            state.sr |= SR_BSY;
        }
        if !state.stuck_rx {
            state.sr |= SR_RXNE;
        }
    }

    fn read_dr(&self) -> u8 {
        let mut state = self.state.borrow_mut();
        state.sr &= !SR_RXNE;
        state.rx_buffer.take().unwrap_or(0x00)
    }
}

fn config() -> Config {
    Config {
        prescaler: Prescaler::Div8,
        mode: Mode::Mode0,
        byteorder: ByteOrder::MsbFirst,
        retries: 16,
    }
}

#[test]
fn prescaler_codes_round_trip() {
    for code in 0..8u8 {
        let prescaler = Prescaler::from_code(code).unwrap();
        assert_eq!(prescaler as u8, code);
        assert_eq!(prescaler.divisor(), 2u32 << code);
    }
}

#[test]
fn invalid_prescaler_code_is_rejected() {
    assert_eq!(Prescaler::from_code(8), Err(Error::InvalidPrescaler(8)));
    assert_eq!(
        Prescaler::from_code(0xFF),
        Err(Error::InvalidPrescaler(0xFF))
    );
}

#[test]
fn init_commits_mode_bits_before_enable() {
    let fake = FakeSpi::new();
    let _bus = Bus::new(&fake, config());
    let state = fake.state.borrow();
    // The first write carries the full mode configuration without the
    // enable bit; no write may carry the enable bit without master role
    // and prescaler already in place.
    assert_eq!(state.cr1_writes[0] & CR1_SPE, 0);
    for &write in &state.cr1_writes {
        if write & CR1_SPE != 0 {
            assert_ne!(write & CR1_MSTR, 0);
            assert_eq!(
                (write & CR1_BR_MASK) >> CR1_BR_SHIFT,
                Prescaler::Div8 as u32
            );
        }
    }
    assert_ne!(state.cr1 & CR1_SPE, 0);
}

#[test]
fn div8_scenario_reads_back_expected_control_register() {
    let fake = FakeSpi::new();
    let _bus = Bus::new(&fake, config());
    let cr1 = fake.state.borrow().cr1;
    assert_ne!(cr1 & CR1_MSTR, 0);
    assert_eq!((cr1 & CR1_BR_MASK) >> CR1_BR_SHIFT, 0b010);
    assert_ne!(cr1 & CR1_SSM, 0);
    assert_ne!(cr1 & CR1_SSI, 0);
    assert_ne!(cr1 & CR1_SPE, 0);
}

#[test]
fn send_leaves_bus_idle_for_all_values() {
    let fake = FakeSpi::new();
    let mut bus = Bus::new(&fake, config());
    for value in 0..=255u8 {
        bus.send(value).unwrap();
        assert_eq!(fake.state.borrow().sr & SR_BSY, 0);
    }
}

#[test]
fn send_never_reads_the_data_register() {
    let fake = FakeSpi::with_peer(&[0x77]);
    let mut bus = Bus::new(&fake, config());
    bus.send(0x42).unwrap();
    // The peer byte is still unread and the receive flag still set.
    let state = fake.state.borrow();
    assert_eq!(state.rx_buffer, Some(0x77));
    assert_ne!(state.sr & SR_RXNE, 0);
}

#[test]
fn receive_returns_peer_byte_and_clocks_dummy() {
    let fake = FakeSpi::with_peer(&[0xA5]);
    let mut bus = Bus::new(&fake, config());
    assert_eq!(bus.receive(), Ok(0xA5));
    let state = fake.state.borrow();
    assert_eq!(state.dr_writes.len(), 1);
    assert_eq!(state.dr_writes[0].0, DUMMY_BYTE);
    // The data register read cleared the receive flag.
    assert_eq!(state.sr & SR_RXNE, 0);
}

#[test]
fn receive_matches_send_then_read() {
    let fake = FakeSpi::with_peer(&[0x3C]);
    let mut bus = Bus::new(&fake, config());
    bus.send(DUMMY_BYTE).unwrap();
    let manual = (&fake).read_dr();

    let fake2 = FakeSpi::with_peer(&[0x3C]);
    let mut bus2 = Bus::new(&fake2, config());
    assert_eq!(bus2.receive(), Ok(manual));
}

#[test]
fn custom_dummy_byte_is_clocked_out() {
    let fake = FakeSpi::with_peer(&[0x10]);
    let mut bus = Bus::new(&fake, config());
    assert_eq!(bus.receive_with(0x00), Ok(0x10));
    assert_eq!(fake.state.borrow().dr_writes[0].0, 0x00);
}

#[test]
fn full_duplex_transfer_pairs_bytes() {
    let fake = FakeSpi::with_peer(&[0xAA, 0xBB]);
    let mut bus = Bus::new(&fake, config());
    assert_eq!(bus.transfer_byte(0x11), Ok(0xAA));
    assert_eq!(bus.transfer_byte(0x22), Ok(0xBB));
    let state = fake.state.borrow();
    let sent: Vec<u8> = state.dr_writes.iter().map(|write| write.0).collect();
    assert_eq!(sent, [0x11, 0x22]);
}

#[test]
fn data_register_never_written_while_tx_full() {
    let fake = FakeSpi::with_peer(&[1, 2, 3]);
    let mut bus = Bus::new(&fake, config());
    bus.send(0x01).unwrap();
    bus.transfer_byte(0x02).unwrap();
    bus.receive().unwrap();
    for &(_, sr) in &fake.state.borrow().dr_writes {
        assert_ne!(sr & SR_TXE, 0);
    }
}

#[test]
fn transmit_flag_stuck_low_times_out_without_touching_dr() {
    let fake = FakeSpi::new();
    fake.state.borrow_mut().sr = 0;
    let mut bus = Bus::new(&fake, config());
    assert_eq!(bus.send(0x55), Err(Error::Timeout(Flag::TxEmpty)));
    assert!(fake.state.borrow().dr_writes.is_empty());
}

#[test]
fn transmit_flag_never_reasserting_times_out_after_one_write() {
    let fake = FakeSpi::new();
    fake.state.borrow_mut().stuck_tx = true;
    let mut bus = Bus::new(&fake, config());
    assert_eq!(bus.send(0x55), Err(Error::Timeout(Flag::TxEmpty)));
    assert_eq!(fake.state.borrow().dr_writes.len(), 1);
}

#[test]
fn busy_flag_stuck_high_times_out() {
    let fake = FakeSpi::new();
    fake.state.borrow_mut().stuck_busy = true;
    let mut bus = Bus::new(&fake, config());
    assert_eq!(bus.send(0x55), Err(Error::Timeout(Flag::Idle)));
}

#[test]
fn receive_flag_stuck_low_times_out() {
    let fake = FakeSpi::new();
    fake.state.borrow_mut().stuck_rx = true;
    let mut bus = Bus::new(&fake, config());
    assert_eq!(bus.receive(), Err(Error::Timeout(Flag::RxNotEmpty)));
}

#[test]
fn blocking_hal_traits_drive_the_same_protocol() {
    use embedded_hal::blocking::spi::{Transfer, Write};

    let fake = FakeSpi::with_peer(&[0xDE, 0xAD]);
    let mut bus = Bus::new(&fake, config());
    let mut words = [0x01, 0x02];
    bus.transfer(&mut words).unwrap();
    assert_eq!(words, [0xDE, 0xAD]);
    bus.write(&[0x03]).unwrap();
    assert_eq!(fake.state.borrow().dr_writes.len(), 3);
}

#[test]
fn lsb_first_and_mode_bits_reach_the_control_register() {
    use super::pac::{CR1_CPHA, CR1_CPOL, CR1_LSBFIRST};

    let fake = FakeSpi::new();
    let _bus = Bus::new(
        &fake,
        Config {
            prescaler: Prescaler::Div64,
            mode: Mode::Mode3,
            byteorder: ByteOrder::LsbFirst,
            retries: 16,
        },
    );
    let cr1 = fake.state.borrow().cr1;
    assert_ne!(cr1 & CR1_CPHA, 0);
    assert_ne!(cr1 & CR1_CPOL, 0);
    assert_ne!(cr1 & CR1_LSBFIRST, 0);
    assert_eq!((cr1 & CR1_BR_MASK) >> CR1_BR_SHIFT, 0b101);
}
