/// GPIO pin mode.
#[derive(Clone, Copy, Debug)]
pub enum Mode {
    Input(Pull),
    Output(OutputType, Speed),
    Alternate(AlternateFunction, OutputType, Speed),
    Analog,
}

/// GPIO output driver type.
#[derive(Clone, Copy, Debug)]
pub enum OutputType {
    PushPull,
    OpenDrain,
}

/// GPIO switching speed.
///
/// Lower speeds can reduce ringing.
#[repr(u8)]
#[derive(Clone, Copy, Debug)]
pub enum Speed {
    Low = 0,
    Medium = 1,
    Fast = 2,
    High = 3,
}

/// Pull-up/pull-down configuration for input pins.
#[repr(u8)]
#[derive(Clone, Copy, Debug)]
pub enum Pull {
    None = 0,
    Up = 1,
    Down = 2,
}

/// Peripheral alternate function index.
///
/// Selecting an alternate function disconnects the pin from the generic
/// GPIO logic and connects it to the numbered peripheral signal.
#[repr(u8)]
#[rustfmt::skip]
#[derive(Clone, Copy, Debug)]
pub enum AlternateFunction {
    Af0  = 0,
    Af1  = 1,
    Af2  = 2,
    Af3  = 3,
    Af4  = 4,
    Af5  = 5,
    Af6  = 6,
    Af7  = 7,
    Af8  = 8,
    Af9  = 9,
    Af10 = 10,
    Af11 = 11,
    Af12 = 12,
    Af13 = 13,
    Af14 = 14,
    Af15 = 15,
}

/// GPIO output mode.
///
/// Subset of the GPIO [modes][Mode].
#[derive(Clone, Copy, Debug)]
pub enum OutputMode {
    PushPull(Speed),
    OpenDrain(Speed),
}

impl Into<Mode> for OutputMode {
    #[inline]
    fn into(self) -> Mode {
        match self {
            Self::PushPull(speed) => Mode::Output(OutputType::PushPull, speed),
            Self::OpenDrain(speed) => Mode::Output(OutputType::OpenDrain, speed),
        }
    }
}
