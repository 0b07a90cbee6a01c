use crate::error::{ProtoError, Result};

/// Command kind tag carried in the command head.
///
/// Unrecognized values decode to [`CommandKind::Unknown`] so the server can
/// reply "undefined command" without inspecting payload bytes it cannot
/// interpret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    SetPinMode,
    SetPinPud,
    DeinitPin,
    Read,
    Write,
    SetPwm,
    Unknown(u32),
}

impl CommandKind {
    pub fn from_wire(raw: u32) -> Self {
        match raw {
            1 => CommandKind::SetPinMode,
            2 => CommandKind::SetPinPud,
            3 => CommandKind::DeinitPin,
            4 => CommandKind::Read,
            5 => CommandKind::Write,
            6 => CommandKind::SetPwm,
            other => CommandKind::Unknown(other),
        }
    }

    pub fn to_wire(self) -> u32 {
        match self {
            CommandKind::SetPinMode => 1,
            CommandKind::SetPinPud => 2,
            CommandKind::DeinitPin => 3,
            CommandKind::Read => 4,
            CommandKind::Write => 5,
            CommandKind::SetPwm => 6,
            CommandKind::Unknown(raw) => raw,
        }
    }
}

/// Electrical mode of a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    Input,
    OutputPushPull,
    OutputOpenDrain,
    OutputOpenSource,
    Pwm,
}

impl PinMode {
    pub fn from_wire(raw: u32) -> Result<Self> {
        match raw {
            1 => Ok(PinMode::Input),
            2 => Ok(PinMode::OutputPushPull),
            3 => Ok(PinMode::OutputOpenDrain),
            4 => Ok(PinMode::OutputOpenSource),
            5 => Ok(PinMode::Pwm),
            other => Err(ProtoError::InvalidPinMode(other)),
        }
    }

    pub fn to_wire(self) -> u32 {
        match self {
            PinMode::Input => 1,
            PinMode::OutputPushPull => 2,
            PinMode::OutputOpenDrain => 3,
            PinMode::OutputOpenSource => 4,
            PinMode::Pwm => 5,
        }
    }
}

/// Idle-state bias resistor configuration of a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinPud {
    Floating,
    PullUp,
    PullDown,
}

impl PinPud {
    pub fn from_wire(raw: u32) -> Result<Self> {
        match raw {
            1 => Ok(PinPud::Floating),
            2 => Ok(PinPud::PullUp),
            3 => Ok(PinPud::PullDown),
            other => Err(ProtoError::InvalidPinPud(other)),
        }
    }

    pub fn to_wire(self) -> u32 {
        match self {
            PinPud::Floating => 1,
            PinPud::PullUp => 2,
            PinPud::PullDown => 3,
        }
    }
}

/// PWM configuration payload.
///
/// `duty` is expressed relative to `range`: a duty of `range / 2` is a 50%
/// duty cycle at `frequency` Hz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PwmConfig {
    pub frequency: u32,
    pub range: u32,
    pub duty: u32,
}

/// A decoded command operation: kind plus its payload, in one variant.
///
/// Exactly one payload shape is valid per kind; [`CommandOp`] makes the
/// pairing unrepresentable to get wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOp {
    SetPinMode(PinMode),
    SetPinPud(PinPud),
    DeinitPin,
    Read,
    Write(u32),
    SetPwm(PwmConfig),
}

impl CommandOp {
    pub fn kind(&self) -> CommandKind {
        match self {
            CommandOp::SetPinMode(_) => CommandKind::SetPinMode,
            CommandOp::SetPinPud(_) => CommandKind::SetPinPud,
            CommandOp::DeinitPin => CommandKind::DeinitPin,
            CommandOp::Read => CommandKind::Read,
            CommandOp::Write(_) => CommandKind::Write,
            CommandOp::SetPwm(_) => CommandKind::SetPwm,
        }
    }

    /// Exact encoded payload size for this operation.
    pub fn payload_size(&self) -> u16 {
        match self {
            CommandOp::SetPinMode(_) | CommandOp::SetPinPud(_) | CommandOp::Write(_) => 4,
            CommandOp::DeinitPin | CommandOp::Read => 0,
            CommandOp::SetPwm(_) => 12,
        }
    }
}

/// Fixed-size command head preceding every command payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandHead {
    pub kind: CommandKind,
    pub payload_size: u16,
    pub pin: u16,
}
