use pinbus_proto::{PinMode, PinPud};

/// The set of hardware operations the dispatcher depends on.
///
/// Implementations are driven from the server's single event-loop thread,
/// so mutual exclusion on the underlying hardware is structural and no
/// internal locking is needed. Operations return a signed status
/// (see [`crate::status`]); they must validate pin membership, report
/// unimplementable modes as not-supported, and never block indefinitely.
pub trait GpioBackend: Send {
    /// Configure the electrical mode of `pin`.
    fn set_mode(&mut self, pin: u16, mode: PinMode) -> i32;

    /// Configure the idle-state bias resistor of `pin`.
    fn set_pud(&mut self, pin: u16, pud: PinPud) -> i32;

    /// Read the logic level of `pin`. Returns `(level, status)`; the level
    /// is only meaningful when the status is [`crate::status::OK`].
    fn read(&mut self, pin: u16) -> (u8, i32);

    /// Drive `pin` to the given logic level (nonzero = high).
    fn write(&mut self, pin: u16, level: u8) -> i32;

    /// Configure PWM output on `pin`.
    fn set_pwm(&mut self, pin: u16, frequency: u32, range: u32, duty: u32) -> i32;

    /// Return `pin` to its power-on state (input, floating).
    fn deinit(&mut self, pin: u16) -> i32;
}
