//! This module provides traits for the output engine's two hardware seams: the analog CV/gate driver and
//! the MIDI transport. The firmware implements both; the engine only ever issues single, non-blocking
//! writes through them.

use wmidi::{Channel, ControlFunction, Note, U7};

/// A trait for driving the device's analog outputs.
///
/// Channel indices are physical DAC/gate channels (0-3). Implementations are assumed always available;
/// none of these operations can fail or block.
pub trait CvGateOutput {
    /// Write a pitch or level value to a CV channel.
    fn write_cv(&mut self, channel: u8, value: i32);

    /// Emit a single momentary pulse on a channel.
    fn clock_out(&mut self, channel: u8);

    /// Drive a channel's gate line high or low. The line holds its level until the next write.
    fn gate_out(&mut self, channel: u8, high: bool);
}

/// A trait for sending MIDI traffic.
///
/// There is deliberately no note-off operation: the engine models note-off as a velocity-0 note-on, the
/// running-status shortcut, so a single `send_note_on` covers the whole note lifecycle.
pub trait MidiOutput {
    /// Send a note-on message. Velocity 0 releases the note.
    fn send_note_on(&mut self, channel: Channel, note: Note, velocity: U7);

    /// Send a control change message.
    fn send_control_change(&mut self, channel: Channel, control: ControlFunction, value: U7);
}
