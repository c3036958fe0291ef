//! This crate contains the architecture-agnostic output engine for a modular shift-register sequencer:
//! the component that turns the raw multi-bit register produced by the sequencing engine into musically
//! meaningful signals. Depending on how an output is configured, the same register value becomes a
//! quantized pitch on a CV channel, a modulation level, a trigger/gate pulse, or a MIDI message, while a
//! single coherent note identity is maintained across the analog and MIDI domains.
//!
//! The surrounding firmware — the applet scheduler, the USB/MIDI transport, the DAC and gate drivers, and
//! the pitch quantizer with its scale tables — lives outside this crate and plugs in through the traits in
//! [`io`] and [`quantizer`]. The engine itself never blocks: every dispatch is a bounded computation over
//! fixed-width integers, invoked once per tick per active output from a single control-loop context.

#![deny(missing_docs)]
#![no_std]

pub mod configuration;

pub mod io;

/// The output slot itself: configuration, note state, and the two dispatch paths.
pub mod output;

pub mod quantizer;
