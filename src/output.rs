use crate::configuration::OutputType;
use crate::io::{CvGateOutput, MidiOutput};
use crate::quantizer::{DEFAULT_SCALE, FULL_INPUT_RANGE, Quantizer};
use wmidi::{Channel, ControlFunction, Note, U7};

/// The number of output slots on the device, one per physical DAC/gate channel.
pub const OUTPUT_SLOT_COUNT: usize = 4;

const LAST_CHANNEL: u8 = OUTPUT_SLOT_COUNT as u8 - 1;

/// Note types narrower than 7 bits are centered so that their middle value lands near the device's
/// conventional middle C. The CV path centers on 64 while the MIDI path centers on 60 (MIDI middle C);
/// the two domains have always disagreed by four semitones, and unifying them would change sounding
/// pitch on one path, so both offsets are kept.
const CV_NOTE_SHIFT: i32 = 64;
const MIDI_NOTE_SHIFT: i32 = 60;

/// Fixed velocity for every note-on the engine emits.
const NOTE_ON_VELOCITY: U7 = U7::from_u8_lossy(0x60);

/// A velocity-0 note-on is the running-status shortcut for note-off.
const NOTE_OFF_VELOCITY: U7 = U7::from_u8_lossy(0);

/// One output slot of the device: the configuration and transient voicing state behind a single physical
/// output channel.
///
/// A slot consumes the sequencer's raw register once per tick on each of two independent paths —
/// [`send_to_dac`](Self::send_to_dac) for the analog domain and [`send_to_midi`](Self::send_to_midi) for
/// the MIDI domain — and interprets it according to its configured [`OutputType`].
///
/// A slot is monophonic. When it is bound to a MIDI channel it owns at most one sounding note
/// (`last_note`); when it is not bound, the notes it computes are parked in `deferred_note` for a paired
/// trigger slot on the same track to voice. The pairing collaborator moves the pending note between
/// slots with [`take_deferred_note`](Self::take_deferred_note) and
/// [`set_deferred_note`](Self::set_deferred_note) between ticks.
pub struct OutputSlot<Q> {
    /// Physical DAC/gate channel (0-3).
    output: u8,
    /// Logical track identity (0-3), used by the pairing collaborator to associate a note-producing slot
    /// with a gate/trigger-producing slot. Independent of `output`.
    track: u8,
    output_type: OutputType,
    /// Index into the quantizer's scale table.
    scale: u8,
    /// `None` means MIDI is disabled for this slot.
    midi_channel: Option<Channel>,
    /// The note currently sounding via this slot's own note-on, if any.
    last_note: Option<Note>,
    /// A note received from a paired slot but not yet voiced.
    deferred_note: Option<Note>,
    quantizer: Q,
}

impl<Q: Quantizer> OutputSlot<Q> {
    /// Construct the slot behind a physical output channel.
    ///
    /// The slot starts on the default scale with MIDI disabled, its track matching its channel, and a
    /// default output type chosen per channel so a freshly initialized device produces a useful spread:
    /// pitch on 0, modulation on 1, trigger on 2, gate on 3.
    pub fn new(channel_index: u8, mut quantizer: Q) -> Self {
        let channel_index = channel_index.min(LAST_CHANNEL);
        quantizer.configure(DEFAULT_SCALE, FULL_INPUT_RANGE);

        let output_type = match channel_index {
            0 => OutputType::Note5,
            1 => OutputType::Modulation,
            2 => OutputType::Trigger,
            _ => OutputType::Gate,
        };

        Self {
            output: channel_index,
            track: channel_index,
            output_type,
            scale: DEFAULT_SCALE,
            midi_channel: None,
            last_note: None,
            deferred_note: None,
            quantizer,
        }
    }

    /// The physical DAC/gate channel this slot drives.
    pub fn output(&self) -> u8 {
        self.output
    }

    /// The logical track this slot belongs to.
    pub fn track(&self) -> u8 {
        self.track
    }

    /// How this slot interprets the register.
    pub fn output_type(&self) -> OutputType {
        self.output_type
    }

    /// The current scale index.
    pub fn scale(&self) -> u8 {
        self.scale
    }

    /// The bound MIDI channel, or `None` when MIDI is disabled for this slot.
    pub fn midi_channel(&self) -> Option<Channel> {
        self.midi_channel
    }

    /// The note currently sounding via this slot's own note-on, if any.
    pub fn last_note(&self) -> Option<Note> {
        self.last_note
    }

    /// The note parked for a paired slot to voice, if any.
    pub fn deferred_note(&self) -> Option<Note> {
        self.deferred_note
    }

    /// Park a note for this slot to voice on its next trigger. Called by the track-pairing collaborator.
    pub fn set_deferred_note(&mut self, note: Option<Note>) {
        self.deferred_note = note;
    }

    /// Read and clear the parked note in one step. Together with
    /// [`set_deferred_note`](Self::set_deferred_note) this forms the cross-slot hand-off performed by the
    /// track-pairing collaborator between ticks.
    pub fn take_deferred_note(&mut self) -> Option<Note> {
        self.deferred_note.take()
    }

    /// Reassign the physical output channel, clamped to the valid range.
    pub fn set_output(&mut self, output: u8) {
        self.output = output.min(LAST_CHANNEL);
    }

    /// Reassign the logical track, clamped to the valid range.
    pub fn set_track(&mut self, track: u8) {
        self.track = track.min(LAST_CHANNEL);
    }

    /// Select the output type from a raw selector value, clamped to the valid variant range.
    pub fn set_output_type(&mut self, output_type: u8) {
        self.output_type = OutputType::from_index_clamped(output_type);
    }

    /// Select a scale, clamped to the table, and reconfigure the quantizer for it over the full register
    /// range so the next lookup already reflects the new scale.
    pub fn set_scale(&mut self, scale: u8) {
        self.scale = scale.min(self.quantizer.scale_count().saturating_sub(1));
        self.quantizer.configure(self.scale, FULL_INPUT_RANGE);
    }

    /// Bind a MIDI channel by number (1-16), or disable MIDI for this slot with 0. Out-of-range values
    /// are clamped.
    pub fn set_midi_channel(&mut self, channel: u8) {
        self.midi_channel = match channel.min(16) {
            0 => None,
            number => Some(
                Channel::from_index(number - 1)
                    .expect("channel numbers 1-16 should map to a MIDI channel"),
            ),
        };
    }

    /// Dispatch one tick's register value to the analog output.
    ///
    /// `transpose` is in quantizer pitch units and is added after quantization.
    pub fn send_to_dac<S: CvGateOutput>(&mut self, sink: &mut S, reg: u16, transpose: i32) {
        match self.output_type {
            OutputType::Note3
            | OutputType::Note4
            | OutputType::Note5
            | OutputType::Note6
            | OutputType::Note7 => {
                let note_index = self.note_index(reg, CV_NOTE_SHIFT, 0);
                let pitch = self.quantizer.lookup(note_index);
                sink.write_cv(self.output, pitch + transpose);
            }
            OutputType::Modulation | OutputType::Expression => {
                sink.write_cv(self.output, i32::from(reg & 0x00FF) * 6);
            }
            OutputType::Trigger => {
                if reg & 0x0001 != 0 {
                    sink.clock_out(self.output);
                }
            }
            OutputType::Gate => {
                sink.gate_out(self.output, reg & 0x0001 != 0);
            }
        }
    }

    /// Dispatch one tick's register value to the MIDI output.
    ///
    /// Runs independently of, and in addition to, [`send_to_dac`](Self::send_to_dac). On the MIDI path
    /// `transpose` contributes whole semitones only, as `transpose / 128` added to the note index before
    /// clamping.
    pub fn send_to_midi<S: MidiOutput>(&mut self, sink: &mut S, reg: u16, transpose: i32) {
        match self.output_type {
            OutputType::Note3
            | OutputType::Note4
            | OutputType::Note5
            | OutputType::Note6
            | OutputType::Note7 => {
                let note = Note::from_u8_lossy(self.note_index(reg, MIDI_NOTE_SHIFT, transpose / 128));
                match self.midi_channel {
                    Some(channel) => {
                        if let Some(last) = self.last_note {
                            sink.send_note_on(channel, last, NOTE_OFF_VELOCITY);
                        }
                        sink.send_note_on(channel, note, NOTE_ON_VELOCITY);
                        self.last_note = Some(note);
                        #[cfg(feature = "defmt")]
                        defmt::info!(
                            "Note-on: channel {}, note {}",
                            channel.number(),
                            note.to_str()
                        );
                    }
                    // No channel to speak on: park the note for the paired trigger slot on this track.
                    None => self.deferred_note = Some(note),
                }
            }
            OutputType::Modulation => {
                if let Some(channel) = self.midi_channel {
                    sink.send_control_change(
                        channel,
                        ControlFunction::MODULATION_WHEEL,
                        Self::control_value(reg),
                    );
                }
            }
            OutputType::Expression => {
                if let Some(channel) = self.midi_channel {
                    sink.send_control_change(
                        channel,
                        ControlFunction::EXPRESSION_CONTROLLER,
                        Self::control_value(reg),
                    );
                }
            }
            OutputType::Trigger => {
                if let (Some(channel), Some(note)) = (self.midi_channel, self.deferred_note) {
                    if reg & 0x0001 != 0 {
                        if let Some(last) = self.last_note {
                            sink.send_note_on(channel, last, NOTE_OFF_VELOCITY);
                        }
                        sink.send_note_on(channel, note, NOTE_ON_VELOCITY);
                        self.last_note = Some(note);
                        self.deferred_note = None;
                        #[cfg(feature = "defmt")]
                        defmt::info!(
                            "Voiced deferred note: channel {}, note {}",
                            channel.number(),
                            note.to_str()
                        );
                    }
                }
            }
            // Only Trigger voices a deferred note. A gate output expresses "note held" on the analog
            // side but never takes over the note identity of its paired slot.
            OutputType::Gate => {}
        }
    }

    /// Release this slot's sounding note and drop any parked one. Invoked on applet exit or pattern
    /// stop. A no-op when no note is held, so calling it repeatedly emits at most one release.
    pub fn note_off<S: MidiOutput>(&mut self, sink: &mut S) {
        if let Some(channel) = self.midi_channel {
            if let Some(last) = self.last_note {
                sink.send_note_on(channel, last, NOTE_OFF_VELOCITY);
                #[cfg(feature = "defmt")]
                defmt::info!(
                    "Note-off: channel {}, note {}",
                    channel.number(),
                    last.to_str()
                );
            }
            self.last_note = None;
            self.deferred_note = None;
        }
    }

    /// The low register byte folded into the 7-bit MIDI controller range.
    fn control_value(reg: u16) -> U7 {
        U7::from_u8_lossy(((reg & 0x00FF) >> 1) as u8)
    }

    /// Decode the note index from the register: mask the type's low bits, center narrow types on the
    /// path's middle-C shift, apply any pre-quantization offset, and clamp to the MIDI note range.
    fn note_index(&self, reg: u16, wide_shift: i32, offset: i32) -> u8 {
        let mask = self
            .output_type
            .register_mask()
            .expect("note_index should only be called for note output types");
        let shift = if self.output_type == OutputType::Note7 {
            0
        } else {
            wide_shift
        };
        (i32::from(reg & mask) + shift + offset).clamp(0, 127) as u8
    }
}

#[cfg(feature = "defmt")]
impl<Q> defmt::Format for OutputSlot<Q> {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "OutputSlot {{ output: {}, track: {}, output_type: {}, scale: {}, midi_channel: {}, last_note: {}, deferred_note: {} }}",
            self.output,
            self.track,
            self.output_type,
            self.scale,
            self.midi_channel.map(|c| c.number()),
            self.last_note.map(u8::from),
            self.deferred_note.map(u8::from),
        )
    }
}
