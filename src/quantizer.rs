//! The pitch quantizer is an external collaborator: the firmware supplies an implementation backed by its
//! scale tables, and each output slot owns one instance. The scale table is only ever consulted through
//! the quantizer, so the two capabilities share a single seam.

/// The input span every output slot configures its quantizer with: the full 16-bit register range.
pub const FULL_INPUT_RANGE: u16 = 0xFFFF;

/// The scale index every output slot starts out on. The scale table is assumed to contain at least this
/// many entries.
pub const DEFAULT_SCALE: u8 = 5;

/// A pitch quantizer backed by a table of musical scales.
///
/// `lookup` takes `&mut self` because real quantizer implementations keep hysteresis state between
/// lookups to avoid flutter at scale-step boundaries.
pub trait Quantizer {
    /// The number of scales in the backing table.
    fn scale_count(&self) -> u8;

    /// Reconfigure the quantizer for the given scale over the given input span.
    fn configure(&mut self, scale_index: u8, input_range: u16);

    /// Map a note index (0-127) to a pitch value for the CV output.
    fn lookup(&mut self, note_index: u8) -> i32;
}
