use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive;

/// Determines how an output slot interprets the sequencer's register on each tick.
///
/// The five note variants differ only in how many low bits of the register form the note index; the
/// remaining variants reinterpret the register as a continuous level (`Modulation`, `Expression`) or as a
/// timing signal read from bit 0 (`Trigger`, `Gate`). `Modulation` and `Expression` are identical on the
/// CV path and diverge only in which MIDI controller they drive.
#[derive(Debug, Clone, Copy, ToPrimitive, FromPrimitive, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputType {
    /// Quantized pitch from the 3 low bits of the register.
    Note3,
    /// Quantized pitch from the 4 low bits of the register.
    Note4,
    /// Quantized pitch from the 5 low bits of the register.
    Note5,
    /// Quantized pitch from the 6 low bits of the register.
    Note6,
    /// Quantized pitch from the 7 low bits of the register.
    Note7,
    /// Continuous level from the 8 low bits of the register; CC 1 (mod wheel) on the MIDI path.
    Modulation,
    /// Continuous level from the 8 low bits of the register; CC 11 (expression) on the MIDI path.
    Expression,
    /// A momentary pulse whenever bit 0 of the register is high.
    Trigger,
    /// A level signal following bit 0 of the register, held until the next tick changes it.
    Gate,
}

impl super::CycleConfig for OutputType {}

impl OutputType {
    /// Clamp a raw selector value to the valid variant range.
    ///
    /// Configuration originates from a bounded physical control, so out-of-range values are nudged to the
    /// nearest variant rather than rejected.
    pub fn from_index_clamped(value: u8) -> Self {
        <Self as FromPrimitive>::from_u8(value.min(Self::Gate as u8))
            .expect("clamped selector value should map to a variant")
    }

    /// The number of low register bits that form the note index, for the note family of variants.
    pub const fn note_bits(self) -> Option<u8> {
        match self {
            Self::Note3 => Some(3),
            Self::Note4 => Some(4),
            Self::Note5 => Some(5),
            Self::Note6 => Some(6),
            Self::Note7 => Some(7),
            _ => None,
        }
    }

    /// A mask selecting exactly [`note_bits`](Self::note_bits) low bits of the register.
    pub const fn register_mask(self) -> Option<u16> {
        match self.note_bits() {
            Some(bits) => Some((1u16 << bits) - 1),
            None => None,
        }
    }

    /// The full label shown in configuration menus.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Note3 => "Note 3-Bit",
            Self::Note4 => "Note 4-Bit",
            Self::Note5 => "Note 5-Bit",
            Self::Note6 => "Note 6-Bit",
            Self::Note7 => "Note 7-Bit",
            Self::Modulation => "Modulation",
            Self::Expression => "Expression",
            Self::Trigger => "Trigger",
            Self::Gate => "Gate",
        }
    }

    /// The abbreviated label used where screen space is tight.
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::Note3 => "Note-3",
            Self::Note4 => "Note-4",
            Self::Note5 => "Note-5",
            Self::Note6 => "Note-6",
            Self::Note7 => "Note-7",
            Self::Modulation => "Mod",
            Self::Expression => "Expr",
            Self::Trigger => "Trigger",
            Self::Gate => "Gate",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_select_exactly_the_documented_bit_widths() {
        assert_eq!(Some(0x0007), OutputType::Note3.register_mask());
        assert_eq!(Some(0x000F), OutputType::Note4.register_mask());
        assert_eq!(Some(0x001F), OutputType::Note5.register_mask());
        assert_eq!(Some(0x003F), OutputType::Note6.register_mask());
        assert_eq!(Some(0x007F), OutputType::Note7.register_mask());
    }

    #[test]
    fn bit_width_is_monotonic_across_the_note_family() {
        let family = [
            OutputType::Note3,
            OutputType::Note4,
            OutputType::Note5,
            OutputType::Note6,
            OutputType::Note7,
        ];
        for (n, variant) in family.into_iter().enumerate() {
            assert_eq!(
                Some(n as u8 + 3),
                variant.note_bits(),
                "Bit width should be variant index + 3; expected left but got right"
            );
        }
    }

    #[test]
    fn non_note_types_have_no_note_bits() {
        for variant in [
            OutputType::Modulation,
            OutputType::Expression,
            OutputType::Trigger,
            OutputType::Gate,
        ] {
            assert_eq!(None, variant.note_bits());
            assert_eq!(None, variant.register_mask());
        }
    }

    #[test]
    fn out_of_range_selector_values_clamp_to_the_last_variant() {
        assert_eq!(OutputType::Note3, OutputType::from_index_clamped(0));
        assert_eq!(OutputType::Gate, OutputType::from_index_clamped(8));
        assert_eq!(OutputType::Gate, OutputType::from_index_clamped(99));
    }

    #[test]
    fn labels() {
        assert_eq!("Note 5-Bit", OutputType::Note5.name());
        assert_eq!("Note-5", OutputType::Note5.short_name());
        assert_eq!("Modulation", OutputType::Modulation.name());
        assert_eq!("Mod", OutputType::Modulation.short_name());
    }
}
