//! A GPOS ValueRecord.

use types::{BigEndian, FixedSize};

use crate::{FontData, ReadError};

/// The [ValueFormat](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#value-record) flags.
///
/// Each set bit adds one uint16 field to the value records governed by the
/// format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ValueFormat(u16);

impl ValueFormat {
    pub const X_PLACEMENT: Self = ValueFormat(0x0001);
    pub const Y_PLACEMENT: Self = ValueFormat(0x0002);
    pub const X_ADVANCE: Self = ValueFormat(0x0004);
    pub const Y_ADVANCE: Self = ValueFormat(0x0008);
    pub const X_PLACEMENT_DEVICE: Self = ValueFormat(0x0010);
    pub const Y_PLACEMENT_DEVICE: Self = ValueFormat(0x0020);
    pub const X_ADVANCE_DEVICE: Self = ValueFormat(0x0040);
    pub const Y_ADVANCE_DEVICE: Self = ValueFormat(0x0080);

    /// The raw bits.
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Construct from raw bits.
    pub const fn from_bits(bits: u16) -> Self {
        ValueFormat(bits)
    }

    /// `true` if all the bits of `other` are set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Return the number of bytes required to store a [`ValueRecord`] in
    /// this format.
    #[inline]
    pub fn record_byte_len(self) -> usize {
        self.0.count_ones() as usize * u16::RAW_BYTE_LEN
    }
}

impl types::Scalar for ValueFormat {
    type Raw = <u16 as types::Scalar>::Raw;

    fn to_raw(self) -> Self::Raw {
        self.0.to_raw()
    }

    fn from_raw(raw: Self::Raw) -> Self {
        Self(<u16>::from_raw(raw))
    }
}

impl types::FixedSize for ValueFormat {
    const RAW_BYTE_LEN: usize = u16::RAW_BYTE_LEN;
}

/// A positioning ValueRecord.
///
/// The wire layout depends on the value format of the enclosing subtable,
/// so these are parsed manually. The device/variation-index fields are
/// skipped over but not retained; this engine positions at design units.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ValueRecord {
    x_placement: Option<BigEndian<i16>>,
    y_placement: Option<BigEndian<i16>>,
    x_advance: Option<BigEndian<i16>>,
    y_advance: Option<BigEndian<i16>>,
}

impl ValueRecord {
    /// Read a record in the given format from the start of `data`.
    pub fn read(data: FontData, format: ValueFormat) -> Result<Self, ReadError> {
        let mut this = ValueRecord::default();
        let mut cursor = data.cursor();

        if format.contains(ValueFormat::X_PLACEMENT) {
            this.x_placement = Some(cursor.read_be()?);
        }
        if format.contains(ValueFormat::Y_PLACEMENT) {
            this.y_placement = Some(cursor.read_be()?);
        }
        if format.contains(ValueFormat::X_ADVANCE) {
            this.x_advance = Some(cursor.read_be()?);
        }
        if format.contains(ValueFormat::Y_ADVANCE) {
            this.y_advance = Some(cursor.read_be()?);
        }
        for device in [
            ValueFormat::X_PLACEMENT_DEVICE,
            ValueFormat::Y_PLACEMENT_DEVICE,
            ValueFormat::X_ADVANCE_DEVICE,
            ValueFormat::Y_ADVANCE_DEVICE,
        ] {
            if format.contains(device) {
                let _offset: u16 = cursor.read()?;
            }
        }
        Ok(this)
    }

    /// Horizontal adjustment for placement, in design units.
    pub fn x_placement(&self) -> i16 {
        self.x_placement.map(|val| val.get()).unwrap_or_default()
    }

    /// Vertical adjustment for placement, in design units.
    pub fn y_placement(&self) -> i16 {
        self.y_placement.map(|val| val.get()).unwrap_or_default()
    }

    /// Horizontal adjustment for advance, in design units.
    pub fn x_advance(&self) -> i16 {
        self.x_advance.map(|val| val.get()).unwrap_or_default()
    }

    /// Vertical adjustment for advance, in design units.
    pub fn y_advance(&self) -> i16 {
        self.y_advance.map(|val| val.get()).unwrap_or_default()
    }
}

impl std::fmt::Debug for ValueRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut f = f.debug_struct("ValueRecord");
        self.x_placement.map(|x| f.field("x_placement", &x));
        self.y_placement.map(|y| f.field("y_placement", &y));
        self.x_advance.map(|x| f.field("x_advance", &x));
        self.y_advance.map(|y| f.field("y_advance", &y));
        f.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_byte_len() {
        assert_eq!(ValueFormat::from_bits(0x0000).record_byte_len(), 0);
        assert_eq!(ValueFormat::X_ADVANCE.record_byte_len(), 2);
        assert_eq!(ValueFormat::from_bits(0x00FF).record_byte_len(), 16);
    }

    #[test]
    fn read_with_device_fields_skipped() {
        let format = ValueFormat::from_bits(0x0015); // x placement, x advance, x placement device
        let buf = layout_test_data::BeBuffer::new()
            .push(-10i16)
            .push(120i16)
            .push(0u16);
        let record = ValueRecord::read(FontData::new(buf.data()), format).unwrap();
        assert_eq!(record.x_placement(), -10);
        assert_eq!(record.x_advance(), 120);
        assert_eq!(record.y_placement(), 0);
    }
}
