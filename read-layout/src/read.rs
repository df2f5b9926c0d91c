//! Traits for interpreting table data.

#![deny(clippy::arithmetic_side_effects)]

use types::{Offset, Tag};

use crate::font_data::FontData;

/// A type that can be read from raw table data.
///
/// In the case of a table, the `read` method is responsible for ensuring the
/// input data is consistent: that any versioned fields are present as
/// required by the version, and that any array lengths are not
/// out-of-bounds.
pub trait FontRead<'a>: Sized {
    /// Read an instance of `Self` from the provided data, performing
    /// validation.
    fn read(data: FontData<'a>) -> Result<Self, ReadError>;
}

/// A trait for resolving offsets against the data of the containing table.
pub trait ResolveOffset {
    /// Resolve the offset, returning an error if it is null or out of
    /// bounds.
    fn resolve<'a, T: FontRead<'a>>(&self, data: FontData<'a>) -> Result<T, ReadError>;

    /// Resolve the offset, treating a null offset as the absence of the
    /// referenced table.
    fn resolve_nullable<'a, T: FontRead<'a>>(
        &self,
        data: FontData<'a>,
    ) -> Option<Result<T, ReadError>>;
}

impl<O: Offset> ResolveOffset for O {
    fn resolve<'a, T: FontRead<'a>>(&self, data: FontData<'a>) -> Result<T, ReadError> {
        match self.resolve_nullable(data) {
            Some(x) => x,
            None => Err(ReadError::NullOffset),
        }
    }

    fn resolve_nullable<'a, T: FontRead<'a>>(
        &self,
        data: FontData<'a>,
    ) -> Option<Result<T, ReadError>> {
        let pos = self.non_null()?;
        Some(
            data.split_off(pos)
                .ok_or(ReadError::OutOfBounds)
                .and_then(T::read),
        )
    }
}

/// An error that occurs when reading table data.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadError {
    OutOfBounds,
    // i64 is flexible enough to store any value we might encounter
    InvalidFormat(i64),
    InvalidArrayLen,
    NullOffset,
    TableIsMissing(Tag),
    MalformedData(&'static str),
}

impl std::fmt::Display for ReadError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ReadError::OutOfBounds => write!(f, "An offset was out of bounds"),
            ReadError::InvalidFormat(x) => write!(f, "Invalid format '{x}'"),
            ReadError::InvalidArrayLen => {
                write!(f, "Specified array length not a multiple of item size")
            }
            ReadError::NullOffset => write!(f, "An offset was unexpectedly null"),
            ReadError::TableIsMissing(tag) => write!(f, "the {tag} table is missing"),
            ReadError::MalformedData(msg) => write!(f, "Malformed data: '{msg}'"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ReadError {}
