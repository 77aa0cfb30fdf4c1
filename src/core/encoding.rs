//! Tagged integer surrogates for dictionary-encoded terms

use std::fmt;

use crate::error::{Result, StoreError};

/// Integer surrogate for a term, minted by a term dictionary.
///
/// The high bit partitions the code space: with the bit clear the remaining
/// bits are a plain-term index (sequential from 0), with the bit set they are a
/// 1-based index into the quoted triple table. The two ranges never overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Code(u32);

impl Code {
    /// Tag bit marking a quoted triple code.
    pub const QUOTED_TAG: u32 = 1 << 31;

    /// Wrap a plain-term index. `None` if the index reaches into the tagged range.
    pub fn plain(index: u32) -> Option<Code> {
        if index & Self::QUOTED_TAG == 0 {
            Some(Code(index))
        } else {
            None
        }
    }

    /// Like [`Code::plain`], but reports exhaustion as an error.
    pub fn try_plain(index: u32) -> Result<Code> {
        Self::plain(index).ok_or(StoreError::CodeSpaceExhausted(index))
    }

    /// Code for the quoted triple stored at `position` (1-based) in the quoted table.
    pub(crate) fn quoted(position: usize) -> Result<Code> {
        match u32::try_from(position) {
            Ok(position) if position != 0 && position & Self::QUOTED_TAG == 0 => {
                Ok(Code(Self::QUOTED_TAG | position))
            }
            _ => Err(StoreError::CodeSpaceExhausted(Self::QUOTED_TAG)),
        }
    }

    pub fn is_quoted(self) -> bool {
        self.0 & Self::QUOTED_TAG != 0
    }

    /// Index into the plain term table, if this is a plain code.
    pub fn plain_index(self) -> Option<u32> {
        (!self.is_quoted()).then_some(self.0)
    }

    /// 1-based position in the quoted triple table, if this is a quoted code.
    pub fn quoted_position(self) -> Option<usize> {
        self.is_quoted().then_some((self.0 & !Self::QUOTED_TAG) as usize)
    }

    /// Raw bit pattern, tag included.
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.quoted_position() {
            Some(position) => write!(f, "quoted:{}", position),
            None => write!(f, "{}", self.0),
        }
    }
}
