use std::fmt;
use std::io;
use thiserror::Error;

use crate::name::MAX_POINTER_HOPS;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("message truncated: needed {needed} byte(s) at offset {offset}, buffer holds {len}")]
    Truncated {
        offset: usize,
        needed: usize,
        len: usize,
    },

    #[error("compression pointer at offset {at} targets offset {target}, which is not before it")]
    ForwardPointer { at: usize, target: usize },

    #[error("name starting at offset {start} follows more than {} compression pointers", MAX_POINTER_HOPS)]
    PointerLoop { start: usize },
}

impl DecodeError {
    pub(crate) fn truncated(offset: usize, needed: usize, len: usize) -> Self {
        DecodeError::Truncated {
            offset,
            needed,
            len,
        }
    }

    // byteorder reports a short read as UnexpectedEof without saying where.
    pub(crate) fn from_short_read(err: io::Error, offset: u64, needed: usize, len: usize) -> Self {
        debug_assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
        DecodeError::truncated(offset as usize, needed, len)
    }
}

/// The record sections that have no wire writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Answer,
    Authority,
    Additional,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Section::Answer => "answer",
            Section::Authority => "authority",
            Section::Additional => "additional",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("{section} section holds {count} record(s); only questions can be encoded")]
    UnsupportedSection { section: Section, count: usize },

    #[error("label `{label}` is {} bytes long, the limit is 63", .label.len())]
    LabelTooLong { label: String },

    #[error("name `{name}` contains an empty label")]
    EmptyLabel { name: String },
}
