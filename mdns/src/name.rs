use crate::error::{DecodeError, EncodeError};
use crate::utils::byte_at;
use std::io::Cursor;

const POINTER_MARK: u8 = 0xC0;

pub const MAX_LABEL_LEN: usize = 63;

/// Upper bound on compression pointers followed while reading one name.
pub const MAX_POINTER_HOPS: usize = 64;

/// How the two bytes of a compression pointer are turned into an offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerOffsets {
    /// `(first - 0xC0) * 256 + second`, the 14-bit offset of RFC 1035.
    Full,
    /// Only the second byte, so targets beyond offset 255 are unreachable.
    LowByte,
}

impl PointerOffsets {
    fn target(self, first: u8, second: u8) -> usize {
        match self {
            PointerOffsets::Full => usize::from(first - POINTER_MARK) * 256 + usize::from(second),
            PointerOffsets::LowByte => usize::from(second),
        }
    }
}

/// Selects the pointer arithmetic used for each kind of name in a message.
///
/// `Legacy` matches the long-standing decoder behaviour: question names and
/// PTR record data only look at the low pointer byte, while record owner
/// names use the full 14-bit offset. `Absolute` uses the full offset
/// everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerMode {
    Legacy,
    Absolute,
}

impl Default for PointerMode {
    fn default() -> Self {
        PointerMode::Legacy
    }
}

impl PointerMode {
    pub fn question_offsets(self) -> PointerOffsets {
        match self {
            PointerMode::Legacy => PointerOffsets::LowByte,
            PointerMode::Absolute => PointerOffsets::Full,
        }
    }

    pub fn record_offsets(self) -> PointerOffsets {
        PointerOffsets::Full
    }

    pub fn record_data_offsets(self) -> PointerOffsets {
        self.question_offsets()
    }
}

fn is_pointer(b: u8) -> bool {
    b & POINTER_MARK == POINTER_MARK
}

/// Reads a possibly compressed name starting at the cursor position, as text.
///
/// Same as [`read_name_bytes`], with label bytes that are not UTF-8 replaced.
pub fn read_name(rdr: &mut Cursor<&[u8]>, offsets: PointerOffsets) -> Result<String, DecodeError> {
    let name = read_name_bytes(rdr, offsets)?;
    Ok(String::from_utf8_lossy(&name).into_owned())
}

/// Reads a possibly compressed name starting at the cursor position.
///
/// Labels are joined with `.` and their bytes are copied unchanged. On
/// return the cursor sits just past the terminating zero, or, when a pointer
/// was followed, just past the first pointer in the original byte stream.
/// Every pointer must point strictly backwards, and at most
/// [`MAX_POINTER_HOPS`] are followed.
pub fn read_name_bytes(rdr: &mut Cursor<&[u8]>, offsets: PointerOffsets) -> Result<Vec<u8>, DecodeError> {
    let buf: &[u8] = *rdr.get_ref();
    let start = rdr.position() as usize;

    let mut pos = start;
    let mut name: Vec<u8> = Vec::new();
    let mut label_remaining: u8 = 0;
    let mut resume_at: Option<usize> = None;
    let mut hops = 0;

    loop {
        let b = byte_at(buf, pos)?;
        if b == 0 {
            break;
        }

        if label_remaining == 0 {
            let mut len = b;
            while is_pointer(len) {
                let target = offsets.target(len, byte_at(buf, pos + 1)?);
                if target >= pos {
                    return Err(DecodeError::ForwardPointer { at: pos, target });
                }

                hops += 1;
                if hops > MAX_POINTER_HOPS {
                    return Err(DecodeError::PointerLoop { start });
                }

                resume_at.get_or_insert(pos);
                pos = target;
                len = byte_at(buf, pos)?;
            }

            // A pointer straight at a root label ends the name.
            if len == 0 {
                break;
            }
            label_remaining = len;
        } else {
            name.push(b);
            label_remaining -= 1;
            if label_remaining == 0 {
                name.push(b'.');
            }
        }

        pos += 1;
    }

    let end = match resume_at {
        Some(pointer) => pointer + 2,
        None => pos + 1,
    };
    rdr.set_position(end as u64);

    if name.last() == Some(&b'.') {
        name.pop();
    }

    Ok(name)
}

/// Encodes a dotted name as plain length-prefixed labels. Pointers are never
/// written. A single trailing dot is accepted.
pub fn domain_to_qname(domain: &str) -> Result<Vec<u8>, EncodeError> {
    let mut qname: Vec<u8> = Vec::with_capacity(domain.len() + 2);

    let trimmed = domain.strip_suffix('.').unwrap_or(domain);
    if !trimmed.is_empty() {
        for label in trimmed.split('.') {
            if label.is_empty() {
                return Err(EncodeError::EmptyLabel {
                    name: domain.to_string(),
                });
            }
            if label.len() > MAX_LABEL_LEN {
                return Err(EncodeError::LabelTooLong {
                    label: label.to_string(),
                });
            }

            qname.push(label.len() as u8);
            qname.extend_from_slice(label.as_bytes());
        }
    }

    qname.push(0);

    Ok(qname)
}
