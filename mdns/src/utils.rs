use crate::error::DecodeError;
use byteorder::{ReadBytesExt, BE};
use std::io::{Cursor, Read};

// Big-endian reads over the message cursor. A failed read on a `Cursor` may
// move the position, so the offset is taken beforehand for the error.

pub fn read_u16(rdr: &mut Cursor<&[u8]>) -> Result<u16, DecodeError> {
    let offset = rdr.position();
    let len = rdr.get_ref().len();
    rdr.read_u16::<BE>()
        .map_err(|e| DecodeError::from_short_read(e, offset, 2, len))
}

pub fn skip(rdr: &mut Cursor<&[u8]>, count: usize) -> Result<(), DecodeError> {
    let offset = rdr.position();
    let len = rdr.get_ref().len();
    let end = offset as usize + count;
    if end > len {
        return Err(DecodeError::truncated(offset as usize, count, len));
    }
    rdr.set_position(end as u64);

    Ok(())
}

pub fn read_bytes(rdr: &mut Cursor<&[u8]>, count: usize) -> Result<Vec<u8>, DecodeError> {
    let offset = rdr.position();
    let len = rdr.get_ref().len();
    let mut buf = vec![0; count];
    rdr.read_exact(&mut buf)
        .map_err(|e| DecodeError::from_short_read(e, offset, count, len))?;

    Ok(buf)
}

pub fn byte_at(buf: &[u8], offset: usize) -> Result<u8, DecodeError> {
    buf.get(offset)
        .copied()
        .ok_or_else(|| DecodeError::truncated(offset, 1, buf.len()))
}
