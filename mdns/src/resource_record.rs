use crate::error::DecodeError;
use crate::name::{read_name, read_name_bytes, PointerMode};
use crate::utils::{read_bytes, read_u16, skip};
use std::io::Cursor;

pub const TYPE_PTR: u16 = 12;

/// Stored in place of the wire TTL, which the decoder skips.
pub const PLACEHOLDER_TTL: u32 = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub name: String,
    pub qtype: u16,
    pub qclass: u16,
    pub ttl: u32,
    /// Raw RDATA, except for PTR records where it holds the bytes of the
    /// decompressed target name. An empty PTR RDATA stays empty.
    pub data: Vec<u8>,
}

impl ResourceRecord {
    pub fn parse_from_reader(rdr: &mut Cursor<&[u8]>, mode: PointerMode) -> Result<Self, DecodeError> {
        let name = read_name(rdr, mode.record_offsets())?;
        let qtype = read_u16(rdr)?;
        let qclass = read_u16(rdr)?;
        skip(rdr, 4)?;
        let rdlength = read_u16(rdr)?;

        let rdata_start = rdr.position();
        let rdata = read_bytes(rdr, rdlength as usize)?;
        let rdata_end = rdr.position();

        let data = if qtype == TYPE_PTR && rdlength > 0 {
            rdr.set_position(rdata_start);
            read_name_bytes(rdr, mode.record_data_offsets())?
        } else {
            rdata
        };
        rdr.set_position(rdata_end);

        let record = Self {
            name,
            qtype,
            qclass,
            ttl: PLACEHOLDER_TTL,
            data,
        };

        Ok(record)
    }

    pub fn data_as_text(&self) -> String {
        String::from_utf8_lossy(&self.data).to_string()
    }
}
