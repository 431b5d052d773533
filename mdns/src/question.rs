use crate::error::{DecodeError, EncodeError};
use crate::name::{domain_to_qname, read_name, PointerMode};
use crate::utils::read_u16;
use std::io::Cursor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub name: String,
    pub qtype: u16,
    pub qclass: u16,
}

impl Question {
    pub fn new(name: &str, qtype: u16, qclass: u16) -> Self {
        Self {
            name: name.to_string(),
            qtype,
            qclass,
        }
    }

    pub fn to_bytes(&self, bytes: &mut Vec<u8>) -> Result<(), EncodeError> {
        let qname = domain_to_qname(&self.name)?;
        bytes.extend_from_slice(&qname);

        bytes.extend_from_slice(&self.qtype.to_be_bytes());
        bytes.extend_from_slice(&self.qclass.to_be_bytes());

        Ok(())
    }

    pub fn parse_from_reader(rdr: &mut Cursor<&[u8]>, mode: PointerMode) -> Result<Self, DecodeError> {
        let name = read_name(rdr, mode.question_offsets())?;
        let qtype = read_u16(rdr)?;
        let qclass = read_u16(rdr)?;

        let q = Self {
            name,
            qtype,
            qclass,
        };

        Ok(q)
    }
}
