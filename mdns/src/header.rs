use crate::error::DecodeError;
use std::fmt;
use std::io::Cursor;

pub const HEADER_LEN: usize = 12;

// byte 2
const QR: u8 = 0b1000_0000;
const OPCODE: u8 = 0b0111_1000;
const AA: u8 = 0b0000_0100;
const TC: u8 = 0b0000_0010;
const RD: u8 = 0b0000_0001;

// byte 3
const RA: u8 = 0b1000_0000;
const Z: u8 = 0b0100_0000;
const AD: u8 = 0b0010_0000;
const CD: u8 = 0b0001_0000;
const RCODE: u8 = 0b0000_1111;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Query,
    Response,
}

/// Reply code carried in the low nibble of the fourth header byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyCode {
    NoError,
    FormatError,
    ServerFailure,
    NameError,
    NotImplemented,
    Refused,
    Other(u8),
}

impl From<u8> for ReplyCode {
    fn from(v: u8) -> Self {
        match v & RCODE {
            0 => ReplyCode::NoError,
            1 => ReplyCode::FormatError,
            2 => ReplyCode::ServerFailure,
            3 => ReplyCode::NameError,
            4 => ReplyCode::NotImplemented,
            5 => ReplyCode::Refused,
            other => ReplyCode::Other(other),
        }
    }
}

impl From<ReplyCode> for u8 {
    fn from(code: ReplyCode) -> Self {
        match code {
            ReplyCode::NoError => 0,
            ReplyCode::FormatError => 1,
            ReplyCode::ServerFailure => 2,
            ReplyCode::NameError => 3,
            ReplyCode::NotImplemented => 4,
            ReplyCode::Refused => 5,
            ReplyCode::Other(v) => v & RCODE,
        }
    }
}

impl fmt::Display for ReplyCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ReplyCode::NoError => write!(f, "no error"),
            ReplyCode::FormatError => write!(f, "format error"),
            ReplyCode::ServerFailure => write!(f, "server failure"),
            ReplyCode::NameError => write!(f, "name error"),
            ReplyCode::NotImplemented => write!(f, "not implemented"),
            ReplyCode::Refused => write!(f, "refused"),
            ReplyCode::Other(v) => write!(f, "reply code {}", v),
        }
    }
}

// 12 bytes, kept verbatim so that unknown bits survive a load/bytes round trip.
//
//  0  1  2  3  4  5  6  7  8  9  10 11 12 13 14 15
// |                      ID                       |
// |QR|  Opcode   |AA|TC|RD|RA| Z|AD|CD|   RCODE   |
// |                    QDCOUNT                    |
// |                    ANCOUNT                    |
// |                    NSCOUNT                    |
// |                    ARCOUNT                    |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Header {
    contents: [u8; HEADER_LEN],
}

impl Header {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the first 12 bytes of `data` verbatim.
    pub fn load(data: &[u8]) -> Result<Self, DecodeError> {
        let mut contents = [0; HEADER_LEN];
        let bytes = data
            .get(..HEADER_LEN)
            .ok_or_else(|| DecodeError::truncated(0, HEADER_LEN, data.len()))?;
        contents.copy_from_slice(bytes);

        Ok(Self { contents })
    }

    pub fn parse_from_reader(rdr: &mut Cursor<&[u8]>) -> Result<Self, DecodeError> {
        let bytes = crate::utils::read_bytes(rdr, HEADER_LEN)?;
        Self::load(&bytes)
    }

    pub fn bytes(&self) -> [u8; HEADER_LEN] {
        self.contents
    }

    pub fn to_bytes(&self, bytes: &mut Vec<u8>) {
        bytes.extend_from_slice(&self.contents);
    }

    fn flag(&self, index: usize, mask: u8) -> bool {
        self.contents[index] & mask != 0
    }

    fn set_flag(&mut self, index: usize, mask: u8, value: bool) {
        self.set_bits(index, mask, if value { mask } else { 0 });
    }

    // Clear the field, then OR in the new value restricted to the field.
    fn set_bits(&mut self, index: usize, mask: u8, shifted: u8) {
        self.contents[index] = (self.contents[index] & !mask) | (shifted & mask);
    }

    fn counter(&self, index: usize) -> u16 {
        u16::from(self.contents[index]) * 256 + u16::from(self.contents[index + 1])
    }

    fn set_counter(&mut self, index: usize, value: u16) {
        self.contents[index] = (value / 256) as u8;
        self.contents[index + 1] = (value % 256) as u8;
    }

    pub fn transaction_id(&self) -> u16 {
        self.counter(0)
    }

    pub fn set_transaction_id(&mut self, id: u16) {
        self.set_counter(0, id);
    }

    pub fn message_type(&self) -> MessageType {
        if self.flag(2, QR) {
            MessageType::Response
        } else {
            MessageType::Query
        }
    }

    pub fn set_message_type(&mut self, message_type: MessageType) {
        self.set_flag(2, QR, message_type == MessageType::Response);
    }

    pub fn opcode(&self) -> u8 {
        (self.contents[2] & OPCODE) >> 3
    }

    /// Only the low four bits of `opcode` are kept.
    pub fn set_opcode(&mut self, opcode: u8) {
        self.set_bits(2, OPCODE, (opcode & 0x0F) << 3);
    }

    pub fn authoritative(&self) -> bool {
        self.flag(2, AA)
    }

    pub fn set_authoritative(&mut self, value: bool) {
        self.set_flag(2, AA, value);
    }

    pub fn truncated(&self) -> bool {
        self.flag(2, TC)
    }

    pub fn set_truncated(&mut self, value: bool) {
        self.set_flag(2, TC, value);
    }

    pub fn recursion_desired(&self) -> bool {
        self.flag(2, RD)
    }

    pub fn set_recursion_desired(&mut self, value: bool) {
        self.set_flag(2, RD, value);
    }

    pub fn recursion_available(&self) -> bool {
        self.flag(3, RA)
    }

    pub fn set_recursion_available(&mut self, value: bool) {
        self.set_flag(3, RA, value);
    }

    pub fn reserved(&self) -> bool {
        self.flag(3, Z)
    }

    pub fn set_reserved(&mut self, value: bool) {
        self.set_flag(3, Z, value);
    }

    pub fn answer_authenticated(&self) -> bool {
        self.flag(3, AD)
    }

    pub fn set_answer_authenticated(&mut self, value: bool) {
        self.set_flag(3, AD, value);
    }

    pub fn non_authenticated_data(&self) -> bool {
        self.flag(3, CD)
    }

    pub fn set_non_authenticated_data(&mut self, value: bool) {
        self.set_flag(3, CD, value);
    }

    pub fn reply_code(&self) -> ReplyCode {
        ReplyCode::from(self.contents[3])
    }

    pub fn set_reply_code(&mut self, code: ReplyCode) {
        self.set_bits(3, RCODE, u8::from(code));
    }

    pub fn qd_count(&self) -> u16 {
        self.counter(4)
    }

    pub fn set_qd_count(&mut self, count: u16) {
        self.set_counter(4, count);
    }

    pub fn answer_count(&self) -> u16 {
        self.counter(6)
    }

    pub fn set_answer_count(&mut self, count: u16) {
        self.set_counter(6, count);
    }

    pub fn authority_count(&self) -> u16 {
        self.counter(8)
    }

    pub fn set_authority_count(&mut self, count: u16) {
        self.set_counter(8, count);
    }

    pub fn additional_count(&self) -> u16 {
        self.counter(10)
    }

    pub fn set_additional_count(&mut self, count: u16) {
        self.set_counter(10, count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: [u8; 12] = [0xAB, 0xCD, 0x84, 0xB5, 0, 1, 0, 2, 0, 3, 1, 4];

    #[test]
    fn load_then_bytes_is_verbatim() {
        for sample in [SAMPLE, [0xFF; 12], [0; 12]].iter() {
            let header = Header::load(sample).unwrap();
            assert_eq!(header.bytes(), *sample);
        }
    }

    #[test]
    fn load_ignores_trailing_bytes() {
        let mut data = SAMPLE.to_vec();
        data.extend_from_slice(&[9, 9, 9]);

        let header = Header::load(&data).unwrap();
        assert_eq!(header.bytes(), SAMPLE);
    }

    #[test]
    fn load_short_buffer_is_truncated() {
        let err = Header::load(&SAMPLE[..11]).unwrap_err();
        assert_eq!(
            err,
            DecodeError::Truncated {
                offset: 0,
                needed: 12,
                len: 11
            }
        );
    }

    #[test]
    fn getters_test() {
        let header = Header::load(&SAMPLE).unwrap();

        assert_eq!(header.transaction_id(), 0xABCD);
        // 0x84 = 1000_0100
        assert_eq!(header.message_type(), MessageType::Response);
        assert_eq!(header.opcode(), 0);
        assert!(header.authoritative());
        assert!(!header.truncated());
        assert!(!header.recursion_desired());
        // 0xB5 = 1011_0101
        assert!(header.recursion_available());
        assert!(!header.reserved());
        assert!(header.answer_authenticated());
        assert!(header.non_authenticated_data());
        assert_eq!(header.reply_code(), ReplyCode::Refused);

        assert_eq!(header.qd_count(), 1);
        assert_eq!(header.answer_count(), 2);
        assert_eq!(header.authority_count(), 3);
        assert_eq!(header.additional_count(), 260);
    }

    #[test]
    fn reply_code_leaves_flags_alone() {
        let mut header = Header::load(&SAMPLE).unwrap();
        let ra = header.recursion_available();
        let z = header.reserved();
        let ad = header.answer_authenticated();
        let cd = header.non_authenticated_data();

        header.set_reply_code(ReplyCode::NoError);
        header.set_reply_code(ReplyCode::Other(0xFF));

        assert_eq!(header.reply_code(), ReplyCode::Other(15));
        assert_eq!(header.recursion_available(), ra);
        assert_eq!(header.reserved(), z);
        assert_eq!(header.answer_authenticated(), ad);
        assert_eq!(header.non_authenticated_data(), cd);
        assert_eq!(&header.bytes()[..3], &SAMPLE[..3]);
    }

    #[test]
    fn byte_two_setters_are_isolated() {
        let mut header = Header::new();
        header.set_message_type(MessageType::Response);
        header.set_opcode(0xFF);
        header.set_recursion_desired(true);

        assert_eq!(header.bytes()[2], 0b1111_1001);
        assert_eq!(header.opcode(), 15);

        header.set_opcode(2);
        assert_eq!(header.bytes()[2], 0b1001_0001);
        assert_eq!(header.message_type(), MessageType::Response);
        assert!(header.recursion_desired());

        header.set_authoritative(true);
        header.set_truncated(true);
        header.set_message_type(MessageType::Query);
        assert_eq!(header.bytes()[2], 0b0001_0111);

        header.set_truncated(false);
        assert_eq!(header.opcode(), 2);
        assert!(header.authoritative());
        assert!(!header.truncated());
        assert_eq!(header.bytes()[3], 0);
    }

    #[test]
    fn byte_three_setters_are_isolated() {
        let mut header = Header::new();
        header.set_reply_code(ReplyCode::NameError);
        header.set_reserved(true);
        header.set_recursion_available(true);

        assert_eq!(header.bytes()[3], 0b1100_0011);

        header.set_reserved(false);
        header.set_answer_authenticated(true);
        header.set_non_authenticated_data(true);
        assert_eq!(header.bytes()[3], 0b1011_0011);
        assert_eq!(header.reply_code(), ReplyCode::NameError);
        assert_eq!(header.bytes()[2], 0);
    }

    #[test]
    fn counters_are_big_endian() {
        let mut header = Header::new();
        header.set_transaction_id(0x1234);
        header.set_qd_count(1);
        header.set_answer_count(256);
        header.set_authority_count(0xFFFF);
        header.set_additional_count(7);

        assert_eq!(
            header.bytes(),
            [0x12, 0x34, 0, 0, 0, 1, 1, 0, 0xFF, 0xFF, 0, 7]
        );
        assert_eq!(header.answer_count(), 256);
        assert_eq!(header.authority_count(), 65535);
    }
}
