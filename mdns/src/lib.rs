// https://datatracker.ietf.org/doc/html/rfc1035#section-4.1
// https://datatracker.ietf.org/doc/html/rfc6762#section-18

mod error;
mod header;
mod message;
mod name;
mod question;
mod resource_record;
mod utils;

pub use error::{DecodeError, EncodeError, Section};
pub use header::{Header, MessageType, ReplyCode, HEADER_LEN};
pub use message::Message;
pub use name::{domain_to_qname, read_name, read_name_bytes, PointerMode, PointerOffsets, MAX_LABEL_LEN, MAX_POINTER_HOPS};
pub use question::Question;
pub use resource_record::{ResourceRecord, PLACEHOLDER_TTL, TYPE_PTR};

/// Builds the bytes of a one-question query.
pub fn encode_query(transaction_id: u16, name: &str, qtype: u16, qclass: u16) -> Result<Vec<u8>, EncodeError> {
    let question = Question::new(name, qtype, qclass);
    Message::query(transaction_id, question).serialize()
}

pub fn encode(message: &Message) -> Result<Vec<u8>, EncodeError> {
    message.serialize()
}

pub fn decode(data: &[u8]) -> Result<Message, DecodeError> {
    Message::decode(data)
}
