use crate::error::{DecodeError, EncodeError, Section};
use crate::header::Header;
use crate::name::PointerMode;
use crate::question::Question;
use crate::resource_record::ResourceRecord;
use log::trace;
use std::io::Cursor;

/// A DNS message as carried by mDNS: header, questions and the three record
/// sections.
///
/// The header is kept as loaded or as set by the caller. Its counts drive
/// decoding; encoding writes it verbatim and does not reconcile it with the
/// number of questions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    pub header: Header,
    pub questions: Vec<Question>,
    pub answers: Vec<ResourceRecord>,
    pub authorities: Vec<ResourceRecord>,
    pub additionals: Vec<ResourceRecord>,
}

impl Message {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single-question query with the question count set to 1.
    pub fn query(transaction_id: u16, question: Question) -> Self {
        let mut header = Header::new();
        header.set_transaction_id(transaction_id);
        header.set_qd_count(1);

        Self {
            header,
            questions: vec![question],
            ..Self::default()
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        Self::decode_with(data, PointerMode::default())
    }

    pub fn decode_with(data: &[u8], mode: PointerMode) -> Result<Self, DecodeError> {
        let mut reader = Cursor::new(data);

        let header = Header::parse_from_reader(&mut reader)?;
        trace!(
            "decoding message {:#06x}: {} question(s), {}/{}/{} record(s)",
            header.transaction_id(),
            header.qd_count(),
            header.answer_count(),
            header.authority_count(),
            header.additional_count()
        );

        let mut questions = Vec::with_capacity(capacity(header.qd_count(), data.len()));
        for _ in 0..header.qd_count() {
            questions.push(Question::parse_from_reader(&mut reader, mode)?);
        }

        let answers = read_records(&mut reader, header.answer_count(), mode)?;
        let authorities = read_records(&mut reader, header.authority_count(), mode)?;
        let additionals = read_records(&mut reader, header.additional_count(), mode)?;

        let msg = Self {
            header,
            questions,
            answers,
            authorities,
            additionals,
        };

        Ok(msg)
    }

    /// Replaces the contents with the decoded `data`. On error `self` is
    /// left untouched.
    pub fn load(&mut self, data: &[u8], mode: PointerMode) -> Result<(), DecodeError> {
        *self = Self::decode_with(data, mode)?;
        Ok(())
    }

    /// Header bytes followed by the question section. Record sections have
    /// no writer, so a message carrying records is refused rather than sent
    /// without them.
    pub fn serialize(&self) -> Result<Vec<u8>, EncodeError> {
        let sections = [
            (Section::Answer, self.answers.len()),
            (Section::Authority, self.authorities.len()),
            (Section::Additional, self.additionals.len()),
        ];
        if let Some(&(section, count)) = sections.iter().find(|(_, count)| *count > 0) {
            return Err(EncodeError::UnsupportedSection { section, count });
        }

        let mut bytes: Vec<u8> = vec![];
        self.header.to_bytes(&mut bytes);
        for question in &self.questions {
            question.to_bytes(&mut bytes)?;
        }

        Ok(bytes)
    }
}

// Every entry takes at least five bytes on the wire, so a count beyond what
// the buffer could hold must not size the allocation.
fn capacity(count: u16, len: usize) -> usize {
    usize::from(count).min(len / 5)
}

fn read_records(rdr: &mut Cursor<&[u8]>, count: u16, mode: PointerMode) -> Result<Vec<ResourceRecord>, DecodeError> {
    let mut records = Vec::with_capacity(capacity(count, rdr.get_ref().len()));
    for _ in 0..count {
        records.push(ResourceRecord::parse_from_reader(rdr, mode)?);
    }

    Ok(records)
}
