use std::fmt;
use mdns::{Message, Question, ResourceRecord};
use mdns_client::DiscoveredService;
use mdns_query_types::QType;

/// Console summary of a packet: each section's count, then its entries.
pub struct PacketSummary<'a>(pub &'a Message);

impl fmt::Display for PacketSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = self.0;
        let header = &msg.header;

        writeln!(f, "Questions: {}", header.qd_count())?;
        for (i, q) in msg.questions.iter().enumerate() {
            writeln!(f, "  Question Number: {}", i)?;
            write_question(f, q)?;
        }

        let sections = [
            ("AnswerRRs", "Answer Number", header.answer_count(), &msg.answers),
            ("AuthorityRRs", "AuthorityRR Number", header.authority_count(), &msg.authorities),
            ("AdditionalRRs", "AdditionalRR Number", header.additional_count(), &msg.additionals),
        ];
        for (title, entry, count, records) in sections.iter() {
            writeln!(f, "{}: {}", title, count)?;
            for (i, r) in records.iter().enumerate() {
                writeln!(f, "  {}: {}", entry, i)?;
                write_record(f, r)?;
            }
        }

        Ok(())
    }
}

fn write_question(f: &mut fmt::Formatter, q: &Question) -> fmt::Result {
    writeln!(f, "    Name: {}", q.name)?;
    writeln!(f, "    QType: {} ({})", q.qtype, QType::from(q.qtype))?;
    writeln!(f, "    QClass: {}", q.qclass)
}

fn write_record(f: &mut fmt::Formatter, r: &ResourceRecord) -> fmt::Result {
    writeln!(f, "    Name: {}", r.name)?;
    writeln!(f, "    QType: {} ({})", r.qtype, QType::from(r.qtype))?;
    writeln!(f, "    QClass: {}", r.qclass)?;
    writeln!(f, "    TTL: {}", r.ttl)?;
    writeln!(f, "    Data: {}", r.data_as_text())
}

pub struct ServiceLine<'a>(pub &'a DiscoveredService);

impl fmt::Display for ServiceLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = self.0;
        match s.ip {
            Some(ip) => write!(f, "{} -> {}:{} ({})", s.instance, s.target, s.port, ip),
            None => write!(f, "{} -> {}:{} (address unknown)", s.instance, s.target, s.port),
        }
    }
}
