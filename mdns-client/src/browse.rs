use std::collections::BTreeMap;
use std::net::Ipv4Addr;
use configuration::BrowseConfiguration;
use mdns::{Message, ResourceRecord};
use mdns_query_types::{NameQuery, QType};

use crate::{ClientError, MdnsSocket};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredService {
    pub instance: String,
    pub target: String,
    pub port: u16,
    pub ip: Option<Ipv4Addr>,
}

/// Walks the answers of a PTR -> SRV -> A lookup chain for one service type.
///
/// Holds no socket; [`ServiceBrowser::handle`] returns the follow-up
/// queries and the caller sends them.
pub struct ServiceBrowser {
    service: String,
    services: BTreeMap<String, DiscoveredService>,
}

impl ServiceBrowser {
    pub fn new(service: &str) -> Self {
        Self {
            service: service.to_string(),
            services: BTreeMap::new(),
        }
    }

    pub fn initial_query(&self) -> NameQuery {
        NameQuery::ptr_record(&self.service)
    }

    pub fn handle(&mut self, message: &Message) -> Vec<NameQuery> {
        let mut follow_ups = Vec::new();

        for record in &message.answers {
            match QType::from(record.qtype) {
                QType::Ptr if record.name == self.service => {
                    let instance = record.data_as_text();
                    follow_ups.push(NameQuery::srv_record(&instance));
                }
                QType::Srv => match parse_srv(&record.data) {
                    Some((port, target)) => {
                        follow_ups.push(NameQuery::a_record(&target));
                        let service = DiscoveredService {
                            instance: record.name.clone(),
                            target,
                            port,
                            ip: None,
                        };
                        self.services.insert(record.name.clone(), service);
                    }
                    None => tracing::debug!("SRV record for {} is too short, skipped", record.name),
                },
                QType::A => self.fill_address(record),
                _ => {}
            }
        }

        follow_ups
    }

    fn fill_address(&mut self, record: &ResourceRecord) {
        let ip = match record.data.get(..4) {
            Some(d) => Ipv4Addr::new(d[0], d[1], d[2], d[3]),
            None => {
                tracing::debug!("A record for {} is too short, skipped", record.name);
                return;
            }
        };

        for service in self.services.values_mut().filter(|s| s.target == record.name) {
            service.ip = Some(ip);
        }
    }

    pub fn services(&self) -> impl Iterator<Item = &DiscoveredService> {
        self.services.values()
    }

    pub fn into_services(self) -> Vec<DiscoveredService> {
        self.services.into_iter().map(|(_, s)| s).collect()
    }
}

// SRV data: priority(2) weight(2) port(2) target. The data is kept raw, so a
// compressed target cannot be followed; its first label plus `.local` is used.
fn parse_srv(data: &[u8]) -> Option<(u16, String)> {
    let port = u16::from_be_bytes([*data.get(4)?, *data.get(5)?]);
    let len = usize::from(*data.get(6)?);
    let label = data.get(7..7 + len)?;

    Some((port, format!("{}.local", String::from_utf8_lossy(label))))
}

/// Queries for `config.service` and follows the answers until
/// `config.idle_rounds` receive rounds pass without a new follow-up query.
/// Every decoded packet is handed to `observer`; packets that fail to decode
/// are logged and skipped.
pub async fn browse<F>(
    socket: &mut MdnsSocket,
    config: &BrowseConfiguration,
    mut observer: F,
) -> Result<Vec<DiscoveredService>, ClientError>
where
    F: FnMut(&Message),
{
    let mut browser = ServiceBrowser::new(&config.service);
    let mode = config.pointer_mode();

    let initial = browser.initial_query();
    for _ in 0..config.initial_queries {
        socket.query(&initial).await?;
    }

    let mut rounds_left = config.idle_rounds;
    while rounds_left > 0 {
        let follow_ups = match socket.read_incoming(mode).await {
            Ok(Some(message)) => {
                observer(&message);
                browser.handle(&message)
            }
            Ok(None) => Vec::new(),
            Err(ClientError::Decode(e)) => {
                tracing::warn!("skipping undecodable packet: {}", e);
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        // The round that produced follow-ups counts against the fresh budget.
        if !follow_ups.is_empty() {
            rounds_left = config.idle_rounds;
        }
        rounds_left -= 1;

        for query in &follow_ups {
            socket.query(query).await?;
        }
    }

    let services = browser.into_services();
    tracing::info!("browsing {} found {} service(s)", config.service, services.len());

    Ok(services)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::net::UdpSocket;

    const SERVICE: &str = "_googlecast._tcp.local";
    const INSTANCE: &str = "Kitchen._googlecast._tcp.local";

    fn qname(name: &str) -> Vec<u8> {
        mdns::domain_to_qname(name).unwrap()
    }

    // A response carrying one uncompressed answer record.
    fn response(name: &str, qtype: u16, rdata: &[u8]) -> Vec<u8> {
        let mut buf = vec![0, 0, 0x84, 0, 0, 0, 0, 1, 0, 0, 0, 0];
        buf.extend_from_slice(&qname(name));
        buf.extend_from_slice(&qtype.to_be_bytes());
        buf.extend_from_slice(&[0x80, 0x01, 0x00, 0x00, 0x00, 0x78]);
        buf.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
        buf.extend_from_slice(rdata);
        buf
    }

    fn ptr_response() -> Vec<u8> {
        response(SERVICE, 12, &qname(INSTANCE))
    }

    fn srv_response() -> Vec<u8> {
        let mut rdata = vec![0, 0, 0, 0, 0x1F, 0x49];
        rdata.extend_from_slice(&qname("cast.local"));
        response(INSTANCE, 33, &rdata)
    }

    fn a_response() -> Vec<u8> {
        response("cast.local", 1, &[192, 168, 1, 20])
    }

    fn decode(bytes: &[u8]) -> Message {
        Message::decode(bytes).unwrap()
    }

    #[test]
    fn ptr_answer_asks_for_srv() {
        let mut browser = ServiceBrowser::new(SERVICE);

        let follow_ups = browser.handle(&decode(&ptr_response()));
        assert_eq!(follow_ups, vec![NameQuery::srv_record(INSTANCE)]);
        assert_eq!(browser.services().count(), 0);
    }

    #[test]
    fn ptr_for_another_service_is_ignored() {
        let mut browser = ServiceBrowser::new("_airplay._tcp.local");

        assert!(browser.handle(&decode(&ptr_response())).is_empty());
    }

    #[test]
    fn srv_then_a_fills_the_service() {
        let mut browser = ServiceBrowser::new(SERVICE);

        let follow_ups = browser.handle(&decode(&srv_response()));
        assert_eq!(follow_ups, vec![NameQuery::a_record("cast.local")]);

        assert!(browser.handle(&decode(&a_response())).is_empty());

        let services = browser.into_services();
        assert_eq!(
            services,
            vec![DiscoveredService {
                instance: INSTANCE.to_string(),
                target: "cast.local".to_string(),
                port: 8009,
                ip: Some(Ipv4Addr::new(192, 168, 1, 20)),
            }]
        );
    }

    #[test]
    fn short_rdata_is_skipped() {
        let mut browser = ServiceBrowser::new(SERVICE);

        assert!(browser.handle(&decode(&response(INSTANCE, 33, &[0, 0, 0]))).is_empty());
        assert!(browser.handle(&decode(&response("cast.local", 1, &[10, 0]))).is_empty());
        assert_eq!(browser.services().count(), 0);
    }

    #[test]
    fn parse_srv_test() {
        let mut rdata = vec![0, 1, 0, 2, 0x1F, 0x49];
        rdata.extend_from_slice(b"\x04cast\xC0\x1D");

        assert_eq!(parse_srv(&rdata), Some((8009, "cast.local".to_string())));
        assert_eq!(parse_srv(&rdata[..9]), None);
    }

    // Answers every query it receives with the next record of the chain.
    async fn spawn_responder(timeout: Duration) -> MdnsSocket {
        let responder = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let local = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let socket = MdnsSocket::from_parts(local, responder.local_addr().unwrap(), timeout);

        tokio::spawn(async move {
            let mut buf = [0u8; 512];
            for _ in 0..3 {
                let (n, from) = responder.recv_from(&mut buf).await.unwrap();
                let query = Message::decode(&buf[..n]).unwrap();
                let reply = match query.questions[0].qtype {
                    12 => ptr_response(),
                    33 => srv_response(),
                    _ => a_response(),
                };
                responder.send_to(&reply, from).await.unwrap();
            }
        });

        socket
    }

    fn browse_config(idle_rounds: u32) -> BrowseConfiguration {
        BrowseConfiguration {
            service: SERVICE.to_string(),
            initial_queries: 1,
            idle_rounds,
            ..BrowseConfiguration::default()
        }
    }

    #[tokio::test]
    async fn browse_follows_the_chain() {
        let mut socket = spawn_responder(Duration::from_millis(100)).await;

        let mut seen = 0;
        let services = browse(&mut socket, &browse_config(2), |_| seen += 1).await.unwrap();

        assert_eq!(seen, 3);
        assert_eq!(services.len(), 1);
        assert_eq!(services[0].port, 8009);
        assert_eq!(services[0].ip, Some(Ipv4Addr::new(192, 168, 1, 20)));
    }

    #[tokio::test]
    async fn single_idle_round_stops_after_first_follow_up() {
        let mut socket = spawn_responder(Duration::from_millis(100)).await;

        let mut seen = 0;
        let services = browse(&mut socket, &browse_config(1), |_| seen += 1).await.unwrap();

        assert_eq!(seen, 1);
        assert!(services.is_empty());
    }
}
