mod browse;
mod error;
mod socket;

pub use browse::{browse, DiscoveredService, ServiceBrowser};
pub use error::ClientError;
pub use socket::MdnsSocket;
