use mdns::{DecodeError, EncodeError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("mDNS socket error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not decode incoming packet: {0}")]
    Decode(#[from] DecodeError),

    #[error("could not encode query: {0}")]
    Encode(#[from] EncodeError),
}
