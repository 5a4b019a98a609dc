pub mod config;
pub mod protocol;
pub mod transport;

pub use config::EngineConfig;
pub use protocol::{ProtocolHandler, ProtocolSession};
pub use transport::serve;
