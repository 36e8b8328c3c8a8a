pub mod key_value_store;
pub mod resolver;
pub mod search_transport;

pub use key_value_store::KeyValueStore;
pub use resolver::EntityResolver;
pub use search_transport::{EntitySearchRequest, SearchTransport};
