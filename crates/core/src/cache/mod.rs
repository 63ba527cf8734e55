mod error;
mod keys;
mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use keys::{news_key, NEWS_KEY_PREFIX};
pub use serialization::{deserialize_news, serialize_news, SerializationError};
pub use traits::Cache;
