mod aside;
mod error;
mod keys;
mod serialization;
mod stats;
mod traits;
mod ttl;

pub use aside::{CacheAside, DEFAULT_OPERATION_TIMEOUT};
pub use error::{CacheError, Result};
pub use keys::{
    course_key, course_list_key, entity_key, list_key, COURSE_KIND, COURSE_LIST_TAG,
};
pub use serialization::{Codec, JsonCodec, SerializationError};
pub use stats::CacheStats;
pub use traits::Cache;
pub use ttl::{TtlPolicy, DEFAULT_ENTITY_TTL, DEFAULT_LIST_TTL};
