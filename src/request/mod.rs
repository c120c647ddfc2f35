//! Request building module
//!
//! Pure construction of request descriptors: URL joining, header merging,
//! body and query field-name translation, query encoding.

mod builder;
mod url;

pub use builder::{build, BuildOptions, QueryEncoding, RequestBody, RequestDescriptor};
pub use self::url::{append_query, encode_query, flatten_query, is_absolute, join_url};
