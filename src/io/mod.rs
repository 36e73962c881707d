pub mod encoding;
pub mod fs;

pub use encoding::{DecodedText, TextEncoding};
pub use fs::{read_bytes, write_atomic, FileResolver, ResolverConfig};
