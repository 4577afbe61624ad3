mod source;
mod stream;

pub use source::{
    parse_u32_array, parse_u64_array, read_u16_le, read_u32_le, read_u64_le, ByteSource,
    SeekOrigin,
};
pub use stream::StreamSource;
