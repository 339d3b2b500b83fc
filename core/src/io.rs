mod codec;
mod crc32_reader;
mod directory;
mod encoding;
pub use {codec::*, crc32_reader::*, directory::*, encoding::*};
