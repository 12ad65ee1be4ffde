//! Byte, hash and path helpers shared by the QBN and text database decoders

pub mod bytes;
pub mod hash;
pub mod path;

pub use bytes::{ByteReader, nul_terminated};
pub use hash::var_hash;
pub use path::{find_child, find_sibling_with_extension};
