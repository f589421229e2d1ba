//! I/O module
//!
//! Handles the on-disk formats.
//!
//! # Components
//!
//! - `record_codec` - Account record format (encode, decode, balance rewrite)
//! - `index_store` - Pipe-delimited account index
//! - `swap` - Temp-file-then-rename replacement used by every rewrite

pub mod index_store;
pub mod record_codec;
pub mod swap;

pub use index_store::{IndexEntry, IndexStore};
pub use record_codec::{decode_record, encode_record, rewrite_balance, RecordField};
pub use swap::replace_file;
