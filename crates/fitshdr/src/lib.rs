#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod block;
pub mod codec;
pub mod error;
pub mod header;
pub mod lines;
pub mod value;

pub use block::{BLOCK_SIZE, CARDS_PER_BLOCK, CARD_SIZE};
pub use codec::{format_ascii_line, format_double_line, format_int_line, format_logical_line};
pub use error::{Error, Result};
pub use header::{copy, Header, MAX_HEADER_LINES};
