#![doc = include_str!("../README.md")]

mod catalog;
mod diff;
pub mod error;
pub mod literal;
pub mod mo;
mod parse;
mod write;

pub use catalog::Catalog;
pub use diff::{Change, ChangeSet};
pub use error::{LiteralError, MoError, ParseError};
pub use parse::{MSGID, MSGSTR, parse};
pub use write::serialize;
