#![doc = include_str!("../README.md")]
#![doc(html_root_url = "https://docs.rs/yeast-yaml")]
#![warn(clippy::pedantic)]
#![allow(
    clippy::cast_lossless,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::too_many_arguments,
    clippy::too_many_lines
)]
#![deny(unsafe_code)]

mod api;
mod char_engine;
mod classify;
mod decode;
mod emitter;
mod error;
mod frame;
mod machine;
mod productions;
mod registry;
mod source;
#[cfg(test)]
mod testutil;
mod token;

pub use crate::api::{
    close_parser, code_type, next_token, open_parser, open_source_buffer, open_source_fd,
    open_source_fd_auto, open_source_fd_mmap, open_source_file, open_source_path_auto,
    open_source_string, YeastParser,
};
pub use crate::decode::{decode, encoding_name, Encoding};
pub use crate::error::{DecodeError, Mark, ParserError, SourceError};
pub use crate::productions::build_registry;
pub use crate::registry::{Production, Registry};
pub use crate::source::Source;
pub use crate::token::{code_pair, CodeType, Token, TokenBody, TokenCode};
