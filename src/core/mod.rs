//! Core text handling: mention extraction and reply formatting.

pub mod consts;
pub mod mention;
pub mod reply;
