//! Terminal front end for websh-prompt: flag parsing and the rustyline
//! line editor plugged into the [`websh_core::Session`].

pub mod cli;
pub mod editor;
pub mod helper;
