//! TFT Display Command Protocol
//!
//! This crate encodes drawing commands for a TFT display controller attached
//! over a serial link. The protocol is transmit-only: the host frames each
//! command and writes it, nothing is acknowledged.
//!
//! # Protocol Overview
//!
//! All commands use a length-prefixed binary frame:
//! ```text
//! ┌─────┬──────┬──────────────┬───────────────┬─────┐
//! │ STX │ TYPE │ LENGTH       │ PAYLOAD       │ ETX │
//! │ 1B  │ 1B   │ 2B or 4B, BE │ LENGTH bytes  │ 1B  │
//! └─────┴──────┴──────────────┴───────────────┴─────┘
//! ```
//!
//! The length width is fixed per deployment: revision-2 controllers read a
//! 2-byte length, later controllers a 4-byte one (needed for full-screen
//! images).

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod color;
pub mod command;
pub mod field;
pub mod frame;
pub mod image;

pub use color::{to_rgb565, Color};
pub use command::{Command, CommandBuilder, CommandKind, ImageCommandError, Position, Size};
pub use frame::{encode_into, encoded_len, frame, FrameError, LengthWidth, ETX, STX};
pub use image::{Bitmap, ImageSource};
