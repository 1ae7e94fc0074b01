//! tftlink Hardware Abstraction Layer
//!
//! This crate defines the serial channel trait the display link writes
//! packets through. Host tooling implements it over an OS serial port;
//! firmware-side tooling can implement it over a UART peripheral.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Transport driver (tftlink-host)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tftlink-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  OS serial    │       │  test / mock  │
//! │  port         │       │  channels     │
//! └───────────────┘       └───────────────┘
//! ```

#![no_std]
#![deny(unsafe_code)]

pub mod serial;

pub use serial::{DataBits, Parity, SerialConfig, SerialTx, StopBits};
