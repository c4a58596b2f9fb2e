//! Atari Lynx (Mikey) audio emulation core

pub mod api;
pub mod apu;

pub use api::{ApuStateError, LynxApuConfig};
pub use apu::Apu;
