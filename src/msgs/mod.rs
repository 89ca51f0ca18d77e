#[macro_use]
mod macros;

pub mod codec;
pub mod enums;
pub mod handshake;
