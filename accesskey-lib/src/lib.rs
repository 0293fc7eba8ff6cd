//! Access key recovery for game title images.
//!
//! Candidate keys are pulled out of a title image ([`extract`]) and checked
//! against a captured packet ([`search`]). Legacy packets end in an 8-bit
//! additive checksum ([`checksum`]); packets starting with `EA D0` carry an
//! HMAC-MD5 signature instead ([`signature`]).

pub mod checksum;
pub mod constants;
pub mod error;
pub mod extract;
pub mod packet;
pub mod search;
pub mod signature;

pub use error::KeyError;
pub use packet::{CapturedPacket, PacketVersion};
pub use search::{SearchOutcome, search};
