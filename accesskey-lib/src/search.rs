//! Candidate key search
//!
//! The packet's leading bytes pick the engine, then candidates are tried in
//! list order and the first one whose checksum or signature matches wins.

use serde::Serialize;
use tracing::{debug, info};

use crate::checksum::V0Packet;
use crate::error::KeyError;
use crate::packet::PacketVersion;
use crate::signature::V1Packet;

/// Something that can tell whether an access key produced a captured packet.
pub trait KeyVerifier {
    fn version(&self) -> PacketVersion;
    fn verify(&self, key: &str) -> Result<bool, KeyError>;
}

impl KeyVerifier for V0Packet<'_> {
    fn version(&self) -> PacketVersion {
        PacketVersion::V0
    }

    fn verify(&self, key: &str) -> Result<bool, KeyError> {
        Ok(self.compute(key) == self.checksum)
    }
}

impl KeyVerifier for V1Packet<'_> {
    fn version(&self) -> PacketVersion {
        PacketVersion::V1
    }

    fn verify(&self, key: &str) -> Result<bool, KeyError> {
        V1Packet::verify(self, key)
    }
}

/// Verifier picked from the packet's leading bytes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verifier<'a> {
    V0(V0Packet<'a>),
    V1(V1Packet<'a>),
}

impl<'a> Verifier<'a> {
    pub fn for_packet(packet: &'a [u8]) -> Result<Self, KeyError> {
        match PacketVersion::detect(packet) {
            PacketVersion::V1 => V1Packet::parse(packet).map(Verifier::V1),
            PacketVersion::V0 => V0Packet::parse(packet).map(Verifier::V0),
        }
    }
}

impl KeyVerifier for Verifier<'_> {
    fn version(&self) -> PacketVersion {
        match self {
            Verifier::V0(packet) => KeyVerifier::version(packet),
            Verifier::V1(packet) => KeyVerifier::version(packet),
        }
    }

    fn verify(&self, key: &str) -> Result<bool, KeyError> {
        match self {
            Verifier::V0(packet) => KeyVerifier::verify(packet, key),
            Verifier::V1(packet) => KeyVerifier::verify(packet, key),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum SearchOutcome {
    /// `key` matched after `attempts` candidates had been tried
    Match { key: String, attempts: usize },
    NoMatch { attempts: usize },
}

impl SearchOutcome {
    pub fn key(&self) -> Option<&str> {
        match self {
            SearchOutcome::Match { key, .. } => Some(key),
            SearchOutcome::NoMatch { .. } => None,
        }
    }

    pub fn attempts(&self) -> usize {
        match self {
            SearchOutcome::Match { attempts, .. } | SearchOutcome::NoMatch { attempts } => *attempts,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, SearchOutcome::Match { .. })
    }
}

/// Try `candidates` in order against `verifier`, stopping at the first match.
pub fn search_with<V, S>(candidates: &[S], verifier: &V) -> Result<SearchOutcome, KeyError>
where
    V: KeyVerifier + ?Sized,
    S: AsRef<str>,
{
    for (index, candidate) in candidates.iter().enumerate() {
        let key = candidate.as_ref();
        debug!(key, "Trying key");
        if verifier.verify(key)? {
            info!(key, attempts = index + 1, "Found working access key");
            return Ok(SearchOutcome::Match {
                key: key.to_string(),
                attempts: index + 1,
            });
        }
    }

    info!(attempts = candidates.len(), "No candidate matched the test packet");
    Ok(SearchOutcome::NoMatch {
        attempts: candidates.len(),
    })
}

/// Search `candidates` for the key that produced `packet`.
///
/// An empty candidate list yields `NoMatch` without looking at the packet.
/// Otherwise a malformed packet is an error.
pub fn search<S: AsRef<str>>(candidates: &[S], packet: &[u8]) -> Result<SearchOutcome, KeyError> {
    if candidates.is_empty() {
        debug!("No candidates to try");
        return Ok(SearchOutcome::NoMatch { attempts: 0 });
    }

    let verifier = Verifier::for_packet(packet)?;
    debug!(version = %verifier.version(), candidates = candidates.len(), "Searching for access key");
    search_with(candidates, &verifier)
}
