//! Fingerprints of commitment sets and threshold keys.
//!
//! Every participant in a setup computes the fingerprint of the commitment
//! set it collected. Comparing fingerprints out of band (read aloud, posted
//! publicly, ...) detects a trustee who sent different commitments to
//! different peers, as well as any commitment damaged or replaced in transit.
//!
//! # Canonical encoding
//!
//! The setup fingerprint is the SHA-256 digest of the following byte string,
//! all integers big-endian and every variable-length field prefixed with its
//! `u32` length:
//!
//! ```text
//! "dkg-core/setup-fingerprint/v1"
//! u16 num_trustees, u16 threshold
//! parameters                                   (Cryptosystem::serialize_parameters)
//! for index in 1..=num_trustees:
//!     u16 index
//!     u16 num_trustees, u16 threshold          (as embedded in the commitment)
//!     u16 count, count × element               (public coefficients)
//!     u16 count, count × ciphertext            (encrypted shares, recipient order)
//! ```
//!
//! Commitments are always taken in index order, never in arrival order.

use core::fmt::{self, Debug, Display};

use alloc::{collections::BTreeMap, string::String};

use byteorder::{BigEndian, ByteOrder};
use sha2::{Digest, Sha256};

use crate::{keys::commitment::Commitment, keys::ThresholdConfig, Cryptosystem, TrusteeIndex};

const SETUP_DOMAIN: &[u8] = b"dkg-core/setup-fingerprint/v1";

/// A SHA-256 digest certifying a specific byte string, e.g. a complete set
/// of commitments.
#[derive(Copy, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// The raw digest.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// The digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<[u8; 32]> for Fingerprint {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Fingerprint").field(&self.to_hex()).finish()
    }
}

/// Length-prefixed, big-endian input to a SHA-256 digest.
pub(crate) struct Transcript {
    hasher: Sha256,
}

impl Transcript {
    pub(crate) fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    pub(crate) fn append_u16(&mut self, value: u16) {
        let mut buf = [0u8; 2];
        BigEndian::write_u16(&mut buf, value);
        self.hasher.update(buf);
    }

    pub(crate) fn append_bytes(&mut self, bytes: &[u8]) {
        let mut buf = [0u8; 4];
        BigEndian::write_u32(&mut buf, bytes.len() as u32);
        self.hasher.update(buf);
        self.hasher.update(bytes);
    }

    pub(crate) fn finalize(self) -> Fingerprint {
        Fingerprint(self.hasher.finalize().into())
    }
}

/// Computes the fingerprint of a commitment set.
///
/// The map is iterated in ascending index order, so the result does not
/// depend on the order in which the commitments were inserted.
pub(crate) fn setup_fingerprint<C: Cryptosystem>(
    cryptosystem: &C,
    config: &ThresholdConfig,
    commitments: &BTreeMap<TrusteeIndex, Commitment<C>>,
) -> Fingerprint {
    let mut transcript = Transcript::new(SETUP_DOMAIN);
    transcript.append_u16(*config.num_trustees());
    transcript.append_u16(*config.threshold());
    transcript.append_bytes(&cryptosystem.serialize_parameters());

    for (index, commitment) in commitments {
        transcript.append_u16(index.get());
        transcript.append_u16(*commitment.num_trustees());
        transcript.append_u16(*commitment.threshold());

        let coefficients = commitment.public_coefficients().coefficients();
        transcript.append_u16(coefficients.len() as u16);
        for coefficient in coefficients {
            transcript.append_bytes(&cryptosystem.serialize_element(coefficient.value()));
        }

        let shares = commitment.encrypted_shares();
        transcript.append_u16(shares.len() as u16);
        for share in shares {
            transcript.append_bytes(&cryptosystem.serialize_ciphertext(share.ciphertext()));
        }
    }

    transcript.finalize()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn transcript_is_length_prefixed() {
        let mut a = Transcript::new(SETUP_DOMAIN);
        a.append_bytes(b"ab");
        a.append_bytes(b"c");

        let mut b = Transcript::new(SETUP_DOMAIN);
        b.append_bytes(b"a");
        b.append_bytes(b"bc");

        assert_ne!(a.finalize(), b.finalize());
    }

    #[test]
    fn transcript_matches_manual_encoding() {
        let mut transcript = Transcript::new(b"tag");
        transcript.append_u16(0x0102);
        transcript.append_bytes(&[0xaa]);

        let expected: [u8; 32] =
            Sha256::digest([b't', b'a', b'g', 0x01, 0x02, 0, 0, 0, 1, 0xaa]).into();
        assert_eq!(transcript.finalize(), Fingerprint::from(expected));
    }

    #[test]
    fn fingerprint_displays_as_hex() {
        let fingerprint = Fingerprint::from([0xab; 32]);
        assert_eq!(fingerprint.to_string(), "ab".repeat(32));
        assert_eq!(fingerprint.as_bytes(), &[0xab; 32]);
    }

    proptest! {
        #[test]
        fn transcript_field_boundaries_matter(
            data in proptest::collection::vec(any::<u8>(), 2..64),
            split in 1usize..63,
        ) {
            let split = split.min(data.len() - 1);

            let mut whole = Transcript::new(SETUP_DOMAIN);
            whole.append_bytes(&data);

            let mut parts = Transcript::new(SETUP_DOMAIN);
            parts.append_bytes(&data[..split]);
            parts.append_bytes(&data[split..]);

            prop_assert_ne!(whole.finalize(), parts.finalize());
        }
    }
}
