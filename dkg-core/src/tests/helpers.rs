//! Helper functions for testing

use alloc::{collections::BTreeMap, vec::Vec};

use rand_core::{CryptoRng, RngCore};

use crate::{Commitment, Cryptosystem, PrivateKey, PublicKey, SetupSession, ThresholdConfig};

/// A trustee's personal key pair.
pub struct Trustee<C: Cryptosystem> {
    /// The trustee's index, 1-based.
    pub index: u16,
    /// Personal decryption key.
    pub private_key: PrivateKey<C>,
    /// Personal encryption key.
    pub public_key: PublicKey<C>,
}

/// Generates personal key pairs for trustees `1..=num_trustees`.
pub fn generate_trustees<C: Cryptosystem, R: RngCore + CryptoRng>(
    cryptosystem: &C,
    num_trustees: u16,
    rng: &mut R,
) -> Vec<Trustee<C>> {
    (1..=num_trustees)
        .map(|index| {
            let (private_key, public_key) = cryptosystem.generate_key_pair(rng);
            Trustee {
                index,
                private_key,
                public_key,
            }
        })
        .collect()
}

/// Creates a session that already holds the public keys of all `trustees`.
pub fn session_with_keys<C: Cryptosystem>(
    cryptosystem: &C,
    config: ThresholdConfig,
    trustees: &[Trustee<C>],
) -> SetupSession<C> {
    let mut session = SetupSession::new(cryptosystem.clone(), config).unwrap();
    for trustee in trustees {
        session
            .add_trustee_public_key(trustee.index, trustee.public_key.clone())
            .unwrap();
    }
    session
}

/// Lets every trustee's session produce its commitment.
pub fn generate_commitments<C: Cryptosystem, R: RngCore + CryptoRng>(
    sessions: &[SetupSession<C>],
    rng: &mut R,
) -> BTreeMap<u16, Commitment<C>> {
    sessions
        .iter()
        .zip(1u16..)
        .map(|(session, index)| (index, session.generate_commitment(rng).unwrap()))
        .collect()
}

/// Feeds every commitment into `session`.
pub fn add_commitments<C: Cryptosystem>(
    session: &mut SetupSession<C>,
    commitments: &BTreeMap<u16, Commitment<C>>,
) {
    for (index, commitment) in commitments {
        session
            .add_trustee_commitment(*index, commitment.clone())
            .unwrap();
    }
}
