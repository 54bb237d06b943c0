//! The threshold setup session.
//!
//! A [`SetupSession`] drives one run of the distributed key generation for
//! one participant. Every participant, trustee or external verifier, runs
//! the same ingestion, fingerprint and combination logic; only producing a
//! commitment and recovering a private share are trustee specific.
//!
//! The session moves through the [`SetupState`]s in order:
//!
//! 1. collect the personal public key of every trustee
//!    ([`SetupSession::add_trustee_public_key`]);
//! 2. build this trustee's commitment ([`SetupSession::generate_commitment`])
//!    and broadcast it;
//! 3. collect every trustee's commitment, this trustee's own included
//!    ([`SetupSession::add_trustee_commitment`]);
//! 4. compare [`SetupSession::get_fingerprint`] with every other
//!    participant out of band;
//! 5. derive the joint key ([`SetupSession::generate_public_key`]) or, as a
//!    trustee, the joint key and the private share
//!    ([`SetupSession::generate_key_pair`]).
//!
//! A failed share verification moves the session to [`SetupState::Failed`];
//! such a session must be discarded and the whole setup restarted.

use alloc::collections::BTreeMap;

use rand_core::{CryptoRng, RngCore};
use tracing::{debug, error, info, warn};
use zeroize::Zeroizing;

use crate::{
    fingerprint::{self, Fingerprint},
    Cryptosystem, Error, Mismatch, PrivateKey, PublicKey, TrusteeIndex,
};

use super::{
    commitment::Commitment, verify_share, ThresholdConfig, ThresholdPrivateKeyShare,
    ThresholdPublicKey,
};

/// The states of a [`SetupSession`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SetupState {
    /// Created, no public key received yet.
    Configured,
    /// Some, but not all, personal public keys received.
    CollectingKeys,
    /// All personal public keys received; commitments can be generated.
    KeysReady,
    /// Some, but not all, commitments received.
    CollectingCommitments,
    /// All commitments received; the fingerprint is available.
    CommitmentsReady,
    /// The threshold key was generated.
    KeyGenerated,
    /// A commitment failed verification. Terminal.
    Failed,
}

/// The state of one run of the threshold key setup.
///
/// Ingestion takes `&mut self`; a process receiving keys and commitments
/// from several connections at once must put the session behind a lock.
#[derive(Clone, Debug)]
pub struct SetupSession<C: Cryptosystem> {
    cryptosystem: C,
    config: ThresholdConfig,
    public_keys: BTreeMap<TrusteeIndex, PublicKey<C>>,
    commitments: BTreeMap<TrusteeIndex, Commitment<C>>,
    state: SetupState,
}

impl<C> SetupSession<C>
where
    C: Cryptosystem,
{
    /// Create a new session for `config` over `cryptosystem`.
    ///
    /// Fails with [`Error::TooManyTrustees`] if the scalar field of
    /// `cryptosystem` cannot give each trustee a distinct, nonzero index.
    pub fn new(cryptosystem: C, config: ThresholdConfig) -> Result<Self, Error> {
        config.check_cryptosystem(&cryptosystem).inspect_err(|_| {
            warn!(num_trustees = config.num_trustees, "scalar field too small for the trustees")
        })?;
        debug!(
            num_trustees = config.num_trustees,
            threshold = config.threshold,
            "threshold setup configured"
        );
        Ok(Self {
            cryptosystem,
            config,
            public_keys: BTreeMap::new(),
            commitments: BTreeMap::new(),
            state: SetupState::Configured,
        })
    }

    /// The current state.
    pub fn state(&self) -> SetupState {
        self.state
    }

    /// The (n, k) parameters of the session.
    pub fn config(&self) -> &ThresholdConfig {
        &self.config
    }

    /// The cryptosystem parameters of the session.
    pub fn cryptosystem(&self) -> &C {
        &self.cryptosystem
    }

    /// The personal public keys collected so far.
    pub fn public_keys(&self) -> &BTreeMap<TrusteeIndex, PublicKey<C>> {
        &self.public_keys
    }

    /// The commitments collected so far, in index order.
    pub fn commitments(&self) -> &BTreeMap<TrusteeIndex, Commitment<C>> {
        &self.commitments
    }

    fn require(&self, allowed: &[SetupState]) -> Result<(), Error> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            warn!(state = ?self.state, "operation rejected in current state");
            Err(Error::InvalidState { state: self.state })
        }
    }

    fn transition(&mut self, state: SetupState) {
        debug!(from = ?self.state, to = ?state, "setup state transition");
        self.state = state;
    }

    /// Registers the personal public key of trustee `index`.
    ///
    /// Once the keys of all trustees are present the session moves to
    /// [`SetupState::KeysReady`].
    pub fn add_trustee_public_key(&mut self, index: u16, key: PublicKey<C>) -> Result<(), Error> {
        self.require(&[SetupState::Configured, SetupState::CollectingKeys])?;
        let index = self.config.check_index(index)?;
        if self.public_keys.contains_key(&index) {
            return Err(Error::DuplicateIndex { index });
        }
        if *C::public_key_parameters(&key) != self.cryptosystem {
            warn!(%index, "public key over different cryptosystem parameters");
            return Err(Mismatch::Parameters.into());
        }

        self.public_keys.insert(index, key);
        debug!(%index, received = self.public_keys.len(), "trustee public key added");

        if self.public_keys.len() == self.config.num_trustees as usize {
            self.transition(SetupState::KeysReady);
        } else if self.state == SetupState::Configured {
            self.transition(SetupState::CollectingKeys);
        }
        Ok(())
    }

    /// Builds a new commitment for the caller, a trustee of this setup.
    ///
    /// This does not register the commitment: the caller must broadcast it
    /// and feed it back with [`SetupSession::add_trustee_commitment`], like
    /// every other trustee's.
    pub fn generate_commitment<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
    ) -> Result<Commitment<C>, Error> {
        self.require(&[
            SetupState::KeysReady,
            SetupState::CollectingCommitments,
            SetupState::CommitmentsReady,
            SetupState::KeyGenerated,
        ])?;
        Commitment::build(&self.cryptosystem, self.config, &self.public_keys, rng)
    }

    /// Registers the commitment of trustee `index`.
    ///
    /// Once the commitments of all trustees are present the session moves to
    /// [`SetupState::CommitmentsReady`].
    pub fn add_trustee_commitment(
        &mut self,
        index: u16,
        commitment: Commitment<C>,
    ) -> Result<(), Error> {
        self.require(&[SetupState::KeysReady, SetupState::CollectingCommitments])?;
        let index = self.config.check_index(index)?;
        if self.commitments.contains_key(&index) {
            return Err(Error::DuplicateIndex { index });
        }
        commitment
            .check_compatible(&self.cryptosystem, &self.config)
            .inspect_err(|e| warn!(%index, error = %e, "incompatible commitment rejected"))?;

        self.commitments.insert(index, commitment);
        debug!(%index, received = self.commitments.len(), "trustee commitment added");

        if self.commitments.len() == self.config.num_trustees as usize {
            self.transition(SetupState::CommitmentsReady);
        } else if self.state == SetupState::KeysReady {
            self.transition(SetupState::CollectingCommitments);
        }
        Ok(())
    }

    /// The fingerprint of the collected commitment set.
    ///
    /// All participants must compare their fingerprints before trusting the
    /// generated key: equal fingerprints mean equal commitment sets.
    pub fn get_fingerprint(&self) -> Result<Fingerprint, Error> {
        self.require(&[SetupState::CommitmentsReady, SetupState::KeyGenerated])?;
        Ok(fingerprint::setup_fingerprint(
            &self.cryptosystem,
            &self.config,
            &self.commitments,
        ))
    }

    /// Combines the commitments into the joint public key.
    ///
    /// This needs no secret and can be run by any participant. A trustee may
    /// still call [`SetupSession::generate_key_pair`] afterwards.
    pub fn generate_public_key(&mut self) -> Result<ThresholdPublicKey<C>, Error> {
        self.require(&[SetupState::CommitmentsReady])?;
        let public_key =
            ThresholdPublicKey::from_commitments(&self.cryptosystem, self.config, &self.commitments)?;
        self.transition(SetupState::KeyGenerated);
        info!(fingerprint = %public_key.fingerprint(), "threshold public key generated");
        Ok(public_key)
    }

    /// Combines the commitments into the joint public key and recovers the
    /// private key share of trustee `index`, the owner of `private_key`.
    ///
    /// Every share addressed to `index` is decrypted and checked against its
    /// dealer's public coefficients. If any check fails the session moves to
    /// [`SetupState::Failed`] and the dealer is reported as the culprit.
    ///
    /// Valid in [`SetupState::CommitmentsReady`] and, after
    /// [`SetupSession::generate_public_key`], in [`SetupState::KeyGenerated`].
    pub fn generate_key_pair(
        &mut self,
        index: u16,
        private_key: &PrivateKey<C>,
    ) -> Result<(ThresholdPublicKey<C>, ThresholdPrivateKeyShare<C>), Error> {
        self.require(&[SetupState::CommitmentsReady, SetupState::KeyGenerated])?;
        let index = self.config.check_index(index)?;
        if *C::private_key_parameters(private_key) != self.cryptosystem {
            return Err(Mismatch::Parameters.into());
        }
        let public_key = self
            .public_keys
            .get(&index)
            .ok_or(Mismatch::MissingPublicKey(index))?;
        if !self.cryptosystem.is_key_pair(private_key, public_key) {
            return Err(Mismatch::PrivateKey(index).into());
        }

        let threshold_public_key =
            ThresholdPublicKey::from_commitments(&self.cryptosystem, self.config, &self.commitments)?;

        let share = match self.combine_shares(index, private_key) {
            Ok(share) => share,
            Err(e) => {
                error!(%index, error = %e, "share verification failed, setup must be restarted");
                self.transition(SetupState::Failed);
                return Err(e);
            }
        };

        self.transition(SetupState::KeyGenerated);
        info!(
            %index,
            fingerprint = %threshold_public_key.fingerprint(),
            "threshold key pair generated"
        );
        Ok((
            threshold_public_key,
            ThresholdPrivateKeyShare::new(index, self.config, share),
        ))
    }

    /// Decrypts and verifies P_i(j) for every dealer i and returns
    /// s_j = Σ_i P_i(j).
    fn combine_shares(
        &self,
        recipient: TrusteeIndex,
        private_key: &PrivateKey<C>,
    ) -> Result<C::Scalar, Error> {
        let cs = &self.cryptosystem;
        let mut signing_share = Zeroizing::new(cs.zero());

        for (dealer, commitment) in &self.commitments {
            let dealer = *dealer;
            let encrypted_share = commitment
                .encrypted_share(recipient)
                .ok_or(Error::CommitmentVerification { culprit: dealer })?;

            // A share that does not even decrypt is as bad as a wrong one.
            let share = Zeroizing::new(
                cs.decrypt(private_key, encrypted_share.ciphertext())
                    .map_err(|_| Error::CommitmentVerification { culprit: dealer })?,
            );

            verify_share(
                cs,
                dealer,
                recipient,
                &share,
                commitment.public_coefficients(),
            )?;

            *signing_share = cs.add(&signing_share, &share);
        }

        Ok((*signing_share).clone())
    }
}
