//! Hierarchical deterministic key derivation
//!
//! Two schemes, selected by [`Curve`]:
//!
//! - **secp256k1 (BIP-32)**: master key from `HMAC-SHA512("Bitcoin seed", seed)`,
//!   hardened and normal children.
//! - **ed25519 (SLIP-0010)**: master key from `HMAC-SHA512("ed25519 seed", seed)`,
//!   hardened children only. Ed25519 has no public-parent derivation, so a
//!   normal component is rejected rather than approximated.
//!
//! Every intermediate private key and chain code lives in a [`SecureBuffer`]
//! and is wiped as soon as the next level replaces it.

use std::fmt;

use bitcoin::hashes::{hash160, sha512, Hash, HashEngine, Hmac, HmacEngine};
use secp256k1::{PublicKey, Scalar, Secp256k1, SecretKey, Signing};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::{Result, WalletError};
use crate::memory::SecureBuffer;
use crate::path::{ChildIndex, DerivationPath, HARDENED_OFFSET};
use crate::seed::Seed;

const BITCOIN_SEED_KEY: &[u8] = b"Bitcoin seed";
const ED25519_SEED_KEY: &[u8] = b"ed25519 seed";

/// Elliptic curve (and therefore derivation scheme) of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Curve {
    Secp256k1,
    Ed25519,
}

/// What to do when BIP-32 produces an unusable child scalar
/// (`I_L >= n` or a zero child key).
///
/// The event has probability below 2^-127 per step; the policy exists so the
/// behaviour is defined rather than accidental.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChildPolicy {
    /// Move to the next index at the same level, as BIP-32 prescribes.
    /// The derived key records the index actually used.
    #[default]
    Retry,
    /// Return [`WalletError::KeyDerivationFailure`].
    Fail,
}

/// A private key together with its chain code and position in the tree.
pub struct ExtendedKey {
    curve: Curve,
    secret: SecureBuffer,
    chain_code: SecureBuffer,
    depth: u8,
    parent_fingerprint: [u8; 4],
    path: Vec<ChildIndex>,
}

impl ExtendedKey {
    /// BIP-32 master key for secp256k1.
    pub fn secp256k1_master(seed: &[u8]) -> Result<Self> {
        let (secret, chain_code) = split_hmac(BITCOIN_SEED_KEY, &[seed]);
        let mut check = SecretKey::from_slice(secret.as_slice()).map_err(|_| {
            WalletError::KeyDerivationFailure("seed produces an invalid master key".into())
        })?;
        check.non_secure_erase();
        Ok(Self::root(Curve::Secp256k1, secret, chain_code))
    }

    /// SLIP-0010 master key for ed25519. Every 32-byte string is a valid key.
    pub fn ed25519_master(seed: &[u8]) -> Self {
        let (secret, chain_code) = split_hmac(ED25519_SEED_KEY, &[seed]);
        Self::root(Curve::Ed25519, secret, chain_code)
    }

    fn root(curve: Curve, secret: SecureBuffer, chain_code: SecureBuffer) -> Self {
        Self {
            curve,
            secret,
            chain_code,
            depth: 0,
            parent_fingerprint: [0; 4],
            path: Vec::new(),
        }
    }

    /// Derive one child. Fails if the child is unusable or the step is not
    /// defined for this curve; no retry happens here.
    pub fn derive_child<C: Signing>(&self, secp: &Secp256k1<C>, child: ChildIndex) -> Result<Self> {
        if child.index >= HARDENED_OFFSET {
            return Err(WalletError::KeyDerivationFailure(format!(
                "child index {} out of range",
                child.index
            )));
        }
        let index_bytes = child.to_u32().to_be_bytes();

        let (secret, chain_code) = match self.curve {
            Curve::Secp256k1 => {
                let mut parent = self.secp256k1_secret()?;
                let parent_public = PublicKey::from_secret_key(secp, &parent);

                let (tweak, chain_code) = if child.hardened {
                    split_hmac(
                        self.chain_code.as_slice(),
                        &[&[0u8][..], self.secret.as_slice(), &index_bytes[..]],
                    )
                } else {
                    split_hmac(
                        self.chain_code.as_slice(),
                        &[&parent_public.serialize()[..], &index_bytes[..]],
                    )
                };

                let derived = tweak_secret(&parent, tweak.as_slice());
                parent.non_secure_erase();
                let mut derived = derived.ok_or_else(|| {
                    WalletError::KeyDerivationFailure(format!("unusable child key at index {}", child))
                })?;
                let mut bytes = derived.secret_bytes();
                derived.non_secure_erase();
                (SecureBuffer::take(&mut bytes), chain_code)
            }
            Curve::Ed25519 => {
                if !child.hardened {
                    return Err(WalletError::KeyDerivationFailure(format!(
                        "ed25519 supports hardened derivation only, got {}",
                        child
                    )));
                }
                split_hmac(
                    self.chain_code.as_slice(),
                    &[&[0u8][..], self.secret.as_slice(), &index_bytes[..]],
                )
            }
        };

        let mut path = self.path.clone();
        path.push(child);
        Ok(Self {
            curve: self.curve,
            secret,
            chain_code,
            depth: self.depth.saturating_add(1),
            parent_fingerprint: self.fingerprint()?,
            path,
        })
    }

    pub fn curve(&self) -> Curve {
        self.curve
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn parent_fingerprint(&self) -> [u8; 4] {
        self.parent_fingerprint
    }

    /// The child index of this key; `None` for a master key.
    pub fn child_index(&self) -> Option<ChildIndex> {
        self.path.last().copied()
    }

    /// The indices actually walked from the master key.
    pub fn path(&self) -> &[ChildIndex] {
        &self.path
    }

    /// Raw 32-byte private key.
    pub fn secret_bytes(&self) -> &[u8] {
        self.secret.as_slice()
    }

    pub fn chain_code(&self) -> &[u8] {
        self.chain_code.as_slice()
    }

    /// First four bytes of HASH160 of the serialized public key.
    pub fn fingerprint(&self) -> Result<[u8; 4]> {
        let public = match self.curve {
            Curve::Secp256k1 => self.secp256k1_public_key()?.serialize().to_vec(),
            Curve::Ed25519 => {
                let mut prefixed = vec![0u8];
                prefixed.extend_from_slice(&self.ed25519_public_key()?);
                prefixed
            }
        };
        let digest = hash160::Hash::hash(&public).to_byte_array();
        let mut fingerprint = [0u8; 4];
        fingerprint.copy_from_slice(&digest[..4]);
        Ok(fingerprint)
    }

    fn secp256k1_secret(&self) -> Result<SecretKey> {
        if self.curve != Curve::Secp256k1 {
            return Err(WalletError::KeyDerivationFailure(
                "not a secp256k1 key".into(),
            ));
        }
        SecretKey::from_slice(self.secret.as_slice())
            .map_err(|e| WalletError::KeyDerivationFailure(e.to_string()))
    }

    /// The secp256k1 public key of this node.
    pub fn secp256k1_public_key(&self) -> Result<PublicKey> {
        let secp = Secp256k1::signing_only();
        let mut secret = self.secp256k1_secret()?;
        let public = PublicKey::from_secret_key(&secp, &secret);
        secret.non_secure_erase();
        Ok(public)
    }

    /// The 32-byte ed25519 public key of this node.
    pub fn ed25519_public_key(&self) -> Result<[u8; 32]> {
        if self.curve != Curve::Ed25519 {
            return Err(WalletError::KeyDerivationFailure("not an ed25519 key".into()));
        }
        let secret = self
            .secret
            .to_array::<32>()
            .ok_or_else(|| WalletError::KeyDerivationFailure("bad ed25519 key length".into()))?;
        let signing = ed25519_dalek::SigningKey::from_bytes(&secret);
        Ok(signing.verifying_key().to_bytes())
    }
}

impl fmt::Debug for ExtendedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedKey")
            .field("curve", &self.curve)
            .field("depth", &self.depth)
            .field("parent_fingerprint", &hex::encode(self.parent_fingerprint))
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// `parent + I_L mod n`, or `None` when `I_L >= n` or the sum is zero.
fn tweak_secret(parent: &SecretKey, tweak: &[u8]) -> Option<SecretKey> {
    let mut bytes = Zeroizing::new([0u8; 32]);
    bytes.copy_from_slice(tweak);
    let mut scalar = Scalar::from_be_bytes(*bytes).ok()?;
    let child = parent.add_tweak(&scalar).ok();
    // SAFETY: `scalar` is a live, aligned local owned by this frame.
    unsafe { std::ptr::write_volatile(&mut scalar, Scalar::ZERO) };
    std::sync::atomic::compiler_fence(std::sync::atomic::Ordering::SeqCst);
    child
}

/// HMAC-SHA512 over the concatenation of `parts`, split into (I_L, I_R).
fn split_hmac(key: &[u8], parts: &[&[u8]]) -> (SecureBuffer, SecureBuffer) {
    let mut engine = HmacEngine::<sha512::Hash>::new(key);
    for part in parts {
        engine.input(part);
    }
    let mut output = Hmac::<sha512::Hash>::from_engine(engine).to_byte_array();
    let left = SecureBuffer::from_slice(&output[..32]);
    let right = SecureBuffer::from_slice(&output[32..]);
    crate::memory::wipe(&mut output);
    (left, right)
}

fn next_index(child: ChildIndex) -> Option<ChildIndex> {
    let index = child.index.checked_add(1)?;
    (index < HARDENED_OFFSET).then_some(ChildIndex {
        index,
        hardened: child.hardened,
    })
}

/// Walk `components` from the BIP-32 master key of `seed`.
pub fn derive_secp256k1(
    seed: &[u8],
    components: &[ChildIndex],
    policy: ChildPolicy,
) -> Result<ExtendedKey> {
    let secp = Secp256k1::new();
    let master = ExtendedKey::secp256k1_master(seed)?;
    walk(master, components, policy, |key, child| key.derive_child(&secp, child))
}

/// Apply `step` once per component, starting from `key`.
///
/// Under [`ChildPolicy::Retry`] a failed step is repeated with the next index
/// at the same level until one succeeds or the index would reach 2^31. The
/// returned key's [`ExtendedKey::path`] holds the indices actually used.
pub(crate) fn walk<F>(
    mut key: ExtendedKey,
    components: &[ChildIndex],
    policy: ChildPolicy,
    mut step: F,
) -> Result<ExtendedKey>
where
    F: FnMut(&ExtendedKey, ChildIndex) -> Result<ExtendedKey>,
{
    for requested in components {
        let mut child = *requested;
        key = loop {
            match step(&key, child) {
                Ok(next) => break next,
                Err(err) if policy == ChildPolicy::Fail => return Err(err),
                Err(err) => {
                    let skipped = child;
                    child = next_index(child).ok_or(err)?;
                    log::trace!("child {} unusable, retrying with {}", skipped, child);
                }
            }
        };
    }
    Ok(key)
}

/// Walk `components` from the SLIP-0010 ed25519 master key of `seed`.
pub fn derive_ed25519(seed: &[u8], components: &[ChildIndex]) -> Result<ExtendedKey> {
    // The context is unused for ed25519 steps.
    let secp = Secp256k1::signing_only();
    let mut key = ExtendedKey::ed25519_master(seed);
    for child in components {
        key = key.derive_child(&secp, *child)?;
    }
    Ok(key)
}

/// Derive the key at `path` from `seed` on the given curve.
pub fn derive_key(
    seed: &Seed,
    path: &DerivationPath,
    curve: Curve,
    policy: ChildPolicy,
) -> Result<ExtendedKey> {
    log::debug!("deriving {:?} key at {}", curve, path);
    match curve {
        Curve::Secp256k1 => derive_secp256k1(seed.as_bytes(), path.components(), policy),
        Curve::Ed25519 => derive_ed25519(seed.as_bytes(), path.components()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PathProfile;
    use crate::seed::mnemonic_to_seed;

    const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    fn bip32_vector1_seed() -> Vec<u8> {
        hex::decode("000102030405060708090a0b0c0d0e0f").unwrap()
    }

    #[test]
    fn test_bip32_vector1_master() {
        let master = ExtendedKey::secp256k1_master(&bip32_vector1_seed()).unwrap();
        assert_eq!(
            hex::encode(master.secret_bytes()),
            "e8f32e723decf4051aefac8e2c93c9c5b214313817cdb01a1494b917c8436b35"
        );
        assert_eq!(
            hex::encode(master.chain_code()),
            "873dff81c02f525623fd1fe5167eac3a55a049de3d314bb42ee227ffc4a65133"
        );
        assert_eq!(master.depth(), 0);
        assert_eq!(master.child_index(), None);
        assert_eq!(hex::encode(master.fingerprint().unwrap()), "3442193e");
    }

    #[test]
    fn test_bip32_vector1_hardened_then_normal() {
        let seed = bip32_vector1_seed();

        let key = derive_secp256k1(&seed, &[ChildIndex::hardened(0)], ChildPolicy::Fail).unwrap();
        assert_eq!(
            hex::encode(key.secret_bytes()),
            "edb2e14f9ee77d26dd93b4ecede8d16ed408ce149b6cd80b0715a2d911a0afea"
        );
        assert_eq!(
            hex::encode(key.chain_code()),
            "47fdacbd0f1097043b78c63c20c34ef4ed9a111d980047ad16282c7ae6236141"
        );
        assert_eq!(hex::encode(key.parent_fingerprint()), "3442193e");

        let key = derive_secp256k1(
            &seed,
            &[ChildIndex::hardened(0), ChildIndex::normal(1)],
            ChildPolicy::Fail,
        )
        .unwrap();
        assert_eq!(
            hex::encode(key.secret_bytes()),
            "3c6cb8d0f6a264c91ea8b5030fadaa8e538b020f0a387421a12de9319dc93368"
        );
        assert_eq!(
            hex::encode(key.chain_code()),
            "2a7857631386ba23dacac34180dd1983734e444fdbf774041578e9b6adb37c19"
        );
        assert_eq!(key.depth(), 2);
        assert_eq!(key.child_index(), Some(ChildIndex::normal(1)));
    }

    #[test]
    fn test_slip10_ed25519_vector1() {
        let seed = bip32_vector1_seed();

        let master = ExtendedKey::ed25519_master(&seed);
        assert_eq!(
            hex::encode(master.secret_bytes()),
            "2b4be7f19ee27bbf30c667b642d5f4aa69fd169872f8fc3059c08ebae2eb19e7"
        );
        assert_eq!(
            hex::encode(master.chain_code()),
            "90046a93de5380a72b5e45010748567d5ea02bbf6522f979e05c0d8d8ca9fffb"
        );
        assert_eq!(
            hex::encode(master.ed25519_public_key().unwrap()),
            "a4b2856bfec510abab89753fac1ac0e1112364e7d250545963f135f2a33188ed"
        );

        let child = derive_ed25519(&seed, &[ChildIndex::hardened(0)]).unwrap();
        assert_eq!(
            hex::encode(child.secret_bytes()),
            "68e0fe46dfb67e368c75379acec591dad19df3cde26e63b93a8e704f1dade7a3"
        );
        assert_eq!(
            hex::encode(child.chain_code()),
            "8b59aa11380b624e81507a27fedda59fea6d0b779a778918a2fd3590e16e9c69"
        );
        assert_eq!(
            hex::encode(child.ed25519_public_key().unwrap()),
            "8c8a13df77a28f3445213a0f432fde644acaa215fc72dcdf300d5efaa85d350c"
        );
    }

    #[test]
    fn test_ed25519_rejects_normal_child() {
        let err = derive_ed25519(&bip32_vector1_seed(), &[ChildIndex::normal(0)]).unwrap_err();
        assert!(matches!(err, WalletError::KeyDerivationFailure(_)));
    }

    #[test]
    fn test_curve_mismatch_is_reported() {
        let master = ExtendedKey::ed25519_master(&bip32_vector1_seed());
        assert!(master.secp256k1_public_key().is_err());

        let master = ExtendedKey::secp256k1_master(&bip32_vector1_seed()).unwrap();
        assert!(master.ed25519_public_key().is_err());
    }

    #[test]
    fn test_derive_key_from_mnemonic_path() {
        let seed = mnemonic_to_seed(ABANDON, "").unwrap();
        let path = DerivationPath::parse("m/44'/0'/0'/0/0", PathProfile::Bip44).unwrap();
        let key = derive_key(&seed, &path, Curve::Secp256k1, ChildPolicy::default()).unwrap();
        assert_eq!(key.depth(), 5);
        assert_eq!(key.path(), path.components());
        assert_eq!(
            hex::encode(key.secp256k1_public_key().unwrap().serialize()),
            "03aaeb52dd7494c361049de67cc680e83ebcbbbdbeb13637d92cd845f70308af5e"
        );
    }

    #[test]
    fn test_tweak_out_of_range_is_rejected() {
        let parent = SecretKey::from_slice(&[1u8; 32]).unwrap();
        // The curve order n itself is not a valid scalar.
        let order =
            hex::decode("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141").unwrap();
        assert!(tweak_secret(&parent, &order).is_none());
        assert!(tweak_secret(&parent, &[0u8; 32]).is_some());
    }

    #[test]
    fn test_tweak_to_zero_is_rejected() {
        // parent = 1, tweak = n - 1 gives a zero child key.
        let mut one = [0u8; 32];
        one[31] = 1;
        let parent = SecretKey::from_slice(&one).unwrap();
        let n_minus_one =
            hex::decode("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364140").unwrap();
        assert!(tweak_secret(&parent, &n_minus_one).is_none());
    }

    #[test]
    fn test_next_index_stays_below_hardened_boundary() {
        assert_eq!(next_index(ChildIndex::normal(5)), Some(ChildIndex::normal(6)));
        assert_eq!(
            next_index(ChildIndex::hardened(7)),
            Some(ChildIndex::hardened(8))
        );
        assert_eq!(next_index(ChildIndex::hardened(HARDENED_OFFSET - 1)), None);
    }

    /// A real derivation step that reports index `bad` as unusable.
    fn step_failing_at(
        bad: u32,
    ) -> impl FnMut(&ExtendedKey, ChildIndex) -> Result<ExtendedKey> {
        let secp = Secp256k1::new();
        move |key: &ExtendedKey, child: ChildIndex| {
            if child.index == bad {
                return Err(WalletError::KeyDerivationFailure(format!(
                    "unusable child key at index {}",
                    child
                )));
            }
            key.derive_child(&secp, child)
        }
    }

    #[test]
    fn test_retry_records_next_index() {
        let seed = bip32_vector1_seed();
        let requested = [ChildIndex::hardened(0), ChildIndex::normal(4)];

        let master = ExtendedKey::secp256k1_master(&seed).unwrap();
        let key = walk(master, &requested, ChildPolicy::Retry, step_failing_at(4)).unwrap();
        assert_eq!(key.path(), &[ChildIndex::hardened(0), ChildIndex::normal(5)]);
        assert_eq!(key.child_index(), Some(ChildIndex::normal(5)));
        assert_eq!(key.depth(), 2);

        // Same key as asking for index 5 directly.
        let direct = derive_secp256k1(
            &seed,
            &[ChildIndex::hardened(0), ChildIndex::normal(5)],
            ChildPolicy::Fail,
        )
        .unwrap();
        assert_eq!(key.secret_bytes(), direct.secret_bytes());
        assert_eq!(key.chain_code(), direct.chain_code());
    }

    #[test]
    fn test_retry_keeps_hardened_flag() {
        let master = ExtendedKey::secp256k1_master(&bip32_vector1_seed()).unwrap();
        let key = walk(
            master,
            &[ChildIndex::hardened(7)],
            ChildPolicy::Retry,
            step_failing_at(7),
        )
        .unwrap();
        assert_eq!(key.path(), &[ChildIndex::hardened(8)]);
    }

    #[test]
    fn test_fail_policy_stops_at_unusable_child() {
        let master = ExtendedKey::secp256k1_master(&bip32_vector1_seed()).unwrap();
        let err = walk(
            master,
            &[ChildIndex::hardened(0), ChildIndex::normal(4)],
            ChildPolicy::Fail,
            step_failing_at(4),
        )
        .unwrap_err();
        assert!(matches!(err, WalletError::KeyDerivationFailure(_)));
    }

    #[test]
    fn test_retry_never_crosses_hardened_boundary() {
        let last = HARDENED_OFFSET - 1;
        let master = ExtendedKey::secp256k1_master(&bip32_vector1_seed()).unwrap();
        let err = walk(
            master,
            &[ChildIndex::normal(last)],
            ChildPolicy::Retry,
            step_failing_at(last),
        )
        .unwrap_err();
        assert!(matches!(err, WalletError::KeyDerivationFailure(_)));
    }

    #[test]
    fn test_debug_hides_key_material() {
        let master = ExtendedKey::secp256k1_master(&bip32_vector1_seed()).unwrap();
        let rendered = format!("{:?}", master);
        assert!(!rendered.contains("e8f32e72"));
        assert!(!rendered.contains("873dff81"));
    }
}
