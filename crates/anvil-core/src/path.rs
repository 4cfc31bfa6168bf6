//! Derivation path parsing
//!
//! Two profiles are supported, each with a fixed shape and hardening pattern:
//!
//! | Profile  | Grammar                             | Hardened        |
//! |----------|-------------------------------------|-----------------|
//! | `Bip44`  | `m/purpose'/coin'/account'/change/index` | first three |
//! | `Solana` | `m/purpose'/coin'/account'/index'`       | all         |
//!
//! Only `'` marks a hardened component and numbers must be written in
//! canonical decimal, so [`DerivationPath`]'s `Display` reproduces the
//! parsed text exactly.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WalletError};

/// Offset added to a hardened child index.
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// Which path grammar to enforce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathProfile {
    /// BIP-44 style, secp256k1 chains.
    Bip44,
    /// SLIP-0010 style, ed25519 (all hardened).
    Solana,
}

impl PathProfile {
    /// Hardening pattern, one entry per component.
    pub fn hardening(&self) -> &'static [bool] {
        match self {
            PathProfile::Bip44 => &[true, true, true, false, false],
            PathProfile::Solana => &[true, true, true, true],
        }
    }

    fn grammar(&self) -> &'static str {
        match self {
            PathProfile::Bip44 => "m/purpose'/coin_type'/account'/change/index",
            PathProfile::Solana => "m/purpose'/coin_type'/account'/index'",
        }
    }
}

/// One level of a derivation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChildIndex {
    /// Index without the hardened offset.
    pub index: u32,
    pub hardened: bool,
}

impl ChildIndex {
    pub fn hardened(index: u32) -> Self {
        Self {
            index,
            hardened: true,
        }
    }

    pub fn normal(index: u32) -> Self {
        Self {
            index,
            hardened: false,
        }
    }

    /// The 32-bit value serialized into the child derivation input.
    ///
    /// Indices are always below 2^31, so hardened and normal values never collide.
    pub fn to_u32(&self) -> u32 {
        if self.hardened {
            self.index | HARDENED_OFFSET
        } else {
            self.index
        }
    }
}

impl fmt::Display for ChildIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hardened {
            write!(f, "{}'", self.index)
        } else {
            write!(f, "{}", self.index)
        }
    }
}

/// A parsed, profile-checked derivation path.
///
/// Deserialization goes through [`DerivationPath::from_components`], so a
/// decoded path obeys the same shape rules as a parsed one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PathRepr")]
pub struct DerivationPath {
    profile: PathProfile,
    components: Vec<ChildIndex>,
}

#[derive(Deserialize)]
struct PathRepr {
    profile: PathProfile,
    components: Vec<ChildIndex>,
}

impl TryFrom<PathRepr> for DerivationPath {
    type Error = WalletError;

    fn try_from(repr: PathRepr) -> Result<Self> {
        Self::from_components(repr.profile, repr.components)
    }
}

impl DerivationPath {
    /// Parse `text` according to `profile`.
    pub fn parse(text: &str, profile: PathProfile) -> Result<Self> {
        let rest = text
            .strip_prefix("m/")
            .ok_or_else(|| invalid(text, "path must start with 'm/'"))?;

        let parts: Vec<&str> = rest.split('/').collect();
        let pattern = profile.hardening();
        if parts.len() != pattern.len() {
            return Err(invalid(
                text,
                &format!(
                    "expected {} components ({}), found {}",
                    pattern.len(),
                    profile.grammar(),
                    parts.len()
                ),
            ));
        }

        let components = parts
            .iter()
            .zip(pattern)
            .enumerate()
            .map(|(position, (part, &hardened))| {
                parse_component(part, hardened)
                    .map_err(|reason| invalid(text, &format!("component {}: {}", position, reason)))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            profile,
            components,
        })
    }

    /// Build a path from already-validated parts, checking the profile rules.
    pub fn from_components(profile: PathProfile, components: Vec<ChildIndex>) -> Result<Self> {
        let pattern = profile.hardening();
        let shape_ok = components.len() == pattern.len()
            && components
                .iter()
                .zip(pattern)
                .all(|(c, &h)| c.hardened == h && c.index < HARDENED_OFFSET);
        if !shape_ok {
            let rendered = format_components(&components);
            return Err(invalid(&rendered, "does not match the profile's hardening pattern"));
        }
        Ok(Self {
            profile,
            components,
        })
    }

    pub fn profile(&self) -> PathProfile {
        self.profile
    }

    pub fn components(&self) -> &[ChildIndex] {
        &self.components
    }

    pub fn purpose(&self) -> u32 {
        self.components[0].index
    }

    pub fn coin_type(&self) -> u32 {
        self.components[1].index
    }

    pub fn account(&self) -> u32 {
        self.components[2].index
    }

    /// The change level; Solana paths have none.
    pub fn change(&self) -> Option<u32> {
        match self.profile {
            PathProfile::Bip44 => Some(self.components[3].index),
            PathProfile::Solana => None,
        }
    }

    /// The last level of the path.
    pub fn address_index(&self) -> u32 {
        self.components[self.components.len() - 1].index
    }

    /// Render the path; the exact inverse of [`DerivationPath::parse`].
    pub fn format(&self) -> String {
        format_components(&self.components)
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

/// Parse `text` as a derivation path for `profile`.
pub fn parse_derivation_path(text: &str, profile: PathProfile) -> Result<DerivationPath> {
    DerivationPath::parse(text, profile)
}

fn format_components(components: &[ChildIndex]) -> String {
    let mut out = String::from("m");
    for component in components {
        out.push('/');
        out.push_str(&component.to_string());
    }
    out
}

fn parse_component(part: &str, must_be_hardened: bool) -> std::result::Result<ChildIndex, String> {
    let (digits, hardened) = match part.strip_suffix('\'') {
        Some(digits) => (digits, true),
        None => (part, false),
    };

    if must_be_hardened && !hardened {
        return Err("must be hardened (end with ')".into());
    }
    if !must_be_hardened && hardened {
        return Err("must not be hardened".into());
    }
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("'{}' is not an unsigned decimal number", digits));
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return Err(format!("'{}' has leading zeros", digits));
    }

    let index: u32 = digits
        .parse()
        .map_err(|_| format!("'{}' does not fit in 32 bits", digits))?;
    if index >= HARDENED_OFFSET {
        return Err(format!("index {} must be below 2^31", index));
    }

    Ok(ChildIndex { index, hardened })
}

fn invalid(path: &str, reason: &str) -> WalletError {
    WalletError::InvalidDerivationPath(format!("{}: {}", path, reason))
}
