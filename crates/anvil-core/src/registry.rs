//! Supported coins and their standard derivation paths

use crate::codec::{AddressCodec, BitcoinParams};
use crate::error::{Result, WalletError};
use crate::keys::Curve;
use crate::path::{DerivationPath, PathProfile};

/// Static description of one supported coin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoinDescriptor {
    /// Ticker, e.g. `BTC`.
    pub symbol: &'static str,
    pub name: &'static str,
    /// SLIP-44 coin type.
    pub coin_type: u32,
    pub codec: AddressCodec,
    /// EVM chain identifier. The codec does not use it; callers building
    /// transactions do.
    pub chain_id: Option<u64>,
    /// Paths a full wallet pass derives, in order.
    pub standard_paths: &'static [&'static str],
}

impl CoinDescriptor {
    pub fn curve(&self) -> Curve {
        self.codec.curve()
    }

    pub fn profile(&self) -> PathProfile {
        self.codec.profile()
    }

    /// Parse `text` with this coin's path profile.
    pub fn parse_path(&self, text: &str) -> Result<DerivationPath> {
        DerivationPath::parse(text, self.profile())
    }
}

static COINS: [CoinDescriptor; 6] = [
    CoinDescriptor {
        symbol: "BTC",
        name: "Bitcoin",
        coin_type: 0,
        codec: AddressCodec::Bitcoin(BitcoinParams::BITCOIN),
        chain_id: None,
        standard_paths: &["m/44'/0'/0'/0/0", "m/49'/0'/0'/0/0", "m/84'/0'/0'/0/0"],
    },
    CoinDescriptor {
        symbol: "DOGE",
        name: "Dogecoin",
        coin_type: 3,
        codec: AddressCodec::Bitcoin(BitcoinParams::DOGECOIN),
        chain_id: None,
        standard_paths: &["m/44'/3'/0'/0/0", "m/49'/3'/0'/0/0", "m/84'/3'/0'/0/0"],
    },
    CoinDescriptor {
        symbol: "ETH",
        name: "Ethereum",
        coin_type: 60,
        codec: AddressCodec::Ethereum,
        chain_id: Some(1),
        standard_paths: &["m/44'/60'/0'/0/0", "m/44'/60'/0'/0/1", "m/44'/60'/1'/0/0"],
    },
    CoinDescriptor {
        symbol: "BNB",
        name: "BNB Smart Chain",
        coin_type: 60,
        codec: AddressCodec::Ethereum,
        chain_id: Some(56),
        standard_paths: &["m/44'/60'/0'/0/0", "m/44'/60'/0'/0/1", "m/44'/60'/1'/0/0"],
    },
    CoinDescriptor {
        symbol: "TRX",
        name: "TRON",
        coin_type: 195,
        codec: AddressCodec::Tron,
        chain_id: None,
        standard_paths: &["m/44'/195'/0'/0/0", "m/44'/195'/0'/0/1", "m/44'/195'/1'/0/0"],
    },
    CoinDescriptor {
        symbol: "SOL",
        name: "Solana",
        coin_type: 501,
        codec: AddressCodec::Solana,
        chain_id: None,
        standard_paths: &["m/44'/501'/0'/0'", "m/44'/501'/1'/0'", "m/44'/501'/2'/0'"],
    },
];

/// Every supported coin, in display order.
pub fn all() -> &'static [CoinDescriptor] {
    &COINS
}

/// Find a coin by ticker. Matching ignores ASCII case.
pub fn lookup(symbol: &str) -> Result<&'static CoinDescriptor> {
    COINS
        .iter()
        .find(|coin| coin.symbol.eq_ignore_ascii_case(symbol))
        .ok_or_else(|| WalletError::UnsupportedCoin(symbol.to_string()))
}

/// The ordered standard paths for `symbol`.
pub fn standard_paths(symbol: &str) -> Result<&'static [&'static str]> {
    Ok(lookup(symbol)?.standard_paths)
}
