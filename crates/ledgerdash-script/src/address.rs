//! Shelley address handling.
//!
//! Supports base, pointer, enterprise and reward addresses in both their
//! binary form (header byte followed by credential hashes) and their bech32
//! text form. The header's high nibble encodes the address type together
//! with the key/script discriminator of each credential; the low nibble is
//! the network id.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use ledgerdash_primitives::Hash28;

use crate::bech32;
use crate::credential::Credential;
use crate::error::ScriptError;

const HASH_LEN: usize = 28;

const TYPE_BASE: u8 = 0b0000;
const TYPE_POINTER: u8 = 0b0100;
const TYPE_ENTERPRISE: u8 = 0b0110;
const TYPE_REWARD: u8 = 0b1110;

/// Network discriminator stored in the address header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NetworkId {
    Testnet = 0,
    Mainnet = 1,
}

impl NetworkId {
    fn from_header(header: u8) -> Result<Self, ScriptError> {
        match header & 0x0f {
            0 => Ok(NetworkId::Testnet),
            1 => Ok(NetworkId::Mainnet),
            other => Err(ScriptError::MalformedAddress(format!("unknown network id {}", other))),
        }
    }

    fn address_hrp(self) -> &'static str {
        match self {
            NetworkId::Mainnet => "addr",
            NetworkId::Testnet => "addr_test",
        }
    }

    fn reward_hrp(self) -> &'static str {
        match self {
            NetworkId::Mainnet => "stake",
            NetworkId::Testnet => "stake_test",
        }
    }
}

/// A named Cardano network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Preprod,
    Preview,
}

impl Network {
    /// Network id carried in the address header. Both test networks share id 0.
    pub fn id(self) -> NetworkId {
        match self {
            Network::Mainnet => NetworkId::Mainnet,
            Network::Preprod | Network::Preview => NetworkId::Testnet,
        }
    }
}

impl From<Network> for NetworkId {
    fn from(network: Network) -> Self {
        network.id()
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => f.write_str("mainnet"),
            Network::Preprod => f.write_str("preprod"),
            Network::Preview => f.write_str("preview"),
        }
    }
}

impl FromStr for Network {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "preprod" => Ok(Network::Preprod),
            "preview" => Ok(Network::Preview),
            other => Err(ScriptError::UnknownNetwork(other.to_string())),
        }
    }
}

/// Location of a stake registration certificate on chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pointer {
    /// Slot of the block holding the certificate.
    pub slot: u64,
    pub tx_index: u64,
    pub cert_index: u64,
}

fn write_natural(out: &mut Vec<u8>, value: u64) {
    let mut groups = vec![(value & 0x7f) as u8];
    let mut rest = value >> 7;
    while rest > 0 {
        groups.push((rest & 0x7f) as u8 | 0x80);
        rest >>= 7;
    }
    out.extend(groups.iter().rev());
}

fn read_natural(data: &[u8], pos: &mut usize) -> Result<u64, ScriptError> {
    let mut value = 0u64;
    loop {
        let byte = *data
            .get(*pos)
            .ok_or_else(|| ScriptError::MalformedAddress("truncated pointer".to_string()))?;
        *pos += 1;
        if value > (u64::MAX >> 7) {
            return Err(ScriptError::MalformedAddress("pointer value overflows".to_string()));
        }
        value = (value << 7) | u64::from(byte & 0x7f);
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
}

/// The delegation part of a Shelley payment address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StakeReference {
    None,
    Credential(Credential),
    Pointer(Pointer),
}

/// An address that can hold funds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShelleyAddress {
    pub network: NetworkId,
    pub payment: Credential,
    pub stake: StakeReference,
}

/// A stake (reward) account address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RewardAddress {
    pub network: NetworkId,
    pub stake: Credential,
}

/// Any supported Shelley-era address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Address {
    Shelley(ShelleyAddress),
    Reward(RewardAddress),
}

fn credential_bit(credential: &Credential) -> u8 {
    u8::from(credential.is_script())
}

fn read_credential(data: &[u8], offset: usize, script: bool) -> Result<Credential, ScriptError> {
    let bytes = data
        .get(offset..offset + HASH_LEN)
        .ok_or_else(|| ScriptError::MalformedAddress("truncated credential".to_string()))?;
    let hash = Hash28::from_slice(bytes)?;
    Ok(if script {
        Credential::Script(hash)
    } else {
        Credential::Key(hash)
    })
}

impl Address {
    /// Network id from the header byte.
    pub fn network(&self) -> NetworkId {
        match self {
            Address::Shelley(a) => a.network,
            Address::Reward(a) => a.network,
        }
    }

    /// The payment credential, absent for reward addresses.
    pub fn payment(&self) -> Option<Credential> {
        match self {
            Address::Shelley(a) => Some(a.payment),
            Address::Reward(_) => None,
        }
    }

    /// The staking credential, if the address carries one directly.
    pub fn stake_credential(&self) -> Option<Credential> {
        match self {
            Address::Shelley(ShelleyAddress {
                stake: StakeReference::Credential(c),
                ..
            }) => Some(*c),
            Address::Shelley(_) => None,
            Address::Reward(a) => Some(a.stake),
        }
    }

    /// Serialize to the binary address form.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + 2 * HASH_LEN);
        match self {
            Address::Shelley(a) => {
                let pay = credential_bit(&a.payment);
                let header_type = match &a.stake {
                    StakeReference::Credential(stake) => TYPE_BASE | (credential_bit(stake) << 1) | pay,
                    StakeReference::Pointer(_) => TYPE_POINTER | pay,
                    StakeReference::None => TYPE_ENTERPRISE | pay,
                };
                out.push((header_type << 4) | a.network as u8);
                out.extend_from_slice(a.payment.hash().as_bytes());
                match &a.stake {
                    StakeReference::Credential(stake) => out.extend_from_slice(stake.hash().as_bytes()),
                    StakeReference::Pointer(p) => {
                        write_natural(&mut out, p.slot);
                        write_natural(&mut out, p.tx_index);
                        write_natural(&mut out, p.cert_index);
                    }
                    StakeReference::None => {}
                }
            }
            Address::Reward(a) => {
                let header_type = TYPE_REWARD | credential_bit(&a.stake);
                out.push((header_type << 4) | a.network as u8);
                out.extend_from_slice(a.stake.hash().as_bytes());
            }
        }
        out
    }

    /// Parse the binary address form.
    pub fn from_bytes(data: &[u8]) -> Result<Self, ScriptError> {
        let header = *data
            .first()
            .ok_or_else(|| ScriptError::MalformedAddress("empty address".to_string()))?;
        let network = NetworkId::from_header(header)?;
        let header_type = header >> 4;

        let (address, consumed) = match header_type {
            0..=3 => {
                let payment = read_credential(data, 1, header_type & 1 == 1)?;
                let stake = read_credential(data, 1 + HASH_LEN, header_type & 2 == 2)?;
                let address = ShelleyAddress {
                    network,
                    payment,
                    stake: StakeReference::Credential(stake),
                };
                (Address::Shelley(address), 1 + 2 * HASH_LEN)
            }
            4 | 5 => {
                let payment = read_credential(data, 1, header_type & 1 == 1)?;
                let mut pos = 1 + HASH_LEN;
                let pointer = Pointer {
                    slot: read_natural(data, &mut pos)?,
                    tx_index: read_natural(data, &mut pos)?,
                    cert_index: read_natural(data, &mut pos)?,
                };
                let address = ShelleyAddress {
                    network,
                    payment,
                    stake: StakeReference::Pointer(pointer),
                };
                (Address::Shelley(address), pos)
            }
            6 | 7 => {
                let payment = read_credential(data, 1, header_type & 1 == 1)?;
                let address = ShelleyAddress {
                    network,
                    payment,
                    stake: StakeReference::None,
                };
                (Address::Shelley(address), 1 + HASH_LEN)
            }
            14 | 15 => {
                let stake = read_credential(data, 1, header_type & 1 == 1)?;
                (Address::Reward(RewardAddress { network, stake }), 1 + HASH_LEN)
            }
            other => {
                return Err(ScriptError::MalformedAddress(format!(
                    "unsupported address type {}",
                    other
                )))
            }
        };

        if consumed != data.len() {
            return Err(ScriptError::MalformedAddress(format!(
                "{} trailing bytes",
                data.len().saturating_sub(consumed)
            )));
        }
        Ok(address)
    }

    fn hrp(&self) -> &'static str {
        match self {
            Address::Shelley(a) => a.network.address_hrp(),
            Address::Reward(a) => a.network.reward_hrp(),
        }
    }

    /// Bech32 form with the network's human-readable prefix.
    ///
    /// # Returns
    /// `addr…`/`addr_test…` for Shelley addresses, `stake…`/`stake_test…` for reward addresses.
    pub fn to_bech32(&self) -> String {
        // hrp is a fixed lowercase constant, so encoding cannot fail
        bech32::encode(self.hrp(), &self.to_bytes()).unwrap_or_default()
    }

    /// Parse a bech32 address.
    ///
    /// # Arguments
    /// * `text` - Bech32 string; its prefix must agree with the network in the header.
    ///
    /// # Returns
    /// The decoded address, or `Bech32` / `MalformedAddress` on failure.
    pub fn from_bech32(text: &str) -> Result<Self, ScriptError> {
        let (hrp, data) = bech32::decode(text)?;
        let address = Address::from_bytes(&data)?;
        if address.hrp() != hrp {
            return Err(ScriptError::MalformedAddress(format!(
                "prefix '{}' does not match address header",
                hrp
            )));
        }
        Ok(address)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_bech32())
    }
}

impl FromStr for Address {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::from_bech32(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_bech32())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::from_bech32(&s).map_err(serde::de::Error::custom)
    }
}

/// Payment credential of `address`.
///
/// Reward addresses have no payment part and yield `MalformedAddress`.
pub fn payment_credential(address: &Address) -> Result<Credential, ScriptError> {
    address
        .payment()
        .ok_or_else(|| ScriptError::MalformedAddress(format!("{} has no payment credential", address)))
}

/// Combine a payment credential and an optional staking credential.
///
/// Pure: the same triple always yields the same address. The key/script
/// discriminator of each credential is carried into the header.
pub fn derive_address(network: Network, payment: Credential, staking: Option<Credential>) -> Address {
    Address::Shelley(ShelleyAddress {
        network: network.id(),
        payment,
        stake: staking.map_or(StakeReference::None, StakeReference::Credential),
    })
}
