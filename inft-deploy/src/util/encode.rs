//! Hex conversions for the JSON-RPC wire format, and serde helpers for the ethabi primitives.

use crate::error::DeployError;
use ethabi::{Address, Hash, Uint};
use serde::Serializer;

/// `0x`-prefixed lowercase hex, the encoding of `DATA` values in the Ethereum JSON-RPC API.
pub fn to_hex_data(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

pub fn format_address(address: &Address) -> String {
    format!("{address:#x}")
}

pub fn parse_hex_data(value: &str) -> Result<Vec<u8>, DeployError> {
    let digits = value.strip_prefix("0x").unwrap_or(value);
    hex::decode(digits).map_err(|e| DeployError::Decode(format!("invalid hex data `{value}`: {e}")))
}

/// Parses a `QUANTITY` value, e.g. a block number or a timestamp.
pub fn parse_quantity(value: &str) -> Result<u64, DeployError> {
    let digits = value.strip_prefix("0x").ok_or_else(|| {
        DeployError::Decode(format!("quantity `{value}` is missing the 0x prefix"))
    })?;
    u64::from_str_radix(digits, 16)
        .map_err(|e| DeployError::Decode(format!("invalid quantity `{value}`: {e}")))
}

pub fn parse_uint(value: &str) -> Result<Uint, DeployError> {
    let digits = value.strip_prefix("0x").unwrap_or(value);
    Uint::from_str_radix(digits, 16)
        .map_err(|e| DeployError::Decode(format!("invalid quantity `{value}`: {e:?}")))
}

pub fn parse_address(value: &str) -> Result<Address, DeployError> {
    let bytes = parse_hex_data(value)?;
    if bytes.len() != Address::len_bytes() {
        return Err(DeployError::Decode(format!(
            "`{value}` is not a 20-byte address"
        )));
    }
    Ok(Address::from_slice(&bytes))
}

pub fn parse_hash(value: &str) -> Result<Hash, DeployError> {
    let bytes = parse_hex_data(value)?;
    if bytes.len() != Hash::len_bytes() {
        return Err(DeployError::Decode(format!("`{value}` is not a 32-byte hash")));
    }
    Ok(Hash::from_slice(&bytes))
}

pub(crate) fn serialize_address<S: Serializer>(
    address: &Address,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_address(address))
}

/// Amounts are written as decimal strings, they routinely exceed the range of a JSON number.
pub(crate) fn serialize_uint<S: Serializer>(
    value: &Uint,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_string())
}
