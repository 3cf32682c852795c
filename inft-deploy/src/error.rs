use ethabi::{Address, Hash};
use std::{path::PathBuf, time::Duration};
use thiserror::Error;

/// Everything a deployment routine can fail with.
///
/// Nothing is retried or rolled back: contracts deployed before the failing step stay deployed.
#[derive(Error, Debug)]
pub enum DeployError {
    /// A binder was supplied together with a token address it is not bound to.
    ///
    /// Raised before any transaction of the failing call is submitted.
    #[error("{contract} address mismatch: supplied {supplied:#x}, binder records {recorded:#x}")]
    AddressMismatch {
        contract: &'static str,
        supplied: Address,
        recorded: Address,
    },
    #[error("artifact `{name}` not found at {}", path.display())]
    ArtifactNotFound { name: String, path: PathBuf },
    #[error("invalid artifact `{name}`: {reason}")]
    Artifact { name: String, reason: String },
    #[error("`{name}` has no bytecode, interfaces and abstract contracts cannot be deployed")]
    NotDeployable { name: String },
    #[error("ABI error in `{contract}`: {reason}")]
    Abi { contract: String, reason: String },
    #[error("node returned JSON-RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("invalid node URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("{contract}.{method} reverted in transaction {tx_hash:#x}")]
    Reverted {
        contract: String,
        method: String,
        tx_hash: Hash,
    },
    #[error("transaction {tx_hash:#x} was not mined within {waited:?}")]
    Timeout { tx_hash: Hash, waited: Duration },
    #[error("receipt of transaction {tx_hash:#x} carries no contract address")]
    MissingContractAddress { tx_hash: Hash },
    #[error("malformed node response: {0}")]
    Decode(String),
}

impl DeployError {
    pub(crate) fn abi(contract: &str, reason: impl ToString) -> Self {
        DeployError::Abi {
            contract: contract.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn artifact(name: &str, reason: impl ToString) -> Self {
        DeployError::Artifact {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn is_address_mismatch(&self) -> bool {
        matches!(self, DeployError::AddressMismatch { .. })
    }

    /// True for failures reported by the chain itself (reverts and JSON-RPC errors), as opposed to
    /// local artifact/ABI problems or transport failures.
    pub fn is_chain_failure(&self) -> bool {
        matches!(
            self,
            DeployError::Reverted { .. } | DeployError::Rpc { .. } | DeployError::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_message_names_both_addresses() {
        let err = DeployError::AddressMismatch {
            contract: "AliERC20v2",
            supplied: Address::from_low_u64_be(1),
            recorded: Address::from_low_u64_be(2),
        };
        assert!(err.is_address_mismatch());
        assert!(!err.is_chain_failure());
        assert_eq!(
            err.to_string(),
            "AliERC20v2 address mismatch: \
             supplied 0x0000000000000000000000000000000000000001, \
             binder records 0x0000000000000000000000000000000000000002"
        );
    }

    #[test]
    fn reverts_are_chain_failures() {
        let err = DeployError::Reverted {
            contract: "FixedSupplySaleMock".into(),
            method: "initialize".into(),
            tx_hash: Hash::from_low_u64_be(7),
        };
        assert!(err.is_chain_failure());
        assert!(!err.is_address_mismatch());
        assert!(err.to_string().starts_with("FixedSupplySaleMock.initialize reverted"));
    }
}
