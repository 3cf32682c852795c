//! Compiled contract artifacts: the ABI and creation bytecode produced by Truffle, Hardhat or Foundry.

use crate::{
    constants::{ARTIFACTS_DIR_ENV, DEFAULT_ARTIFACTS_DIR},
    error::DeployError,
    util::encode::parse_hex_data,
};
use inft_tracing::println_warning;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// A deployable contract: its ABI and creation (init) bytecode.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub contract_name: String,
    pub abi: ethabi::Contract,
    pub bytecode: Vec<u8>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArtifactFile {
    contract_name: Option<String>,
    abi: serde_json::Value,
    #[serde(default)]
    bytecode: Option<BytecodeField>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BytecodeField {
    /// Truffle and Hardhat: `"bytecode": "0x6080..."`
    Hex(String),
    /// Foundry: `"bytecode": { "object": "0x6080...", "linkReferences": {} }`
    Object { object: String },
}

impl BytecodeField {
    fn hex(&self) -> &str {
        match self {
            BytecodeField::Hex(hex) => hex,
            BytecodeField::Object { object } => object,
        }
    }
}

impl Artifact {
    /// Parses an artifact file. `name` is the name the artifact was requested under, used for
    /// error messages and as the contract name when the file does not record one.
    pub fn from_json_str(name: &str, json: &str) -> Result<Self, DeployError> {
        let file: ArtifactFile =
            serde_json::from_str(json).map_err(|e| DeployError::artifact(name, e))?;
        let abi: ethabi::Contract = serde_json::from_value(file.abi)
            .map_err(|e| DeployError::artifact(name, format!("invalid ABI: {e}")))?;

        let hex = file.bytecode.as_ref().map(BytecodeField::hex).unwrap_or("");
        // Truffle writes `__LibName___...`, solc >= 0.5 writes `__$<hash>$__`.
        if hex.contains("__") {
            return Err(DeployError::artifact(
                name,
                "bytecode contains unlinked library references",
            ));
        }
        let bytecode =
            parse_hex_data(hex).map_err(|e| DeployError::artifact(name, e.to_string()))?;
        if bytecode.is_empty() {
            return Err(DeployError::NotDeployable {
                name: name.to_string(),
            });
        }

        let contract_name = match file.contract_name {
            Some(recorded) if recorded != name => {
                println_warning(&format!(
                    "artifact requested as `{name}` declares contract `{recorded}`"
                ));
                recorded
            }
            Some(recorded) => recorded,
            None => name.to_string(),
        };

        Ok(Artifact {
            contract_name,
            abi,
            bytecode,
        })
    }
}

/// Resolves artifacts by contract name from a build output directory, one `<Name>.json` per contract.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Uses `INFT_ARTIFACTS_DIR` if set, `build/contracts` otherwise.
    pub fn from_env() -> Self {
        let dir = std::env::var_os(ARTIFACTS_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ARTIFACTS_DIR));
        Self::new(dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Accepts `"./Name"`, `"Name"` and `"Name.json"`.
    pub fn path_of(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", normalize_name(name)))
    }

    pub fn require(&self, name: &str) -> Result<Artifact, DeployError> {
        let name = normalize_name(name);
        let path = self.path_of(name);
        let json = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DeployError::ArtifactNotFound {
                name: name.to_string(),
                path: path.clone(),
            },
            _ => DeployError::artifact(name, format!("failed to read {}: {e}", path.display())),
        })?;
        tracing::debug!("loaded artifact {name} from {}", path.display());
        Artifact::from_json_str(name, &json)
    }
}

fn normalize_name(name: &str) -> &str {
    let name = name.strip_prefix("./").unwrap_or(name);
    name.strip_suffix(".json").unwrap_or(name)
}
