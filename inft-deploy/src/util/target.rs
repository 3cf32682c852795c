use crate::constants::{GANACHE_NODE_URL, NODE_URL};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
/// Development nodes the deployment routines know how to reach without an explicit URL.
pub enum Target {
    /// Hardhat network or Anvil on their default port.
    #[default]
    Local,
    /// Ganache UI on its default port.
    Ganache,
}

impl Target {
    pub fn target_url(&self) -> String {
        let url = match self {
            Target::Local => NODE_URL,
            Target::Ganache => GANACHE_NODE_URL,
        };
        url.to_string()
    }
}

impl FromStr for Target {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" | "hardhat" | "anvil" => Ok(Target::Local),
            "ganache" => Ok(Target::Ganache),
            _ => bail!(
                "'{s}' is not a valid target name. Possible values: '{}', '{}'",
                Target::Local,
                Target::Ganache
            ),
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Target::Local => "local",
            Target::Ganache => "ganache",
        };
        write!(f, "{}", s)
    }
}
