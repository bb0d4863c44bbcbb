use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskType {
    Stablecoin,
    Slashing,
    SmartContract,
    Protocol,
}

impl RiskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stablecoin => "Stablecoin",
            Self::Slashing => "Slashing",
            Self::SmartContract => "SmartContract",
            Self::Protocol => "Protocol",
        }
    }
}

impl fmt::Display for RiskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DepositStatus {
    Active,
    Withdrawn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalStatus {
    Submitted,
    Pending,
    Approved,
    Rejected,
    Claimed,
}
