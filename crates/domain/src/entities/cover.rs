use crate::enums::RiskType;
use crate::value_objects::{CoverId, PoolId, TokenAmount};
use serde::{Deserialize, Serialize};

/// Insurance cover backed by a pool.
///
/// Issued and maintained by the cover service; the ledger only stores it and
/// checks that the pool can carry its `capacity_amount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cover {
    pub id: CoverId,
    pub pool_id: PoolId,
    pub cover_name: String,
    /// Content identifier of the cover terms document.
    #[serde(default)]
    pub cid: String,
    pub risk_type: RiskType,
    #[serde(default)]
    pub chains: Vec<String>,
    pub cost: TokenAmount,
    /// Cover value already sold.
    pub cover_values: TokenAmount,
    /// Capacity as a percentage of pool tvl.
    pub capacity: u64,
    /// Capacity in tokens committed from the pool.
    pub capacity_amount: TokenAmount,
    pub max_amount: TokenAmount,
}
