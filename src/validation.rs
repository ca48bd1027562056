use ethers_core::types::H256;

use crate::error::AnalysisError;

const HASH_HEX_LEN: usize = 64;

/// Checks that `input` is `0x` followed by exactly 64 hex digits and returns the decoded hash.
pub fn validate_tx_hash(input: &str) -> Result<H256, AnalysisError> {
    let digits = input
        .strip_prefix("0x")
        .ok_or(AnalysisError::Validation)?;

    if digits.len() != HASH_HEX_LEN || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(AnalysisError::Validation);
    }

    let bytes = hex::decode(digits).map_err(|_| AnalysisError::Validation)?;
    Ok(H256::from_slice(&bytes))
}
