use core_logic::EntropySource;
use ethers::types::U256;

pub const TOKEN_ID_BYTES: usize = 20;
const ASSET_ID_DIGITS: usize = 10;

/// Token id and the asset id derived from it.
///
/// The asset id is the first ten decimal digits of the token id. The metadata
/// service relies on that coupling, so it must not change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenIdentifiers {
    pub token_id: String,
    pub asset_id: u64,
}

impl TokenIdentifiers {
    pub fn generate(entropy: &dyn EntropySource) -> Self {
        let mut bytes = [0u8; TOKEN_ID_BYTES];
        entropy.fill_bytes(&mut bytes);
        Self::from_bytes(bytes)
    }

    pub fn from_bytes(bytes: [u8; TOKEN_ID_BYTES]) -> Self {
        let token_id = U256::from_big_endian(&bytes).to_string();
        let asset_id = asset_id_for(&token_id);
        Self { token_id, asset_id }
    }

    pub fn token_id_u256(&self) -> U256 {
        U256::from_dec_str(&self.token_id).unwrap_or_default()
    }
}

pub fn asset_id_for(token_id: &str) -> u64 {
    let prefix: String = token_id.chars().take(ASSET_ID_DIGITS).collect();
    // at most ten decimal digits, always fits
    prefix.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_logic::testing::FixedEntropy;

    #[test]
    fn test_max_value_identifiers() {
        let ids = TokenIdentifiers::from_bytes([0xff; TOKEN_ID_BYTES]);
        // 2^160 - 1
        assert_eq!(
            ids.token_id,
            "1461501637330902918203684832716283019655932542975"
        );
        assert_eq!(ids.asset_id, 1_461_501_637);
    }

    #[test]
    fn test_small_token_id_uses_all_digits() {
        let mut bytes = [0u8; TOKEN_ID_BYTES];
        bytes[TOKEN_ID_BYTES - 1] = 42;
        let ids = TokenIdentifiers::from_bytes(bytes);
        assert_eq!(ids.token_id, "42");
        assert_eq!(ids.asset_id, 42);
        assert_eq!(ids.token_id_u256(), U256::from(42));
    }

    #[test]
    fn test_generate_uses_entropy_bytes() {
        let entropy = FixedEntropy::new([false], vec![0x01]);
        let ids = TokenIdentifiers::generate(&entropy);
        let expected = U256::from_big_endian(&[0x01; TOKEN_ID_BYTES]).to_string();
        assert_eq!(ids.token_id, expected);
        assert_eq!(ids.asset_id.to_string(), expected[..10]);
    }
}
