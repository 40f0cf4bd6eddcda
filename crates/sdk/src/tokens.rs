/// Known-token lookup for one chain

use lendgine_types::{Address, Token};
use std::collections::HashMap;

use crate::config::ChainConfig;

#[derive(Debug, Clone, Default)]
pub struct TokenList {
    chain_id: u64,
    tokens: HashMap<Address, Token>,
}

impl TokenList {
    pub fn new(chain_id: u64, tokens: impl IntoIterator<Item = Token>) -> Self {
        let tokens = tokens
            .into_iter()
            .filter(|t| t.chain_id == chain_id)
            .map(|t| (t.address, t))
            .collect();
        Self { chain_id, tokens }
    }

    /// Configured tokens plus the wrapped native token
    pub fn from_config(config: &ChainConfig) -> Self {
        Self::new(
            config.chain_id,
            config
                .tokens
                .iter()
                .cloned()
                .chain(std::iter::once(config.wrapped_native.clone())),
        )
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn get(&self, address: &Address) -> Option<&Token> {
        self.tokens.get(address)
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.tokens.contains_key(address)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_list_from_config() {
        let config = ChainConfig::arbitrum().unwrap();
        let list = TokenList::from_config(&config);

        // WETH appears in both the list and as wrapped native
        assert_eq!(list.len(), 3);
        assert_eq!(list.get(&config.wrapped_native.address).unwrap().symbol, "WETH");
        assert!(!list.contains(&Address::ZERO));
    }

    #[test]
    fn test_foreign_chain_tokens_are_ignored() {
        let foreign = Token::new(137, Address::new([1; 20]), 18, "X", "X");
        let list = TokenList::new(42_161, vec![foreign]);
        assert!(list.is_empty());
    }
}
