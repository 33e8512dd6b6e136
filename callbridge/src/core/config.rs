use crate::core::token::TokenStrategy;
use crate::core::wire::WireFormat;
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    pub tokens: TokenStrategy,
    pub wire_format: WireFormat,
}

impl BrokerConfig {
    pub fn with_tokens(mut self, tokens: TokenStrategy) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn with_wire_format(mut self, wire_format: WireFormat) -> Self {
        self.wire_format = wire_format;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_keep_the_legacy_wire() {
        let config = BrokerConfig::default();

        assert_eq!(config.tokens, TokenStrategy::Sequential);
        assert_eq!(config.wire_format, WireFormat::Legacy);
    }

    #[test]
    fn loads_from_json() {
        let config: BrokerConfig =
            serde_json::from_str(r#"{"tokens":"random","wire_format":"json"}"#).unwrap();

        assert_eq!(
            config,
            BrokerConfig::default()
                .with_tokens(TokenStrategy::Random)
                .with_wire_format(WireFormat::Json)
        );
    }

    #[test]
    fn missing_fields_fall_back() {
        let config: BrokerConfig = serde_json::from_str(r#"{"wire_format":"json"}"#).unwrap();

        assert_eq!(config.tokens, TokenStrategy::Sequential);
    }
}
