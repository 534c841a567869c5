pub mod fcsapi;
pub mod goldapi;
pub mod metalprice;
pub mod util;

use crate::core::PriceProvider;
use crate::core::config::{ProviderConfig, ProviderKind};

/// Builds the adapter for one configured provider.
pub fn build_provider(config: &ProviderConfig, usd_inr_rate: f64) -> Box<dyn PriceProvider> {
    let name = config.name.as_str();
    let endpoint = config.endpoint();
    let api_key = config.credential();
    match config.kind {
        ProviderKind::MetalPriceApi => Box::new(metalprice::MetalPriceProvider::new(
            name,
            endpoint,
            api_key,
            usd_inr_rate,
        )),
        ProviderKind::GoldApi => Box::new(goldapi::GoldApiProvider::new(
            name,
            endpoint,
            api_key,
            usd_inr_rate,
        )),
        ProviderKind::FcsApi => Box::new(fcsapi::FcsApiProvider::new(
            name,
            endpoint,
            api_key,
            usd_inr_rate,
        )),
    }
}

/// Builds all configured adapters, each paired with its priority.
pub fn build_providers(
    configs: &[ProviderConfig],
    usd_inr_rate: f64,
) -> Vec<(u32, Box<dyn PriceProvider>)> {
    configs
        .iter()
        .map(|c| (c.priority, build_provider(c, usd_inr_rate)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_providers_keeps_names() {
        let configs = vec![
            ProviderConfig {
                name: "Backup".to_string(),
                kind: ProviderKind::FcsApi,
                endpoint: None,
                api_key: None,
                api_key_env: None,
                priority: 5,
            },
            ProviderConfig {
                name: "Primary".to_string(),
                kind: ProviderKind::GoldApi,
                endpoint: Some("http://localhost:1".to_string()),
                api_key: Some("k".to_string()),
                api_key_env: None,
                priority: 1,
            },
        ];

        let providers = build_providers(&configs, 83.0);
        let names: Vec<(u32, &str)> = providers.iter().map(|(p, pr)| (*p, pr.name())).collect();
        assert_eq!(names, vec![(5, "Backup"), (1, "Primary")]);
    }
}
