use super::{parse_stat, Attribute, GeneratedLoot, LootItem, LootSource, LootVariant};
use core_logic::{EntropySource, UpstreamError};
use std::sync::Arc;
use tracing::debug;

pub struct LootGenerator {
    source: Arc<dyn LootSource>,
    entropy: Arc<dyn EntropySource>,
}

impl LootGenerator {
    pub fn new(source: Arc<dyn LootSource>, entropy: Arc<dyn EntropySource>) -> Self {
        Self { source, entropy }
    }

    /// Fetches one payload, keeps a random variant and derives its attributes.
    pub async fn generate(&self) -> Result<GeneratedLoot, UpstreamError> {
        let payload = self.source.fetch_loot().await?;

        let variant = if self.entropy.coin_flip() {
            LootVariant::Armor
        } else {
            LootVariant::Weapon
        };

        let loot = payload.take(variant).ok_or_else(|| {
            UpstreamError::invalid_response(
                "loot service",
                format!("payload has no {} variant", variant),
            )
        })?;

        let attributes = build_attributes(&loot);
        debug!(
            "Rolled {} '{}' ({}) with {} attributes",
            variant,
            loot.name,
            loot.tier,
            attributes.len()
        );

        Ok(GeneratedLoot { loot, attributes })
    }
}

/// Order: category, first main stat, every sub stat, tier, type.
pub fn build_attributes(loot: &LootItem) -> Vec<Attribute> {
    let mut attributes = vec![Attribute::new("category", "Category", &loot.category)];

    attributes.extend(parse_stat(loot.main_stats.first().map(String::as_str), true));

    for stat in &loot.sub_stats {
        attributes.extend(parse_stat(Some(stat), false));
    }

    attributes.push(Attribute::new("tier", "tier", &loot.tier));
    attributes.push(Attribute::new("type", "type", &loot.item_type));
    attributes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loot::LootPayload;
    use async_trait::async_trait;
    use core_logic::testing::FixedEntropy;

    struct StaticLoot(Result<serde_json::Value, UpstreamError>);

    #[async_trait]
    impl LootSource for StaticLoot {
        async fn fetch_loot(&self) -> Result<LootPayload, UpstreamError> {
            let value = self.0.clone()?;
            serde_json::from_value(value)
                .map_err(|e| UpstreamError::invalid_response("test", e))
        }
    }

    fn payload() -> serde_json::Value {
        serde_json::json!({
            "armor": {
                "category": "Plate",
                "name": "Bulwark",
                "type": "Chestplate",
                "tier": "Rare",
                "main_stats": ["Defense 40"],
                "stats": ["Thorns: 2-4", "broken", "Dodge 3%"]
            },
            "weapon": {
                "category": "Blade",
                "name": "Fury",
                "type": "Sword",
                "tier": "Epic",
                "main_stats": ["Damage: 10-20"],
                "stats": ["Crit Chance 5%"]
            }
        })
    }

    fn generator(source: StaticLoot, armor: bool) -> LootGenerator {
        LootGenerator::new(Arc::new(source), Arc::new(FixedEntropy::always(armor)))
    }

    fn display_values(loot: &GeneratedLoot) -> Vec<(String, String)> {
        loot.attributes
            .iter()
            .map(|a| (a.display_type.clone(), a.value.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_weapon_branch_attribute_order() {
        let loot = generator(StaticLoot(Ok(payload())), false)
            .generate()
            .await
            .unwrap();

        let expected: Vec<(String, String)> = [
            ("category", "Blade"),
            ("damage_min", "10"),
            ("damage_max", "20"),
            ("sub_stats_crit_chance", "5%"),
            ("tier", "Epic"),
            ("type", "Sword"),
        ]
        .iter()
        .map(|(d, v)| (d.to_string(), v.to_string()))
        .collect();

        assert_eq!(display_values(&loot), expected);
        assert_eq!(loot.token_name(), "Fury Sword");
    }

    #[tokio::test]
    async fn test_armor_branch_skips_malformed_sub_stat() {
        let loot = generator(StaticLoot(Ok(payload())), true)
            .generate()
            .await
            .unwrap();

        let displays: Vec<String> = loot
            .attributes
            .iter()
            .map(|a| a.display_type.clone())
            .collect();
        assert_eq!(
            displays,
            vec![
                "category",
                "defense",
                "sub_stats_thorns_min",
                "sub_stats_thorns_max",
                "sub_stats_dodge",
                "tier",
                "type",
            ]
        );
        assert_eq!(loot.loot.name, "Bulwark");
    }

    #[tokio::test]
    async fn test_missing_variant_is_upstream_error() {
        let only_armor = serde_json::json!({ "armor": payload()["armor"].clone() });
        let err = generator(StaticLoot(Ok(only_armor)), false)
            .generate()
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates() {
        let failing = StaticLoot(Err(UpstreamError::HttpStatus {
            status_code: 502,
            endpoint: "loot".to_string(),
        }));
        let err = generator(failing, true).generate().await.unwrap_err();
        assert_eq!(
            err,
            UpstreamError::HttpStatus {
                status_code: 502,
                endpoint: "loot".to_string()
            }
        );
    }

    #[test]
    fn test_empty_main_stats_yields_no_main_attribute() {
        let item: LootItem = serde_json::from_value(serde_json::json!({
            "category": "Relic",
            "name": "Orb",
            "type": "Trinket",
            "tier": "Common"
        }))
        .unwrap();

        let attrs = build_attributes(&item);
        assert_eq!(attrs.len(), 3);
        assert_eq!(attrs[0].trait_type, "Category");
        assert_eq!(attrs[2].value, "Trinket");
    }
}
