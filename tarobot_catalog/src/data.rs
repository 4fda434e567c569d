//! Catalog data model and uniform random selection.

use rand::Rng;
use serde::Deserialize;
use std::collections::HashMap;

use crate::error::{Error, Result};

/// Upright and reversed meanings of one card.
#[derive(Debug, Clone, Deserialize)]
pub struct Meaning {
    pub up: String,
    pub down: String,
}

/// One tarot card. Immutable once loaded; the card id is the catalog map key.
#[derive(Debug, Clone, Deserialize)]
pub struct Card {
    /// Localized display name.
    pub name_cn: String,
    pub meaning: Meaning,
    /// Free text that may embed an image URL.
    #[serde(default)]
    pub image_url: Option<String>,
}

/// A named spread layout: how many cards are drawn and which positional
/// label sets may describe them.
#[derive(Debug, Clone, Deserialize)]
pub struct Formation {
    pub cards_num: usize,
    /// Each label set is `cards_num` long.
    pub representations: Vec<Vec<String>>,
}

/// The full dataset: card id -> card, formation name -> formation.
#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    pub cards: HashMap<String, Card>,
    pub formations: HashMap<String, Formation>,
}

impl Catalog {
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    /// Pick a formation uniformly at random.
    pub fn random_formation<R: Rng>(&self, rng: &mut R) -> Result<(&str, &Formation)> {
        if self.formations.is_empty() {
            return Err(Error::NoFormations);
        }
        let idx = rng.random_range(0..self.formations.len());
        self.formations
            .iter()
            .nth(idx)
            .map(|(name, formation)| (name.as_str(), formation))
            .ok_or(Error::NoFormations)
    }

    /// Sample `n` distinct cards uniformly at random.
    pub fn random_cards<R: Rng>(&self, rng: &mut R, n: usize) -> Result<Vec<&Card>> {
        if n > self.cards.len() {
            return Err(Error::InsufficientCards {
                requested: n,
                available: self.cards.len(),
            });
        }
        let pool: Vec<&Card> = self.cards.values().collect();
        let picks = rand::seq::index::sample(rng, pool.len(), n);
        Ok(picks.iter().map(|i| pool[i]).collect())
    }

    /// Pick a single card uniformly at random.
    pub fn random_card<R: Rng>(&self, rng: &mut R) -> Result<&Card> {
        if self.cards.is_empty() {
            return Err(Error::NoCards);
        }
        let idx = rng.random_range(0..self.cards.len());
        self.cards.values().nth(idx).ok_or(Error::NoCards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn test_catalog(cards: usize) -> Catalog {
        let json = format!(
            r#"{{
              "cards": {{ {} }},
              "formations": {{
                "圣三角": {{
                  "cards_num": 3,
                  "representations": [["过去", "现在", "未来"], ["现状", "障碍", "建议"]]
                }}
              }}
            }}"#,
            (0..cards)
                .map(|i| {
                    format!(
                        r#""{i}": {{"name_cn": "牌{i}", "meaning": {{"up": "顺{i}", "down": "逆{i}"}}}}"#
                    )
                })
                .collect::<Vec<_>>()
                .join(",")
        );
        serde_json::from_str(&json).expect("test catalog should parse")
    }

    #[test]
    fn random_cards_are_distinct() {
        let catalog = test_catalog(10);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..100 {
            let cards = catalog
                .random_cards(&mut rng, 3)
                .expect("10 cards can cover 3");
            let mut names: Vec<&str> = cards.iter().map(|c| c.name_cn.as_str()).collect();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), 3);
        }
    }

    #[test]
    fn random_cards_rejects_oversized_request() {
        let catalog = test_catalog(2);
        let mut rng = StdRng::seed_from_u64(7);

        let err = catalog
            .random_cards(&mut rng, 3)
            .expect_err("2 cards cannot cover 3");
        assert!(matches!(
            err,
            Error::InsufficientCards {
                requested: 3,
                available: 2
            }
        ));
    }

    #[test]
    fn random_formation_returns_declared_count() {
        let catalog = test_catalog(5);
        let mut rng = StdRng::seed_from_u64(7);

        let (name, formation) = catalog
            .random_formation(&mut rng)
            .expect("catalog has a formation");
        assert_eq!(name, "圣三角");
        assert_eq!(formation.cards_num, 3);
        for labels in &formation.representations {
            assert_eq!(labels.len(), formation.cards_num);
        }
    }

    #[test]
    fn empty_catalog_errors() {
        let catalog: Catalog =
            serde_json::from_str(r#"{"cards": {}, "formations": {}}"#).expect("empty parses");
        let mut rng = StdRng::seed_from_u64(7);

        assert!(matches!(
            catalog.random_formation(&mut rng),
            Err(Error::NoFormations)
        ));
        assert!(matches!(catalog.random_card(&mut rng), Err(Error::NoCards)));
    }

    #[test]
    fn card_without_image_field_parses() {
        let catalog = test_catalog(1);
        let card = catalog.cards.get("0").expect("card 0 exists");
        assert!(card.image_url.is_none());
    }
}
