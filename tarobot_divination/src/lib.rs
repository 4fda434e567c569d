#![warn(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! The draw engine: pure selection and rendering logic.
//!
//! Given a catalog and an RNG, produces either a full spread (random
//! formation, positional labels, distinct cards) or a single card, each with
//! an independently chosen orientation, rendered as a user-facing text block
//! plus the image URLs embedded in card metadata.

use rand::Rng;
use std::fmt::Write as _;
use tarobot_catalog::{Card, Catalog, Error, Meaning, Result};
use tarobot_core::extract_image_url;
use tracing::debug;

/// Upright or reversed state of a drawn card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Upright,
    Reversed,
}

impl Orientation {
    /// 50/50 choice, independent per card.
    fn random<R: Rng>(rng: &mut R) -> Self {
        if rng.random_bool(0.5) {
            Self::Upright
        } else {
            Self::Reversed
        }
    }

    #[must_use]
    pub const fn label_cn(self) -> &'static str {
        match self {
            Self::Upright => "正位",
            Self::Reversed => "逆位",
        }
    }

    /// The meaning text this orientation selects.
    #[must_use]
    pub const fn pick<'a>(self, meaning: &'a Meaning) -> &'a String {
        match self {
            Self::Upright => &meaning.up,
            Self::Reversed => &meaning.down,
        }
    }
}

/// One drawn card with its resolved position, orientation and meaning.
#[derive(Debug, Clone)]
pub struct DrawnCard {
    /// Positional label within a spread; absent for single draws.
    pub position: Option<String>,
    pub name: String,
    pub orientation: Orientation,
    pub meaning: String,
    pub image_url: Option<String>,
}

impl DrawnCard {
    fn from_card<R: Rng>(card: &Card, position: Option<String>, rng: &mut R) -> Self {
        let orientation = Orientation::random(rng);
        Self {
            position,
            name: card.name_cn.clone(),
            orientation,
            meaning: orientation.pick(&card.meaning).clone(),
            image_url: card.image_url.as_deref().and_then(extract_image_url),
        }
    }
}

/// A completed draw, ready to render and retain.
#[derive(Debug, Clone)]
pub struct Draw {
    /// Formation name; absent for single draws.
    pub formation: Option<String>,
    pub cards: Vec<DrawnCard>,
}

impl Draw {
    /// Render the user-facing text block. Image URLs are not part of the
    /// rendered text; they travel separately via [`Self::image_urls`].
    #[must_use]
    pub fn render(&self) -> String {
        if let Some(formation) = &self.formation {
            let mut text = format!(
                "✨ 启用{formation}牌阵，抽取了{}张牌：\n\n",
                self.cards.len()
            );
            for (i, card) in self.cards.iter().enumerate() {
                let position = card.position.as_deref().unwrap_or_default();
                let _ = writeln!(
                    text,
                    "{}. {position}：{}（{}）\n   含义：{}\n",
                    i + 1,
                    card.name,
                    card.orientation.label_cn(),
                    card.meaning
                );
            }
            text
        } else if let Some(card) = self.cards.first() {
            format!(
                "🃏 抽到了 {}（{}）\n含义：{}\n",
                card.name,
                card.orientation.label_cn(),
                card.meaning
            )
        } else {
            String::new()
        }
    }

    /// Embedded image URLs in card order.
    #[must_use]
    pub fn image_urls(&self) -> Vec<String> {
        self.cards
            .iter()
            .filter_map(|card| card.image_url.clone())
            .collect()
    }
}

/// Draw a full spread: random formation, random representation label set,
/// `cards_num` distinct cards, independent orientations.
pub fn draw_spread<R: Rng>(catalog: &Catalog, rng: &mut R) -> Result<Draw> {
    let (name, formation) = catalog.random_formation(rng)?;

    if formation.representations.is_empty() {
        return Err(Error::NoRepresentations(name.to_string()));
    }
    let labels = &formation.representations[rng.random_range(0..formation.representations.len())];

    let cards = catalog.random_cards(rng, formation.cards_num)?;
    debug!("Drew {} cards for formation {name}", cards.len());

    let drawn = cards
        .iter()
        .zip(labels.iter())
        .map(|(card, label)| DrawnCard::from_card(card, Some(label.clone()), rng))
        .collect();

    Ok(Draw {
        formation: Some(name.to_string()),
        cards: drawn,
    })
}

/// Draw one card with a random orientation.
pub fn draw_single<R: Rng>(catalog: &Catalog, rng: &mut R) -> Result<Draw> {
    let card = catalog.random_card(rng)?;

    Ok(Draw {
        formation: None,
        cards: vec![DrawnCard::from_card(card, None, rng)],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn test_catalog(cards: usize, with_images: bool) -> Catalog {
        let image = if with_images {
            r#", "image_url": "图 https://example.com/c.png""#
        } else {
            ""
        };
        let json = format!(
            r#"{{
              "cards": {{ {} }},
              "formations": {{
                "圣三角": {{
                  "cards_num": 3,
                  "representations": [["过去", "现在", "未来"]]
                }}
              }}
            }}"#,
            (0..cards)
                .map(|i| {
                    format!(
                        r#""{i}": {{"name_cn": "牌{i}", "meaning": {{"up": "顺{i}", "down": "逆{i}"}}{image}}}"#
                    )
                })
                .collect::<Vec<_>>()
                .join(",")
        );
        serde_json::from_str(&json).expect("test catalog should parse")
    }

    #[test]
    fn spread_matches_formation_count_without_duplicates() {
        let catalog = test_catalog(10, false);
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..50 {
            let draw = draw_spread(&catalog, &mut rng).expect("catalog is sufficient");
            assert_eq!(draw.cards.len(), 3);

            let mut names: Vec<&str> = draw.cards.iter().map(|c| c.name.as_str()).collect();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), 3);
        }
    }

    #[test]
    fn spread_positions_follow_label_order() {
        let catalog = test_catalog(5, false);
        let mut rng = StdRng::seed_from_u64(42);

        let draw = draw_spread(&catalog, &mut rng).expect("catalog is sufficient");
        let positions: Vec<&str> = draw
            .cards
            .iter()
            .filter_map(|c| c.position.as_deref())
            .collect();
        assert_eq!(positions, ["过去", "现在", "未来"]);
    }

    #[test]
    fn undersized_catalog_is_rejected() {
        let catalog = test_catalog(2, false);
        let mut rng = StdRng::seed_from_u64(42);

        let err = draw_spread(&catalog, &mut rng).expect_err("2 cards cannot fill 3 positions");
        assert!(matches!(err, Error::InsufficientCards { .. }));
    }

    #[test]
    fn orientation_is_roughly_unbiased() {
        let catalog = test_catalog(3, false);
        let mut rng = StdRng::seed_from_u64(42);

        let mut upright = 0usize;
        let trials = 1000usize;
        for _ in 0..trials {
            let draw = draw_single(&catalog, &mut rng).expect("catalog has cards");
            if draw.cards[0].orientation == Orientation::Upright {
                upright += 1;
            }
        }

        #[allow(clippy::cast_precision_loss)]
        let fraction = upright as f64 / trials as f64;
        assert!(
            (0.45..=0.55).contains(&fraction),
            "upright fraction {fraction} outside tolerance"
        );
    }

    #[test]
    fn meaning_tracks_orientation() {
        let catalog = test_catalog(3, false);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..20 {
            let draw = draw_single(&catalog, &mut rng).expect("catalog has cards");
            let card = &draw.cards[0];
            match card.orientation {
                Orientation::Upright => assert!(card.meaning.starts_with('顺')),
                Orientation::Reversed => assert!(card.meaning.starts_with('逆')),
            }
        }
    }

    #[test]
    fn spread_render_has_header_and_numbered_entries() {
        let catalog = test_catalog(5, false);
        let mut rng = StdRng::seed_from_u64(42);

        let draw = draw_spread(&catalog, &mut rng).expect("catalog is sufficient");
        let text = draw.render();

        assert!(text.starts_with("✨ 启用圣三角牌阵，抽取了3张牌：\n\n"));
        assert!(text.contains("1. 过去："));
        assert!(text.contains("3. 未来："));
        assert!(text.contains("   含义："));
    }

    #[test]
    fn single_render_is_one_line_block() {
        let catalog = test_catalog(1, false);
        let mut rng = StdRng::seed_from_u64(42);

        let draw = draw_single(&catalog, &mut rng).expect("catalog has a card");
        let text = draw.render();
        assert!(text.starts_with("🃏 抽到了 牌0（"));
        assert!(text.contains("\n含义："));
    }

    #[test]
    fn image_urls_are_collected_in_card_order() {
        let catalog = test_catalog(5, true);
        let mut rng = StdRng::seed_from_u64(42);

        let draw = draw_spread(&catalog, &mut rng).expect("catalog is sufficient");
        assert_eq!(draw.image_urls().len(), 3);
        assert!(
            draw.image_urls()
                .iter()
                .all(|u| u == "https://example.com/c.png")
        );
        // URLs travel separately, never inside the rendered block
        assert!(!draw.render().contains("https://example.com/c.png"));
    }
}
