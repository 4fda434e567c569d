use crate::command::CommandStrategy;
use tarobot_catalog::CatalogLoader;
use tarobot_config::Config;
use tarobot_divination::{draw_single, draw_spread};

/// Input for the local draw command.
pub struct DrawInput {
    /// Draw a single card instead of a full spread
    pub single: bool,
}

/// Strategy for a local draw without the bot: loads the catalog, runs the
/// draw engine once and prints the result. Quotas gate the chat surface,
/// not the operator's terminal.
pub struct DrawStrategy;

impl CommandStrategy for DrawStrategy {
    type Input = DrawInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;

        let loader = CatalogLoader::new(
            config.catalog.source_url.clone(),
            config.catalog.cache_path()?,
        )?
        .with_refresh_days(config.catalog.refresh_days);
        let catalog = loader.load().await?;

        let draw = {
            let mut rng = rand::rng();
            if input.single {
                draw_single(&catalog, &mut rng)?
            } else {
                draw_spread(&catalog, &mut rng)?
            }
        };

        println!("{}", draw.render());
        for url in draw.image_urls() {
            println!("{url}");
        }

        Ok(())
    }
}
