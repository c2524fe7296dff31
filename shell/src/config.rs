use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use isomap_renderer::TextureStrategy;

pub const DEFAULT_TERRAINS: [&str; 10] = [
    "arctic",
    "desert",
    "forest",
    "grassland",
    "hills",
    "jungle",
    "mountains",
    "plains",
    "swamp",
    "tundra",
];

/// Map and window settings. Every field is optional in the TOML file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapConfig {
    /// Columns.
    pub width: usize,
    /// Rows.
    pub height: usize,
    /// Random when not set.
    pub seed: Option<u64>,
    /// The directory containing `<terrain>.png` for each terrain.
    pub assets: PathBuf,
    /// Terrain names in sprite index order.
    pub terrains: Vec<String>,
    pub window_width: u32,
    pub window_height: u32,
    pub recenter_duration_ms: u64,
    pub texture_strategy: TextureStrategy,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 40,
            seed: None,
            assets: PathBuf::from("assets"),
            terrains: DEFAULT_TERRAINS.map(String::from).into(),
            window_width: 1280,
            window_height: 720,
            recenter_duration_ms: 300,
            texture_strategy: TextureStrategy::Auto,
        }
    }
}

impl MapConfig {
    /// The configuration from the file named by the first argument, or the defaults.
    pub fn from_args(mut args: impl Iterator<Item = String>) -> Result<Self> {
        match args.next() {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Reading configuration `{}`", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid configuration `{}`", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn recenter_duration(&self) -> Duration {
        Duration::from_millis(self.recenter_duration_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.terrains.is_empty() {
            bail!("At least one terrain is required");
        }
        if self.window_width == 0 || self.window_height == 0 {
            bail!(
                "Window size {}x{} is empty",
                self.window_width,
                self.window_height
            );
        }
        // Instances are addressed with `u32` indices.
        match self.width.checked_mul(self.height) {
            Some(tiles) if u32::try_from(tiles).is_ok() => {}
            _ => bail!("A {}x{} map has too many tiles", self.width, self.height),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{path::PathBuf, time::Duration};

    use isomap_renderer::TextureStrategy;

    use super::MapConfig;

    #[test]
    fn empty_file_is_the_default() {
        let config = MapConfig::parse("").unwrap();
        assert_eq!(config, MapConfig::default());
        assert_eq!(config.width, 20);
        assert_eq!(config.height, 40);
        assert_eq!(config.terrains.len(), 10);
        assert_eq!(config.terrains[0], "arctic");
        assert_eq!(config.recenter_duration(), Duration::from_millis(300));
    }

    #[test]
    fn fields_override_the_defaults() {
        let config = MapConfig::parse(
            r#"
            width = 4
            seed = 99
            assets = "sprites"
            terrains = ["plains", "swamp"]
            texture_strategy = "list"
            "#,
        )
        .unwrap();

        assert_eq!(config.width, 4);
        assert_eq!(config.height, 40);
        assert_eq!(config.seed, Some(99));
        assert_eq!(config.assets, PathBuf::from("sprites"));
        assert_eq!(config.terrains, ["plains", "swamp"]);
        assert_eq!(config.texture_strategy, TextureStrategy::TextureList);
    }

    #[test]
    fn texture_strategy_names() {
        let strategy = |name: &str| {
            MapConfig::parse(&format!("texture_strategy = \"{name}\""))
                .unwrap()
                .texture_strategy
        };
        assert_eq!(strategy("auto"), TextureStrategy::Auto);
        assert_eq!(strategy("array"), TextureStrategy::ArrayAtlas);
        assert_eq!(strategy("array_atlas"), TextureStrategy::ArrayAtlas);
        assert_eq!(strategy("texture_list"), TextureStrategy::TextureList);
        assert!(MapConfig::parse("texture_strategy = \"mipmapped\"").is_err());
    }

    #[test]
    fn invalid_configurations_are_rejected() {
        assert!(MapConfig::parse("colums = 3").is_err());
        assert!(MapConfig::parse("terrains = []").is_err());
        assert!(MapConfig::parse("window_width = 0").is_err());
        assert!(MapConfig::parse("width = -1").is_err());
    }

    #[test]
    fn tile_count_must_fit_the_instance_range() {
        assert!(MapConfig::parse("width = 65536\nheight = 65535").is_ok());
        assert!(MapConfig::parse("width = 65536\nheight = 65536").is_err());
        assert!(MapConfig::parse("width = 9223372036854775807\nheight = 3").is_err());
    }

    #[test]
    fn no_argument_no_file() {
        let config = MapConfig::from_args(std::iter::empty()).unwrap();
        assert_eq!(config, MapConfig::default());

        let missing = MapConfig::from_args(["/nonexistent/isomap.toml".to_string()].into_iter());
        assert!(format!("{:#}", missing.unwrap_err()).contains("isomap.toml"));
    }
}
