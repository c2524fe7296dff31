//! The sprite catalog: all terrain images, in index order.

use std::path::Path;

use anyhow::{Context, Result, bail};
use image::{RgbaImage, imageops::FilterType};
use log::{info, warn};

use isomap_terrain::layout::{TILE_HEIGHT, TILE_WIDTH};

/// The size every sprite in the catalog has.
pub const SPRITE_SIZE: (u32, u32) = (TILE_WIDTH, TILE_HEIGHT);

#[derive(Debug, Clone)]
pub struct SpriteCatalog {
    names: Vec<String>,
    sprites: Vec<RgbaImage>,
}

impl SpriteCatalog {
    /// Load `<directory>/<name>.png` for every name.
    ///
    /// Fails on the first missing or undecodable file.
    pub fn load(directory: &Path, names: &[impl AsRef<str>]) -> Result<Self> {
        let images = names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                let path = directory.join(format!("{name}.png"));
                let image = image::open(&path)
                    .with_context(|| format!("Loading sprite `{}`", path.display()))?;
                Ok((name.to_string(), image.into_rgba8()))
            })
            .collect::<Result<Vec<_>>>()?;

        let catalog = Self::from_images(images)?;
        info!(
            "Loaded {} sprites from `{}`",
            catalog.len(),
            directory.display()
        );
        Ok(catalog)
    }

    /// Create a catalog from decoded images. Images not matching [`SPRITE_SIZE`] are resampled.
    pub fn from_images(images: impl IntoIterator<Item = (String, RgbaImage)>) -> Result<Self> {
        let (names, sprites): (Vec<_>, Vec<_>) = images
            .into_iter()
            .map(|(name, image)| {
                let image = fit_to_sprite_size(&name, image);
                (name, image)
            })
            .unzip();

        if sprites.is_empty() {
            bail!("The sprite catalog needs at least one sprite");
        }

        Ok(Self { names, sprites })
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    /// Always `false`, catalogs can't be empty.
    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&RgbaImage> {
        self.sprites.get(index)
    }

    pub fn sprites(&self) -> &[RgbaImage] {
        &self.sprites
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

fn fit_to_sprite_size(name: &str, image: RgbaImage) -> RgbaImage {
    if image.dimensions() == SPRITE_SIZE {
        return image;
    }
    warn!(
        "Sprite `{name}` is {:?}, resampling to {SPRITE_SIZE:?}",
        image.dimensions()
    );
    image::imageops::resize(&image, SPRITE_SIZE.0, SPRITE_SIZE.1, FilterType::Triangle)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use image::{Rgba, RgbaImage};

    use super::{SPRITE_SIZE, SpriteCatalog};

    fn solid(width: u32, height: u32, value: u8) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([value, value, value, 255]))
    }

    #[test]
    fn sprites_keep_their_order() {
        let catalog = SpriteCatalog::from_images([
            ("arctic".to_string(), solid(96, 48, 1)),
            ("desert".to_string(), solid(96, 48, 2)),
        ])
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.names(), ["arctic", "desert"]);
        assert_eq!(catalog.get(1).unwrap().get_pixel(0, 0), &Rgba([2, 2, 2, 255]));
        assert!(catalog.get(2).is_none());
    }

    #[test]
    fn other_sizes_are_resampled() {
        let catalog =
            SpriteCatalog::from_images([("hills".to_string(), solid(32, 32, 9))]).unwrap();
        assert_eq!(catalog.get(0).unwrap().dimensions(), SPRITE_SIZE);
    }

    #[test]
    fn empty_catalog_is_an_error() {
        assert!(SpriteCatalog::from_images(Vec::<(String, RgbaImage)>::new()).is_err());
    }

    #[test]
    fn missing_asset_fails_with_its_path() {
        let directory = std::env::temp_dir().join("isomap-catalog-does-not-exist");
        let error = SpriteCatalog::load(&directory, &["swamp"]).unwrap_err();
        assert!(format!("{error:#}").contains("swamp.png"));
    }

    #[test]
    fn loads_png_files() {
        let directory =
            std::env::temp_dir().join(format!("isomap-catalog-{}", std::process::id()));
        fs::create_dir_all(&directory).unwrap();
        solid(96, 48, 7).save(directory.join("plains.png")).unwrap();

        let catalog = SpriteCatalog::load(&directory, &["plains"]).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(0).unwrap().get_pixel(5, 5), &Rgba([7, 7, 7, 255]));

        fs::remove_dir_all(&directory).unwrap();
    }
}
