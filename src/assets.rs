//! Startup asset loading and decoding
//!
//! The host gathers raw bytes for every manifest entry (disk or fetch), then
//! `Assets::decode` turns them into textures, sounds and the HUD font. Any
//! failure is fatal to startup.

use std::collections::HashMap;
use std::fmt;

use glam::Vec2;

use crate::settings::Settings;
use crate::sim::{ImageId, SpriteSizes};

pub const SHIP_IMAGE: &str = "images/ship.png";
pub const BACKGROUND_IMAGE: &str = "images/background.png";
pub const LASER_IMAGE: &str = "images/laser.png";
pub const INVADER_IMAGE: &str = "images/invader.png";
pub const SHOOT_SOUND: &str = "sounds/shoot.wav";
pub const EXPLOSION_SOUND: &str = "sounds/explosion.wav";
pub const MUSIC: &str = "sounds/bgm.mp3";
pub const HUD_FONT: &str = "fonts/Game Shark.otf";

/// Every file the game needs, relative to the asset root
pub const MANIFEST: [&str; 8] = [
    SHIP_IMAGE,
    BACKGROUND_IMAGE,
    LASER_IMAGE,
    INVADER_IMAGE,
    SHOOT_SOUND,
    EXPLOSION_SOUND,
    MUSIC,
    HUD_FONT,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    Missing { path: String },
    Read { path: String, reason: String },
    Decode { path: String, reason: String },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::Missing { path } => write!(f, "missing asset {}", path),
            AssetError::Read { path, reason } => write!(f, "failed to read {}: {}", path, reason),
            AssetError::Decode { path, reason } => {
                write!(f, "failed to decode {}: {}", path, reason)
            }
        }
    }
}

impl std::error::Error for AssetError {}

/// Undecoded file contents keyed by manifest path
#[derive(Debug, Clone, Default)]
pub struct RawAssets {
    files: HashMap<String, Vec<u8>>,
}

impl RawAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: &str, bytes: Vec<u8>) {
        self.files.insert(path.to_string(), bytes);
    }

    pub fn get(&self, path: &str) -> Result<&[u8], AssetError> {
        self.files
            .get(path)
            .map(Vec::as_slice)
            .ok_or_else(|| AssetError::Missing {
                path: path.to_string(),
            })
    }

    /// Read every manifest entry from under `settings.asset_root`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn read_from_disk(settings: &Settings) -> Result<Self, AssetError> {
        let mut raw = Self::new();
        for path in MANIFEST {
            let full = settings.asset_path(path);
            let bytes = std::fs::read(&full).map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => AssetError::Missing { path: full.clone() },
                _ => AssetError::Read {
                    path: full.clone(),
                    reason: e.to_string(),
                },
            })?;
            log::debug!("Read {} ({} bytes)", full, bytes.len());
            raw.insert(path, bytes);
        }
        Ok(raw)
    }

    /// Fetch every manifest entry relative to the page
    #[cfg(target_arch = "wasm32")]
    pub async fn fetch_all(settings: &Settings) -> Result<Self, AssetError> {
        let mut raw = Self::new();
        for path in MANIFEST {
            let url = settings.asset_path(path).replace(' ', "%20");
            let bytes = fetch_bytes(&url).await?;
            raw.insert(path, bytes);
        }
        Ok(raw)
    }
}

#[cfg(target_arch = "wasm32")]
async fn fetch_bytes(url: &str) -> Result<Vec<u8>, AssetError> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let read_err = |reason: String| AssetError::Read {
        path: url.to_string(),
        reason,
    };

    let window = web_sys::window().ok_or_else(|| read_err("no window".to_string()))?;
    let response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| read_err(format!("{:?}", e)))?;
    let response: web_sys::Response = response
        .dyn_into()
        .map_err(|e| read_err(format!("{:?}", e)))?;
    if !response.ok() {
        return Err(AssetError::Missing {
            path: url.to_string(),
        });
    }
    let buffer = response
        .array_buffer()
        .map_err(|e| read_err(format!("{:?}", e)))?;
    let buffer = JsFuture::from(buffer)
        .await
        .map_err(|e| read_err(format!("{:?}", e)))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

/// RGBA8 pixels ready for upload
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl DecodedImage {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    pub fn decode_png(path: &str, bytes: &[u8]) -> Result<Self, AssetError> {
        let img = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
            .map_err(|e| AssetError::Decode {
                path: path.to_string(),
                reason: e.to_string(),
            })?
            .to_rgba8();
        let (width, height) = img.dimensions();
        Ok(Self {
            width,
            height,
            rgba: img.into_raw(),
        })
    }
}

/// Everything loaded at startup
pub struct Assets {
    pub ship: DecodedImage,
    pub background: DecodedImage,
    pub laser: DecodedImage,
    pub invader: DecodedImage,
    pub shoot_sound: Vec<u8>,
    pub explosion_sound: Vec<u8>,
    pub music: Vec<u8>,
    pub font: fontdue::Font,
}

impl Assets {
    pub fn decode(raw: &RawAssets) -> Result<Self, AssetError> {
        let png = |path: &str| DecodedImage::decode_png(path, raw.get(path)?);
        let sound = |path: &str| -> Result<Vec<u8>, AssetError> {
            let bytes = raw.get(path)?;
            if bytes.is_empty() {
                return Err(AssetError::Decode {
                    path: path.to_string(),
                    reason: "empty sound file".to_string(),
                });
            }
            Ok(bytes.to_vec())
        };

        let font = fontdue::Font::from_bytes(raw.get(HUD_FONT)?, fontdue::FontSettings::default())
            .map_err(|e| AssetError::Decode {
                path: HUD_FONT.to_string(),
                reason: e.to_string(),
            })?;

        let assets = Self {
            ship: png(SHIP_IMAGE)?,
            background: png(BACKGROUND_IMAGE)?,
            laser: png(LASER_IMAGE)?,
            invader: png(INVADER_IMAGE)?,
            shoot_sound: sound(SHOOT_SOUND)?,
            explosion_sound: sound(EXPLOSION_SOUND)?,
            music: sound(MUSIC)?,
            font,
        };
        log::info!(
            "Assets decoded: ship {}x{}, laser {}x{}, invader {}x{}",
            assets.ship.width,
            assets.ship.height,
            assets.laser.width,
            assets.laser.height,
            assets.invader.width,
            assets.invader.height
        );
        Ok(assets)
    }

    pub fn image(&self, id: ImageId) -> &DecodedImage {
        match id {
            ImageId::Ship => &self.ship,
            ImageId::Background => &self.background,
            ImageId::Laser => &self.laser,
            ImageId::Invader => &self.invader,
        }
    }

    /// Child sprite sizes follow the art
    pub fn sprite_sizes(&self) -> SpriteSizes {
        SpriteSizes {
            laser: self.laser.size(),
            invader: self.invader.size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([255, 0, 0, 255]));
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png)
            .expect("encode png");
        out.into_inner()
    }

    #[test]
    fn test_missing_entry_is_reported() {
        let raw = RawAssets::new();
        match Assets::decode(&raw) {
            Err(AssetError::Missing { path }) => assert_eq!(path, HUD_FONT),
            Err(e) => panic!("unexpected error {}", e),
            Ok(_) => panic!("decode should fail"),
        }
    }

    #[test]
    fn test_decode_png() {
        let img = DecodedImage::decode_png(LASER_IMAGE, &png_bytes(3, 7)).expect("decode");
        assert_eq!((img.width, img.height), (3, 7));
        assert_eq!(img.rgba.len(), 3 * 7 * 4);
        assert_eq!(&img.rgba[..4], &[255, 0, 0, 255]);
        assert_eq!(img.size(), Vec2::new(3.0, 7.0));
    }

    #[test]
    fn test_garbage_png_is_decode_error() {
        let err = DecodedImage::decode_png(SHIP_IMAGE, b"not a png").expect_err("garbage");
        assert!(matches!(err, AssetError::Decode { .. }));
        assert!(err.to_string().contains(SHIP_IMAGE));
    }

    #[test]
    fn test_manifest_lists_every_file_once() {
        let mut sorted = MANIFEST.to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 8);
    }

    #[test]
    fn test_error_display() {
        let err = AssetError::Read {
            path: "sounds/bgm.mp3".into(),
            reason: "denied".into(),
        };
        assert_eq!(err.to_string(), "failed to read sounds/bgm.mp3: denied");
    }
}
