// -- imports
use ab_glyph::{FontRef, PxScale};
use image::{DynamicImage, Rgb, RgbImage, imageops};
use imageproc::drawing::draw_text_mut;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

// -- config

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SheetConfigs {
    /// grid rows per sheet
    pub rows: u32,

    /// grid columns per sheet
    pub cols: u32,

    /// (width, height) of one tile
    pub tile_size: (u32, u32),

    /// whether to draw captions on tiles
    pub show_caption: bool,

    /// TTF font used for captions; captions are skipped without one
    pub font: Option<PathBuf>,

    /// directory rendered sheets are saved into
    pub save_dir: Option<PathBuf>,
}

impl Default for SheetConfigs {
    fn default() -> Self {
        Self {
            rows: 3,
            cols: 3,
            tile_size: (200, 200),
            show_caption: true,
            font: None,
            save_dir: None,
        }
    }
}

impl SheetConfigs {
    /// Number of tiles one sheet holds.
    pub const fn capacity(&self) -> usize {
        (self.rows * self.cols) as usize
    }
}

// -- public API

pub fn load_font(font_path: &Path) -> Option<Vec<u8>> {
    let mut file = File::open(font_path).ok()?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer).ok()?;
    Some(buffer)
}

/// Compose a captioned grid image out of `tiles`.
///
/// Tiles beyond the grid capacity are ignored; unused cells stay black.
/// Captions are drawn only when `show_caption` is set and a font file is
/// configured and loadable.
pub fn render_contact_sheet(tiles: &[(DynamicImage, String)], configs: &SheetConfigs) -> RgbImage {
    let (tile_w, tile_h) = configs.tile_size;
    let mut sheet = RgbImage::new(configs.cols * tile_w, configs.rows * tile_h);

    let font_data = if configs.show_caption {
        configs.font.as_deref().and_then(load_font)
    } else {
        None
    };
    let font = match font_data {
        Some(ref data) => FontRef::try_from_slice(data).ok(),
        None => None,
    };

    for (idx, (image, caption)) in tiles.iter().take(configs.capacity()).enumerate() {
        let col = idx as u32 % configs.cols;
        let row = idx as u32 / configs.cols;
        let x = (col * tile_w) as i64;
        let y = (row * tile_h) as i64;

        let resized = image.resize_exact(tile_w, tile_h, imageops::FilterType::Triangle);
        imageops::replace(&mut sheet, &resized.to_rgb8(), x, y);

        if let Some(ref font) = font {
            draw_caption(&mut sheet, caption, x as i32, y as i32, tile_w, font);
        }
    }

    sheet
}

// -- drawing helpers

fn draw_caption(
    sheet: &mut RgbImage,
    caption: &str,
    x: i32,
    y: i32,
    tile_w: u32,
    font: &FontRef,
) {
    // Adaptive font scale based on tile width
    let scale_factor = (tile_w as f32 / 600.0).max(0.6).min(2.0);
    let scale = PxScale::from(22.0 * scale_factor);
    let band_height = (scale.y * 1.4) as u32;

    // Darken a band under the caption so it stays readable on bright tiles
    draw_transparent_band(sheet, x, y, tile_w, band_height, Rgb([0, 0, 0]), 0.4);
    draw_text_mut(sheet, Rgb([255, 255, 255]), x + 4, y + 2, scale, font, caption);
}

fn draw_transparent_band(
    img: &mut RgbImage,
    x: i32,
    y: i32,
    w: u32,
    h: u32,
    color: Rgb<u8>,
    alpha: f32,
) {
    let (width, height) = img.dimensions();
    let alpha = alpha.max(0.0).min(1.0);
    let inv_alpha = 1.0 - alpha;

    let r = f32::from(color[0]);
    let g = f32::from(color[1]);
    let b = f32::from(color[2]);

    for dy in 0..h {
        let py = y + dy as i32;
        if py < 0 || py >= height as i32 {
            continue;
        }

        for dx in 0..w {
            let px = x + dx as i32;
            if px < 0 || px >= width as i32 {
                continue;
            }

            let pixel = img.get_pixel_mut(px as u32, py as u32);
            let current = pixel.0;

            let new_r = f32::from(current[0]).mul_add(inv_alpha, r * alpha) as u8;
            let new_g = f32::from(current[1]).mul_add(inv_alpha, g * alpha) as u8;
            let new_b = f32::from(current[2]).mul_add(inv_alpha, b * alpha) as u8;

            *pixel = Rgb([new_r, new_g, new_b]);
        }
    }
}
