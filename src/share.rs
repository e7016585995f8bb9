use std::io::Cursor;
use std::sync::Arc;

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use base64::Engine;
use image::{
    imageops::{self, FilterType},
    ImageFormat, Pixel, Rgba, RgbaImage,
};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use thiserror::Error;

use crate::assets::{AssetRegistry, AssetSource};
use crate::results::{SessionReport, Summary};
use crate::session::SessionDuration;

pub const SHARE_WIDTH: u32 = 1200;
pub const SHARE_HEIGHT: u32 = 675;
pub const QR_SIZE: u32 = 140;

const TEXT_X: i32 = 90;
const OVERLAY_RGB: [u8; 3] = [2, 6, 23];
const OVERLAY_MAX_ALPHA: f32 = 0.75;
const SHADOW: Rgba<u8> = Rgba([15, 23, 42, 150]);
const SHADOW_OFFSET_Y: i64 = 4;
const SHADOW_BLUR_SIGMA: f32 = 6.0;
const TEXT_PRIMARY: Rgba<u8> = Rgba([0xe2, 0xe8, 0xf0, 0xff]);
const TEXT_SECONDARY: Rgba<u8> = Rgba([0xcb, 0xd5, 0xe1, 0xff]);
const DEFAULT_DISPLAY_NAME: &str = "Player";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShareError {
    /// No background is registered, or the chosen one cannot be read.
    #[error("share asset unavailable: {0}")]
    AssetUnavailable(String),
    /// The canvas could not be created, an image failed to decode, or encoding failed.
    #[error("share image rendering failed: {0}")]
    RenderFailure(String),
}

impl ShareError {
    /// Short text for the results screen.
    pub fn user_message(&self) -> &'static str {
        match self {
            ShareError::AssetUnavailable(_) => "Add a share background image first",
            ShareError::RenderFailure(_) => "Could not create the share image, please try again",
        }
    }
}

/// Where an image lands on the canvas, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

/// Scales `image` uniformly to cover `canvas`, centered, overflow cropped.
pub fn cover_placement(canvas: (u32, u32), image: (u32, u32)) -> Placement {
    let (cw, ch) = (canvas.0 as f64, canvas.1 as f64);
    let (iw, ih) = (image.0.max(1) as f64, image.1.max(1) as f64);
    let scale = f64::max(cw / iw, ch / ih);
    let width = (iw * scale).round();
    let height = (ih * scale).round();

    Placement {
        x: ((cw - width) / 2.0).round() as i64,
        y: ((ch - height) / 2.0).round() as i64,
        width: width as u32,
        height: height as u32,
    }
}

/// The part of a placed image that lands on the canvas: which source pixels
/// to sample and the canvas rectangle they fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRegion {
    pub src_x: u32,
    pub src_y: u32,
    pub src_width: u32,
    pub src_height: u32,
    pub dest: Placement,
}

/// Clips `at` to the canvas and maps the result back into source pixels, so
/// only the visible slice is ever scaled. `None` when nothing is visible.
pub fn visible_region(canvas: (u32, u32), image: (u32, u32), at: Placement) -> Option<VisibleRegion> {
    let (src_x, src_width, dest_x, dest_width) = clip_axis(at.x, at.width, canvas.0, image.0)?;
    let (src_y, src_height, dest_y, dest_height) = clip_axis(at.y, at.height, canvas.1, image.1)?;

    Some(VisibleRegion {
        src_x,
        src_y,
        src_width,
        src_height,
        dest: Placement {
            x: dest_x,
            y: dest_y,
            width: dest_width,
            height: dest_height,
        },
    })
}

/// One axis of `visible_region`: (source start, source length, canvas start, canvas length).
fn clip_axis(pos: i64, len: u32, canvas: u32, src: u32) -> Option<(u32, u32, i64, u32)> {
    if len == 0 || src == 0 {
        return None;
    }
    let start = pos.max(0);
    let end = (pos + len as i64).min(canvas as i64);
    if end <= start {
        return None;
    }

    let scale = src as f64 / len as f64;
    let src_start = (((start - pos) as f64 * scale).floor() as u32).min(src - 1);
    let src_end = (((end - pos) as f64 * scale).ceil() as u32).clamp(src_start + 1, src);
    Some((src_start, src_end - src_start, start, (end - start) as u32))
}

pub fn qr_placement() -> Placement {
    Placement {
        x: TEXT_X as i64,
        y: (SHARE_HEIGHT - 100 - QR_SIZE - 20) as i64,
        width: QR_SIZE,
        height: QR_SIZE,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub color: Rgba<u8>,
}

/// 2D raster target the card is painted on.
pub trait RasterSurface {
    fn size(&self) -> (u32, u32);
    fn draw_image(&mut self, image: &RgbaImage, at: Placement);
    /// Blends a `color` rectangle blurred by `sigma` pixels.
    fn soft_shadow(&mut self, at: Placement, color: Rgba<u8>, sigma: f32);
    /// Blends `rgb` across the full canvas, alpha varying linearly from left to right edge.
    fn fade_horizontal(&mut self, rgb: [u8; 3], left_alpha: f32, right_alpha: f32);
    /// `baseline` is the y coordinate the text sits on.
    fn draw_text(&mut self, text: &str, x: i32, baseline: i32, style: TextStyle);
    fn encode_png(&self) -> Result<Vec<u8>, ShareError>;
}

/// In-memory RGBA canvas backed by the `image` crate.
#[derive(Debug)]
pub struct ImageSurface {
    canvas: RgbaImage,
    font: Option<FontVec>,
}

impl ImageSurface {
    pub fn new(width: u32, height: u32, font: Option<FontVec>) -> Result<Self, ShareError> {
        if width == 0 || height == 0 {
            return Err(ShareError::RenderFailure(format!(
                "cannot create a {width}x{height} canvas"
            )));
        }
        Ok(Self {
            canvas: RgbaImage::new(width, height),
            font,
        })
    }

    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }
}

impl RasterSurface for ImageSurface {
    fn size(&self) -> (u32, u32) {
        self.canvas.dimensions()
    }

    fn draw_image(&mut self, image: &RgbaImage, at: Placement) {
        let Some(region) = visible_region(self.canvas.dimensions(), image.dimensions(), at) else {
            return;
        };
        let dest = region.dest;
        let visible = imageops::crop_imm(
            image,
            region.src_x,
            region.src_y,
            region.src_width,
            region.src_height,
        )
        .to_image();

        if visible.dimensions() == (dest.width, dest.height) {
            imageops::overlay(&mut self.canvas, &visible, dest.x, dest.y);
        } else {
            let scaled = imageops::resize(&visible, dest.width, dest.height, FilterType::Triangle);
            imageops::overlay(&mut self.canvas, &scaled, dest.x, dest.y);
        }
    }

    fn soft_shadow(&mut self, at: Placement, color: Rgba<u8>, sigma: f32) {
        if at.width == 0 || at.height == 0 {
            return;
        }
        let pad = (sigma.max(0.0) * 3.0).ceil() as u32;
        let mut layer = RgbaImage::new(at.width + 2 * pad, at.height + 2 * pad);
        for y in pad..pad + at.height {
            for x in pad..pad + at.width {
                layer.put_pixel(x, y, color);
            }
        }
        if sigma > 0.0 {
            layer = imageproc::filter::gaussian_blur_f32(&layer, sigma);
        }
        imageops::overlay(&mut self.canvas, &layer, at.x - pad as i64, at.y - pad as i64);
    }

    fn fade_horizontal(&mut self, rgb: [u8; 3], left_alpha: f32, right_alpha: f32) {
        let (w, h) = self.canvas.dimensions();
        let span = w.saturating_sub(1).max(1) as f32;

        for x in 0..w {
            let t = x as f32 / span;
            let alpha = left_alpha + (right_alpha - left_alpha) * t;
            let overlay = Rgba([
                rgb[0],
                rgb[1],
                rgb[2],
                (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
            ]);
            for y in 0..h {
                self.canvas.get_pixel_mut(x, y).blend(&overlay);
            }
        }
    }

    fn draw_text(&mut self, text: &str, x: i32, baseline: i32, style: TextStyle) {
        let Some(font) = &self.font else {
            return;
        };
        let scale = PxScale::from(style.size);
        let ascent = font.as_scaled(scale).ascent();
        let top = baseline - ascent.round() as i32;
        imageproc::drawing::draw_text_mut(&mut self.canvas, style.color, x, top, scale, font, text);
    }

    fn encode_png(&self) -> Result<Vec<u8>, ShareError> {
        let mut bytes = Vec::new();
        self.canvas
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| ShareError::RenderFailure(format!("png encoding: {e}")))?;
        Ok(bytes)
    }
}

/// One line of text on the card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardLine {
    pub text: String,
    pub baseline: i32,
    pub style: TextStyle,
}

/// What the share card says.
#[derive(Debug, Clone)]
pub struct ShareCard {
    pub display_name: String,
    pub duration: SessionDuration,
    pub summary: Summary,
    pub share_url: Option<String>,
}

impl ShareCard {
    pub fn new(
        nickname: &str,
        duration: SessionDuration,
        summary: Summary,
        share_url: Option<String>,
    ) -> Self {
        let trimmed = nickname.trim();
        let display_name = if trimmed.is_empty() {
            DEFAULT_DISPLAY_NAME.to_string()
        } else {
            trimmed.to_string()
        };
        Self {
            display_name,
            duration,
            summary,
            share_url,
        }
    }

    pub fn from_report(report: &SessionReport, share_url: Option<String>) -> Self {
        Self::new(
            report.nickname.as_str(),
            report.duration,
            report.summary,
            share_url,
        )
    }

    pub fn lines(&self) -> Vec<CardLine> {
        let height = SHARE_HEIGHT as i32;
        let title = TextStyle {
            size: 48.0,
            color: TEXT_PRIMARY,
        };
        let body = TextStyle {
            size: 26.0,
            color: TEXT_PRIMARY,
        };
        let footer = TextStyle {
            size: 22.0,
            color: TEXT_SECONDARY,
        };
        let link = TextStyle {
            size: 20.0,
            color: TEXT_SECONDARY,
        };

        let line = |text: String, baseline: i32, style: TextStyle| CardLine {
            text,
            baseline,
            style,
        };

        let mut lines = vec![
            line(format!("{}'s results", self.display_name), 130, title),
            line(
                format!(
                    "Score: {} / {}",
                    self.summary.correct_count, self.summary.total
                ),
                210,
                body,
            ),
            line(
                format!("Accuracy: {}%", self.summary.accuracy_label()),
                255,
                body,
            ),
            line(
                format!("Avg response: {} ms", self.summary.avg_response_ms),
                300,
                body,
            ),
            line(format!("Duration: {} s", self.duration), 345, body),
            line(
                format!("Number compare {}s challenge", self.duration),
                height - 100,
                footer,
            ),
        ];
        if let Some(url) = &self.share_url {
            lines.push(line(url.clone(), height - 60, link));
        }
        lines
    }
}

/// A finished PNG share card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareImage {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Name of the background asset it was painted on.
    pub background: String,
}

impl ShareImage {
    pub fn to_data_url(&self) -> String {
        format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&self.png)
        )
    }
}

/// Paints `card` on `surface` and returns the encoded PNG.
pub fn render_card<S: RasterSurface>(
    mut surface: S,
    card: &ShareCard,
    background: &RgbaImage,
    qr: &RgbaImage,
) -> Result<Vec<u8>, ShareError> {
    let canvas = surface.size();
    surface.draw_image(background, cover_placement(canvas, background.dimensions()));
    surface.fade_horizontal(OVERLAY_RGB, OVERLAY_MAX_ALPHA, 0.0);

    for line in card.lines() {
        surface.draw_text(&line.text, TEXT_X, line.baseline, line.style);
    }

    let qr_at = qr_placement();
    surface.soft_shadow(
        Placement {
            y: qr_at.y + SHADOW_OFFSET_Y,
            ..qr_at
        },
        SHADOW,
        SHADOW_BLUR_SIGMA,
    );
    surface.draw_image(qr, qr_at);

    surface.encode_png()
}

fn decode(bytes: &[u8], name: &str) -> Result<RgbaImage, ShareError> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| ShareError::RenderFailure(format!("cannot decode {name}: {e}")))?
        .to_rgba8();
    if image.width() == 0 || image.height() == 0 {
        return Err(ShareError::RenderFailure(format!("{name} is empty")));
    }
    Ok(image)
}

/// Builds share cards on a randomly chosen background.
#[derive(Debug)]
pub struct ShareComposer<R: Rng = StdRng> {
    assets: Arc<AssetRegistry>,
    rng: R,
}

impl ShareComposer<StdRng> {
    pub fn seeded(assets: Arc<AssetRegistry>, seed: u64) -> Self {
        Self::new(assets, StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy(assets: Arc<AssetRegistry>) -> Self {
        Self::new(assets, StdRng::from_entropy())
    }
}

impl<R: Rng> ShareComposer<R> {
    pub fn new(assets: Arc<AssetRegistry>, rng: R) -> Self {
        Self { assets, rng }
    }

    pub fn pick_background(&mut self) -> Result<AssetSource, ShareError> {
        self.assets
            .backgrounds()
            .choose(&mut self.rng)
            .cloned()
            .ok_or_else(|| {
                ShareError::AssetUnavailable("no share background registered".to_string())
            })
    }

    pub fn compose(&mut self, card: &ShareCard) -> Result<ShareImage, ShareError> {
        let background = self.pick_background()?;
        let name = background.name();
        let bytes = background
            .load()
            .map_err(|e| ShareError::AssetUnavailable(format!("{name}: {e}")))?;
        let background_image = decode(&bytes, &name)?;

        let qr_source = self
            .assets
            .qr()
            .ok_or_else(|| ShareError::RenderFailure("no QR image configured".to_string()))?;
        let qr_bytes = qr_source
            .load()
            .map_err(|e| ShareError::RenderFailure(format!("{}: {e}", qr_source.name())))?;
        let qr_image = decode(&qr_bytes, &qr_source.name())?;

        let surface = ImageSurface::new(SHARE_WIDTH, SHARE_HEIGHT, self.load_font()?)?;
        let png = render_card(surface, card, &background_image, &qr_image)?;

        log::info!(
            "share card composed on {name} ({} bytes)",
            png.len()
        );
        Ok(ShareImage {
            png,
            width: SHARE_WIDTH,
            height: SHARE_HEIGHT,
            background: name,
        })
    }

    fn load_font(&self) -> Result<Option<FontVec>, ShareError> {
        let Some(source) = self.assets.font() else {
            return Ok(None);
        };
        let bytes = source
            .load()
            .map_err(|e| ShareError::RenderFailure(format!("font {}: {e}", source.name())))?;
        FontVec::try_from_vec(bytes.into_owned())
            .map(Some)
            .map_err(|e| ShareError::RenderFailure(format!("font {}: {e}", source.name())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn png_bytes(width: u32, height: u32, color: Rgba<u8>) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, color);
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn summary() -> Summary {
        Summary {
            total: 2,
            correct_count: 1,
            accuracy_pct: 50.0,
            avg_response_ms: 250,
        }
    }

    fn card() -> ShareCard {
        ShareCard::new(" ada ", SessionDuration::Thirty, summary(), None)
    }

    fn registry(backgrounds: Vec<AssetSource>) -> Arc<AssetRegistry> {
        Arc::new(AssetRegistry::new(
            backgrounds,
            Some(AssetSource::memory(
                "qr.png",
                png_bytes(20, 20, Rgba([0, 0, 0, 255])),
            )),
            None,
        ))
    }

    #[derive(Default)]
    struct RecordingSurface {
        images: Vec<((u32, u32), Placement)>,
        texts: Vec<(String, i32, i32)>,
        fades: Vec<(f32, f32)>,
        shades: Vec<Placement>,
    }

    impl RasterSurface for &mut RecordingSurface {
        fn size(&self) -> (u32, u32) {
            (SHARE_WIDTH, SHARE_HEIGHT)
        }
        fn draw_image(&mut self, image: &RgbaImage, at: Placement) {
            self.images.push((image.dimensions(), at));
        }
        fn soft_shadow(&mut self, at: Placement, _color: Rgba<u8>, _sigma: f32) {
            self.shades.push(at);
        }
        fn fade_horizontal(&mut self, _rgb: [u8; 3], left_alpha: f32, right_alpha: f32) {
            self.fades.push((left_alpha, right_alpha));
        }
        fn draw_text(&mut self, text: &str, x: i32, baseline: i32, _style: TextStyle) {
            self.texts.push((text.to_string(), x, baseline));
        }
        fn encode_png(&self) -> Result<Vec<u8>, ShareError> {
            Ok(vec![1, 2, 3])
        }
    }

    #[test]
    fn test_cover_wide_image_crops_sides() {
        let at = cover_placement((1200, 675), (2400, 675));
        assert_eq!(at.width, 2400);
        assert_eq!(at.height, 675);
        assert_eq!(at.x, -600);
        assert_eq!(at.y, 0);
    }

    #[test]
    fn test_cover_small_tall_image_scales_up() {
        let at = cover_placement((1200, 675), (600, 600));
        assert_eq!(at.width, 1200);
        assert_eq!(at.height, 1200);
        assert_eq!(at.x, 0);
        assert_eq!(at.y, -263);
    }

    #[test]
    fn test_cover_exact_fit() {
        let at = cover_placement((1200, 675), (1200, 675));
        assert_eq!(
            at,
            Placement {
                x: 0,
                y: 0,
                width: 1200,
                height: 675
            }
        );
    }

    #[test]
    fn test_card_lines() {
        let lines = card().lines();
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "ada's results",
                "Score: 1 / 2",
                "Accuracy: 50.0%",
                "Avg response: 250 ms",
                "Duration: 30 s",
                "Number compare 30s challenge",
            ]
        );
        assert_eq!(lines[0].baseline, 130);
        assert_eq!(lines[5].baseline, 575);
    }

    #[test]
    fn test_card_url_and_fallback_name() {
        let card = ShareCard::new(
            "   ",
            SessionDuration::Ten,
            summary(),
            Some("https://example.com/".into()),
        );
        let lines = card.lines();
        assert_eq!(lines[0].text, "Player's results");
        assert_eq!(lines.last().unwrap().text, "https://example.com/");
        assert_eq!(lines.last().unwrap().baseline, 615);
    }

    #[test]
    fn test_render_card_paints_layers_in_order() {
        let mut surface = RecordingSurface::default();
        let background = RgbaImage::new(600, 600);
        let qr = RgbaImage::new(20, 20);

        let png = render_card(&mut surface, &card(), &background, &qr).unwrap();
        assert_eq!(png, vec![1, 2, 3]);

        assert_eq!(surface.images.len(), 2);
        assert_eq!(surface.images[0].0, (600, 600));
        assert_eq!(surface.images[0].1.width, 1200);
        assert_eq!(surface.images[1].1, qr_placement());
        assert_eq!(surface.fades, vec![(OVERLAY_MAX_ALPHA, 0.0)]);
        assert_eq!(surface.shades[0].y, qr_placement().y + SHADOW_OFFSET_Y);
        assert_eq!(surface.texts.len(), 6);
        assert!(surface.texts.iter().all(|(_, x, _)| *x == TEXT_X));
    }

    #[test]
    fn test_visible_region_of_thin_strip_is_bounded() {
        let at = cover_placement((SHARE_WIDTH, SHARE_HEIGHT), (1, 100_000));
        assert_eq!(at.height, 120_000_000);

        let region = visible_region((SHARE_WIDTH, SHARE_HEIGHT), (1, 100_000), at).unwrap();
        assert_eq!(
            region.dest,
            Placement {
                x: 0,
                y: 0,
                width: SHARE_WIDTH,
                height: SHARE_HEIGHT
            }
        );
        assert_eq!(region.src_width, 1);
        assert!(region.src_height <= 2);
        assert!(region.src_y >= 49_999 && region.src_y <= 50_000);
    }

    #[test]
    fn test_visible_region_crops_wide_image() {
        let at = cover_placement((1200, 675), (2400, 675));
        let region = visible_region((1200, 675), (2400, 675), at).unwrap();
        assert_eq!((region.src_x, region.src_width), (600, 1200));
        assert_eq!((region.src_y, region.src_height), (0, 675));
        assert_eq!(region.dest.x, 0);
    }

    #[test]
    fn test_visible_region_offscreen_is_none() {
        let at = Placement {
            x: 2000,
            y: 0,
            width: 10,
            height: 10,
        };
        assert_eq!(visible_region((1200, 675), (10, 10), at), None);
    }

    #[test]
    fn test_thin_strip_background_renders() {
        let mut composer = ShareComposer::seeded(
            registry(vec![AssetSource::memory(
                "strip.png",
                png_bytes(1, 100_000, Rgba([0, 200, 0, 255])),
            )]),
            3,
        );
        let shot = composer.compose(&card()).unwrap();
        let decoded = image::load_from_memory(&shot.png).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (SHARE_WIDTH, SHARE_HEIGHT));
        assert!(decoded.get_pixel(SHARE_WIDTH - 1, 0)[1] > 150);
    }

    #[test]
    fn test_soft_shadow_fades_at_edges() {
        let mut surface = ImageSurface::new(60, 60, None).unwrap();
        let white = RgbaImage::from_pixel(60, 60, Rgba([255, 255, 255, 255]));
        surface.draw_image(
            &white,
            Placement {
                x: 0,
                y: 0,
                width: 60,
                height: 60,
            },
        );
        surface.soft_shadow(
            Placement {
                x: 20,
                y: 20,
                width: 20,
                height: 20,
            },
            Rgba([0, 0, 0, 200]),
            3.0,
        );

        let center = surface.canvas().get_pixel(30, 30)[0];
        let edge = surface.canvas().get_pixel(18, 30)[0];
        let far = surface.canvas().get_pixel(2, 2)[0];
        assert!(center < edge, "center {center} edge {edge}");
        assert!(edge < 255);
        assert_eq!(far, 255);
    }

    #[test]
    fn test_qr_sits_above_footer() {
        let at = qr_placement();
        assert_eq!(at.y, 415);
        assert_eq!(at.width, QR_SIZE);
    }

    #[test]
    fn test_no_backgrounds_is_asset_unavailable() {
        let mut composer = ShareComposer::seeded(registry(vec![]), 1);
        let err = composer.compose(&card()).unwrap_err();
        assert_matches!(err, ShareError::AssetUnavailable(_));
        assert_eq!(err.user_message(), "Add a share background image first");
    }

    #[test]
    fn test_undecodable_background_is_render_failure() {
        let mut composer = ShareComposer::seeded(
            registry(vec![AssetSource::memory("broken.png", vec![0u8; 16])]),
            1,
        );
        assert_matches!(
            composer.compose(&card()),
            Err(ShareError::RenderFailure(_))
        );
    }

    #[test]
    fn test_missing_background_file_is_asset_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let mut composer = ShareComposer::seeded(
            registry(vec![AssetSource::File(dir.path().join("gone.png"))]),
            1,
        );
        assert_matches!(
            composer.compose(&card()),
            Err(ShareError::AssetUnavailable(_))
        );
    }

    #[test]
    fn test_missing_qr_is_render_failure() {
        let assets = Arc::new(AssetRegistry::new(
            vec![AssetSource::memory(
                "bg.png",
                png_bytes(8, 8, Rgba([255, 0, 0, 255])),
            )],
            None,
            None,
        ));
        let mut composer = ShareComposer::seeded(assets, 1);
        assert_matches!(
            composer.compose(&card()),
            Err(ShareError::RenderFailure(_))
        );
    }

    #[test]
    fn test_bad_font_is_render_failure() {
        let assets = Arc::new(AssetRegistry::new(
            vec![AssetSource::memory(
                "bg.png",
                png_bytes(8, 8, Rgba([255, 0, 0, 255])),
            )],
            Some(AssetSource::memory(
                "qr.png",
                png_bytes(4, 4, Rgba([0, 0, 0, 255])),
            )),
            Some(AssetSource::memory("font.ttf", vec![0u8; 8])),
        ));
        let mut composer = ShareComposer::seeded(assets, 1);
        assert_matches!(
            composer.compose(&card()),
            Err(ShareError::RenderFailure(_))
        );
    }

    #[test]
    fn test_compose_twice_yields_independent_pngs() {
        let mut composer = ShareComposer::seeded(
            registry(vec![
                AssetSource::memory("red.png", png_bytes(64, 36, Rgba([255, 0, 0, 255]))),
                AssetSource::memory("blue.png", png_bytes(36, 64, Rgba([0, 0, 255, 255]))),
            ]),
            42,
        );

        let first = composer.compose(&card()).unwrap();
        let second = composer.compose(&card()).unwrap();

        for shot in [&first, &second] {
            assert_eq!((shot.width, shot.height), (SHARE_WIDTH, SHARE_HEIGHT));
            let decoded = image::load_from_memory(&shot.png).unwrap();
            assert_eq!(decoded.width(), SHARE_WIDTH);
            assert_eq!(decoded.height(), SHARE_HEIGHT);
            assert!(shot.to_data_url().starts_with("data:image/png;base64,"));
        }
    }

    #[test]
    fn test_seeded_selection_is_pinned() {
        let backgrounds = vec![
            AssetSource::memory("a.png", vec![]),
            AssetSource::memory("b.png", vec![]),
            AssetSource::memory("c.png", vec![]),
        ];
        let mut first = ShareComposer::seeded(registry(backgrounds.clone()), 9);
        let mut second = ShareComposer::seeded(registry(backgrounds), 9);
        for _ in 0..5 {
            assert_eq!(
                first.pick_background().unwrap().name(),
                second.pick_background().unwrap().name()
            );
        }
    }

    #[test]
    fn test_image_surface_gradient_darkens_left_edge() {
        let mut surface = ImageSurface::new(10, 2, None).unwrap();
        let white = RgbaImage::from_pixel(10, 2, Rgba([255, 255, 255, 255]));
        surface.draw_image(
            &white,
            Placement {
                x: 0,
                y: 0,
                width: 10,
                height: 2,
            },
        );
        surface.fade_horizontal(OVERLAY_RGB, OVERLAY_MAX_ALPHA, 0.0);

        let left = surface.canvas().get_pixel(0, 0);
        let right = surface.canvas().get_pixel(9, 0);
        assert!(left[0] < 100);
        assert_eq!(right[0], 255);
    }

    #[test]
    fn test_image_surface_rejects_empty_canvas() {
        assert_matches!(
            ImageSurface::new(0, 675, None),
            Err(ShareError::RenderFailure(_))
        );
    }

    #[test]
    fn test_image_surface_text_without_font_is_noop() {
        let mut surface = ImageSurface::new(40, 40, None).unwrap();
        surface.draw_text(
            "hi",
            2,
            30,
            TextStyle {
                size: 20.0,
                color: TEXT_PRIMARY,
            },
        );
        assert!(surface.canvas().pixels().all(|p| p[3] == 0));
    }
}
