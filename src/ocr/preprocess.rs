//! Image preparation for the OCR passes
//!
//! All functions are CPU bound; callers run them on the blocking pool.

use std::io::Cursor;

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, GrayImage, ImageFormat};

use super::types::OcrError;

const MAX_SIDE: u32 = 2000;
const MIN_SIDE: u32 = 1200;
const UPSCALE_TO: u32 = 1400;

/// Downscale phone photos, lightly upscale tiny scans
pub fn resize_sane(img: DynamicImage) -> DynamicImage {
    let (w, h) = img.dimensions();
    let longest = w.max(h);
    if longest == 0 {
        return img;
    }

    let target = if longest > MAX_SIDE {
        MAX_SIDE
    } else if longest < MIN_SIDE {
        UPSCALE_TO
    } else {
        return img;
    };

    let scale = target as f64 / longest as f64;
    let nw = ((w as f64 * scale) as u32).max(1);
    let nh = ((h as f64 * scale) as u32).max(1);
    let filter = if longest > MAX_SIDE {
        FilterType::Triangle
    } else {
        FilterType::CatmullRom
    };
    img.resize_exact(nw, nh, filter)
}

/// Stretch intensities to the full 0..255 range
pub fn normalize_minmax(img: &GrayImage) -> GrayImage {
    let (lo, hi) = img
        .pixels()
        .fold((u8::MAX, u8::MIN), |(lo, hi), p| (lo.min(p[0]), hi.max(p[0])));
    if hi <= lo {
        return img.clone();
    }
    let range = (hi - lo) as f32;
    let mut out = img.clone();
    for p in out.pixels_mut() {
        p[0] = (((p[0] - lo) as f32 / range) * 255.0).round() as u8;
    }
    out
}

/// Percentile stretch, clipping the darkest and brightest 1%
pub fn contrast_stretch(img: &GrayImage) -> GrayImage {
    let mut hist = [0u64; 256];
    for p in img.pixels() {
        hist[p[0] as usize] += 1;
    }
    let total: u64 = hist.iter().sum();
    if total == 0 {
        return img.clone();
    }
    let clip = total / 100;

    let mut acc = 0;
    let mut lo = 0usize;
    for (i, n) in hist.iter().enumerate() {
        acc += n;
        if acc > clip {
            lo = i;
            break;
        }
    }
    acc = 0;
    let mut hi = 255usize;
    for (i, n) in hist.iter().enumerate().rev() {
        acc += n;
        if acc > clip {
            hi = i;
            break;
        }
    }
    if hi <= lo {
        return img.clone();
    }

    let range = (hi - lo) as f32;
    let mut out = img.clone();
    for p in out.pixels_mut() {
        let v = (p[0] as f32 - lo as f32) / range * 255.0;
        p[0] = v.clamp(0.0, 255.0).round() as u8;
    }
    out
}

/// `1.6 * img - 0.6 * blur(img)`
pub fn sharpen(img: &GrayImage) -> GrayImage {
    let blurred = imageops::blur(img, 1.0);
    let mut out = img.clone();
    for (p, b) in out.pixels_mut().zip(blurred.pixels()) {
        let v = 1.6 * p[0] as f32 - 0.6 * b[0] as f32;
        p[0] = v.clamp(0.0, 255.0).round() as u8;
    }
    out
}

/// Gray, normalized, contrast stretched and lightly smoothed full page
pub fn denoise_variant(img: &DynamicImage) -> GrayImage {
    let gray = normalize_minmax(&img.to_luma8());
    imageops::blur(&contrast_stretch(&gray), 0.6)
}

pub fn crop_top(img: &DynamicImage, frac: f64) -> DynamicImage {
    let (w, h) = img.dimensions();
    let y2 = ((h as f64 * frac) as u32).max(1).min(h);
    img.crop_imm(0, 0, w, y2)
}

pub fn crop_right(img: &DynamicImage, frac: f64) -> DynamicImage {
    let (w, h) = img.dimensions();
    let x1 = ((w as f64 * (1.0 - frac)) as u32).min(w.saturating_sub(1));
    img.crop_imm(x1, 0, w - x1, h)
}

/// Top strip where the merchant name usually is
pub fn vendor_strip(img: &DynamicImage) -> GrayImage {
    let top = crop_top(img, 0.32);
    contrast_stretch(&normalize_minmax(&top.to_luma8()))
}

/// Right strip where totals are usually printed
pub fn totals_strip(img: &DynamicImage, denoise: bool) -> GrayImage {
    let right = crop_right(img, 0.42);
    let mut g = contrast_stretch(&normalize_minmax(&right.to_luma8()));
    if denoise {
        g = imageops::blur(&g, 0.6);
    }
    sharpen(&g)
}

/// Softened full page for faint thermal prints
pub fn soft_variant(denoise: &GrayImage) -> GrayImage {
    normalize_minmax(&imageops::blur(denoise, 0.8))
}

pub fn encode_png(img: &GrayImage) -> Result<Vec<u8>, OcrError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| OcrError::Image(e.to_string()))?;
    Ok(buf)
}

/// PNG inputs for every pass of one page, prepared up front
pub struct PassImages {
    pub denoise: Vec<u8>,
    pub sharp: Vec<u8>,
    pub vendor: Vec<u8>,
    pub right_mixed: Vec<u8>,
    pub right_digits: Vec<u8>,
    pub soft: Vec<u8>,
}

impl PassImages {
    /// `img` is expected to be resized already
    pub fn prepare(img: DynamicImage) -> Result<Self, OcrError> {
        let denoise = denoise_variant(&img);
        let sharp = sharpen(&denoise);

        Ok(Self {
            sharp: encode_png(&sharp)?,
            vendor: encode_png(&vendor_strip(&img))?,
            right_mixed: encode_png(&totals_strip(&img, true))?,
            right_digits: encode_png(&totals_strip(&img, false))?,
            soft: encode_png(&soft_variant(&denoise))?,
            denoise: encode_png(&denoise)?,
        })
    }
}
