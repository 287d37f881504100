use crate::error::OcrError;
use image::{GrayImage, Luma};

/// Histogram clip limit, relative to a flat histogram
const CLIP_LIMIT: f32 = 2.0;
/// Number of tiles along each axis
const TILE_GRID: u32 = 8;

const BINS: usize = 256;

/// Contrast-limited adaptive histogram equalization
///
/// Equalizes each tile of an 8x8 grid separately, clipping every tile
/// histogram so noise in flat regions is not amplified, then blends the
/// per-tile mappings bilinearly to avoid seams at tile borders.
pub fn apply(image: GrayImage) -> Result<GrayImage, OcrError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(OcrError::Preprocessing(
            "cannot equalize an empty image".to_string(),
        ));
    }

    let (tile_w, tile_h) = tile_size(width, height);
    let luts = tile_luts(&image, tile_w, tile_h);

    let inv_tw = 1.0 / tile_w as f32;
    let inv_th = 1.0 / tile_h as f32;
    let last = TILE_GRID as i64 - 1;

    Ok(GrayImage::from_fn(width, height, |x, y| {
        let value = image.get_pixel(x, y).0[0] as usize;

        let (tx1, tx2, xa) = neighbours(x as f32 * inv_tw - 0.5, last);
        let (ty1, ty2, ya) = neighbours(y as f32 * inv_th - 0.5, last);

        let lut = |tx: usize, ty: usize| luts[ty * TILE_GRID as usize + tx][value] as f32;

        let top = lut(tx1, ty1) * (1.0 - xa) + lut(tx2, ty1) * xa;
        let bottom = lut(tx1, ty2) * (1.0 - xa) + lut(tx2, ty2) * xa;
        let blended = top * (1.0 - ya) + bottom * ya;

        Luma([blended.round_ties_even().clamp(0.0, 255.0) as u8])
    }))
}

/// Tile dimensions over the reflection-padded image
///
/// Unless both sides divide evenly by the grid, both sides are padded,
/// so an evenly divisible side still grows by a whole row of tiles.
fn tile_size(width: u32, height: u32) -> (u32, u32) {
    if width % TILE_GRID == 0 && height % TILE_GRID == 0 {
        return (width / TILE_GRID, height / TILE_GRID);
    }
    let padded_w = width + TILE_GRID - width % TILE_GRID;
    let padded_h = height + TILE_GRID - height % TILE_GRID;
    (padded_w / TILE_GRID, padded_h / TILE_GRID)
}

/// Neighbouring tile indices and the weight of the second one
fn neighbours(position: f32, last: i64) -> (usize, usize, f32) {
    let first = position.floor();
    let weight = position - first;
    let first = first as i64;
    let lo = first.clamp(0, last) as usize;
    let hi = (first + 1).clamp(0, last) as usize;
    (lo, hi, weight)
}

/// Build the clipped-equalization lookup table of every tile
fn tile_luts(image: &GrayImage, tile_w: u32, tile_h: u32) -> Vec<[u8; BINS]> {
    let (width, height) = image.dimensions();
    let tile_area = (tile_w * tile_h) as usize;
    let clip = ((CLIP_LIMIT * tile_area as f32 / BINS as f32) as usize).max(1);
    let scale = 255.0 / tile_area as f32;

    let mut luts = Vec::with_capacity((TILE_GRID * TILE_GRID) as usize);
    for ty in 0..TILE_GRID {
        for tx in 0..TILE_GRID {
            let mut hist = [0usize; BINS];
            for y in ty * tile_h..(ty + 1) * tile_h {
                let sy = reflect(y, height);
                for x in tx * tile_w..(tx + 1) * tile_w {
                    let sx = reflect(x, width);
                    hist[image.get_pixel(sx, sy).0[0] as usize] += 1;
                }
            }

            clip_histogram(&mut hist, clip);

            let mut lut = [0u8; BINS];
            let mut sum = 0usize;
            for (entry, count) in lut.iter_mut().zip(hist.iter()) {
                sum += count;
                *entry = (sum as f32 * scale).round_ties_even().min(255.0) as u8;
            }
            luts.push(lut);
        }
    }
    luts
}

/// Clip bins at `clip` and hand the excess back out evenly
fn clip_histogram(hist: &mut [usize; BINS], clip: usize) {
    let mut excess = 0usize;
    for count in hist.iter_mut() {
        if *count > clip {
            excess += *count - clip;
            *count = clip;
        }
    }

    let batch = excess / BINS;
    let mut residual = excess - batch * BINS;
    for count in hist.iter_mut() {
        *count += batch;
    }

    if residual > 0 {
        let step = (BINS / residual).max(1);
        let mut i = 0;
        while i < BINS && residual > 0 {
            hist[i] += 1;
            residual -= 1;
            i += step;
        }
    }
}

/// Mirror an out-of-range coordinate back into `0..len` without
/// repeating the edge pixel
fn reflect(pos: u32, len: u32) -> u32 {
    if len == 1 {
        return 0;
    }
    let period = 2 * (len - 1);
    let m = pos % period;
    if m >= len {
        period - m
    } else {
        m
    }
}
