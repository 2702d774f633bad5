use image::{GrayImage, Luma, Rgba, RgbaImage};
use crate::types::{RawImage, Region};

const OPAQUE: u8 = 255;

/// Rasterize a region's boundary as a filled polygon, sized to its bounding box.
///
/// Boundary pixels are part of the interior. The result only holds 0 and 255.
pub fn region_alpha(region: &Region) -> GrayImage {
    let bbox = region.bounding_box;
    let mut alpha = GrayImage::new(bbox.width, bbox.height);

    let mut polygon = region.local_boundary();
    polygon.dedup();
    while polygon.len() > 1 && polygon.first() == polygon.last() {
        polygon.pop();
    }

    if polygon.len() < 3 {
        // Single pixels and one-pixel-wide runs: set the traced points directly
        for p in &polygon {
            if p.x >= 0 && p.y >= 0 && (p.x as u32) < bbox.width && (p.y as u32) < bbox.height {
                alpha.put_pixel(p.x as u32, p.y as u32, Luma([OPAQUE]));
            }
        }
        return alpha;
    }

    imageproc::drawing::draw_polygon_mut(&mut alpha, &polygon, Luma([OPAQUE]));
    alpha
}

/// Crop the region's bounding box out of `image` and attach `alpha` as the fourth channel.
pub fn compose_rgba(image: &RawImage, region: &Region, alpha: &GrayImage) -> RgbaImage {
    let bbox = region.bounding_box;
    let crop = image::imageops::crop_imm(image, bbox.x, bbox.y, bbox.width, bbox.height).to_image();

    RgbaImage::from_fn(bbox.width, bbox.height, |x, y| {
        let [r, g, b] = crop.get_pixel(x, y).0;
        Rgba([r, g, b, alpha.get_pixel(x, y)[0]])
    })
}
