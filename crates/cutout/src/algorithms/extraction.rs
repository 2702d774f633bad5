use image::GrayImage;
use imageproc::contours::BorderType;
use crate::{error::Result, traits::ContourExtractor, types::Region};

/// Imageproc-based extractor keeping only outermost borders.
///
/// Holes and anything nested inside them are dropped. Regions come out in
/// raster order of each component's first pixel (top-to-bottom, then
/// left-to-right).
#[derive(Debug, Clone, Default)]
pub struct ExternalContourExtractor;

impl ContourExtractor for ExternalContourExtractor {
    fn extract_regions(&self, mask: &GrayImage) -> Result<Vec<Region>> {
        let contours = imageproc::contours::find_contours::<i32>(mask);

        let regions = contours
            .into_iter()
            .filter(|contour| contour.border_type == BorderType::Outer && contour.parent.is_none())
            .filter_map(|contour| Region::from_boundary(contour.points))
            .collect();

        Ok(regions)
    }
}
