use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::contours::{BorderType, find_contours};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::point::Point;
use imageproc::rect::Rect;

const DIFF_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const RECT_THICKNESS: i32 = 2;

/// Binary mask of the per-pixel difference: white where the grayscale values
/// differ by strictly more than the threshold.
pub(crate) fn diff_mask(first: &GrayImage, second: &GrayImage, threshold: u8) -> GrayImage {
    GrayImage::from_fn(first.width(), first.height(), |x, y| {
        let difference = first.get_pixel(x, y)[0].abs_diff(second.get_pixel(x, y)[0]);
        if difference > threshold {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}

/// Bounding rectangles of the connected changed regions in a mask.
pub(crate) fn diff_regions(mask: &GrayImage) -> Vec<Rect> {
    find_contours::<u32>(mask)
        .iter()
        .filter(|contour| contour.border_type == BorderType::Outer)
        .filter_map(|contour| bounding_rect(&contour.points))
        .collect()
}

pub(crate) fn draw_diff_regions(page: &mut RgbImage, regions: &[Rect]) {
    for region in regions {
        for expand in 0..RECT_THICKNESS {
            let rect = Rect::at(region.left() - expand, region.top() - expand).of_size(
                region.width() + 2 * expand as u32,
                region.height() + 2 * expand as u32,
            );
            draw_hollow_rect_mut(page, rect, DIFF_COLOR);
        }
    }
}

fn bounding_rect(points: &[Point<u32>]) -> Option<Rect> {
    let first = points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for point in points {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }
    Some(
        Rect::at(min_x as i32, min_y as i32).of_size(max_x - min_x + 1, max_y - min_y + 1),
    )
}
