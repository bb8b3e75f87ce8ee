//! Page layout: orientation, scale, and centred placement for one image.
//!
//! All geometry is computed in millimetres on an A4 page with a fixed
//! 10 mm margin. The coordinate origin is the top-left corner of the page
//! (print convention); the PDF assembly stage flips to PDF's bottom-left
//! origin when emitting the content stream.
//!
//! Pure arithmetic, no error path: any image with non-zero dimensions has
//! a valid layout. Zero dimensions are rejected earlier, at decode time.

/// A4 portrait width in millimetres.
pub const PAGE_WIDTH_MM: f64 = 210.0;
/// A4 portrait height in millimetres.
pub const PAGE_HEIGHT_MM: f64 = 297.0;
/// Margin on every side, in millimetres.
pub const PAGE_MARGIN_MM: f64 = 10.0;

/// Page orientation, derived from the image aspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Placement of one image on its page, in millimetres from the top-left
/// page corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    pub orientation: Orientation,
    /// Page width after orientation is applied.
    pub page_width: f64,
    /// Page height after orientation is applied.
    pub page_height: f64,
    /// Left edge of the image.
    pub x: f64,
    /// Top edge of the image.
    pub y: f64,
    /// Scaled image width.
    pub width: f64,
    /// Scaled image height.
    pub height: f64,
}

/// Lay out an image of `img_w` x `img_h` pixels on an A4 page.
///
/// Orientation is landscape exactly when the image is wider than tall;
/// square images get portrait. The image is scaled uniformly to the
/// largest size that fits inside the margins (small images are scaled
/// up), then centred both ways.
pub fn layout_a4(img_w: u32, img_h: u32) -> PageLayout {
    let orientation = if img_w > img_h {
        Orientation::Landscape
    } else {
        Orientation::Portrait
    };
    let (page_width, page_height) = match orientation {
        Orientation::Portrait => (PAGE_WIDTH_MM, PAGE_HEIGHT_MM),
        Orientation::Landscape => (PAGE_HEIGHT_MM, PAGE_WIDTH_MM),
    };
    compute(page_width, page_height, PAGE_MARGIN_MM, img_w, img_h, orientation)
}

fn compute(
    page_width: f64,
    page_height: f64,
    margin: f64,
    img_w: u32,
    img_h: u32,
    orientation: Orientation,
) -> PageLayout {
    let max_w = page_width - 2.0 * margin;
    let max_h = page_height - 2.0 * margin;

    let iw = f64::from(img_w);
    let ih = f64::from(img_h);
    let ratio = (max_w / iw).min(max_h / ih);

    let width = iw * ratio;
    let height = ih * ratio;

    PageLayout {
        orientation,
        page_width,
        page_height,
        x: (page_width - width) / 2.0,
        y: (page_height - height) / 2.0,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn wide_image_gets_landscape() {
        let l = layout_a4(800, 600);
        assert_eq!(l.orientation, Orientation::Landscape);
        assert!(l.page_width > l.page_height);
    }

    #[test]
    fn tall_image_gets_portrait() {
        let l = layout_a4(600, 800);
        assert_eq!(l.orientation, Orientation::Portrait);
        assert!(l.page_height > l.page_width);
    }

    #[test]
    fn square_image_gets_portrait() {
        let l = layout_a4(500, 500);
        assert_eq!(l.orientation, Orientation::Portrait);
    }

    #[test]
    fn image_fits_inside_margins() {
        for &(w, h) in &[(3000u32, 200u32), (200, 3000), (1024, 768), (1, 1)] {
            let l = layout_a4(w, h);
            assert!(l.x >= PAGE_MARGIN_MM - EPS, "{w}x{h}: x = {}", l.x);
            assert!(l.y >= PAGE_MARGIN_MM - EPS, "{w}x{h}: y = {}", l.y);
            assert!(l.x + l.width <= l.page_width - PAGE_MARGIN_MM + EPS);
            assert!(l.y + l.height <= l.page_height - PAGE_MARGIN_MM + EPS);
        }
    }

    #[test]
    fn at_least_one_axis_spans_the_printable_area() {
        let l = layout_a4(1024, 768);
        let spans_w = (l.x - PAGE_MARGIN_MM).abs() < EPS;
        let spans_h = (l.y - PAGE_MARGIN_MM).abs() < EPS;
        assert!(spans_w || spans_h);
    }

    #[test]
    fn aspect_ratio_is_preserved() {
        let l = layout_a4(1024, 768);
        let original = 1024.0 / 768.0;
        let scaled = l.width / l.height;
        assert!((original - scaled).abs() < EPS);
    }

    #[test]
    fn tiny_images_are_scaled_up() {
        let l = layout_a4(10, 10);
        assert!(l.width > 10.0);
        assert!((l.width - l.height).abs() < EPS);
    }

    #[test]
    fn placement_is_centred() {
        let l = layout_a4(500, 500);
        assert!((l.x - (l.page_width - l.width) / 2.0).abs() < EPS);
        assert!((l.y - (l.page_height - l.height) / 2.0).abs() < EPS);
    }
}
