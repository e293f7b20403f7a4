//! Viewport to image coordinate translation
//!
//! A bounding box is drawn by dragging across an image shown in a viewport.
//! The image is fitted into the viewport keeping its aspect ratio and centred,
//! so the viewport may have empty margins on two sides. Drag endpoints are
//! mapped back onto the image's native pixel grid.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DrawingError {
    #[error("invalid size '{0}': expected WIDTHxHEIGHT with positive integers")]
    InvalidSize(String),

    #[error("invalid drag '{0}': expected x1,y1,x2,y2 in whole pixels")]
    InvalidDrag(String),

    #[error("point ({x}, {y}) lies outside the displayed image")]
    OutsideImage { x: i64, y: i64 },

    #[error("a {width}x{height} image cannot be displayed in the viewport")]
    DegenerateFit { width: u32, height: u32 },
}

/// Width and height in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl FromStr for Size {
    type Err = DrawingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DrawingError::InvalidSize(s.to_string());
        let (width, height) = s.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
        let width: u32 = width.trim().parse().map_err(|_| invalid())?;
        let height: u32 = height.trim().parse().map_err(|_| invalid())?;
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        Ok(Self { width, height })
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Pixel position inside the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

/// Press and release positions of a drag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragGesture {
    pub start: Point,
    pub end: Point,
}

impl FromStr for DragGesture {
    type Err = DrawingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(|part| part.trim().parse::<i64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| DrawingError::InvalidDrag(s.to_string()))?;

        match values.as_slice() {
            [x1, y1, x2, y2] => Ok(Self {
                start: Point { x: *x1, y: *y1 },
                end: Point { x: *x2, y: *y2 },
            }),
            _ => Err(DrawingError::InvalidDrag(s.to_string())),
        }
    }
}

/// Placement of an image fitted into a viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Letterbox {
    image: Size,
    left: i64,
    top: i64,
    shown: Size,
}

impl Letterbox {
    /// Fit `image` into `viewport`, preserving aspect ratio and centring it
    pub fn fit(viewport: Size, image: Size) -> Result<Self, DrawingError> {
        let scale = f64::min(
            f64::from(viewport.width) / f64::from(image.width),
            f64::from(viewport.height) / f64::from(image.height),
        );
        let shown = Size::new(
            (f64::from(image.width) * scale) as u32,
            (f64::from(image.height) * scale) as u32,
        );
        if shown.width == 0 || shown.height == 0 {
            return Err(DrawingError::DegenerateFit {
                width: image.width,
                height: image.height,
            });
        }

        Ok(Self {
            image,
            left: i64::from((viewport.width - shown.width) / 2),
            top: i64::from((viewport.height - shown.height) / 2),
            shown,
        })
    }

    /// Size of the image as displayed
    pub fn shown(&self) -> Size {
        self.shown
    }

    /// Top-left corner of the displayed image in viewport pixels
    pub fn origin(&self) -> Point {
        Point {
            x: self.left,
            y: self.top,
        }
    }

    fn contains(&self, point: Point) -> bool {
        point.x >= self.left
            && point.x < self.left + i64::from(self.shown.width)
            && point.y >= self.top
            && point.y < self.top + i64::from(self.shown.height)
    }

    /// Map a viewport point onto native image pixels, truncating toward zero
    pub fn to_image(&self, point: Point) -> Result<Point, DrawingError> {
        if !self.contains(point) {
            return Err(DrawingError::OutsideImage {
                x: point.x,
                y: point.y,
            });
        }

        let scale_x = f64::from(self.image.width) / f64::from(self.shown.width);
        let scale_y = f64::from(self.image.height) / f64::from(self.shown.height);

        Ok(Point {
            x: ((point.x - self.left) as f64 * scale_x) as i64,
            y: ((point.y - self.top) as f64 * scale_y) as i64,
        })
    }

    /// Translate a drag into a normalized `[x1, y1, x2, y2]` in native pixels
    pub fn translate(&self, drag: DragGesture) -> Result<[i64; 4], DrawingError> {
        let a = self.to_image(drag.start)?;
        let b = self.to_image(drag.end)?;

        tracing::debug!(?drag, start = ?a, end = ?b, "Translated drag to image pixels");

        Ok([a.x.min(b.x), a.y.min(b.y), a.x.max(b.x), a.y.max(b.y)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drag(x1: i64, y1: i64, x2: i64, y2: i64) -> DragGesture {
        DragGesture {
            start: Point { x: x1, y: y1 },
            end: Point { x: x2, y: y2 },
        }
    }

    #[test]
    fn test_parse_size() {
        assert_eq!("640x480".parse::<Size>().unwrap(), Size::new(640, 480));
        assert_eq!(" 10X20 ".parse::<Size>().unwrap(), Size::new(10, 20));
        assert!("640".parse::<Size>().is_err());
        assert!("0x480".parse::<Size>().is_err());
        assert!("axb".parse::<Size>().is_err());
    }

    #[test]
    fn test_parse_drag() {
        assert_eq!("1, 2,3,4".parse::<DragGesture>().unwrap(), drag(1, 2, 3, 4));
        assert!("1,2,3".parse::<DragGesture>().is_err());
        assert!("1,2,3,4.5".parse::<DragGesture>().is_err());
    }

    #[test]
    fn test_wide_image_is_letterboxed_vertically() {
        let fit = Letterbox::fit(Size::new(800, 800), Size::new(1600, 800)).unwrap();
        assert_eq!(fit.shown(), Size::new(800, 400));
        assert_eq!(fit.origin(), Point { x: 0, y: 200 });
    }

    #[test]
    fn test_tall_image_is_pillarboxed() {
        let fit = Letterbox::fit(Size::new(800, 600), Size::new(300, 600)).unwrap();
        assert_eq!(fit.shown(), Size::new(300, 600));
        assert_eq!(fit.origin(), Point { x: 250, y: 0 });
    }

    #[test]
    fn test_displayed_corners_map_to_native_corners() {
        let fit = Letterbox::fit(Size::new(800, 800), Size::new(1600, 800)).unwrap();

        assert_eq!(fit.to_image(Point { x: 0, y: 200 }).unwrap(), Point { x: 0, y: 0 });
        assert_eq!(
            fit.to_image(Point { x: 799, y: 599 }).unwrap(),
            Point { x: 1598, y: 798 }
        );
    }

    #[test]
    fn test_margin_points_rejected() {
        let fit = Letterbox::fit(Size::new(800, 800), Size::new(1600, 800)).unwrap();

        assert_eq!(
            fit.to_image(Point { x: 10, y: 100 }),
            Err(DrawingError::OutsideImage { x: 10, y: 100 })
        );
        assert!(fit.to_image(Point { x: 400, y: 600 }).is_err());
        assert!(fit.translate(drag(10, 250, 10, 700)).is_err());
    }

    #[test]
    fn test_drag_is_normalized() {
        let fit = Letterbox::fit(Size::new(400, 300), Size::new(400, 300)).unwrap();
        assert_eq!(fit.translate(drag(200, 150, 50, 20)).unwrap(), [50, 20, 200, 150]);
    }

    #[test]
    fn test_scaling_truncates_toward_zero() {
        // 1000x1000 shown at 300x300: each viewport pixel covers 3.33 native pixels
        let fit = Letterbox::fit(Size::new(300, 300), Size::new(1000, 1000)).unwrap();
        assert_eq!(fit.to_image(Point { x: 1, y: 2 }).unwrap(), Point { x: 3, y: 6 });
    }

    #[test]
    fn test_small_image_is_scaled_up() {
        let fit = Letterbox::fit(Size::new(200, 100), Size::new(20, 10)).unwrap();
        assert_eq!(fit.shown(), Size::new(200, 100));
        assert_eq!(fit.translate(drag(0, 0, 199, 99)).unwrap(), [0, 0, 19, 9]);
    }

    #[test]
    fn test_extreme_aspect_ratio_cannot_fit() {
        let result = Letterbox::fit(Size::new(10, 10), Size::new(10_000, 1));
        assert!(matches!(result, Err(DrawingError::DegenerateFit { .. })));
    }
}
