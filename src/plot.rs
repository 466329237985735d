use std::path::Path;

use image::{Rgb, RgbImage};

use crate::{AliquotRun, Error};

pub const WIDTH: u32 = 800;
pub const HEIGHT: u32 = 600;
const MARGIN: u32 = 40;
const TICK_LEN: i64 = 5;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([0, 0, 0]);
const LINE: Rgb<u8> = Rgb([31, 119, 180]);

/// Data range mapped onto the drawable area of the image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl Frame {
    pub fn fit(points: &[(usize, f64)]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut frame = Frame {
            x_min: first.0 as f64,
            x_max: first.0 as f64,
            y_min: first.1,
            y_max: first.1,
        };
        for &(x, y) in rest {
            frame.x_min = frame.x_min.min(x as f64);
            frame.x_max = frame.x_max.max(x as f64);
            frame.y_min = frame.y_min.min(y);
            frame.y_max = frame.y_max.max(y);
        }

        if frame.x_max == frame.x_min {
            frame.x_max += 1.0;
        }
        if frame.y_max == frame.y_min {
            frame.y_max += 1.0;
        }

        Some(frame)
    }

    /// Pixel coordinates of a data point, y growing downwards as in the image.
    pub fn to_pixel(&self, x: f64, y: f64) -> (i64, i64) {
        let span_x = f64::from(WIDTH - 2 * MARGIN - 1);
        let span_y = f64::from(HEIGHT - 2 * MARGIN - 1);
        let px = f64::from(MARGIN) + (x - self.x_min) / (self.x_max - self.x_min) * span_x;
        let py = f64::from(HEIGHT - MARGIN - 1) - (y - self.y_min) / (self.y_max - self.y_min) * span_y;

        (px.round() as i64, py.round() as i64)
    }
}

fn put(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && x < i64::from(img.width()) && y < i64::from(img.height()) {
        img.put_pixel(x as u32, y as u32, color);
    }
}

// Bresenham.
fn draw_line(img: &mut RgbImage, from: (i64, i64), to: (i64, i64), color: Rgb<u8>) {
    let (mut x, mut y) = from;
    let dx = (to.0 - x).abs();
    let dy = -(to.1 - y).abs();
    let step_x = if x < to.0 { 1 } else { -1 };
    let step_y = if y < to.1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put(img, x, y, color);
        if x == to.0 && y == to.1 {
            break;
        }

        let err2 = 2 * err;
        if err2 >= dy {
            err += dy;
            x += step_x;
        }
        if err2 <= dx {
            err += dx;
            y += step_y;
        }
    }
}

fn draw_axes(img: &mut RgbImage, frame: &Frame) {
    let left = i64::from(MARGIN) - 1;
    let bottom = i64::from(HEIGHT - MARGIN);
    draw_line(img, (left, i64::from(MARGIN)), (left, bottom), AXIS);
    draw_line(img, (left, bottom), (i64::from(WIDTH - MARGIN), bottom), AXIS);

    // One tick per power of ten.
    let mut decade = frame.y_min.ceil();
    while decade <= frame.y_max {
        let (_, py) = frame.to_pixel(frame.x_min, decade);
        draw_line(img, (left - TICK_LEN, py), (left, py), AXIS);
        decade += 1.0;
    }
}

/// Draws log10(term) against step, or nothing for a run without terms.
pub fn draw(run: &AliquotRun) -> Option<RgbImage> {
    let points = run.log10_points();
    let frame = Frame::fit(&points)?;
    let mut img = RgbImage::from_pixel(WIDTH, HEIGHT, BACKGROUND);
    draw_axes(&mut img, &frame);

    let pixels = points
        .iter()
        .map(|&(x, y)| frame.to_pixel(x as f64, y))
        .collect::<Vec<_>>();
    if let &[(x, y)] = pixels.as_slice() {
        for (dx, dy) in [(0, 0), (-1, 0), (1, 0), (0, -1), (0, 1)] {
            put(&mut img, x + dx, y + dy, LINE);
        }
    }
    for pair in pixels.windows(2) {
        draw_line(&mut img, pair[0], pair[1], LINE);
    }

    Some(img)
}

pub fn render<P: AsRef<Path>>(run: &AliquotRun, path: P) -> Result<(), Error> {
    let img = draw(run).ok_or_else(|| Error::Plot("no terms to plot".to_string()))?;
    img.save(&path)
        .map_err(|e| Error::Plot(format!("{} ({})", e, path.as_ref().display())))?;
    log::info!("Wrote plot to {}", path.as_ref().display());

    Ok(())
}

#[cfg(test)]
use crate::{SequenceConfig, State};

#[test]
fn test_frame_corners() {
    let frame = Frame::fit(&[(1, 0.0), (3, 2.0), (5, 1.0)]).unwrap();
    assert_eq!(frame.to_pixel(1.0, 0.0), (40, 559));
    assert_eq!(frame.to_pixel(5.0, 2.0), (759, 40));
}

#[test]
fn test_frame_single_point() {
    let frame = Frame::fit(&[(1, 3.0)]).unwrap();
    assert_eq!(frame.to_pixel(1.0, 3.0), (40, 559));
    assert!(Frame::fit(&[]).is_none());
}

#[test]
fn test_draw() {
    let run = SequenceConfig::default().run(12).unwrap();
    let img = draw(&run).unwrap();
    assert_eq!(img.dimensions(), (WIDTH, HEIGHT));
    // First term 16 lands in the top left corner, last term 1 in the bottom right.
    assert_eq!(*img.get_pixel(40, 40), LINE);
    assert_eq!(*img.get_pixel(759, 559), LINE);
    assert_eq!(*img.get_pixel(39, 300), AXIS);

    assert!(draw(&AliquotRun::new(1, Vec::new(), State::Terminated)).is_none());
}

#[test]
fn test_render_writes_png() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plot.png");
    let run = SequenceConfig::default().run(8).unwrap();
    render(&run, &path).unwrap();
    assert_eq!(image::image_dimensions(&path).unwrap(), (WIDTH, HEIGHT));

    let empty = AliquotRun::new(1, Vec::new(), State::Terminated);
    assert!(matches!(render(&empty, &path), Err(Error::Plot(_))));
}
