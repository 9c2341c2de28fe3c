use crate::error::*;
use crate::grid::*;
use crate::util::*;
use std::path::{Path, PathBuf};

/// Map `value` in `[-scale, scale]` onto the turbo gradient.
fn color(value: f64, scale: f64) -> image::Rgb<u8> {
    let r = if scale > 0.0 {
        (0.5 + 0.5 * value / scale).clamp(0.0, 1.0)
    } else {
        0.5
    };
    image::Rgb(colorous::TURBO.eval_continuous(r).as_array())
}

/// Image of a `nz × nx` field, depth increasing downward.
pub fn image2d<F: AsRef<Path>>(field: &Grid2, scale: f64, s: &F) -> FdResult<()> {
    let nz = field.extent(0);
    let nx = field.extent(1);
    let mut img = image::RgbImage::new(nx as u32, nz as u32);
    for j in 0..nx {
        for (i, value) in field.column(j).iter().enumerate() {
            img.put_pixel(j as u32, i as u32, color(*value, scale));
        }
    }
    img.save(s)?;
    Ok(())
}

/// Shot gather of `nx × nt` traces, time increasing downward.
pub struct TraceImage {
    img_buffer: image::RgbImage,
    scale: f64,
}

impl TraceImage {
    pub fn new(nx: usize, nt: usize, scale: f64) -> Self {
        TraceImage {
            img_buffer: image::RgbImage::new(nx as u32, nt as u32),
            scale,
        }
    }

    pub fn add_line(&mut self, l: u32, v: &[f64]) {
        debug_assert!(l < self.img_buffer.height());
        debug_assert_eq!(v.len(), self.img_buffer.width() as usize);
        for x in 0..self.img_buffer.width() {
            let c = color(v[x as usize], self.scale);
            self.img_buffer.put_pixel(x, l, c);
        }
    }

    pub fn from_traces(traces: &Grid2, scale: f64) -> Self {
        let nx = traces.extent(0);
        let nt = traces.extent(1);
        let mut result = TraceImage::new(nx, nt, scale);
        for t in 0..nt {
            let line: Vec<f64> =
                (0..nx).map(|j| traces.get(&vector![j, t])).collect();
            result.add_line(t as u32, &line);
        }
        result
    }

    pub fn write<F: AsRef<Path>>(self, s: &F) -> FdResult<()> {
        self.img_buffer.save(s)?;
        Ok(())
    }
}

pub fn frame_path<P: AsRef<Path>>(dir: &P, t: usize) -> PathBuf {
    dir.as_ref().join(format!("frame_{t:04}.png"))
}

/// Write every `every`th snapshot plane as a PNG frame in `dir`,
/// all frames on the colour scale of the largest amplitude.
pub fn write_frames<P: AsRef<Path>>(
    snapshots: &Grid3,
    every: usize,
    dir: &P,
) -> FdResult<usize> {
    let nz = snapshots.extent(0);
    let nx = snapshots.extent(1);
    let scale = snapshots.max_abs();
    let mut written = 0;
    for t in (0..snapshots.extent(2)).step_by(every.max(1)) {
        let frame = Grid::from_vec(vector![nz, nx], snapshots.plane(t).to_vec())?;
        let path = frame_path(dir, t);
        log::debug!("Writing: {path:?}");
        image2d(&frame, scale, &path)?;
        written += 1;
    }
    Ok(written)
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn color_scale() {
        assert_eq!(color(0.0, 0.0), color(5.0, 0.0));
        assert_eq!(color(-2.0, 1.0), color(-1.0, 1.0));
        assert_ne!(color(-1.0, 1.0), color(1.0, 1.0));
    }

    #[test]
    fn frame_names() {
        assert_eq!(
            frame_path(&"out", 7),
            std::path::Path::new("out").join("frame_0007.png")
        );
    }

    #[test]
    fn trace_image_dims() {
        let traces = Grid::zeros(vector![5, 9]);
        let img = TraceImage::from_traces(&traces, 1.0);
        assert_eq!(img.img_buffer.width(), 5);
        assert_eq!(img.img_buffer.height(), 9);
    }
}
