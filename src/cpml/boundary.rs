use crate::cpml::*;
use crate::error::*;
use crate::grid::*;
use crate::util::*;

/// One padding region along an axis.
///
/// Depth grows away from the interior: positions past `edge` in
/// `direction` are inside the region, one grid step deep at the
/// first sample past the edge.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PaddingRegion {
    pub edge: f64,
    pub direction: f64,
    pub spacing: f64,
    pub width: f64,
}

impl PaddingRegion {
    /// `[0, boundary)` of an axis, deepest at position 0.
    pub fn low(boundary: usize, spacing: f64) -> Option<Self> {
        (boundary > 0).then(|| PaddingRegion {
            edge: boundary as f64,
            direction: -1.0,
            spacing,
            width: boundary as f64 * spacing,
        })
    }

    /// `[extent - boundary, extent)` of an axis, deepest at the far end.
    pub fn high(extent: usize, boundary: usize, spacing: f64) -> Option<Self> {
        (boundary > 0).then(|| PaddingRegion {
            edge: extent as f64 - boundary as f64 - 1.0,
            direction: 1.0,
            spacing,
            width: boundary as f64 * spacing,
        })
    }

    /// Physical distance into the region, zero outside it.
    pub fn depth(&self, position: f64) -> f64 {
        (self.direction * (position - self.edge)).max(0.0) * self.spacing
    }
}

/// Evenly spaced sample positions `first, first + 1, ...` along an axis,
/// in grid steps of the global grid.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SampleLine {
    pub first: f64,
    pub count: usize,
}

impl SampleLine {
    pub fn position(&self, i: usize) -> f64 {
        self.first + i as f64
    }
}

/// How a run of samples meets a padding region.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Coverage {
    Outside,
    Partial { start: usize, count: usize },
    Full,
}

impl Coverage {
    pub fn of(region: &PaddingRegion, line: &SampleLine) -> Self {
        let t = region.edge - line.first;
        let (start, end) = if region.direction < 0.0 {
            // samples with i < t
            let end = if t <= 0.0 { 0 } else { t.ceil() as usize };
            (0, end.min(line.count))
        } else {
            // samples with i > t
            let start = if t < 0.0 { 0 } else { t.floor() as usize + 1 };
            (start.min(line.count), line.count)
        };
        if start >= end {
            Coverage::Outside
        } else if end - start == line.count {
            Coverage::Full
        } else {
            Coverage::Partial {
                start,
                count: end - start,
            }
        }
    }

    /// Range of covered samples as `(start, count)`.
    pub fn range(&self, line: &SampleLine) -> Option<(usize, usize)> {
        match self {
            Coverage::Outside => None,
            Coverage::Partial { start, count } => Some((*start, *count)),
            Coverage::Full => Some((0, line.count)),
        }
    }
}

/// Add the damping of `region` into `damping`.
///
/// `damping` is laid out with `line` along `line_axis` and `across`
/// points on the other axis. `velocity(position, j)` gives the local
/// velocity at a sample position and across index.
pub fn build_damping<V: Fn(f64, usize) -> f64>(
    region: &PaddingRegion,
    line: &SampleLine,
    line_axis: usize,
    velocity: V,
    damping: &mut Grid2,
) -> FdResult<Coverage> {
    let across_axis = 1 - line_axis;
    if damping.extent(line_axis) != line.count {
        let mut expected = *damping.dims();
        expected[line_axis] = line.count;
        return Err(FdError::shape_mismatch(
            expected.as_slice(),
            damping.dims().as_slice(),
        ));
    }
    let across = damping.extent(across_axis);
    let coverage = Coverage::of(region, line);
    let Some((start, count)) = coverage.range(line) else {
        return Ok(coverage);
    };

    let mut dims = *damping.dims();
    dims[line_axis] = count;
    let at = |c: &Coord<2>| (start + c[line_axis], c[across_axis]);
    let u = Grid::from_fn(
        dims,
        |c: Coord<2>| region.depth(line.position(at(&c).0)),
        across.max(1),
    );
    let mut v = Grid::zeros(dims);
    for i in 0..count {
        for j in 0..across {
            let mut c = Coord::zeros();
            c[line_axis] = i;
            c[across_axis] = j;
            v.set(&c, velocity(line.position(start + i), j));
        }
    }
    let profile = damp_profile(&u, &v, region.width)?;

    for i in 0..count {
        for j in 0..across {
            let mut c = Coord::zeros();
            c[line_axis] = i;
            c[across_axis] = j;
            let value = profile.get(&c);
            c[line_axis] = start + i;
            let total = damping.get(&c) + value;
            damping.set(&c, total);
        }
    }
    Ok(coverage)
}

/// Where a worker's block sits in the global grid.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoundaryGeometry {
    pub nz: usize,
    pub nx: usize,
    pub offset: usize,
    pub count: usize,
    pub order: usize,
    pub boundary: usize,
    pub dz: f64,
    pub dx: f64,
}

impl BoundaryGeometry {
    pub fn halo_width(&self) -> usize {
        2 * self.order - 1
    }

    /// Rows of the first z difference, half steps from the surface.
    pub fn z_half_line(&self) -> SampleLine {
        SampleLine {
            first: 0.5 - self.order as f64,
            count: self.nz + self.halo_width(),
        }
    }

    pub fn z_full_line(&self) -> SampleLine {
        SampleLine {
            first: 0.0,
            count: self.nz,
        }
    }

    /// Columns of the first x difference over the halo extended block.
    pub fn x_half_line(&self) -> SampleLine {
        SampleLine {
            first: self.offset as f64 - self.order as f64 + 0.5,
            count: self.count + self.halo_width(),
        }
    }

    pub fn x_full_line(&self) -> SampleLine {
        SampleLine {
            first: self.offset as f64,
            count: self.count,
        }
    }

    pub fn x_regions(&self) -> Vec<PaddingRegion> {
        PaddingRegion::low(self.boundary, self.dx)
            .into_iter()
            .chain(PaddingRegion::high(self.nx, self.boundary, self.dx))
            .collect()
    }

    /// The surface is free, only the bottom is padded.
    pub fn z_regions(&self) -> Vec<PaddingRegion> {
        PaddingRegion::high(self.nz, self.boundary, self.dz)
            .into_iter()
            .collect()
    }
}

/// Decay factors for the four memory variables of one worker.
#[derive(Debug, Clone, PartialEq)]
pub struct CpmlBoundary {
    /// `(nz + h) × c`, at half rows.
    pub z_half: Grid2,
    /// `nz × c`
    pub z_full: Grid2,
    /// `nz × (c + h)`, at half columns.
    pub x_half: Grid2,
    /// `nz × c`
    pub x_full: Grid2,
}

impl CpmlBoundary {
    /// `velocity` is the worker's block extended by `h` columns per side.
    pub fn build(
        geometry: &BoundaryGeometry,
        velocity: &Grid2,
        dt: f64,
    ) -> FdResult<Self> {
        profiling::scope!("cpml::build");
        let h = geometry.halo_width();
        let nz = geometry.nz;
        let c = geometry.count;
        if nz == 0 || c == 0 {
            return Err(FdError::InvalidArgument(format!(
                "empty worker block of {nz} rows and {c} columns"
            )));
        }
        let expected = vector![nz, c + 2 * h];
        if *velocity.dims() != expected {
            return Err(FdError::shape_mismatch(
                expected.as_slice(),
                velocity.dims().as_slice(),
            ));
        }

        let row_of = |position: f64| {
            (position.floor().max(0.0) as usize).min(nz - 1)
        };
        let column_of = |position: f64| {
            let e = position.floor() + h as f64 - geometry.offset as f64;
            (e.max(0.0) as usize).min(c + 2 * h - 1)
        };
        let z_velocity =
            |position: f64, j: usize| velocity.get(&vector![row_of(position), j + h]);
        let x_velocity =
            |position: f64, i: usize| velocity.get(&vector![i, column_of(position)]);

        let z_damping = |line: SampleLine| -> FdResult<Grid2> {
            let mut damping = Grid::zeros(vector![line.count, c]);
            for region in geometry.z_regions() {
                let coverage =
                    build_damping(&region, &line, 0, z_velocity, &mut damping)?;
                log::debug!(
                    "cols {}..{}: z padding from {} {:?}",
                    geometry.offset,
                    geometry.offset + c,
                    line.first,
                    coverage
                );
            }
            Ok(damping)
        };
        let x_damping = |line: SampleLine| -> FdResult<Grid2> {
            let mut damping = Grid::zeros(vector![nz, line.count]);
            for region in geometry.x_regions() {
                let coverage =
                    build_damping(&region, &line, 1, x_velocity, &mut damping)?;
                log::debug!(
                    "cols {}..{}: x padding edge {} {:?}",
                    geometry.offset,
                    geometry.offset + c,
                    region.edge,
                    coverage
                );
            }
            Ok(damping)
        };

        Ok(CpmlBoundary {
            z_half: decay_factor(&z_damping(geometry.z_half_line())?, dt),
            z_full: decay_factor(&z_damping(geometry.z_full_line())?, dt),
            x_half: decay_factor(&x_damping(geometry.x_half_line())?, dt),
            x_full: decay_factor(&x_damping(geometry.x_full_line())?, dt),
        })
    }
}
