use crate::error::*;
use crate::grid::*;
use crate::util::*;
use std::io::prelude::*;

/// One line per time step, one value per receiver column.
pub fn write_traces<W: Write>(traces: &Grid2, output: &mut W) -> FdResult<()> {
    let nx = traces.extent(0);
    for t in 0..traces.extent(1) {
        for j in 0..nx {
            let r = traces.get(&vector![j, t]);
            if j == 0 {
                write!(output, "{r}")?;
            } else {
                write!(output, ", {r}")?;
            }
        }
        writeln!(output)?;
    }
    Ok(())
}

pub fn write_traces_csv<P: AsRef<std::path::Path>>(
    traces: &Grid2,
    path: &P,
) -> FdResult<()> {
    log::info!("Writing: {:?}", path.as_ref());
    let mut output = std::io::BufWriter::new(std::fs::File::create(path)?);
    write_traces(traces, &mut output)?;
    output.flush()?;
    Ok(())
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn lines_per_step() {
        let traces = Grid::from_fn(
            vector![3, 2],
            |c: Coord<2>| (c[0] + 10 * c[1]) as f64,
            2,
        );
        let mut out = Vec::new();
        write_traces(&traces, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "0, 1, 2\n10, 11, 12\n");
    }
}
