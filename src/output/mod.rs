//! Writers for traces and wavefields.

mod binary;
mod csv;
mod image;
mod vtk;

pub use self::csv::*;
pub use self::image::*;
pub use binary::*;
pub use vtk::*;

/// Utility function to ensure output directories exist when needed
pub fn ensure_dir_exists<P: AsRef<std::path::Path>>(
    path: &P,
) -> crate::error::FdResult<()> {
    let p = path.as_ref();
    if p.exists() && !p.is_dir() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("not a directory {p:?}"),
        )
        .into());
    }
    if !p.exists() {
        log::info!("Creating: {p:?}");
        std::fs::create_dir_all(p)?;
    }
    Ok(())
}
