//! Pressure source abstraction.
//!
//! The engine samples one [`PressureSource`] per resource each cycle. The
//! production implementation is [`PressureFile`], reading the kernel's
//! `/proc/pressure/{cpu,io,memory}` files.

mod file;
pub mod parse;

pub use file::PressureFile;

use std::fmt::Debug;
use std::path::Path;

use crate::data::{Resource, ResourceSample};
use crate::error::ReadError;

/// Default directory of the kernel pressure files.
pub const PRESSURE_DIR: &str = "/proc/pressure";

/// Trait for reading one resource's pressure counters.
///
/// # Example
///
/// ```no_run
/// use psistat::data::Resource;
/// use psistat::source::{PressureFile, PressureSource};
///
/// let mut source = PressureFile::open("/proc/pressure", Resource::Io)?;
/// let sample = source.read()?;
/// println!("io some total: {}us", sample.some.total_micros);
/// # Ok::<(), psistat::error::ReadError>(())
/// ```
pub trait PressureSource: Send + Debug {
    /// The resource this source reports.
    fn resource(&self) -> Resource;

    /// Read both modes. Fails if either mode is missing; never partial.
    fn read(&mut self) -> Result<ResourceSample, ReadError>;

    /// Human-readable description, usually the file path.
    fn description(&self) -> &str;
}

/// Open the file sources for every resource under `dir`.
pub fn open_all<P: AsRef<Path>>(dir: P) -> Result<Vec<Box<dyn PressureSource>>, ReadError> {
    Resource::ALL
        .into_iter()
        .map(|resource| {
            PressureFile::open(dir.as_ref(), resource)
                .map(|file| Box::new(file) as Box<dyn PressureSource>)
        })
        .collect()
}
