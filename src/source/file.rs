//! File-backed pressure source.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use super::parse::parse_pressure;
use super::PressureSource;
use crate::data::{Resource, ResourceSample};
use crate::error::ReadError;

/// Reads one pressure file, e.g. `/proc/pressure/io`.
///
/// The handle is opened once and kept for the lifetime of the source. Every
/// read seeks back to the start and parses the whole file again, since the
/// kernel rewrites it in place.
#[derive(Debug)]
pub struct PressureFile<R = File> {
    resource: Resource,
    description: String,
    handle: R,
    buffer: String,
}

impl PressureFile<File> {
    /// Open `<dir>/<resource>`.
    pub fn open<P: AsRef<Path>>(dir: P, resource: Resource) -> Result<Self, ReadError> {
        let path = dir.as_ref().join(resource.tag());
        let description = path.display().to_string();
        let handle = File::open(&path).map_err(|source| ReadError::Open {
            path: description.clone(),
            source,
        })?;
        Ok(Self::from_reader(resource, description, handle))
    }
}

impl<R: Read + Seek> PressureFile<R> {
    /// Wrap an already-open reader.
    pub fn from_reader(resource: Resource, description: impl Into<String>, handle: R) -> Self {
        Self {
            resource,
            description: description.into(),
            handle,
            buffer: String::new(),
        }
    }

    fn read_document(&mut self) -> std::io::Result<()> {
        self.buffer.clear();
        self.handle.seek(SeekFrom::Start(0))?;
        self.handle.read_to_string(&mut self.buffer)?;
        Ok(())
    }
}

impl<R: Read + Seek + Send + std::fmt::Debug> PressureSource for PressureFile<R> {
    fn resource(&self) -> Resource {
        self.resource
    }

    fn read(&mut self) -> Result<ResourceSample, ReadError> {
        self.read_document().map_err(|source| ReadError::Io {
            path: self.description.clone(),
            source,
        })?;
        parse_pressure(self.resource, &self.description, &self.buffer)
    }

    fn description(&self) -> &str {
        &self.description
    }
}
