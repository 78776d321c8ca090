//! ODF package (ZIP archive) access.

use odp_notes_core::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

/// Member holding the MIME declaration.
pub const MIMETYPE_MEMBER: &str = "mimetype";

/// Member holding the document body.
pub const CONTENT_MEMBER: &str = "content.xml";

/// Raw members needed for notes extraction.
#[derive(Debug, Clone)]
pub struct OdpParts {
    /// Bytes of the `mimetype` member.
    pub mimetype: Vec<u8>,
    /// Bytes of the `content.xml` member.
    pub content: Vec<u8>,
}

/// An opened ODF package.
pub struct OdpArchive<R> {
    archive: ZipArchive<R>,
}

impl OdpArchive<BufReader<File>> {
    /// Open a package from a file on disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::open(BufReader::new(file))
    }
}

impl<R: Read + Seek> OdpArchive<R> {
    /// Open a package from any seekable reader.
    pub fn open(reader: R) -> Result<Self> {
        let archive = ZipArchive::new(reader)
            .map_err(|e| Error::ArchiveRead(format!("Failed to open ZIP: {}", e)))?;

        Ok(Self { archive })
    }

    /// Read a single member's raw bytes.
    pub fn read_member(&mut self, name: &str) -> Result<Vec<u8>> {
        read_member(&mut self.archive, name)
    }

    /// Read the MIME declaration and content stream, releasing the archive.
    pub fn into_parts(mut self) -> Result<OdpParts> {
        let mimetype = self.read_member(MIMETYPE_MEMBER)?;
        let content = self.read_member(CONTENT_MEMBER)?;

        Ok(OdpParts { mimetype, content })
    }
}

/// Read a member of a ZIP archive into memory.
pub fn read_member<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Vec<u8>> {
    let mut file = archive
        .by_name(name)
        .map_err(|e| Error::ArchiveRead(format!("File not found in archive '{}': {}", name, e)))?;

    let mut content = Vec::with_capacity(file.size() as usize);
    file.read_to_end(&mut content)
        .map_err(|e| Error::ArchiveRead(format!("Failed to read '{}': {}", name, e)))?;

    log::debug!("Read {} bytes from '{}'", content.len(), name);
    Ok(content)
}

/// Read the MIME declaration and content stream from a package.
///
/// The archive is dropped before returning, whether or not reading succeeded.
pub fn read_parts<R: Read + Seek>(reader: R) -> Result<OdpParts> {
    OdpArchive::open(reader)?.into_parts()
}
