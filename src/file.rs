use crate::constant::FINGERPRINT_SEED;
use crate::error::{ReconcileError, Result};
use std::fs;
use std::path::Path;
use tracing::debug;
use xxhash_rust::xxh64::xxh64;

/// Read a whole UTF-8 document
pub fn read_text(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path).map_err(|e| ReconcileError::io(path, e))?;
    debug!("Read {} bytes from {:?}", content.len(), path);
    Ok(content)
}

/// Overwrite a document with new content
pub fn write_text(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| ReconcileError::io(path, e))?;
    debug!("Wrote {} bytes to {:?}", content.len(), path);
    Ok(())
}

/// XXHash64 of content as a hex string
pub fn fingerprint(content: &str) -> String {
    let hash = xxh64(content.as_bytes(), FINGERPRINT_SEED);
    format!("{:016x}", hash)
}
