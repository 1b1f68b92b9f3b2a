use std::fs;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use log::info;

use crate::config::MAX_PROG_SIZE;

/// Read a program image from disk.
///
/// Images that contain no bytes at all, or that would not fit in the
/// program region, are rejected; both are fatal to the caller.
pub fn read_program<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let image = fs::read(path)
        .with_context(|| format!("failed to open program image {}", path.display()))?;
    check_image(&image)?;
    info!("Loaded {} ({} bytes)", path.display(), image.len());
    Ok(image)
}

fn check_image(image: &[u8]) -> Result<()> {
    ensure!(!image.is_empty(), "program image is empty");
    ensure!(
        image.len() <= MAX_PROG_SIZE,
        "program image is {} bytes but only {} fit in memory",
        image.len(),
        MAX_PROG_SIZE
    );
    Ok(())
}
