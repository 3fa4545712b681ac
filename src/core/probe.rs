//! core/probe.rs
//! "Is this actually audio?" check (Symphonia).
//!
//! The id3 crate will happily prepend a tag to any file, so before we write
//! we ask Symphonia to find a format reader and a default track.
//! No decoding happens here.

use std::fs::File;
use std::path::Path;

use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::error::{Error, Result};

pub fn probe_audio(path: &Path) -> Result<()> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mss = MediaSourceStream::new(Box::new(file), MediaSourceStreamOptions::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| Error::NotAudio {
            path: path.to_path_buf(),
            reason: format!("format probe failed: {e}"),
        })?;

    if probed.format.default_track().is_none() {
        return Err(Error::NotAudio {
            path: path.to_path_buf(),
            reason: "no supported audio track found".to_string(),
        });
    }

    Ok(())
}
