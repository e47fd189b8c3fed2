//! PNG container walk: integrity verification and metadata stripping.

use crate::error::{MediaError, MediaResult};

const SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

/// Chunk types preserved in the canonical form. Everything else (tEXt,
/// iTXt, eXIf, tIME, gAMA, ...) is ancillary metadata and is dropped.
const KEEP_CHUNKS: [&[u8; 4]; 5] = [b"IHDR", b"PLTE", b"tRNS", b"IDAT", b"IEND"];

/// Canonicalize a PNG byte stream.
///
/// Walks the chunk structure, verifies every chunk CRC, reads the declared
/// dimensions from IHDR, and emits the signature plus the allowlisted
/// chunks verbatim. Deterministic for identical input.
pub(crate) fn canonicalize(data: &[u8], max_dimension: u32) -> MediaResult<Vec<u8>> {
    if data.len() < SIGNATURE.len() || data[..8] != SIGNATURE {
        return Err(MediaError::Corrupt("missing PNG signature".to_string()));
    }

    let mut out = Vec::with_capacity(data.len());
    out.extend_from_slice(&SIGNATURE);

    let mut pos = SIGNATURE.len();
    let mut first = true;
    let mut saw_idat = false;
    let mut saw_iend = false;

    while pos < data.len() {
        if saw_iend {
            return Err(MediaError::Corrupt("trailing data after IEND".to_string()));
        }
        if data.len() - pos < 12 {
            return Err(MediaError::Corrupt("truncated chunk header".to_string()));
        }

        let len = u32::from_be_bytes([data[pos], data[pos + 1], data[pos + 2], data[pos + 3]])
            as usize;
        let chunk_type: [u8; 4] = [data[pos + 4], data[pos + 5], data[pos + 6], data[pos + 7]];
        let data_start = pos + 8;
        let data_end = data_start
            .checked_add(len)
            .ok_or_else(|| MediaError::Corrupt("chunk length overflow".to_string()))?;
        if data_end + 4 > data.len() {
            return Err(MediaError::Corrupt(format!(
                "chunk {} truncated",
                String::from_utf8_lossy(&chunk_type)
            )));
        }

        let declared_crc = u32::from_be_bytes([
            data[data_end],
            data[data_end + 1],
            data[data_end + 2],
            data[data_end + 3],
        ]);
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&chunk_type);
        hasher.update(&data[data_start..data_end]);
        if hasher.finalize() != declared_crc {
            return Err(MediaError::Corrupt(format!(
                "bad CRC for chunk {}",
                String::from_utf8_lossy(&chunk_type)
            )));
        }

        if first {
            if &chunk_type != b"IHDR" || len != 13 {
                return Err(MediaError::Corrupt("first chunk is not IHDR".to_string()));
            }
            let width = u32::from_be_bytes([
                data[data_start],
                data[data_start + 1],
                data[data_start + 2],
                data[data_start + 3],
            ]);
            let height = u32::from_be_bytes([
                data[data_start + 4],
                data[data_start + 5],
                data[data_start + 6],
                data[data_start + 7],
            ]);
            if width == 0 || height == 0 {
                return Err(MediaError::Corrupt("zero image dimension".to_string()));
            }
            if width > max_dimension || height > max_dimension {
                return Err(MediaError::DimensionsTooLarge {
                    width,
                    height,
                    max: max_dimension,
                });
            }
            first = false;
        }

        match &chunk_type {
            b"IDAT" => saw_idat = true,
            b"IEND" => saw_iend = true,
            _ => {}
        }

        if KEEP_CHUNKS.contains(&&chunk_type) {
            out.extend_from_slice(&data[pos..data_end + 4]);
        }

        pos = data_end + 4;
    }

    if !saw_iend {
        return Err(MediaError::Corrupt("missing IEND chunk".to_string()));
    }
    if !saw_idat {
        return Err(MediaError::Corrupt("missing IDAT chunk".to_string()));
    }

    Ok(out)
}
