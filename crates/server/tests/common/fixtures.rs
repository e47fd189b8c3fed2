//! Test data builders: minimal structurally valid PNG and JPEG streams.

/// Build a PNG chunk with a valid CRC.
#[allow(dead_code)]
pub fn png_chunk(chunk_type: &[u8; 4], data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(chunk_type);
    out.extend_from_slice(data);
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    out.extend_from_slice(&hasher.finalize().to_be_bytes());
    out
}

/// Build a minimal structurally valid PNG with the given dimensions.
#[allow(dead_code)]
pub fn test_png(width: u32, height: u32) -> Vec<u8> {
    let mut ihdr = Vec::new();
    ihdr.extend_from_slice(&width.to_be_bytes());
    ihdr.extend_from_slice(&height.to_be_bytes());
    // bit depth 8, color type 2 (truecolor), default methods
    ihdr.extend_from_slice(&[8, 2, 0, 0, 0]);

    let mut out = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
    out.extend_from_slice(&png_chunk(b"IHDR", &ihdr));
    out.extend_from_slice(&png_chunk(b"IDAT", &[0x78, 0x9c, 0x03, 0x00]));
    out.extend_from_slice(&png_chunk(b"IEND", &[]));
    out
}

/// A PNG whose canonical bytes differ per `seed`, so each upload gets a
/// distinct content hash.
#[allow(dead_code)]
pub fn distinct_png(seed: u8) -> Vec<u8> {
    let mut ihdr = Vec::new();
    ihdr.extend_from_slice(&4u32.to_be_bytes());
    ihdr.extend_from_slice(&4u32.to_be_bytes());
    ihdr.extend_from_slice(&[8, 2, 0, 0, 0]);

    let mut out = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
    out.extend_from_slice(&png_chunk(b"IHDR", &ihdr));
    out.extend_from_slice(&png_chunk(b"IDAT", &[0x78, 0x9c, 0x03, seed]));
    out.extend_from_slice(&png_chunk(b"IEND", &[]));
    out
}

/// Build a JPEG segment (marker, big-endian length including itself, payload).
#[allow(dead_code)]
pub fn jpeg_segment(marker: u8, payload: &[u8]) -> Vec<u8> {
    let mut out = vec![0xff, marker];
    out.extend_from_slice(&((payload.len() as u16 + 2).to_be_bytes()));
    out.extend_from_slice(payload);
    out
}

/// Build a minimal structurally valid JPEG with the given dimensions.
#[allow(dead_code)]
pub fn test_jpeg(width: u16, height: u16) -> Vec<u8> {
    let mut out = vec![0xff, 0xd8];
    // JFIF APP0
    out.extend_from_slice(&jpeg_segment(
        0xe0,
        &[b'J', b'F', b'I', b'F', 0, 1, 1, 0, 0, 1, 0, 1, 0, 0],
    ));
    // SOF0: precision 8, height, width, 1 component
    let mut sof = vec![8];
    sof.extend_from_slice(&height.to_be_bytes());
    sof.extend_from_slice(&width.to_be_bytes());
    sof.extend_from_slice(&[1, 1, 0x11, 0]);
    out.extend_from_slice(&jpeg_segment(0xc0, &sof));
    // SOS: 1 component, then a little entropy data and EOI
    out.extend_from_slice(&jpeg_segment(0xda, &[1, 1, 0, 0, 0x3f, 0]));
    out.extend_from_slice(&[0x12, 0x34, 0x56]);
    out.extend_from_slice(&[0xff, 0xd9]);
    out
}
