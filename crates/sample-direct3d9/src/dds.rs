//! Minimal DDS reader for the texture asset.
//!
//! Only the formats the sample assets actually use are supported: the BC
//! FourCC formats (`DXT1`/`DXT3`/`DXT5`) and uncompressed 32-bit
//! `A8R8G8B8`/`X8R8G8B8`. Mip chains are honored; cube maps and volume
//! textures are not.

use thiserror::Error;

const DDS_MAGIC: u32 = u32::from_le_bytes(*b"DDS ");
const HEADER_SIZE: usize = 124;
const PIXEL_FORMAT_SIZE: u32 = 32;

const DDSD_MIPMAPCOUNT: u32 = 0x2_0000;
const DDPF_ALPHAPIXELS: u32 = 0x1;
const DDPF_FOURCC: u32 = 0x4;
const DDPF_RGB: u32 = 0x40;

const FOURCC_DXT1: u32 = u32::from_le_bytes(*b"DXT1");
const FOURCC_DXT3: u32 = u32::from_le_bytes(*b"DXT3");
const FOURCC_DXT5: u32 = u32::from_le_bytes(*b"DXT5");

#[derive(Debug, Error)]
pub enum DdsError {
    #[error("missing DDS magic")]
    BadMagic,
    #[error("file too small for a DDS header")]
    TruncatedHeader,
    #[error("header size field is {0}, expected 124")]
    BadHeaderSize(u32),
    #[error("pixel format size field is {0}, expected 32")]
    BadPixelFormatSize(u32),
    #[error("unsupported pixel format (fourcc 0x{fourcc:08X}, flags 0x{flags:08X}, {bit_count} bpp)")]
    UnsupportedFormat {
        fourcc: u32,
        flags: u32,
        bit_count: u32,
    },
    #[error("image data truncated: mip {level} needs {needed} bytes, {available} left")]
    TruncatedData {
        level: u32,
        needed: usize,
        available: usize,
    },
    #[error("mip {level} dimensions {width}x{height} exceed the addressable size")]
    OversizedImage { level: u32, width: u32, height: u32 },
}

/// Pixel format of the decoded file, one-to-one with a `D3DFMT_*` value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DdsFormat {
    Dxt1,
    Dxt3,
    Dxt5,
    A8R8G8B8,
    X8R8G8B8,
}

impl DdsFormat {
    /// Bytes occupied by one mip level of the given dimensions, or `None`
    /// when the header's dimensions do not fit in memory. The fields are
    /// attacker-controlled, so all the arithmetic is checked.
    pub fn level_size(self, width: u32, height: u32) -> Option<usize> {
        let (rows, row_bytes) = self.row_layout(width, height);
        u64::from(rows)
            .checked_mul(row_bytes as u64)
            .and_then(|total| usize::try_from(total).ok())
    }

    /// Rows of data in one mip level (block rows for compressed formats) and
    /// the byte length of each row.
    pub fn row_layout(self, width: u32, height: u32) -> (u32, u64) {
        match self {
            // 4x4 texel blocks, 8 or 16 bytes each.
            DdsFormat::Dxt1 => (height.div_ceil(4), u64::from(width.div_ceil(4)) * 8),
            DdsFormat::Dxt3 | DdsFormat::Dxt5 => {
                (height.div_ceil(4), u64::from(width.div_ceil(4)) * 16)
            }
            DdsFormat::A8R8G8B8 | DdsFormat::X8R8G8B8 => (height, u64::from(width) * 4),
        }
    }
}

/// One mip level's dimensions and pixel bytes.
#[derive(Debug)]
pub struct MipLevel<'a> {
    pub level: u32,
    pub width: u32,
    pub height: u32,
    pub data: &'a [u8],
}

/// A decoded DDS file: header fields plus the raw pixel payload.
#[derive(Debug)]
pub struct DdsImage {
    width: u32,
    height: u32,
    mip_count: u32,
    format: DdsFormat,
    data: Vec<u8>,
    // Byte range of each mip level within `data`, proven in-bounds by
    // `parse`.
    level_ranges: Vec<std::ops::Range<usize>>,
}

impl DdsImage {
    pub fn parse(bytes: &[u8]) -> Result<Self, DdsError> {
        if bytes.len() < 4 + HEADER_SIZE {
            return Err(DdsError::TruncatedHeader);
        }
        if read_u32(bytes, 0) != DDS_MAGIC {
            return Err(DdsError::BadMagic);
        }

        // DDS_HEADER, offsets relative to the magic.
        let header_size = read_u32(bytes, 4);
        if header_size != HEADER_SIZE as u32 {
            return Err(DdsError::BadHeaderSize(header_size));
        }
        let flags = read_u32(bytes, 8);
        let height = read_u32(bytes, 12);
        let width = read_u32(bytes, 16);
        let mip_count = if flags & DDSD_MIPMAPCOUNT != 0 {
            read_u32(bytes, 28).max(1)
        } else {
            1
        };

        // DDS_PIXELFORMAT at offset 76.
        let pf_size = read_u32(bytes, 76);
        if pf_size != PIXEL_FORMAT_SIZE {
            return Err(DdsError::BadPixelFormatSize(pf_size));
        }
        let pf_flags = read_u32(bytes, 80);
        let fourcc = read_u32(bytes, 84);
        let bit_count = read_u32(bytes, 88);

        let format = if pf_flags & DDPF_FOURCC != 0 {
            match fourcc {
                FOURCC_DXT1 => DdsFormat::Dxt1,
                FOURCC_DXT3 => DdsFormat::Dxt3,
                FOURCC_DXT5 => DdsFormat::Dxt5,
                _ => {
                    return Err(DdsError::UnsupportedFormat {
                        fourcc,
                        flags: pf_flags,
                        bit_count,
                    })
                }
            }
        } else if pf_flags & DDPF_RGB != 0 && bit_count == 32 {
            if pf_flags & DDPF_ALPHAPIXELS != 0 {
                DdsFormat::A8R8G8B8
            } else {
                DdsFormat::X8R8G8B8
            }
        } else {
            return Err(DdsError::UnsupportedFormat {
                fourcc,
                flags: pf_flags,
                bit_count,
            });
        };

        let mut image = Self {
            width,
            height,
            mip_count,
            format,
            data: bytes[4 + HEADER_SIZE..].to_vec(),
            level_ranges: Vec::with_capacity(mip_count as usize),
        };

        // Validate the payload covers the whole mip chain up front so later
        // slicing cannot fail.
        let mut offset = 0usize;
        for level in 0..mip_count {
            let (w, h) = image.level_dimensions(level);
            let needed = format.level_size(w, h).ok_or(DdsError::OversizedImage {
                level,
                width: w,
                height: h,
            })?;
            let available = image.data.len().saturating_sub(offset);
            if needed > available {
                return Err(DdsError::TruncatedData {
                    level,
                    needed,
                    available,
                });
            }
            image.level_ranges.push(offset..offset + needed);
            offset += needed;
        }

        Ok(image)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn mip_count(&self) -> u32 {
        self.mip_count
    }

    pub fn format(&self) -> DdsFormat {
        self.format
    }

    /// Dimensions of a mip level; each level halves, clamped at one texel.
    pub fn level_dimensions(&self, level: u32) -> (u32, u32) {
        ((self.width >> level).max(1), (self.height >> level).max(1))
    }

    /// Iterates the mip chain in storage order, largest level first.
    pub fn mip_levels(&self) -> impl Iterator<Item = MipLevel<'_>> {
        self.level_ranges.iter().enumerate().map(|(level, range)| {
            let level = level as u32;
            let (width, height) = self.level_dimensions(level);
            MipLevel {
                level,
                width,
                height,
                data: &self.data[range.clone()],
            }
        })
    }
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_dds(
        width: u32,
        height: u32,
        mip_count: u32,
        pf_flags: u32,
        fourcc: u32,
        bit_count: u32,
        payload: &[u8],
    ) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&DDS_MAGIC.to_le_bytes());
        bytes.extend_from_slice(&(HEADER_SIZE as u32).to_le_bytes());
        let flags = if mip_count > 1 { DDSD_MIPMAPCOUNT } else { 0 };
        bytes.extend_from_slice(&flags.to_le_bytes());
        bytes.extend_from_slice(&height.to_le_bytes());
        bytes.extend_from_slice(&width.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes()); // pitch
        bytes.extend_from_slice(&0u32.to_le_bytes()); // depth
        bytes.extend_from_slice(&mip_count.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 44]); // reserved1
        bytes.extend_from_slice(&PIXEL_FORMAT_SIZE.to_le_bytes());
        bytes.extend_from_slice(&pf_flags.to_le_bytes());
        bytes.extend_from_slice(&fourcc.to_le_bytes());
        bytes.extend_from_slice(&bit_count.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 16]); // channel masks
        bytes.extend_from_slice(&[0u8; 20]); // caps, reserved2
        assert_eq!(bytes.len(), 4 + HEADER_SIZE);
        bytes.extend_from_slice(payload);
        bytes
    }

    #[test]
    fn parses_uncompressed_argb_with_mips() {
        // 2x2 with two mips: 16 + 4 bytes of pixels.
        let payload: Vec<u8> = (0u8..20).collect();
        let bytes = build_dds(2, 2, 2, DDPF_RGB | DDPF_ALPHAPIXELS, 0, 32, &payload);
        let image = DdsImage::parse(&bytes).unwrap();

        assert_eq!(image.format(), DdsFormat::A8R8G8B8);
        assert_eq!(image.mip_count(), 2);
        let levels: Vec<_> = image.mip_levels().collect();
        assert_eq!(levels.len(), 2);
        assert_eq!((levels[0].width, levels[0].height), (2, 2));
        assert_eq!(levels[0].data.len(), 16);
        assert_eq!((levels[1].width, levels[1].height), (1, 1));
        assert_eq!(levels[1].data, &payload[16..]);
    }

    #[test]
    fn parses_dxt1_block_sizes() {
        // 8x8 DXT1: one mip, 2x2 blocks of 8 bytes.
        let payload = vec![0xAB; 32];
        let bytes = build_dds(8, 8, 1, DDPF_FOURCC, FOURCC_DXT1, 0, &payload);
        let image = DdsImage::parse(&bytes).unwrap();

        assert_eq!(image.format(), DdsFormat::Dxt1);
        let level = image.mip_levels().next().unwrap();
        assert_eq!(level.data.len(), 32);
        assert_eq!(DdsFormat::Dxt1.row_layout(8, 8), (2, 16));
    }

    #[test]
    fn sub_block_mips_still_occupy_a_whole_block() {
        // A 4x4 DXT5 with a full chain: 4x4, 2x2, 1x1 all take one block.
        assert_eq!(DdsFormat::Dxt5.level_size(4, 4), Some(16));
        assert_eq!(DdsFormat::Dxt5.level_size(2, 2), Some(16));
        assert_eq!(DdsFormat::Dxt5.level_size(1, 1), Some(16));
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        assert_eq!(DdsFormat::A8R8G8B8.level_size(u32::MAX, u32::MAX), None);
        assert_eq!(DdsFormat::Dxt1.level_size(u32::MAX, u32::MAX), None);

        // A header claiming 4 billion texels a side must parse to an error,
        // not panic on the size arithmetic.
        let bytes = build_dds(
            u32::MAX,
            u32::MAX,
            1,
            DDPF_RGB | DDPF_ALPHAPIXELS,
            0,
            32,
            &[],
        );
        assert!(matches!(
            DdsImage::parse(&bytes),
            Err(DdsError::OversizedImage { level: 0, .. })
        ));
    }

    #[test]
    fn bad_magic_is_rejected() {
        let mut bytes = build_dds(4, 4, 1, DDPF_FOURCC, FOURCC_DXT1, 0, &[0; 8]);
        bytes[0] = b'X';
        assert!(matches!(DdsImage::parse(&bytes), Err(DdsError::BadMagic)));
    }

    #[test]
    fn truncated_payload_is_rejected() {
        // 8x8 DXT1 needs 32 bytes; provide 8.
        let bytes = build_dds(8, 8, 1, DDPF_FOURCC, FOURCC_DXT1, 0, &[0; 8]);
        assert!(matches!(
            DdsImage::parse(&bytes),
            Err(DdsError::TruncatedData { level: 0, .. })
        ));
    }

    #[test]
    fn unsupported_formats_are_rejected() {
        // 16-bit RGB is outside the supported set.
        let bytes = build_dds(4, 4, 1, DDPF_RGB, 0, 16, &[0; 32]);
        assert!(matches!(
            DdsImage::parse(&bytes),
            Err(DdsError::UnsupportedFormat { .. })
        ));
    }
}
