//! Fixed layout constants for the GMA and TPL container formats.
//!
//! All multi-byte integers in both containers are big-endian on disk.
//! Headers and descriptor tables are padded with zero bytes to a multiple
//! of [`ARCHIVE_ALIGN`].

/// Alignment unit for GMA headers and TPL descriptor tables.
pub const ARCHIVE_ALIGN: usize = 0x20;

/// Size of the fixed GMA file header (model count + header length).
pub const GMA_FILE_HEADER_SIZE: usize = 0x08;

/// Size of one GMA offset-table entry: (dataOffset: u32, nameOffset: u32).
pub const GMA_OFFSET_ENTRY_SIZE: usize = 0x08;

/// Size of the fixed per-model header inside a GMA data region.
pub const MODEL_HEADER_SIZE: usize = 0x40;

/// Offset of the u16 material count within a model header.
pub const MODEL_MATERIAL_COUNT_OFFSET: usize = 0x18;

/// Size of one material entry following a model header.
pub const MATERIAL_ENTRY_SIZE: usize = 0x20;

/// Offset of the u16 texture index within a material entry.
pub const MATERIAL_TEXTURE_INDEX_OFFSET: usize = 0x04;

/// Opaque bytes trailing the texture index in a material entry.
pub const MATERIAL_TRAILING_SIZE: usize = 0x1A;

/// Size of the fixed TPL file header (texture count).
pub const TPL_FILE_HEADER_SIZE: usize = 0x04;

/// Size of one TPL texture descriptor: (format: 4, dataOffset: u32, attributes: 8).
pub const TPL_DESCRIPTOR_SIZE: usize = 0x10;

/// Offset of the u32 data offset within a texture descriptor.
pub const TPL_DATA_OFFSET_OFFSET: usize = 0x04;

/// Round `value` up to the next multiple of [`ARCHIVE_ALIGN`].
pub fn align_up(value: usize) -> usize {
    value.div_ceil(ARCHIVE_ALIGN) * ARCHIVE_ALIGN
}

/// Header length of a freshly written TPL holding `texture_count` descriptors.
pub fn tpl_header_len(texture_count: usize) -> usize {
    align_up(TPL_FILE_HEADER_SIZE + TPL_DESCRIPTOR_SIZE * texture_count)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn align_up_rounds_to_0x20() {
        assert_eq!(align_up(0), 0);
        assert_eq!(align_up(1), 0x20);
        assert_eq!(align_up(0x20), 0x20);
        assert_eq!(align_up(0x21), 0x40);
        assert_eq!(align_up(0x19), 0x20);
    }

    #[test]
    fn tpl_header_len_is_aligned() {
        // 4 + 16 = 20 -> 0x20; 4 + 32 = 36 -> 0x40; 4 + 48 = 52 -> 0x40
        assert_eq!(tpl_header_len(0), 0x20);
        assert_eq!(tpl_header_len(1), 0x20);
        assert_eq!(tpl_header_len(2), 0x40);
        assert_eq!(tpl_header_len(3), 0x40);
    }
}
