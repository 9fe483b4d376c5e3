//! Parser for TPL texture-archive files.
//!
//! A TPL file contains a texture count, a table of 0x10-byte descriptors
//! (format, absolute data offset, opaque attributes), zero padding to a
//! multiple of 0x20, and concatenated pixel-data blobs. A texture's pixel
//! data runs from its descriptor's offset to the next descriptor's offset,
//! or to end of file for the last texture.

use std::ops::Range;

use thiserror::Error;

use crate::format::{TPL_DATA_OFFSET_OFFSET, TPL_DESCRIPTOR_SIZE, TPL_FILE_HEADER_SIZE};
use crate::parse::be_u32_at;

#[derive(Debug, Error)]
pub enum TplError {
    #[error("file too short for TPL header (have {0:#x} bytes)")]
    TooShort(usize),
    #[error("descriptor table extends beyond file (need {needed:#x}, file is {file_len:#x})")]
    DescriptorTableOutOfBounds { needed: usize, file_len: usize },
    #[error("texture {texture} extent {start:#x}..{end:#x} is invalid (file is {file_len:#x})")]
    BadTextureExtent {
        texture: usize,
        start: usize,
        end: usize,
        file_len: usize,
    },
    #[error("texture index {index} out of range (archive holds {count} textures)")]
    TextureIndexOutOfRange { index: u16, count: usize },
}

/// One texture's entry in the descriptor table.
#[derive(Debug, Clone)]
pub struct TextureDesc {
    /// Opaque format/flag bytes, copied verbatim when rewriting.
    pub format: [u8; 4],
    /// Absolute offset of the pixel data within the file.
    pub data_offset: u32,
    /// Opaque attribute bytes, copied verbatim when rewriting.
    pub attributes: [u8; 8],
    /// Absolute byte extent of the pixel data within the file.
    pub data_range: Range<usize>,
}

/// Parsed index of a TPL file.
#[derive(Debug)]
pub struct TplIndex {
    pub descriptors: Vec<TextureDesc>,
}

impl TplIndex {
    /// Parse the descriptor table of a TPL file from raw bytes.
    pub fn parse(file_data: &[u8]) -> Result<TplIndex, TplError> {
        let file_len = file_data.len();
        let texture_count =
            be_u32_at(file_data, 0x00).ok_or(TplError::TooShort(file_len))? as usize;

        let table_end = TPL_FILE_HEADER_SIZE + TPL_DESCRIPTOR_SIZE * texture_count;
        if table_end > file_len {
            return Err(TplError::DescriptorTableOutOfBounds {
                needed: table_end,
                file_len,
            });
        }

        let mut descriptors = Vec::with_capacity(texture_count);
        for texture in 0..texture_count {
            let entry_offset = TPL_FILE_HEADER_SIZE + TPL_DESCRIPTOR_SIZE * texture;
            let entry = &file_data[entry_offset..entry_offset + TPL_DESCRIPTOR_SIZE];
            descriptors.push(TextureDesc {
                format: entry[..4].try_into().expect("descriptor is 0x10 bytes"),
                data_offset: be_u32_at(entry, TPL_DATA_OFFSET_OFFSET)
                    .expect("descriptor is 0x10 bytes"),
                attributes: entry[8..].try_into().expect("descriptor is 0x10 bytes"),
                data_range: 0..0,
            });
        }

        // Resolve extents: each texture ends where the next one starts, the
        // last at end of file.
        for texture in 0..texture_count {
            let start = descriptors[texture].data_offset as usize;
            let end = if texture + 1 == texture_count {
                file_len
            } else {
                descriptors[texture + 1].data_offset as usize
            };
            if start > end || end > file_len {
                return Err(TplError::BadTextureExtent {
                    texture,
                    start,
                    end,
                    file_len,
                });
            }
            descriptors[texture].data_range = start..end;
        }

        Ok(TplIndex { descriptors })
    }

    pub fn texture_count(&self) -> usize {
        self.descriptors.len()
    }

    /// Look up a descriptor by the index a material references.
    pub fn descriptor(&self, index: u16) -> Result<&TextureDesc, TplError> {
        self.descriptors
            .get(index as usize)
            .ok_or(TplError::TextureIndexOutOfRange {
                index,
                count: self.descriptors.len(),
            })
    }

    /// Header length of this archive: the first texture's data offset.
    ///
    /// `None` for a zero-texture archive, which has no data region.
    pub fn header_len(&self) -> Option<usize> {
        self.descriptors.first().map(|d| d.data_offset as usize)
    }
}
