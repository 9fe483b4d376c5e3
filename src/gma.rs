//! Parser for GMA model-archive files.
//!
//! A GMA file contains:
//! - A fixed header with the model count and total header length
//! - An offset table with one `(dataOffset, nameOffset)` pair per model
//! - A name list of null-terminated model names, zero-padded to the header length
//! - A data region of back-to-back model records
//!
//! Each model record is a fixed 0x40-byte header, a material table, and a
//! geometry blob that runs to the start of the next model (or end of file
//! for the last model).

use std::ops::Range;

use thiserror::Error;

use crate::format::{
    GMA_FILE_HEADER_SIZE, GMA_OFFSET_ENTRY_SIZE, MATERIAL_ENTRY_SIZE,
    MATERIAL_TEXTURE_INDEX_OFFSET, MATERIAL_TRAILING_SIZE, MODEL_HEADER_SIZE,
    MODEL_MATERIAL_COUNT_OFFSET,
};
use crate::parse::{be_u16_at, be_u32_at, scan_null_terminated};

#[derive(Debug, Error)]
pub enum GmaError {
    #[error("file too short for GMA header (have {0:#x} bytes)")]
    TooShort(usize),
    #[error("offset table extends beyond header (need {needed:#x}, header is {header_len:#x}, file is {file_len:#x})")]
    OffsetTableOutOfBounds {
        needed: usize,
        header_len: usize,
        file_len: usize,
    },
    #[error("model {model} name at {offset:#x} has no terminator inside the header")]
    UnterminatedName { model: usize, offset: usize },
    #[error("model {model} extent {start:#x}..{end:#x} is invalid (file is {file_len:#x})")]
    BadModelExtent {
        model: usize,
        start: usize,
        end: usize,
        file_len: usize,
    },
    #[error("model record too short for header (have {0:#x} bytes)")]
    TruncatedModelHeader(usize),
    #[error("material table of {count} entries extends beyond model (have {available:#x} bytes)")]
    MaterialTableOutOfBounds { count: u16, available: usize },
}

/// One model's entry in the archive index.
#[derive(Debug, Clone)]
pub struct ModelEntry {
    /// The model's name, without the null terminator.
    pub name: String,
    /// Data offset relative to the end of the archive header.
    pub data_offset: u32,
    /// Name offset relative to the start of the name list.
    pub name_offset: u32,
    /// Absolute byte extent of the model record within the file.
    pub data_range: Range<usize>,
}

/// Parsed index of a GMA file: counts, header geometry, and per-model entries.
#[derive(Debug)]
pub struct GmaIndex {
    /// Total header length (offset table + name list + padding).
    pub header_len: usize,
    /// Exact name-list length: the end of the last name (terminator
    /// included) relative to the name-list start. Zero for an empty archive.
    pub name_list_len: usize,
    pub entries: Vec<ModelEntry>,
}

impl GmaIndex {
    /// Parse the index of a GMA file from raw bytes.
    ///
    /// Fails whenever the header, offset table, a name scan, or a model
    /// extent would read past the end of the data.
    pub fn parse(file_data: &[u8]) -> Result<GmaIndex, GmaError> {
        let file_len = file_data.len();
        let model_count =
            be_u32_at(file_data, 0x00).ok_or(GmaError::TooShort(file_len))? as usize;
        let header_len =
            be_u32_at(file_data, 0x04).ok_or(GmaError::TooShort(file_len))? as usize;

        let name_list_start = GMA_FILE_HEADER_SIZE + GMA_OFFSET_ENTRY_SIZE * model_count;
        if name_list_start > header_len || header_len > file_len {
            return Err(GmaError::OffsetTableOutOfBounds {
                needed: name_list_start,
                header_len,
                file_len,
            });
        }

        // First pass: offset-table pairs and names
        let mut entries = Vec::with_capacity(model_count);
        let mut name_list_len = 0usize;
        for model in 0..model_count {
            let entry_offset = GMA_FILE_HEADER_SIZE + GMA_OFFSET_ENTRY_SIZE * model;
            // In bounds per the check above
            let data_offset = be_u32_at(file_data, entry_offset).expect("offset table in bounds");
            let name_offset =
                be_u32_at(file_data, entry_offset + 4).expect("offset table in bounds");

            let name_start = name_list_start + name_offset as usize;
            let (name_bytes, scanned) = scan_null_terminated(file_data, name_start, header_len)
                .ok_or(GmaError::UnterminatedName {
                    model,
                    offset: name_start,
                })?;
            name_list_len = name_list_len.max(name_offset as usize + scanned);

            entries.push(ModelEntry {
                name: String::from_utf8_lossy(name_bytes).into_owned(),
                data_offset,
                name_offset,
                data_range: 0..0,
            });
        }

        // Second pass: resolve extents now that every data offset is known.
        // A model runs to the next model's start, or to end of file for the
        // last model.
        for model in 0..model_count {
            let start = header_len + entries[model].data_offset as usize;
            let end = if model + 1 == model_count {
                file_len
            } else {
                header_len + entries[model + 1].data_offset as usize
            };
            if start > end || end > file_len {
                return Err(GmaError::BadModelExtent {
                    model,
                    start,
                    end,
                    file_len,
                });
            }
            entries[model].data_range = start..end;
        }

        Ok(GmaIndex {
            header_len,
            name_list_len,
            entries,
        })
    }
}

/// One material entry inside a model record.
#[derive(Debug, Clone, Copy)]
pub struct MaterialEntry<'a> {
    /// Opaque leading flag bytes, copied verbatim when rewriting.
    pub flags: &'a [u8],
    /// Index into the companion TPL's descriptor table.
    pub texture_index: u16,
    /// Opaque trailing bytes, copied verbatim when rewriting.
    pub trailing: &'a [u8],
}

/// A model record split into its header, material table, and geometry blob.
///
/// Borrowed views into the source archive; extraction and merge rewrite the
/// material table (remapping texture indices) and copy everything else
/// verbatim.
#[derive(Debug)]
pub struct ModelRecord<'a> {
    pub header: &'a [u8],
    pub materials: Vec<MaterialEntry<'a>>,
    pub geometry: &'a [u8],
}

impl<'a> ModelRecord<'a> {
    /// Split a model's byte extent into header, materials, and geometry.
    pub fn parse(bytes: &'a [u8]) -> Result<ModelRecord<'a>, GmaError> {
        if bytes.len() < MODEL_HEADER_SIZE {
            return Err(GmaError::TruncatedModelHeader(bytes.len()));
        }
        let header = &bytes[..MODEL_HEADER_SIZE];
        let material_count =
            be_u16_at(header, MODEL_MATERIAL_COUNT_OFFSET).expect("header is 0x40 bytes");

        let table_len = MATERIAL_ENTRY_SIZE * material_count as usize;
        let table_end = MODEL_HEADER_SIZE + table_len;
        if table_end > bytes.len() {
            return Err(GmaError::MaterialTableOutOfBounds {
                count: material_count,
                available: bytes.len(),
            });
        }

        let mut materials = Vec::with_capacity(material_count as usize);
        for i in 0..material_count as usize {
            let entry = &bytes[MODEL_HEADER_SIZE + MATERIAL_ENTRY_SIZE * i..][..MATERIAL_ENTRY_SIZE];
            materials.push(MaterialEntry {
                flags: &entry[..MATERIAL_TEXTURE_INDEX_OFFSET],
                texture_index: be_u16_at(entry, MATERIAL_TEXTURE_INDEX_OFFSET)
                    .expect("entry is 0x20 bytes"),
                trailing: &entry[MATERIAL_TEXTURE_INDEX_OFFSET + 2..][..MATERIAL_TRAILING_SIZE],
            });
        }

        Ok(ModelRecord {
            header,
            materials,
            geometry: &bytes[table_end..],
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testutil::{GmaBuilder, model_record};

    #[test]
    fn parses_counts_names_and_extents() {
        let record_a = model_record(&[0, 1], b"geometry");
        let record_b = model_record(&[], b"tail");
        let gma = GmaBuilder::new()
            .model("GOAL_01", record_a.clone())
            .model("BUTTON_A", record_b.clone())
            .build();

        let index = GmaIndex::parse(&gma).unwrap();
        assert_eq!(index.entries.len(), 2);
        assert_eq!(index.entries[0].name, "GOAL_01");
        assert_eq!(index.entries[1].name, "BUTTON_A");
        // "GOAL_01\0" + "BUTTON_A\0"
        assert_eq!(index.name_list_len, 8 + 9);
        assert_eq!(index.header_len % 0x20, 0);

        assert_eq!(&gma[index.entries[0].data_range.clone()], &record_a[..]);
        assert_eq!(&gma[index.entries[1].data_range.clone()], &record_b[..]);
        assert_eq!(index.entries[1].data_range.end, gma.len());
    }

    #[test]
    fn model_record_splits_materials() {
        let bytes = model_record(&[7, 3, 7], b"blob");
        let record = ModelRecord::parse(&bytes).unwrap();
        assert_eq!(record.header.len(), MODEL_HEADER_SIZE);
        assert_eq!(record.materials.len(), 3);
        assert_eq!(record.materials[0].texture_index, 7);
        assert_eq!(record.materials[1].texture_index, 3);
        assert_eq!(record.materials[2].texture_index, 7);
        assert_eq!(record.materials[0].flags.len(), 4);
        assert_eq!(record.materials[0].trailing.len(), 0x1A);
        assert_eq!(record.geometry, b"blob");
    }

    #[test]
    fn rejects_inconsistent_model_count() {
        // Claims 100 models but the file holds far fewer table entries
        let mut gma = GmaBuilder::new().model("A", model_record(&[], b"")).build();
        gma[..4].copy_from_slice(&100u32.to_be_bytes());
        assert!(matches!(
            GmaIndex::parse(&gma),
            Err(GmaError::OffsetTableOutOfBounds { .. })
        ));
    }

    #[test]
    fn rejects_name_running_past_header() {
        let mut gma = GmaBuilder::new().model("A", model_record(&[], b"")).build();
        // Point the name offset past the padded header end
        let header_len = u32::from_be_bytes(gma[4..8].try_into().unwrap());
        gma[0x0C..0x10].copy_from_slice(&header_len.to_be_bytes());
        assert!(matches!(
            GmaIndex::parse(&gma),
            Err(GmaError::UnterminatedName { model: 0, .. })
        ));
    }

    #[test]
    fn rejects_truncated_material_table() {
        let mut bytes = model_record(&[1, 2], b"");
        bytes.truncate(MODEL_HEADER_SIZE + MATERIAL_ENTRY_SIZE);
        assert!(matches!(
            ModelRecord::parse(&bytes),
            Err(GmaError::MaterialTableOutOfBounds { count: 2, .. })
        ));
    }
}
