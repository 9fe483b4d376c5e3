//! Builders for synthetic GMA/TPL archives used across the test modules.

use crate::format::{
    GMA_FILE_HEADER_SIZE, GMA_OFFSET_ENTRY_SIZE, MATERIAL_ENTRY_SIZE, MODEL_HEADER_SIZE,
    MODEL_MATERIAL_COUNT_OFFSET, align_up, tpl_header_len,
};

/// Build a model record: a 0x40-byte header with the given material count,
/// one material entry per texture index, and the geometry blob.
///
/// Flag and trailing bytes are filled with per-material marker values so
/// tests can detect misaligned copies.
pub fn model_record(texture_indices: &[u16], geometry: &[u8]) -> Vec<u8> {
    let mut bytes = vec![0u8; MODEL_HEADER_SIZE];
    bytes[..4].copy_from_slice(b"GCMF");
    bytes[MODEL_MATERIAL_COUNT_OFFSET..MODEL_MATERIAL_COUNT_OFFSET + 2]
        .copy_from_slice(&(texture_indices.len() as u16).to_be_bytes());
    for (i, &texture) in texture_indices.iter().enumerate() {
        let mut entry = [0u8; MATERIAL_ENTRY_SIZE];
        entry[..4].fill(0xF0 | i as u8);
        entry[4..6].copy_from_slice(&texture.to_be_bytes());
        entry[6..].fill(0x80 | i as u8);
        bytes.extend_from_slice(&entry);
    }
    bytes.extend_from_slice(geometry);
    bytes
}

/// Builds a well-formed GMA from named model records.
#[derive(Default)]
pub struct GmaBuilder {
    models: Vec<(String, Vec<u8>)>,
}

impl GmaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model(mut self, name: &str, record: Vec<u8>) -> Self {
        self.models.push((name.to_owned(), record));
        self
    }

    pub fn build(self) -> Vec<u8> {
        let name_list_len: usize = self.models.iter().map(|(name, _)| name.len() + 1).sum();
        let header_len = align_up(
            GMA_FILE_HEADER_SIZE + GMA_OFFSET_ENTRY_SIZE * self.models.len() + name_list_len,
        );

        let mut out = Vec::new();
        out.extend_from_slice(&(self.models.len() as u32).to_be_bytes());
        out.extend_from_slice(&(header_len as u32).to_be_bytes());

        let mut data_offset = 0u32;
        let mut name_offset = 0u32;
        for (name, record) in &self.models {
            out.extend_from_slice(&data_offset.to_be_bytes());
            out.extend_from_slice(&name_offset.to_be_bytes());
            data_offset += record.len() as u32;
            name_offset += name.len() as u32 + 1;
        }
        for (name, _) in &self.models {
            out.extend_from_slice(name.as_bytes());
            out.push(0);
        }
        out.resize(header_len, 0);
        for (_, record) in &self.models {
            out.extend_from_slice(record);
        }
        out
    }
}

/// Builds a well-formed TPL from (format, pixel data) pairs.
#[derive(Default)]
pub struct TplBuilder {
    textures: Vec<(u32, Vec<u8>)>,
}

impl TplBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texture(mut self, format: u32, data: &[u8]) -> Self {
        self.textures.push((format, data.to_vec()));
        self
    }

    pub fn build(self) -> Vec<u8> {
        let header_len = tpl_header_len(self.textures.len());

        let mut out = Vec::new();
        out.extend_from_slice(&(self.textures.len() as u32).to_be_bytes());
        let mut data_offset = header_len as u32;
        for (i, (format, data)) in self.textures.iter().enumerate() {
            out.extend_from_slice(&format.to_be_bytes());
            out.extend_from_slice(&data_offset.to_be_bytes());
            out.extend_from_slice(&[0xA0 | i as u8; 8]);
            data_offset += data.len() as u32;
        }
        out.resize(header_len, 0);
        for (_, data) in &self.textures {
            out.extend_from_slice(data);
        }
        out
    }
}
