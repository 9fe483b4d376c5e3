//! Pairwise archive merge: concatenate two GMA/TPL pairs into one,
//! rebasing every stored offset and texture index so the result is
//! self-consistent.
//!
//! The first pair's models and textures keep their positions at the front
//! of the merged layout; the second pair's offset-table entries, material
//! texture indices, and texture data offsets are all shifted past them.
//! Textures are not deduplicated across the two inputs.

use tracing::{debug, info};

use crate::ArchivePair;
use crate::error::Result;
use crate::format::{GMA_FILE_HEADER_SIZE, GMA_OFFSET_ENTRY_SIZE, align_up, tpl_header_len};
use crate::gma::{GmaIndex, ModelRecord};
use crate::tpl::TplIndex;

/// Merge two archive pairs into one. The second pair's data is always
/// placed after the first's.
pub fn merge(
    gma1_data: &[u8],
    tpl1_data: &[u8],
    gma2_data: &[u8],
    tpl2_data: &[u8],
) -> Result<ArchivePair> {
    let gma1 = GmaIndex::parse(gma1_data)?;
    let gma2 = GmaIndex::parse(gma2_data)?;
    let tpl1 = TplIndex::parse(tpl1_data)?;
    let tpl2 = TplIndex::parse(tpl2_data)?;
    info!(
        models = gma1.entries.len() + gma2.entries.len(),
        textures = tpl1.texture_count() + tpl2.texture_count(),
        "merging archive pairs"
    );

    let gma = merge_gma(gma1_data, &gma1, gma2_data, &gma2, tpl1.texture_count())?;
    let tpl = merge_tpl(tpl1_data, &tpl1, tpl2_data, &tpl2);
    Ok(ArchivePair { gma, tpl })
}

fn merge_gma(
    gma1_data: &[u8],
    gma1: &GmaIndex,
    gma2_data: &[u8],
    gma2: &GmaIndex,
    tpl1_texture_count: usize,
) -> Result<Vec<u8>> {
    let model_count = gma1.entries.len() + gma2.entries.len();
    let data_len1 = gma1_data.len() - gma1.header_len;

    let bare_header_len = GMA_FILE_HEADER_SIZE
        + GMA_OFFSET_ENTRY_SIZE * model_count
        + gma1.name_list_len
        + gma2.name_list_len;
    let header_len = align_up(bare_header_len);

    let mut out = Vec::with_capacity(header_len + data_len1 + gma2_data.len());
    out.extend_from_slice(&(model_count as u32).to_be_bytes());
    out.extend_from_slice(&(header_len as u32).to_be_bytes());

    // Offset table: the first archive's entries stay valid because its name
    // list and data segment both remain first; the second archive's entries
    // are shifted past them.
    for entry in &gma1.entries {
        out.extend_from_slice(&entry.data_offset.to_be_bytes());
        out.extend_from_slice(&entry.name_offset.to_be_bytes());
    }
    for entry in &gma2.entries {
        out.extend_from_slice(&(entry.data_offset + data_len1 as u32).to_be_bytes());
        out.extend_from_slice(&(entry.name_offset + gma1.name_list_len as u32).to_be_bytes());
    }

    // Name lists back to back, then pad the header out
    let name_list_start1 = GMA_FILE_HEADER_SIZE + GMA_OFFSET_ENTRY_SIZE * gma1.entries.len();
    let name_list_start2 = GMA_FILE_HEADER_SIZE + GMA_OFFSET_ENTRY_SIZE * gma2.entries.len();
    out.extend_from_slice(&gma1_data[name_list_start1..name_list_start1 + gma1.name_list_len]);
    out.extend_from_slice(&gma2_data[name_list_start2..name_list_start2 + gma2.name_list_len]);
    out.resize(header_len, 0);

    // The first archive's data segment is position-independent here and is
    // copied byte for byte
    out.extend_from_slice(&gma1_data[gma1.header_len..]);

    // The second archive's models are re-emitted so every material's texture
    // index can be shifted past the first TPL's textures
    for entry in &gma2.entries {
        let record = ModelRecord::parse(&gma2_data[entry.data_range.clone()])?;
        debug!(
            model = %entry.name,
            materials = record.materials.len(),
            "rebasing model"
        );
        out.extend_from_slice(record.header);
        for material in &record.materials {
            out.extend_from_slice(material.flags);
            let shifted = material.texture_index.wrapping_add(tpl1_texture_count as u16);
            out.extend_from_slice(&shifted.to_be_bytes());
            out.extend_from_slice(material.trailing);
        }
        out.extend_from_slice(record.geometry);
    }

    Ok(out)
}

fn merge_tpl(
    tpl1_data: &[u8],
    tpl1: &TplIndex,
    tpl2_data: &[u8],
    tpl2: &TplIndex,
) -> Vec<u8> {
    let texture_count = tpl1.texture_count() + tpl2.texture_count();
    let header_len = tpl_header_len(texture_count);

    // A zero-texture input contributes no data region at all
    let header_len1 = tpl1.header_len().unwrap_or(tpl1_data.len());
    let header_len2 = tpl2.header_len().unwrap_or(tpl2_data.len());
    let data_len1 = tpl1_data.len() - header_len1;
    let data_len2 = tpl2_data.len() - header_len2;

    let mut out = Vec::with_capacity(header_len + data_len1 + data_len2);
    out.extend_from_slice(&(texture_count as u32).to_be_bytes());

    // First archive's descriptors: pixel data keeps its relative position,
    // only the header in front of it changes size
    for desc in &tpl1.descriptors {
        out.extend_from_slice(&desc.format);
        let rebased = desc.data_offset as usize - header_len1 + header_len;
        out.extend_from_slice(&(rebased as u32).to_be_bytes());
        out.extend_from_slice(&desc.attributes);
    }
    // Second archive's descriptors land immediately after the first's pixel data
    for desc in &tpl2.descriptors {
        out.extend_from_slice(&desc.format);
        let rebased = desc.data_offset as usize - header_len2 + data_len1 + header_len;
        out.extend_from_slice(&(rebased as u32).to_be_bytes());
        out.extend_from_slice(&desc.attributes);
    }
    out.resize(header_len, 0);

    if tpl1.texture_count() != 0 {
        out.extend_from_slice(&tpl1_data[header_len1..]);
    }
    if tpl2.texture_count() != 0 {
        out.extend_from_slice(&tpl2_data[header_len2..]);
    }

    out
}
