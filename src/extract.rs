//! Single-model extraction: pull one model and its referenced textures out
//! of an archive pair into a new, minimal, self-consistent pair.
//!
//! The extracted GMA holds exactly one model; its materials' texture
//! indices are remapped through a first-seen-order dedup map so the
//! extracted TPL holds each referenced texture once, densely numbered
//! from zero.

use tracing::{debug, info, warn};

use crate::ArchivePair;
use crate::classify::{ModelClass, classify, select_goals};
use crate::error::Result;
use crate::format::{GMA_FILE_HEADER_SIZE, GMA_OFFSET_ENTRY_SIZE, align_up, tpl_header_len};
use crate::gma::{GmaIndex, ModelRecord};
use crate::tpl::TplIndex;

/// First-seen-order mapping from original texture indices to new, densely
/// packed indices. Grows without bound; material counts are small in
/// practice so the linear lookup is fine.
#[derive(Debug, Default)]
pub struct TextureRemap {
    order: Vec<u16>,
}

impl TextureRemap {
    /// Map an original index to its new index, assigning the next
    /// sequential index on first sight.
    pub fn remap(&mut self, original: u16) -> u16 {
        match self.order.iter().position(|&t| t == original) {
            Some(new) => new as u16,
            None => {
                self.order.push(original);
                (self.order.len() - 1) as u16
            }
        }
    }

    /// Original indices in dedup (first-seen) order.
    pub fn originals(&self) -> &[u16] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Extract the model at `model` from the archive pair into a standalone pair.
pub fn extract_model(
    gma_data: &[u8],
    gma_index: &GmaIndex,
    tpl_data: &[u8],
    tpl_index: &TplIndex,
    model: usize,
) -> Result<ArchivePair> {
    let entry = &gma_index.entries[model];
    let record = ModelRecord::parse(&gma_data[entry.data_range.clone()])?;
    debug!(
        model = %entry.name,
        materials = record.materials.len(),
        geometry_len = record.geometry.len(),
        "extracting model"
    );

    // New GMA header: one model, its name, no further offset-table entries
    // (the single implicit entry is the zero pair).
    let name_len = entry.name.len() + 1;
    let header_len = align_up(name_len + GMA_FILE_HEADER_SIZE + GMA_OFFSET_ENTRY_SIZE);
    let mut gma = Vec::with_capacity(header_len + entry.data_range.len());
    gma.extend_from_slice(&1u32.to_be_bytes());
    gma.extend_from_slice(&(header_len as u32).to_be_bytes());
    gma.extend_from_slice(&[0u8; 8]);
    gma.extend_from_slice(entry.name.as_bytes());
    gma.resize(header_len, 0);

    // Model header verbatim, then the material table with texture indices
    // remapped through the dedup map, then the geometry blob verbatim.
    gma.extend_from_slice(record.header);
    let mut remap = TextureRemap::default();
    for material in &record.materials {
        // Validate the reference before committing to the new index
        tpl_index.descriptor(material.texture_index)?;
        gma.extend_from_slice(material.flags);
        gma.extend_from_slice(&remap.remap(material.texture_index).to_be_bytes());
        gma.extend_from_slice(material.trailing);
    }
    gma.extend_from_slice(record.geometry);

    // New TPL: descriptors for the deduplicated textures in dedup order,
    // offsets accumulated from each texture's original byte length.
    let texture_count = remap.len();
    let tpl_header = tpl_header_len(texture_count);
    let mut tpl = Vec::with_capacity(tpl_header);
    tpl.extend_from_slice(&(texture_count as u32).to_be_bytes());
    let mut rolling_offset = tpl_header;
    for &original in remap.originals() {
        let desc = tpl_index.descriptor(original)?;
        tpl.extend_from_slice(&desc.format);
        tpl.extend_from_slice(&(rolling_offset as u32).to_be_bytes());
        tpl.extend_from_slice(&desc.attributes);
        rolling_offset += desc.data_range.len();
    }
    tpl.resize(tpl_header, 0);
    for &original in remap.originals() {
        let desc = tpl_index.descriptor(original)?;
        tpl.extend_from_slice(&tpl_data[desc.data_range.clone()]);
    }

    Ok(ArchivePair { gma, tpl })
}

/// One extracted model, tagged with the output-name suffix to save it under.
#[derive(Debug)]
pub struct Extraction {
    pub model_name: String,
    pub suffix: String,
    pub pair: ArchivePair,
}

/// Extract the first blue, green, and red goal models from the pair.
///
/// Missing colours are reported as warnings; the operation succeeds as
/// long as the archives parse.
pub fn extract_goals(gma_data: &[u8], tpl_data: &[u8]) -> Result<Vec<Extraction>> {
    let gma_index = GmaIndex::parse(gma_data)?;
    let tpl_index = TplIndex::parse(tpl_data)?;

    let slots = select_goals(gma_index.entries.iter().map(|e| e.name.as_str()));
    let mut extractions = Vec::new();
    for (class, slot) in slots.iter() {
        let Some(model) = slot else {
            warn!("no {} found", class.describe());
            continue;
        };
        let entry = &gma_index.entries[model];
        info!(model = %entry.name, "{}", class.describe());
        extractions.push(Extraction {
            model_name: entry.name.clone(),
            suffix: class.goal_suffix().expect("goal classes have a suffix").to_owned(),
            pair: extract_model(gma_data, &gma_index, tpl_data, &tpl_index, model)?,
        });
    }
    Ok(extractions)
}

/// Extract every switch model (name prefixed `BUTTON_`) from the pair.
pub fn extract_switches(gma_data: &[u8], tpl_data: &[u8]) -> Result<Vec<Extraction>> {
    let gma_index = GmaIndex::parse(gma_data)?;
    let tpl_index = TplIndex::parse(tpl_data)?;

    let mut extractions = Vec::new();
    for model in 0..gma_index.entries.len() {
        let entry = &gma_index.entries[model];
        if classify(&entry.name) != Some(ModelClass::Switch) {
            continue;
        }
        info!(model = %entry.name, "switch");
        extractions.push(Extraction {
            model_name: entry.name.clone(),
            suffix: entry.name.clone(),
            pair: extract_model(gma_data, &gma_index, tpl_data, &tpl_index, model)?,
        });
    }
    if extractions.is_empty() {
        warn!("no switches found");
    }
    Ok(extractions)
}

/// Extract every model whose name exactly equals `target` from the pair.
pub fn extract_named(gma_data: &[u8], tpl_data: &[u8], target: &str) -> Result<Vec<Extraction>> {
    let gma_index = GmaIndex::parse(gma_data)?;
    let tpl_index = TplIndex::parse(tpl_data)?;

    let mut extractions = Vec::new();
    for model in 0..gma_index.entries.len() {
        let entry = &gma_index.entries[model];
        if entry.name != target {
            continue;
        }
        info!(model = %entry.name, "named model");
        extractions.push(Extraction {
            model_name: entry.name.clone(),
            suffix: entry.name.clone(),
            pair: extract_model(gma_data, &gma_index, tpl_data, &tpl_index, model)?,
        });
    }
    if extractions.is_empty() {
        warn!("the model {target} wasn't found");
    }
    Ok(extractions)
}
