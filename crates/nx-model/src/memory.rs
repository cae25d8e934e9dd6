//! Arena-backed in-memory file.

use std::collections::HashMap;

use nx_core::{EntityKind, Id, NxError, NxResult, units};

use crate::reader::EntityReader;
use crate::records::{
    BlockRecord, DataArrayRecord, DimensionDescriptor, DimensionRecord, FileRecord, GroupRecord,
    MultiTagRecord, PropertyRecord, SectionRecord, SourceRecord, TagRecord,
};
use crate::schema::{BlockDef, DimensionDef, FileDef, SectionDef, SourceDef};
use crate::value::Value;
use crate::{ModelError, ModelResult};

/// Where a new source is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceParent {
    Block(Id),
    Source(Id),
}

/// A complete file held in memory.
///
/// Every entity family lives in its own arena; an entity's [`Id`] is its
/// position in that arena. Entities are never removed, so ids stay stable
/// for the lifetime of the file.
#[derive(Debug, Clone, Default)]
pub struct MemoryFile {
    file: FileRecord,
    blocks: Vec<BlockRecord>,
    groups: Vec<GroupRecord>,
    data_arrays: Vec<DataArrayRecord>,
    tags: Vec<TagRecord>,
    multi_tags: Vec<MultiTagRecord>,
    sources: Vec<SourceRecord>,
    sections: Vec<SectionRecord>,
    properties: Vec<PropertyRecord>,
}

fn next_id<T>(arena: &[T]) -> Id {
    Id::from_index(arena.len() as u32)
}

fn slot<T>(arena: &[T], kind: EntityKind, id: Id) -> NxResult<&T> {
    arena
        .get(id.index() as usize)
        .ok_or(NxError::NotFound { kind, id })
}

fn slot_mut<T>(arena: &mut [T], kind: EntityKind, id: Id) -> NxResult<&mut T> {
    arena
        .get_mut(id.index() as usize)
        .ok_or(NxError::NotFound { kind, id })
}

fn find_named<T>(
    ids: &[Id],
    arena: &[T],
    name: &str,
    name_of: impl Fn(&T) -> Option<&str>,
) -> Option<Id> {
    ids.iter().copied().find(|id| {
        arena
            .get(id.index() as usize)
            .is_some_and(|record| name_of(record) == Some(name))
    })
}

impl MemoryFile {
    /// Create an empty file with the given format string and version.
    pub fn new(format: impl Into<String>, version: Vec<u32>) -> Self {
        Self {
            file: FileRecord {
                version,
                format: format.into(),
                ..FileRecord::default()
            },
            ..Self::default()
        }
    }

    pub fn file_mut(&mut self) -> &mut FileRecord {
        &mut self.file
    }

    pub fn block_ids(&self) -> &[Id] {
        &self.file.blocks
    }

    pub fn section_ids(&self) -> &[Id] {
        &self.file.sections
    }

    pub fn create_block(
        &mut self,
        name: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Id {
        let id = next_id(&self.blocks);
        self.blocks.push(BlockRecord {
            name: Some(name.into()),
            type_name: Some(type_name.into()),
            ..BlockRecord::default()
        });
        self.file.blocks.push(id);
        id
    }

    pub fn create_group(
        &mut self,
        block: Id,
        name: impl Into<String>,
        type_name: impl Into<String>,
    ) -> NxResult<Id> {
        let id = next_id(&self.groups);
        slot_mut(&mut self.blocks, EntityKind::Block, block)?
            .groups
            .push(id);
        self.groups.push(GroupRecord {
            name: Some(name.into()),
            type_name: Some(type_name.into()),
        });
        Ok(id)
    }

    /// Create a DataArray with the given data shape and no dimensions.
    pub fn create_data_array(
        &mut self,
        block: Id,
        name: impl Into<String>,
        type_name: impl Into<String>,
        shape: Vec<usize>,
    ) -> NxResult<Id> {
        let id = next_id(&self.data_arrays);
        slot_mut(&mut self.blocks, EntityKind::Block, block)?
            .data_arrays
            .push(id);
        self.data_arrays.push(DataArrayRecord {
            name: Some(name.into()),
            type_name: Some(type_name.into()),
            shape,
            ..DataArrayRecord::default()
        });
        Ok(id)
    }

    /// Append a dimension, storing its 1-based position as its index.
    ///
    /// Returns that position.
    pub fn append_dimension(
        &mut self,
        data_array: Id,
        descriptor: DimensionDescriptor,
    ) -> NxResult<usize> {
        let record = self.data_array_mut(data_array)?;
        let position = record.dimensions.len() + 1;
        record.dimensions.push(DimensionRecord {
            index: position as i64,
            descriptor,
        });
        Ok(position)
    }

    pub fn append_set_dimension(
        &mut self,
        data_array: Id,
        labels: Option<Vec<String>>,
    ) -> NxResult<usize> {
        self.append_dimension(data_array, DimensionDescriptor::Set { labels })
    }

    pub fn append_range_dimension(
        &mut self,
        data_array: Id,
        ticks: Vec<f64>,
        unit: Option<&str>,
    ) -> NxResult<usize> {
        self.append_dimension(
            data_array,
            DimensionDescriptor::Range {
                ticks: Some(ticks),
                unit: unit.map(str::to_string),
            },
        )
    }

    pub fn append_sampled_dimension(
        &mut self,
        data_array: Id,
        interval: f64,
        unit: Option<&str>,
    ) -> NxResult<usize> {
        self.append_dimension(
            data_array,
            DimensionDescriptor::Sampled {
                interval,
                offset: None,
                unit: unit.map(str::to_string),
            },
        )
    }

    pub fn delete_dimensions(&mut self, data_array: Id) -> NxResult<()> {
        self.data_array_mut(data_array)?.dimensions.clear();
        Ok(())
    }

    pub fn create_tag(
        &mut self,
        block: Id,
        name: impl Into<String>,
        type_name: impl Into<String>,
        position: Vec<f64>,
    ) -> NxResult<Id> {
        let id = next_id(&self.tags);
        slot_mut(&mut self.blocks, EntityKind::Block, block)?
            .tags
            .push(id);
        self.tags.push(TagRecord {
            name: Some(name.into()),
            type_name: Some(type_name.into()),
            position,
            ..TagRecord::default()
        });
        Ok(id)
    }

    pub fn create_multi_tag(
        &mut self,
        block: Id,
        name: impl Into<String>,
        type_name: impl Into<String>,
        positions: Id,
    ) -> NxResult<Id> {
        slot(&self.data_arrays, EntityKind::DataArray, positions)?;
        let id = next_id(&self.multi_tags);
        slot_mut(&mut self.blocks, EntityKind::Block, block)?
            .multi_tags
            .push(id);
        self.multi_tags.push(MultiTagRecord {
            name: Some(name.into()),
            type_name: Some(type_name.into()),
            positions: Some(positions),
            ..MultiTagRecord::default()
        });
        Ok(id)
    }

    /// Add a DataArray to a tag's references.
    pub fn add_tag_reference(&mut self, tag: Id, data_array: Id) -> NxResult<()> {
        slot(&self.data_arrays, EntityKind::DataArray, data_array)?;
        self.tag_mut(tag)?.references.push(data_array);
        Ok(())
    }

    /// Add a DataArray to a multi-tag's references.
    pub fn add_multi_tag_reference(&mut self, multi_tag: Id, data_array: Id) -> NxResult<()> {
        slot(&self.data_arrays, EntityKind::DataArray, data_array)?;
        self.multi_tag_mut(multi_tag)?.references.push(data_array);
        Ok(())
    }

    pub fn create_source(
        &mut self,
        parent: SourceParent,
        name: impl Into<String>,
        type_name: impl Into<String>,
    ) -> NxResult<Id> {
        let id = next_id(&self.sources);
        match parent {
            SourceParent::Block(block) => {
                slot_mut(&mut self.blocks, EntityKind::Block, block)?
                    .sources
                    .push(id);
            }
            SourceParent::Source(source) => {
                slot_mut(&mut self.sources, EntityKind::Source, source)?
                    .sources
                    .push(id);
            }
        }
        self.sources.push(SourceRecord {
            name: Some(name.into()),
            type_name: Some(type_name.into()),
            sources: Vec::new(),
        });
        Ok(id)
    }

    /// Create a section at the file root (`parent == None`) or below another section.
    pub fn create_section(
        &mut self,
        parent: Option<Id>,
        name: impl Into<String>,
        type_name: impl Into<String>,
    ) -> NxResult<Id> {
        let id = next_id(&self.sections);
        match parent {
            None => self.file.sections.push(id),
            Some(parent) => slot_mut(&mut self.sections, EntityKind::Section, parent)?
                .sections
                .push(id),
        }
        self.sections.push(SectionRecord {
            name: Some(name.into()),
            type_name: Some(type_name.into()),
            ..SectionRecord::default()
        });
        Ok(id)
    }

    pub fn create_property(
        &mut self,
        section: Id,
        name: impl Into<String>,
        values: Vec<Value>,
    ) -> NxResult<Id> {
        let id = next_id(&self.properties);
        slot_mut(&mut self.sections, EntityKind::Section, section)?
            .properties
            .push(id);
        self.properties.push(PropertyRecord {
            name: Some(name.into()),
            values,
            ..PropertyRecord::default()
        });
        Ok(id)
    }

    pub fn data_array_by_name(&self, block: Id, name: &str) -> Option<Id> {
        let block = self.blocks.get(block.index() as usize)?;
        find_named(&block.data_arrays, &self.data_arrays, name, |r| r.name.as_deref())
    }

    pub fn tag_by_name(&self, block: Id, name: &str) -> Option<Id> {
        let block = self.blocks.get(block.index() as usize)?;
        find_named(&block.tags, &self.tags, name, |r| r.name.as_deref())
    }

    pub fn multi_tag_by_name(&self, block: Id, name: &str) -> Option<Id> {
        let block = self.blocks.get(block.index() as usize)?;
        find_named(&block.multi_tags, &self.multi_tags, name, |r| r.name.as_deref())
    }

    pub fn block_mut(&mut self, id: Id) -> NxResult<&mut BlockRecord> {
        slot_mut(&mut self.blocks, EntityKind::Block, id)
    }

    pub fn group_mut(&mut self, id: Id) -> NxResult<&mut GroupRecord> {
        slot_mut(&mut self.groups, EntityKind::Group, id)
    }

    pub fn data_array_mut(&mut self, id: Id) -> NxResult<&mut DataArrayRecord> {
        slot_mut(&mut self.data_arrays, EntityKind::DataArray, id)
    }

    pub fn tag_mut(&mut self, id: Id) -> NxResult<&mut TagRecord> {
        slot_mut(&mut self.tags, EntityKind::Tag, id)
    }

    pub fn multi_tag_mut(&mut self, id: Id) -> NxResult<&mut MultiTagRecord> {
        slot_mut(&mut self.multi_tags, EntityKind::MultiTag, id)
    }

    pub fn source_mut(&mut self, id: Id) -> NxResult<&mut SourceRecord> {
        slot_mut(&mut self.sources, EntityKind::Source, id)
    }

    pub fn section_mut(&mut self, id: Id) -> NxResult<&mut SectionRecord> {
        slot_mut(&mut self.sections, EntityKind::Section, id)
    }

    pub fn property_mut(&mut self, id: Id) -> NxResult<&mut PropertyRecord> {
        slot_mut(&mut self.properties, EntityKind::Property, id)
    }

    /// Build a file from its fixture description.
    ///
    /// Tag references, multi-tag positions and extents name DataArrays of
    /// the same block.
    pub fn from_def(def: &FileDef) -> ModelResult<Self> {
        let mut file = Self::new(def.format.clone(), def.version.clone());
        for block in &def.blocks {
            file.load_block(block)?;
        }
        for section in &def.sections {
            file.load_section(None, section)?;
        }
        tracing::debug!(
            blocks = file.blocks.len(),
            data_arrays = file.data_arrays.len(),
            sections = file.sections.len(),
            "built in-memory file"
        );
        Ok(file)
    }

    fn load_block(&mut self, def: &BlockDef) -> ModelResult<()> {
        let block = next_id(&self.blocks);
        self.blocks.push(BlockRecord {
            name: def.name.clone(),
            type_name: def.type_name.clone(),
            ..BlockRecord::default()
        });
        self.file.blocks.push(block);
        let context = format!("block '{}'", def.name.as_deref().unwrap_or("<unnamed>"));

        for group in &def.groups {
            let id = next_id(&self.groups);
            self.groups.push(GroupRecord {
                name: group.name.clone(),
                type_name: group.type_name.clone(),
            });
            self.block_mut(block)?.groups.push(id);
        }

        let mut by_name: HashMap<&str, Id> = HashMap::new();
        for da in &def.data_arrays {
            let id = next_id(&self.data_arrays);
            if let Some(name) = da.name.as_deref() {
                if by_name.insert(name, id).is_some() {
                    return Err(ModelError::DuplicateName {
                        name: name.to_string(),
                        context: format!("{context} data_arrays"),
                    });
                }
            }
            self.data_arrays.push(DataArrayRecord {
                name: da.name.clone(),
                type_name: da.type_name.clone(),
                shape: da.shape.clone(),
                unit: da.unit.clone(),
                expansion_origin: da.expansion_origin,
                polynom_coefficients: da.polynom_coefficients.clone(),
                dimensions: da
                    .dimensions
                    .iter()
                    .enumerate()
                    .map(|(i, dim)| decode_dimension(i + 1, dim))
                    .collect(),
            });
            self.block_mut(block)?.data_arrays.push(id);
        }

        let resolve = |name: &str, what: &str| -> ModelResult<Id> {
            by_name
                .get(name)
                .copied()
                .ok_or_else(|| ModelError::MissingReference {
                    name: name.to_string(),
                    context: format!("{context} {what}"),
                })
        };

        for tag in &def.tags {
            let references = tag
                .references
                .iter()
                .map(|name| resolve(name, "tag references"))
                .collect::<ModelResult<Vec<_>>>()?;
            let id = next_id(&self.tags);
            self.tags.push(TagRecord {
                name: tag.name.clone(),
                type_name: tag.type_name.clone(),
                position: tag.position.clone(),
                extent: tag.extent.clone(),
                units: tag.units.clone(),
                references,
            });
            self.block_mut(block)?.tags.push(id);
        }

        for mtag in &def.multi_tags {
            let positions = mtag
                .positions
                .as_deref()
                .map(|name| resolve(name, "multi-tag positions"))
                .transpose()?;
            let extents = mtag
                .extents
                .as_deref()
                .map(|name| resolve(name, "multi-tag extents"))
                .transpose()?;
            let references = mtag
                .references
                .iter()
                .map(|name| resolve(name, "multi-tag references"))
                .collect::<ModelResult<Vec<_>>>()?;
            let id = next_id(&self.multi_tags);
            self.multi_tags.push(MultiTagRecord {
                name: mtag.name.clone(),
                type_name: mtag.type_name.clone(),
                positions,
                extents,
                units: mtag.units.clone(),
                references,
            });
            self.block_mut(block)?.multi_tags.push(id);
        }

        for source in &def.sources {
            self.load_source(SourceParent::Block(block), source)?;
        }
        Ok(())
    }

    fn load_source(&mut self, parent: SourceParent, def: &SourceDef) -> ModelResult<()> {
        let mut pending = vec![(parent, def)];
        while let Some((parent, def)) = pending.pop() {
            let id = self.create_source(parent, "", "")?;
            let record = self.source_mut(id)?;
            record.name = def.name.clone();
            record.type_name = def.type_name.clone();
            // Reversed so children are created, and numbered, in order.
            pending.extend(
                def.sources
                    .iter()
                    .rev()
                    .map(|child| (SourceParent::Source(id), child)),
            );
        }
        Ok(())
    }

    fn load_section(&mut self, parent: Option<Id>, def: &SectionDef) -> ModelResult<()> {
        let mut pending = vec![(parent, def)];
        while let Some((parent, def)) = pending.pop() {
            let id = self.create_section(parent, "", "")?;
            let record = self.section_mut(id)?;
            record.name = def.name.clone();
            record.type_name = def.type_name.clone();
            for prop in &def.properties {
                let pid = self.create_property(id, "", prop.values.clone())?;
                let record = self.property_mut(pid)?;
                record.name = prop.name.clone();
                record.unit = prop.unit.as_deref().map(units::sanitize);
                record.odml_type = prop.odml_type;
            }
            pending.extend(def.sections.iter().rev().map(|child| (Some(id), child)));
        }
        Ok(())
    }
}

fn decode_dimension(position: usize, def: &DimensionDef) -> DimensionRecord {
    let descriptor = match DimensionDescriptor::from_type_tag(&def.dimension_type) {
        DimensionDescriptor::Set { .. } => DimensionDescriptor::Set {
            labels: def.labels.clone(),
        },
        DimensionDescriptor::Range { .. } => DimensionDescriptor::Range {
            ticks: def.ticks.clone(),
            unit: def.unit.clone(),
        },
        DimensionDescriptor::Sampled { .. } => DimensionDescriptor::Sampled {
            // A missing interval is stored as 0 and reported as invalid.
            interval: def.sampling_interval.unwrap_or(0.0),
            offset: def.offset,
            unit: def.unit.clone(),
        },
        unknown @ DimensionDescriptor::Unknown { .. } => unknown,
    };
    DimensionRecord {
        index: def.index.unwrap_or(position as i64),
        descriptor,
    }
}

impl EntityReader for MemoryFile {
    fn file(&self) -> NxResult<FileRecord> {
        Ok(self.file.clone())
    }

    fn block(&self, id: Id) -> NxResult<BlockRecord> {
        slot(&self.blocks, EntityKind::Block, id).cloned()
    }

    fn group(&self, id: Id) -> NxResult<GroupRecord> {
        slot(&self.groups, EntityKind::Group, id).cloned()
    }

    fn data_array(&self, id: Id) -> NxResult<DataArrayRecord> {
        slot(&self.data_arrays, EntityKind::DataArray, id).cloned()
    }

    fn tag(&self, id: Id) -> NxResult<TagRecord> {
        slot(&self.tags, EntityKind::Tag, id).cloned()
    }

    fn multi_tag(&self, id: Id) -> NxResult<MultiTagRecord> {
        slot(&self.multi_tags, EntityKind::MultiTag, id).cloned()
    }

    fn source(&self, id: Id) -> NxResult<SourceRecord> {
        slot(&self.sources, EntityKind::Source, id).cloned()
    }

    fn section(&self, id: Id) -> NxResult<SectionRecord> {
        slot(&self.sections, EntityKind::Section, id).cloned()
    }

    fn property(&self, id: Id) -> NxResult<PropertyRecord> {
        slot(&self.properties, EntityKind::Property, id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::PropertyDef;

    #[test]
    fn ids_are_arena_positions() {
        let mut file = MemoryFile::new("nix", vec![1, 2, 1]);
        let b0 = file.create_block("b0", "t");
        let b1 = file.create_block("b1", "t");
        assert_eq!(b0.index(), 0);
        assert_eq!(b1.index(), 1);
        assert_eq!(file.block_ids(), &[b0, b1]);

        let g = file.create_group(b1, "g", "t").unwrap();
        assert_eq!(file.block(b1).unwrap().groups, vec![g]);
        assert!(file.block(b0).unwrap().groups.is_empty());
    }

    #[test]
    fn equal_entities_get_distinct_ids() {
        let mut file = MemoryFile::new("nix", vec![1, 2, 1]);
        let block = file.create_block("b", "t");
        let a = file.create_group(block, "same", "same").unwrap();
        let b = file.create_group(block, "same", "same").unwrap();
        assert_ne!(a, b);
        assert_eq!(file.group(a).unwrap(), file.group(b).unwrap());
    }

    #[test]
    fn dimensions_get_one_based_indices() {
        let mut file = MemoryFile::new("nix", vec![1, 2, 1]);
        let block = file.create_block("b", "t");
        let da = file.create_data_array(block, "da", "t", vec![2, 10]).unwrap();
        assert_eq!(file.append_set_dimension(da, None).unwrap(), 1);
        assert_eq!(file.append_sampled_dimension(da, 0.1, None).unwrap(), 2);

        let record = file.data_array(da).unwrap();
        let indices: Vec<i64> = record.dimensions.iter().map(|d| d.index).collect();
        assert_eq!(indices, vec![1, 2]);
    }

    #[test]
    fn unknown_parent_is_rejected() {
        let mut file = MemoryFile::new("nix", vec![1, 2, 1]);
        let missing = Id::from_index(7);
        let err = file.create_group(missing, "g", "t").unwrap_err();
        assert_eq!(
            err,
            NxError::NotFound {
                kind: EntityKind::Block,
                id: missing
            }
        );
        assert!(file
            .create_source(SourceParent::Source(missing), "s", "t")
            .is_err());
        assert!(file.tag(missing).is_err());
    }

    #[test]
    fn lookup_by_name_is_scoped_to_block() {
        let mut file = MemoryFile::new("nix", vec![1, 2, 1]);
        let b0 = file.create_block("b0", "t");
        let b1 = file.create_block("b1", "t");
        let da0 = file.create_data_array(b0, "data", "t", vec![3]).unwrap();
        let da1 = file.create_data_array(b1, "data", "t", vec![3]).unwrap();
        assert_eq!(file.data_array_by_name(b0, "data"), Some(da0));
        assert_eq!(file.data_array_by_name(b1, "data"), Some(da1));
        assert_eq!(file.data_array_by_name(b0, "other"), None);
    }

    #[test]
    fn nested_defs_load_in_document_order() {
        let leaf = |name: &str| SourceDef {
            name: Some(name.into()),
            type_name: Some("t".into()),
            sources: vec![],
        };
        let def = FileDef {
            blocks: vec![BlockDef {
                name: Some("b".into()),
                type_name: Some("t".into()),
                sources: vec![SourceDef {
                    sources: vec![leaf("first"), leaf("second")],
                    ..leaf("parent")
                }],
                ..BlockDef::default()
            }],
            ..FileDef::default()
        };
        let file = MemoryFile::from_def(&def).unwrap();
        let parent = file.block(file.block_ids()[0]).unwrap().sources[0];
        let children = file.source(parent).unwrap().sources;
        let names: Vec<_> = children
            .iter()
            .map(|&id| file.source(id).unwrap().name)
            .collect();
        assert_eq!(names, vec![Some("first".into()), Some("second".into())]);
        assert_eq!(parent.index(), 0);
        assert_eq!(children[0].index(), 1);
    }

    #[test]
    fn deep_section_chain_loads() {
        let depth = 2_000;
        let mut def = SectionDef {
            name: Some("leaf".into()),
            type_name: Some("t".into()),
            properties: vec![PropertyDef {
                name: Some("gain".into()),
                unit: Some(" µV ".into()),
                values: vec![Value::Float(1.0)],
                ..PropertyDef::default()
            }],
            sections: vec![],
        };
        for _ in 1..depth {
            def = SectionDef {
                name: Some("s".into()),
                type_name: Some("t".into()),
                properties: vec![],
                sections: vec![def],
            };
        }
        let file = MemoryFile::from_def(&FileDef {
            sections: vec![def],
            ..FileDef::default()
        })
        .unwrap();

        let leaf = Id::from_index(depth - 1);
        let record = file.section(leaf).unwrap();
        assert_eq!(record.name.as_deref(), Some("leaf"));
        let prop = file.property(record.properties[0]).unwrap();
        assert_eq!(prop.unit.as_deref(), Some("uV"));
    }
}
