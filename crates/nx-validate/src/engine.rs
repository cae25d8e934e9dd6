//! The validation pass over a whole file.

use std::collections::HashSet;

use nx_core::{EntityKey, Id, NxResult};
use nx_model::{DataArrayRecord, EntityReader};
use rayon::prelude::*;

use crate::dimension::check_data_array;
use crate::finding::WarningKind;
use crate::metadata::{check_identity, check_property, check_section};
use crate::reference::{check_multi_tag, check_tag};
use crate::report::ValidationReport;
use crate::walk::TreeWalk;

/// Validate every entity reachable from the file root.
///
/// Findings never stop the pass; every rule runs once for every entity,
/// however many containers link to it. A reader failure (an id that does
/// not resolve, an unreadable attribute) aborts it, since the report would
/// otherwise be silently incomplete. The reader is never written to, so
/// validating twice yields equal reports.
#[tracing::instrument(level = "debug", skip_all)]
pub fn validate<R: EntityReader + ?Sized>(reader: &R) -> NxResult<ValidationReport> {
    let file = reader.file()?;
    let mut pass = Pass::new(reader);
    let file_key = EntityKey::file();

    if file.version.is_empty() {
        pass.report.record(file_key, WarningKind::NoVersion.into());
    }
    if file.format.is_empty() {
        pass.report.record(file_key, WarningKind::NoFormat.into());
    }

    for &block_id in &file.blocks {
        pass.block(block_id)?;
    }
    pass.sections(&file.sections)?;

    let report = pass.report;
    tracing::debug!(
        errors = report.error_count(),
        warnings = report.warning_count(),
        "validation finished"
    );
    Ok(report)
}

/// Validate several files in parallel, one report per reader, in order.
pub fn validate_all<R: EntityReader + Sync>(readers: &[R]) -> Vec<NxResult<ValidationReport>> {
    readers.par_iter().map(|reader| validate(reader)).collect()
}

/// State of one validation pass.
struct Pass<'r, R: ?Sized> {
    reader: &'r R,
    report: ValidationReport,
    /// Entities already checked; a second link to one is not re-checked.
    seen: HashSet<EntityKey>,
}

impl<'r, R: EntityReader + ?Sized> Pass<'r, R> {
    fn new(reader: &'r R) -> Self {
        Self {
            reader,
            report: ValidationReport::new(),
            seen: HashSet::new(),
        }
    }

    fn first_visit(&mut self, key: EntityKey) -> bool {
        self.seen.insert(key)
    }

    fn block(&mut self, block_id: Id) -> NxResult<()> {
        if !self.first_visit(EntityKey::block(block_id)) {
            return Ok(());
        }
        let reader = self.reader;
        let block = reader.block(block_id)?;
        tracing::debug!(
            block = %block_id,
            data_arrays = block.data_arrays.len(),
            tags = block.tags.len(),
            multi_tags = block.multi_tags.len(),
            "validating block"
        );
        self.report.record_all(
            EntityKey::block(block_id),
            check_identity(block.name.as_deref(), block.type_name.as_deref()),
        );

        for &id in &block.groups {
            let key = EntityKey::group(id);
            if !self.first_visit(key) {
                continue;
            }
            let group = reader.group(id)?;
            self.report.record_all(
                key,
                check_identity(group.name.as_deref(), group.type_name.as_deref()),
            );
        }

        for &id in &block.data_arrays {
            let key = EntityKey::data_array(id);
            if !self.first_visit(key) {
                continue;
            }
            let da = reader.data_array(id)?;
            self.report
                .record_all(key, check_identity(da.name.as_deref(), da.type_name.as_deref()));
            self.report.record_all(key, check_data_array(&da));
        }

        for &id in &block.tags {
            let key = EntityKey::tag(id);
            if !self.first_visit(key) {
                continue;
            }
            let tag = reader.tag(id)?;
            let references = read_all(reader, &tag.references)?;
            self.report
                .record_all(key, check_identity(tag.name.as_deref(), tag.type_name.as_deref()));
            self.report.record_all(key, check_tag(&tag, &references));
        }

        for &id in &block.multi_tags {
            let key = EntityKey::multi_tag(id);
            if !self.first_visit(key) {
                continue;
            }
            let mtag = reader.multi_tag(id)?;
            let positions = mtag.positions.map(|p| reader.data_array(p)).transpose()?;
            let extents = mtag.extents.map(|e| reader.data_array(e)).transpose()?;
            let references = read_all(reader, &mtag.references)?;
            self.report.record_all(
                key,
                check_identity(mtag.name.as_deref(), mtag.type_name.as_deref()),
            );
            self.report.record_all(
                key,
                check_multi_tag(&mtag, positions.as_ref(), extents.as_ref(), &references),
            );
        }

        let mut sources = TreeWalk::new(&block.sources);
        while let Some(node) = sources.pop() {
            let key = EntityKey::source(node.id);
            if !self.first_visit(key) {
                continue;
            }
            let source = reader.source(node.id)?;
            self.report.record_all(
                key,
                check_identity(source.name.as_deref(), source.type_name.as_deref()),
            );
            sources.descend(&source.sources, node.depth);
        }

        Ok(())
    }

    fn sections(&mut self, roots: &[Id]) -> NxResult<()> {
        let reader = self.reader;
        let mut sections = TreeWalk::new(roots);
        while let Some(node) = sections.pop() {
            let key = EntityKey::section(node.id);
            if !self.first_visit(key) {
                continue;
            }
            let section = reader.section(node.id)?;
            self.report.record_all(key, check_section(&section));
            for &prop_id in &section.properties {
                let prop_key = EntityKey::property(prop_id);
                if !self.first_visit(prop_key) {
                    continue;
                }
                let prop = reader.property(prop_id)?;
                self.report.record_all(prop_key, check_property(&prop));
            }
            sections.descend(&section.sections, node.depth);
        }
        Ok(())
    }
}

fn read_all<R: EntityReader + ?Sized>(reader: &R, ids: &[Id]) -> NxResult<Vec<DataArrayRecord>> {
    ids.iter().map(|&id| reader.data_array(id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nx_core::{EntityKind, NxError};
    use nx_model::{MemoryFile, SourceParent};

    use crate::finding::ErrorKind;

    #[test]
    fn empty_file_only_warns_about_header() {
        let report = validate(&MemoryFile::new("", vec![])).unwrap();
        assert!(report.is_valid());
        assert_eq!(
            report.warnings_for(EntityKey::file()),
            &[WarningKind::NoVersion, WarningKind::NoFormat]
        );
    }

    #[test]
    fn unnamed_block_and_group() {
        let mut file = MemoryFile::new("nix", vec![1, 2, 1]);
        let block = file.create_block("b", "t");
        let group = file.create_group(block, "g", "t").unwrap();
        file.block_mut(block).unwrap().name = None;
        file.group_mut(group).unwrap().type_name = Some(String::new());

        let report = validate(&file).unwrap();
        assert_eq!(report.errors_for(EntityKey::block(block)), &[ErrorKind::NoName]);
        assert_eq!(report.errors_for(EntityKey::group(group)), &[ErrorKind::NoType]);
        assert_eq!(report.error_count(), 2);
    }

    /// Delegates to a `MemoryFile` but cannot decode any section.
    struct BrokenSections(MemoryFile);

    impl EntityReader for BrokenSections {
        fn file(&self) -> NxResult<nx_model::FileRecord> {
            self.0.file()
        }
        fn block(&self, id: Id) -> NxResult<nx_model::BlockRecord> {
            self.0.block(id)
        }
        fn group(&self, id: Id) -> NxResult<nx_model::GroupRecord> {
            self.0.group(id)
        }
        fn data_array(&self, id: Id) -> NxResult<DataArrayRecord> {
            self.0.data_array(id)
        }
        fn tag(&self, id: Id) -> NxResult<nx_model::TagRecord> {
            self.0.tag(id)
        }
        fn multi_tag(&self, id: Id) -> NxResult<nx_model::MultiTagRecord> {
            self.0.multi_tag(id)
        }
        fn source(&self, id: Id) -> NxResult<nx_model::SourceRecord> {
            self.0.source(id)
        }
        fn section(&self, id: Id) -> NxResult<nx_model::SectionRecord> {
            Err(NxError::Unreadable {
                kind: EntityKind::Section,
                id,
                attr: "type",
                reason: "not a string".into(),
            })
        }
        fn property(&self, id: Id) -> NxResult<nx_model::PropertyRecord> {
            self.0.property(id)
        }
    }

    #[test]
    fn unreadable_attribute_aborts_the_pass() {
        let mut file = MemoryFile::new("nix", vec![1, 2, 1]);
        let section = file.create_section(None, "s", "t").unwrap();
        let err = validate(&BrokenSections(file)).unwrap_err();
        assert!(matches!(err, NxError::Unreadable { id, .. } if id == section));
    }

    #[test]
    fn missing_multi_tag_extents_are_fatal() {
        let mut file = MemoryFile::new("nix", vec![1, 2, 1]);
        let block = file.create_block("b", "t");
        let pos = file.create_data_array(block, "pos", "t", vec![1]).unwrap();
        file.append_set_dimension(pos, None).unwrap();
        let mtag = file.create_multi_tag(block, "m", "t", pos).unwrap();
        let dangling = Id::from_index(42);
        file.multi_tag_mut(mtag).unwrap().extents = Some(dangling);

        assert_eq!(
            validate(&file).unwrap_err(),
            NxError::NotFound {
                kind: EntityKind::DataArray,
                id: dangling
            }
        );
    }

    #[test]
    fn source_linked_from_two_blocks_is_reported_once() {
        let mut file = MemoryFile::new("nix", vec![1, 2, 1]);
        let b0 = file.create_block("b0", "t");
        let b1 = file.create_block("b1", "t");
        let shared = file
            .create_source(SourceParent::Block(b0), "s", "t")
            .unwrap();
        file.block_mut(b1).unwrap().sources.push(shared);
        let source = file.source_mut(shared).unwrap();
        source.name = None;
        source.type_name = None;

        let report = validate(&file).unwrap();
        assert_eq!(
            report.errors_for(EntityKey::source(shared)),
            &[ErrorKind::NoName, ErrorKind::NoType]
        );
        assert_eq!(report.error_count(), 2);
    }

    const DEEP: usize = 100_000;

    #[test]
    fn deep_source_chain() {
        let mut file = MemoryFile::new("nix", vec![1, 2, 1]);
        let block = file.create_block("b", "t");
        let mut leaf = file
            .create_source(SourceParent::Block(block), "s", "t")
            .unwrap();
        for _ in 1..DEEP {
            leaf = file
                .create_source(SourceParent::Source(leaf), "s", "t")
                .unwrap();
        }
        let source = file.source_mut(leaf).unwrap();
        source.name = None;
        source.type_name = Some(String::new());

        let report = validate(&file).unwrap();
        assert_eq!(
            report.errors_for(EntityKey::source(leaf)),
            &[ErrorKind::NoName, ErrorKind::NoType]
        );
        assert_eq!(report.error_count(), 2);
    }

    #[test]
    fn deep_section_chain() {
        let mut file = MemoryFile::new("nix", vec![1, 2, 1]);
        let mut leaf = file.create_section(None, "s", "t").unwrap();
        for _ in 1..DEEP {
            leaf = file.create_section(Some(leaf), "s", "t").unwrap();
        }
        let section = file.section_mut(leaf).unwrap();
        section.name = None;
        section.type_name = None;

        let report = validate(&file).unwrap();
        assert_eq!(
            report.errors_for(EntityKey::section(leaf)),
            &[ErrorKind::NoName, ErrorKind::NoType]
        );
        assert_eq!(report.error_count(), 2);
    }
}
