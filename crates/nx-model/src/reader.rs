//! Read-only capability interface over an open file.

use nx_core::{Id, NxResult};

use crate::records::{
    BlockRecord, DataArrayRecord, FileRecord, GroupRecord, MultiTagRecord, PropertyRecord,
    SectionRecord, SourceRecord, TagRecord,
};

/// Everything structural validation needs to read from a file.
///
/// Implementations back this with whatever storage they use. Each call
/// returns a fresh snapshot; an unknown id is `NxError::NotFound` and any
/// storage failure is propagated as an `NxError`.
pub trait EntityReader {
    fn file(&self) -> NxResult<FileRecord>;
    fn block(&self, id: Id) -> NxResult<BlockRecord>;
    fn group(&self, id: Id) -> NxResult<GroupRecord>;
    fn data_array(&self, id: Id) -> NxResult<DataArrayRecord>;
    fn tag(&self, id: Id) -> NxResult<TagRecord>;
    fn multi_tag(&self, id: Id) -> NxResult<MultiTagRecord>;
    fn source(&self, id: Id) -> NxResult<SourceRecord>;
    fn section(&self, id: Id) -> NxResult<SectionRecord>;
    fn property(&self, id: Id) -> NxResult<PropertyRecord>;
}
