use core::fmt;
use core::num::NonZeroU32;

/// Arena position of an entity inside one open file.
///
/// Positions start at 0; the stored value is offset by one so that
/// `Option<Id>` (an unset MultiTag extents link, say) costs no extra space.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(NonZeroU32);

impl Id {
    pub fn from_index(index: u32) -> Self {
        Self(NonZeroU32::MIN.saturating_add(index))
    }

    pub fn index(self) -> u32 {
        self.0.get() - 1
    }
}

// Both forms print the arena position, never the offset value.
impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Id").field(&self.index()).finish()
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.index(), f)
    }
}

/// Entity families of the data model. Ids are only unique within a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    File,
    Block,
    Group,
    DataArray,
    Tag,
    MultiTag,
    Source,
    Section,
    Property,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::File => "File",
            Self::Block => "Block",
            Self::Group => "Group",
            Self::DataArray => "DataArray",
            Self::Tag => "Tag",
            Self::MultiTag => "MultiTag",
            Self::Source => "Source",
            Self::Section => "Section",
            Self::Property => "Property",
        };
        f.write_str(name)
    }
}

/// Identity of one entity: its family plus its arena id.
///
/// Two structurally equal entities created separately never share a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKey {
    pub kind: EntityKind,
    pub id: Id,
}

impl EntityKey {
    pub fn new(kind: EntityKind, id: Id) -> Self {
        Self { kind, id }
    }

    /// The file itself; there is exactly one per open session.
    pub fn file() -> Self {
        Self::new(EntityKind::File, Id::from_index(0))
    }

    pub fn block(id: Id) -> Self {
        Self::new(EntityKind::Block, id)
    }

    pub fn group(id: Id) -> Self {
        Self::new(EntityKind::Group, id)
    }

    pub fn data_array(id: Id) -> Self {
        Self::new(EntityKind::DataArray, id)
    }

    pub fn tag(id: Id) -> Self {
        Self::new(EntityKind::Tag, id)
    }

    pub fn multi_tag(id: Id) -> Self {
        Self::new(EntityKind::MultiTag, id)
    }

    pub fn source(id: Id) -> Self {
        Self::new(EntityKind::Source, id)
    }

    pub fn section(id: Id) -> Self {
        Self::new(EntityKind::Section, id)
    }

    pub fn property(id: Id) -> Self {
        Self::new(EntityKind::Property, id)
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_round_trip_index() {
        for i in [0_u32, 1, 2, 42, 10_000] {
            let id = Id::from_index(i);
            assert_eq!(id.index(), i);
        }
    }

    #[test]
    fn option_id_is_small() {
        assert_eq!(
            core::mem::size_of::<Id>(),
            core::mem::size_of::<Option<Id>>()
        );
    }

    #[test]
    fn keys_of_different_kinds_differ() {
        let id = Id::from_index(0);
        assert_ne!(EntityKey::block(id), EntityKey::group(id));
        assert_eq!(EntityKey::tag(id).to_string(), "Tag#0");
    }

    #[test]
    fn formatting_shows_arena_position() {
        let id = Id::from_index(7);
        assert_eq!(format!("{id:?}"), "Id(7)");
        assert_eq!(id.to_string(), "7");
    }
}
