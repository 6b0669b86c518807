//! Type definitions for JSON Pointer paths.

/// A step in a JSON Pointer path.
///
/// Either an object key or an array index rendered as a decimal string.
pub type PathStep = String;

/// A parsed JSON Pointer path. The empty path is the document root.
pub type Path = Vec<PathStep>;

/// How two paths relate to each other, segment-wise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathRelation {
    /// Both paths address the same location.
    Equal,
    /// The first path is a strict prefix of the second.
    Ancestor,
    /// The second path is a strict prefix of the first.
    Descendant,
    /// Neither path is a prefix of the other.
    Unrelated,
}

impl PathRelation {
    /// `true` for every relation except [`PathRelation::Unrelated`].
    pub fn is_related(self) -> bool {
        !matches!(self, PathRelation::Unrelated)
    }
}
