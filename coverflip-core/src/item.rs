/// Identifies an item across the window, the cache and the render thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub u64);
impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Something that can be shown in a slot. Only the id matters to the core; the rest of
/// the item is handed through to the render backend untouched.
pub trait Item: Clone + Send + 'static {
    fn id(&self) -> ItemId;
}

/// The playback/session service that owns the real playlist position.
pub trait ItemSource<I: Item> {
    /// The item `offset` places away from the current one, if there is one.
    fn item_at(&self, offset: i32) -> Option<I>;
    /// The index of the current item in the overall sequence.
    fn current_cursor(&self) -> usize;
}

/// Notifications broadcast by an [`ItemSource`] when its contents change.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceEvent<I> {
    /// A single neighbour of the current item was replaced.
    ReplaceAt { offset: i32, item: Option<I> },
    /// The cursor moved, or the sequence was rebuilt.
    CursorChanged { cursor: usize, current: Option<I> },
}

/// A one-step move through the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delta {
    Backward,
    Forward,
}
impl Delta {
    pub fn as_i32(self) -> i32 {
        match self {
            Delta::Backward => -1,
            Delta::Forward => 1,
        }
    }

    /// Maps a page index relative to the center page onto a move, if it is one.
    pub fn from_page_offset(offset: i32) -> Option<Self> {
        match offset {
            -1 => Some(Delta::Backward),
            1 => Some(Delta::Forward),
            _ => None,
        }
    }
}
impl std::fmt::Display for Delta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:+}", self.as_i32())
    }
}
