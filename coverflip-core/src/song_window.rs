use crate::{Delta, Item, ItemId, ItemSource, SourceEvent};

/// Number of slots held by the window: previous, current, next.
pub const STORE_SIZE: usize = 3;
/// Slot index of the current item.
pub const CENTER_SLOT: usize = STORE_SIZE / 2;

/// The set of slots that were (re)assigned by a window operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlotChanges([bool; STORE_SIZE]);
impl SlotChanges {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self([true; STORE_SIZE])
    }

    fn mark(&mut self, slot: usize) {
        self.0[slot] = true;
    }

    pub fn contains(&self, slot: usize) -> bool {
        self.0.get(slot).copied().unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        !self.0.iter().any(|changed| *changed)
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..STORE_SIZE).filter(|slot| self.0[*slot])
    }
}

/// The previous/current/next items on display, plus the source cursor the current slot
/// corresponds to.
#[derive(Debug, Clone)]
pub struct SongWindow<I: Item> {
    slots: [Option<I>; STORE_SIZE],
    position: usize,
}
impl<I: Item> Default for SongWindow<I> {
    fn default() -> Self {
        Self::new()
    }
}
impl<I: Item> SongWindow<I> {
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
            position: 0,
        }
    }

    pub fn get(&self, slot: usize) -> Option<&I> {
        self.slots.get(slot)?.as_ref()
    }

    pub fn current(&self) -> Option<&I> {
        self.get(CENTER_SLOT)
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Whether the current item is the first one in the sequence, in which case there
    /// is nothing to scroll back to.
    pub fn at_start(&self) -> bool {
        self.position == 0
    }

    /// Reads the cursor and all three slots from `source`, replacing whatever was there.
    pub fn initialize(&mut self, source: &impl ItemSource<I>) -> SlotChanges {
        self.position = source.current_cursor();
        self.query(source, true)
    }

    /// Moves the window one step. The slot that scrolls into view is left unknown until
    /// the source is queried again.
    pub fn shift(&mut self, delta: Delta) {
        match delta {
            Delta::Forward => {
                self.slots.rotate_left(1);
                self.slots[STORE_SIZE - 1] = None;
            }
            Delta::Backward => {
                self.slots.rotate_right(1);
                self.slots[0] = None;
            }
        }
        self.position = self.position.saturating_add_signed(delta.as_i32() as isize);
    }

    pub fn apply_external_update(
        &mut self,
        event: SourceEvent<I>,
        source: &impl ItemSource<I>,
    ) -> SlotChanges {
        match event {
            SourceEvent::ReplaceAt { offset, item } => {
                let mut changes = SlotChanges::none();
                let Some(slot) = slot_for_offset(offset) else {
                    tracing::debug!("Ignoring replacement at offset {offset}, outside the window");
                    return changes;
                };
                self.slots[slot] = item;
                changes.mark(slot);
                changes
            }
            SourceEvent::CursorChanged { cursor, current } => {
                self.position = cursor;
                let shown = self.current().map(Item::id);
                let force = shown.is_none() || shown != current.as_ref().map(Item::id);
                if force {
                    tracing::debug!(
                        "Current item changed ({} -> {}), requerying all slots",
                        display_id(shown),
                        display_id(current.as_ref().map(Item::id))
                    );
                }
                self.query(source, force)
            }
        }
    }

    /// Fills unknown slots from `source`, or every slot when `force` is set.
    fn query(&mut self, source: &impl ItemSource<I>, force: bool) -> SlotChanges {
        let mut changes = SlotChanges::none();
        for slot in 0..STORE_SIZE {
            if force || self.slots[slot].is_none() {
                self.slots[slot] = source.item_at(slot as i32 - CENTER_SLOT as i32);
                changes.mark(slot);
            }
        }
        changes
    }
}

fn slot_for_offset(offset: i32) -> Option<usize> {
    let slot = CENTER_SLOT as i32 + offset;
    (0..STORE_SIZE as i32)
        .contains(&slot)
        .then_some(slot as usize)
}

fn display_id(id: Option<ItemId>) -> String {
    id.map(|id| id.to_string())
        .unwrap_or_else(|| "none".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeSource, TestItem};

    fn ids(window: &SongWindow<TestItem>) -> [Option<u64>; STORE_SIZE] {
        std::array::from_fn(|slot| window.get(slot).map(|item| item.id().0))
    }

    #[test]
    fn test_initialize_fills_every_slot() {
        let source = FakeSource::with_items(10, 5);
        let mut window = SongWindow::new();
        let changes = window.initialize(&source);

        assert_eq!(ids(&window), [Some(4), Some(5), Some(6)]);
        assert_eq!(window.position(), 5);
        assert_eq!(changes.iter().collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_initialize_at_start_leaves_previous_unknown() {
        let source = FakeSource::with_items(10, 0);
        let mut window = SongWindow::new();
        window.initialize(&source);

        assert_eq!(ids(&window), [None, Some(0), Some(1)]);
        assert!(window.at_start());
    }

    #[test]
    fn test_shift_forward() {
        let source = FakeSource::with_items(10, 5);
        let mut window = SongWindow::new();
        window.initialize(&source);

        window.shift(Delta::Forward);
        assert_eq!(ids(&window), [Some(5), Some(6), None]);
        assert_eq!(window.position(), 6);
    }

    #[test]
    fn test_shift_backward() {
        let source = FakeSource::with_items(10, 5);
        let mut window = SongWindow::new();
        window.initialize(&source);

        window.shift(Delta::Backward);
        assert_eq!(ids(&window), [None, Some(4), Some(5)]);
        assert_eq!(window.position(), 4);
    }

    #[test]
    fn test_replace_at_offset_touches_one_slot() {
        let source = FakeSource::with_items(10, 5);
        let mut window = SongWindow::new();
        window.initialize(&source);

        let changes = window.apply_external_update(
            SourceEvent::ReplaceAt {
                offset: 1,
                item: Some(TestItem(42)),
            },
            &source,
        );
        assert_eq!(ids(&window), [Some(4), Some(5), Some(42)]);
        assert_eq!(changes.iter().collect::<Vec<_>>(), vec![2]);

        window.apply_external_update(SourceEvent::ReplaceAt { offset: -1, item: None }, &source);
        assert_eq!(ids(&window), [None, Some(5), Some(42)]);
    }

    #[test]
    fn test_replace_outside_window_is_ignored() {
        let source = FakeSource::with_items(10, 5);
        let mut window = SongWindow::new();
        window.initialize(&source);

        let changes = window.apply_external_update(
            SourceEvent::ReplaceAt {
                offset: 2,
                item: Some(TestItem(42)),
            },
            &source,
        );
        assert!(changes.is_empty());
        assert_eq!(ids(&window), [Some(4), Some(5), Some(6)]);
    }

    #[test]
    fn test_resync_with_same_current_only_fills_unknown_slots() {
        let mut source = FakeSource::with_items(10, 5);
        let mut window = SongWindow::new();
        window.initialize(&source);
        window.shift(Delta::Forward);

        // The source followed the navigation but also changed an already known neighbour,
        // which must not be picked up.
        source.cursor = 6;
        source.items[5] = TestItem(99);
        let changes = window.apply_external_update(
            SourceEvent::CursorChanged {
                cursor: 6,
                current: Some(TestItem(6)),
            },
            &source,
        );

        assert_eq!(ids(&window), [Some(5), Some(6), Some(7)]);
        assert_eq!(changes.iter().collect::<Vec<_>>(), vec![2]);
        assert_eq!(window.position(), 6);
    }

    #[test]
    fn test_resync_with_different_current_requeries_everything() {
        let mut source = FakeSource::with_items(10, 5);
        let mut window = SongWindow::new();
        window.initialize(&source);

        source.cursor = 2;
        let changes = window.apply_external_update(
            SourceEvent::CursorChanged {
                cursor: 2,
                current: Some(TestItem(2)),
            },
            &source,
        );

        assert_eq!(ids(&window), [Some(1), Some(2), Some(3)]);
        assert_eq!(changes.iter().count(), STORE_SIZE);
        assert_eq!(window.position(), 2);
    }

    #[test]
    fn test_resync_with_unknown_current_requeries_everything() {
        let source = FakeSource::with_items(10, 3);
        let mut window = SongWindow::new();
        window.initialize(&source);
        window.apply_external_update(SourceEvent::ReplaceAt { offset: 0, item: None }, &source);

        let changes = window.apply_external_update(
            SourceEvent::CursorChanged {
                cursor: 3,
                current: Some(TestItem(3)),
            },
            &source,
        );
        assert_eq!(ids(&window), [Some(2), Some(3), Some(4)]);
        assert_eq!(changes.iter().count(), STORE_SIZE);
    }
}
