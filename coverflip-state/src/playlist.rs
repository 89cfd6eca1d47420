use std::sync::mpsc::{Receiver, Sender};

use coverflip_core::{Delta, ItemId, ItemSource, SourceEvent};

use crate::{Song, SongId};

/// Errors from editing a [`Playlist`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PlaylistError {
    /// The requested position is not in the playlist.
    #[error("position {index} is outside the playlist ({len} songs)")]
    OutOfRange {
        /// The position that was asked for, relative to the start of the playlist.
        index: i64,
        /// The number of songs in the playlist.
        len: usize,
    },
}

/// An ordered list of songs with a cursor marking the one that is playing.
///
/// Every change is broadcast as a [`SourceEvent`] to the subscriber, if there is one.
#[derive(Debug, Default)]
pub struct Playlist {
    songs: Vec<Song>,
    cursor: usize,
    event_tx: Option<Sender<SourceEvent<Song>>>,
}
impl Playlist {
    /// A playlist positioned on its first song.
    pub fn new(songs: Vec<Song>) -> Self {
        Self {
            songs,
            cursor: 0,
            event_tx: None,
        }
    }

    /// `count` placeholder songs without artwork, for running without a music library.
    pub fn demo(count: usize) -> Self {
        let songs = (0..count)
            .map(|index| Song {
                artist: Some("Demo Artist".to_string()),
                album: Some(format!("Demo Album {}", index / 4 + 1)),
                ..Song::untagged(SongId(index as u64), format!("Demo Song {}", index + 1))
            })
            .collect();
        Self::new(songs)
    }

    /// Routes future change notifications to the returned receiver, replacing any
    /// previous subscriber.
    pub fn subscribe(&mut self) -> Receiver<SourceEvent<Song>> {
        let (event_tx, event_rx) = std::sync::mpsc::channel();
        self.event_tx = Some(event_tx);
        event_rx
    }

    /// The number of songs.
    pub fn len(&self) -> usize {
        self.songs.len()
    }

    /// Whether there are no songs at all.
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    /// The index of the current song.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The current song, unless the playlist is empty.
    pub fn current(&self) -> Option<&Song> {
        self.songs.get(self.cursor)
    }

    /// Looks a song up by the ID the cover browser knows it by.
    pub fn find(&self, id: ItemId) -> Option<&Song> {
        self.songs.iter().find(|song| song.id.0 == id.0)
    }

    /// Moves the cursor one step, stopping at either end of the playlist.
    ///
    /// A change notification is sent even when the cursor could not move, so that a
    /// subscriber that moved ahead optimistically is brought back in line.
    pub fn set_song(&mut self, delta: Delta) -> Option<&Song> {
        let last = self.songs.len().saturating_sub(1);
        self.cursor = self
            .cursor
            .saturating_add_signed(delta.as_i32() as isize)
            .min(last);
        tracing::debug!("Playlist cursor moved {delta} to {}", self.cursor);
        self.emit_cursor();
        self.current()
    }

    /// Jumps straight to `index`.
    pub fn set_cursor(&mut self, index: usize) -> Result<(), PlaylistError> {
        if index >= self.songs.len() {
            return Err(self.out_of_range(index as i64));
        }
        self.cursor = index;
        self.emit_cursor();
        Ok(())
    }

    /// Replaces the song `offset` places away from the current one.
    pub fn replace(&mut self, offset: i32, song: Song) -> Result<(), PlaylistError> {
        let index = self
            .index_for(offset)
            .ok_or_else(|| self.out_of_range(self.cursor as i64 + offset as i64))?;
        self.songs[index] = song.clone();
        if offset == 0 {
            self.emit_cursor();
        } else {
            self.emit(SourceEvent::ReplaceAt {
                offset,
                item: Some(song),
            });
        }
        Ok(())
    }

    fn index_for(&self, offset: i32) -> Option<usize> {
        let index = self.cursor.checked_add_signed(offset as isize)?;
        (index < self.songs.len()).then_some(index)
    }

    fn out_of_range(&self, index: i64) -> PlaylistError {
        PlaylistError::OutOfRange {
            index,
            len: self.songs.len(),
        }
    }

    fn emit_cursor(&self) {
        self.emit(SourceEvent::CursorChanged {
            cursor: self.cursor,
            current: self.current().cloned(),
        });
    }

    fn emit(&self, event: SourceEvent<Song>) {
        let Some(event_tx) = &self.event_tx else {
            return;
        };
        if event_tx.send(event).is_err() {
            tracing::warn!("Playlist subscriber has gone away");
        }
    }
}
impl ItemSource<Song> for Playlist {
    fn item_at(&self, offset: i32) -> Option<Song> {
        self.index_for(offset)
            .and_then(|index| self.songs.get(index))
            .cloned()
    }

    fn current_cursor(&self) -> usize {
        self.cursor
    }
}
