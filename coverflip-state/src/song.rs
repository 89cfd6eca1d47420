use std::{
    hash::{Hash, Hasher},
    path::{Path, PathBuf},
    sync::Arc,
};

use coverflip_core::{Item, ItemId};

/// A song ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SongId(pub u64);
impl SongId {
    /// Derives a stable ID from the song's location on disk.
    pub fn from_path(path: &Path) -> Self {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        path.hash(&mut hasher);
        SongId(hasher.finish())
    }
}

/// A song, as the cover browser cares about it
#[derive(Debug, Clone)]
pub struct Song {
    /// The song ID
    pub id: SongId,
    /// The song title
    pub title: String,
    /// The song artist
    pub artist: Option<String>,
    /// The album name
    pub album: Option<String>,
    /// Where the song was read from, if it came from disk
    pub path: Option<PathBuf>,
    /// The encoded bytes of the embedded cover picture, if any
    pub cover: Option<Arc<[u8]>>,
}
impl Song {
    /// A song with only a title, as used by the demo playlist.
    pub fn untagged(id: SongId, title: impl Into<String>) -> Self {
        Song {
            id,
            title: title.into(),
            artist: None,
            album: None,
            path: None,
            cover: None,
        }
    }

    /// `artist - album`, skipping whichever is missing.
    pub fn subtitle(&self) -> Option<String> {
        match (&self.artist, &self.album) {
            (Some(artist), Some(album)) => Some(format!("{artist} - {album}")),
            (Some(one), None) | (None, Some(one)) => Some(one.clone()),
            (None, None) => None,
        }
    }
}
impl PartialEq for Song {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for Song {}
impl Item for Song {
    fn id(&self) -> ItemId {
        ItemId(self.id.0)
    }
}
