//! The songs the cover browser pages through, and the playlist that owns the real
//! playback position.
//!
//! Separated out so the widget core never has to know where songs come from.
#![deny(missing_docs)]

mod playlist;
pub use playlist::{Playlist, PlaylistError};

mod scan;
pub use scan::{MUSIC_EXTENSIONS, ScanError, read_song, scan_directory};

mod song;
pub use song::{Song, SongId};
