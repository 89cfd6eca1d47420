use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use lofty::{
    file::TaggedFileExt,
    picture::{Picture, PictureType},
    read_from_path,
    tag::Accessor,
};
use walkdir::WalkDir;

use crate::{Song, SongId};

/// File extensions treated as music when scanning a directory.
pub const MUSIC_EXTENSIONS: &[&str] = &["mp3", "flac", "m4a", "aac", "ogg", "wav", "wma", "mp4"];

/// Errors from reading songs off disk.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The scan root does not exist or is a file.
    #[error("{} is not a directory", .path.display())]
    NotADirectory {
        /// The path that was asked for.
        path: PathBuf,
    },
    /// The file could not be parsed as audio.
    #[error("failed to read {}: {source}", .path.display())]
    Tags {
        /// The offending file.
        path: PathBuf,
        /// What lofty had to say about it.
        #[source]
        source: lofty::error::LoftyError,
    },
}

/// Reads every music file under `dir`, in file name order. Files that fail to parse are
/// logged and skipped.
pub fn scan_directory(dir: &Path) -> Result<Vec<Song>, ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }

    let mut songs = vec![];
    for entry in WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        if !is_music_file(path) {
            continue;
        }
        match read_song(path) {
            Ok(song) => songs.push(song),
            Err(e) => tracing::warn!("Skipping song: {e}"),
        }
    }

    tracing::info!("Found {} songs in {}", songs.len(), dir.display());
    Ok(songs)
}

/// Reads a single song's tags and cover picture. Untagged files are titled after their
/// file name.
pub fn read_song(path: &Path) -> Result<Song, ScanError> {
    let tagged_file = read_from_path(path).map_err(|source| ScanError::Tags {
        path: path.to_path_buf(),
        source,
    })?;

    let fallback_title = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let mut song = Song {
        path: Some(path.to_path_buf()),
        ..Song::untagged(SongId::from_path(path), fallback_title)
    };

    // Get the primary tag or first available tag
    let Some(tag) = tagged_file
        .primary_tag()
        .or_else(|| tagged_file.first_tag())
    else {
        tracing::debug!("No tags found in {}", path.display());
        return Ok(song);
    };

    if let Some(title) = non_empty(tag.title()) {
        song.title = title;
    }
    song.artist = non_empty(tag.artist());
    song.album = non_empty(tag.album());
    song.cover = pick_cover(tag.pictures()).map(|picture| Arc::from(picture.data()));

    Ok(song)
}

fn is_music_file(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| {
            MUSIC_EXTENSIONS.contains(&extension.to_lowercase().as_str())
        })
}

/// Prefers the front cover, then whatever picture comes first.
fn pick_cover(pictures: &[Picture]) -> Option<&Picture> {
    pictures
        .iter()
        .find(|picture| picture.pic_type() == PictureType::CoverFront)
        .or_else(|| pictures.first())
}

fn non_empty(value: Option<std::borrow::Cow<'_, str>>) -> Option<String> {
    let value = value?;
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
