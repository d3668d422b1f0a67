//! Attachment classification by file extension.

use std::fmt;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg", "webp", "bmp"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov", "mkv", "avi", "ogv"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "m4a", "flac", "aac"];

/// Coarse media category of an attachment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttachmentKind {
    Image,
    Video,
    Audio,
    /// Anything that isn't recognized as media.
    File,
}

impl AttachmentKind {
    /// Classify a path by its extension (case-insensitive).
    ///
    /// The extension is whatever follows the last `.`; paths without one
    /// are plain files.
    ///
    /// # Examples
    ///
    /// ```
    /// use fns_embed::AttachmentKind;
    ///
    /// assert_eq!(AttachmentKind::from_path("media/Clip.MP4"), AttachmentKind::Video);
    /// assert_eq!(AttachmentKind::from_path("report.pdf"), AttachmentKind::File);
    /// ```
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let Some((_, ext)) = path.rsplit_once('.') else {
            return Self::File;
        };
        let in_set = |set: &[&str]| set.iter().any(|known| ext.eq_ignore_ascii_case(known));

        if in_set(IMAGE_EXTENSIONS) {
            Self::Image
        } else if in_set(VIDEO_EXTENSIONS) {
            Self::Video
        } else if in_set(AUDIO_EXTENSIONS) {
            Self::Audio
        } else {
            Self::File
        }
    }

    /// Whether the attachment plays in a native media element.
    #[must_use]
    pub fn is_media(self) -> bool {
        matches!(self, Self::Video | Self::Audio)
    }

    /// Emoji prefix used for link-style embeds.
    ///
    /// Images are embedded inline and have no marker.
    #[must_use]
    pub fn marker(self) -> Option<&'static str> {
        match self {
            Self::Image => None,
            Self::Video => Some("🎬"),
            Self::Audio => Some("🎵"),
            Self::File => Some("📎"),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::File => "file",
        }
    }
}

impl fmt::Display for AttachmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
