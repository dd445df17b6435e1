// SPDX-License-Identifier: MPL-2.0
use crate::domain::media::VideoId;
use std::fmt;

#[derive(Debug, Clone)]
pub enum Error {
    Io(String),
    Config(String),
    Preferences(String),
    Video(VideoError),
    Catalog(CatalogError),
}

/// Specific error types for video playback issues.
/// Used to provide user-friendly messages when the media engine gives up on an item.
#[derive(Debug, Clone, PartialEq)]
pub enum VideoError {
    /// File format is not supported (e.g., unknown extension)
    UnsupportedFormat,

    /// Video codec is not supported by the media engine
    UnsupportedCodec(String),

    /// File appears corrupted or has invalid data
    CorruptedFile,

    /// File exists but contains no video stream
    NoVideoStream,

    /// Decoding failed during playback
    DecodingFailed(String),

    /// I/O error (file not found, permission denied, etc.)
    IoError(String),

    /// Generic error with raw message
    Other(String),
}

impl VideoError {
    /// Returns the notice key for this error type.
    pub fn message_key(&self) -> &'static str {
        match self {
            VideoError::UnsupportedFormat => "error-play-video-unsupported-format",
            VideoError::UnsupportedCodec(_) => "error-play-video-unsupported-codec",
            VideoError::CorruptedFile => "error-play-video-corrupted",
            VideoError::NoVideoStream => "error-play-video-no-video-stream",
            VideoError::DecodingFailed(_) => "error-play-video-decoding-failed",
            VideoError::IoError(_) => "error-play-video-io",
            VideoError::Other(_) => "error-play-video-general",
        }
    }

    /// Attempts to parse a raw error message into a specific VideoError type.
    /// This is used to categorize errors reported by FFmpeg or the media engine.
    pub fn from_message(msg: &str) -> Self {
        let msg_lower = msg.to_lowercase();

        // Check codec/decoder errors first (they might contain "not found")
        if msg_lower.contains("codec") || msg_lower.contains("decoder") {
            if let Some(codec) = Self::extract_codec_name(&msg_lower) {
                return VideoError::UnsupportedCodec(codec);
            } else if msg_lower.contains("not found") || msg_lower.contains("unsupported") {
                return VideoError::DecodingFailed(msg.to_string());
            }
        }

        if msg_lower.contains("no such file")
            || (msg_lower.contains("not found") && !msg_lower.contains("decoder"))
            || msg_lower.contains("permission denied")
            || msg_lower.contains("i/o error")
        {
            return VideoError::IoError(msg.to_string());
        }

        if msg_lower.contains("no video stream")
            || msg_lower.contains("no video track")
            || msg_lower.contains("invalid data found")
        {
            return VideoError::NoVideoStream;
        }

        if msg_lower.contains("corrupt")
            || msg_lower.contains("invalid")
            || msg_lower.contains("malformed")
        {
            return VideoError::CorruptedFile;
        }

        if msg_lower.contains("unrecognized format") || msg_lower.contains("unknown format") {
            return VideoError::UnsupportedFormat;
        }

        if msg_lower.contains("packet")
            || msg_lower.contains("renderer")
            || msg_lower.contains("seek")
            || msg_lower.contains("decode")
            || msg_lower.contains("unsupported")
        {
            return VideoError::DecodingFailed(msg.to_string());
        }

        VideoError::Other(msg.to_string())
    }

    /// Tries to extract a codec name from an error message.
    fn extract_codec_name(msg: &str) -> Option<String> {
        // Common patterns: "codec 'xyz' not found", "decoder xyz not found"
        let codecs = [
            "h264", "hevc", "h265", "vp8", "vp9", "av1", "mpeg4", "mpeg2",
        ];
        for codec in codecs {
            if msg.contains(codec) {
                return Some(codec.to_uppercase());
            }
        }
        None
    }
}

impl fmt::Display for VideoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoError::UnsupportedFormat => write!(f, "Unsupported video format"),
            VideoError::UnsupportedCodec(codec) => {
                write!(f, "Unsupported video codec: {}", codec)
            }
            VideoError::CorruptedFile => write!(f, "Video file is corrupted"),
            VideoError::NoVideoStream => write!(f, "No video stream found"),
            VideoError::DecodingFailed(msg) => write!(f, "Decoding failed: {}", msg),
            VideoError::IoError(msg) => write!(f, "I/O error: {}", msg),
            VideoError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

/// Resumable token handed out when a catalog mutation needs one-time consent.
///
/// Passing it back to [`MediaCatalog::grant`](crate::application::port::MediaCatalog::grant)
/// completes the consent flow for exactly the items it names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantToken {
    request_id: u64,
    items: Vec<VideoId>,
}

impl GrantToken {
    #[must_use]
    pub fn new(request_id: u64, items: Vec<VideoId>) -> Self {
        Self { request_id, items }
    }

    #[must_use]
    pub fn request_id(&self) -> u64 {
        self.request_id
    }

    #[must_use]
    pub fn items(&self) -> &[VideoId] {
        &self.items
    }
}

/// Failures reported by a media catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// A mutation was rejected until the user grants one-time consent.
    ConsentRequired(GrantToken),

    /// The catalog cannot be queried at all without the storage permission.
    PermissionDenied,

    /// The requested video no longer exists.
    NotFound(VideoId),

    /// A rename target is empty or contains a path separator.
    InvalidName(String),

    /// Underlying storage failure.
    Io(String),
}

impl CatalogError {
    /// Maps an I/O error on `id` to the matching catalog failure.
    pub fn from_io(id: VideoId, err: &std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => CatalogError::NotFound(id),
            std::io::ErrorKind::PermissionDenied => CatalogError::PermissionDenied,
            _ => CatalogError::Io(err.to_string()),
        }
    }
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::ConsentRequired(token) => {
                write!(f, "User consent required (request {})", token.request_id())
            }
            CatalogError::PermissionDenied => write!(f, "Storage permission denied"),
            CatalogError::NotFound(id) => write!(f, "Video {} not found", id),
            CatalogError::InvalidName(name) => write!(f, "Invalid file name: {:?}", name),
            CatalogError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::Preferences(e) => write!(f, "Preferences Error: {}", e),
            Error::Video(e) => write!(f, "Video Error: {}", e),
            Error::Catalog(e) => write!(f, "Catalog Error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<VideoError> for Error {
    fn from(err: VideoError) -> Self {
        Error::Video(err)
    }
}

impl From<CatalogError> for Error {
    fn from(err: CatalogError) -> Self {
        Error::Catalog(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
