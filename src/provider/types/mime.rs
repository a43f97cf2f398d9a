/*!
 * MIME Lookup
 * Extension to MIME type table for document rows
 */

use std::path::Path;

use crate::core::limits::{IMAGE_MIME_PREFIX, MIME_TYPE_DIR, MIME_TYPE_OCTET_STREAM};

/// MIME type for a filesystem entry
pub fn mime_type_for(path: &Path, is_dir: bool) -> &'static str {
    if is_dir {
        MIME_TYPE_DIR
    } else {
        mime_type_from_extension(path)
    }
}

/// MIME type from file extension, octet-stream when unknown
pub fn mime_type_from_extension(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        // Images
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        // Audio
        Some("mp3") => "audio/mpeg",
        Some("ogg") | Some("oga") => "audio/ogg",
        Some("wav") => "audio/wav",
        Some("flac") => "audio/flac",
        // Video
        Some("mp4") | Some("m4v") => "video/mp4",
        Some("webm") => "video/webm",
        Some("mkv") => "video/x-matroska",
        // Documents
        Some("pdf") => "application/pdf",
        Some("json") => "application/json",
        Some("xml") => "application/xml",
        // Text
        Some("txt") | Some("log") | Some("ini") | Some("cfg") => "text/plain",
        Some("html") | Some("htm") => "text/html",
        Some("csv") => "text/csv",
        Some("md") => "text/markdown",
        // Archives
        Some("zip") => "application/zip",
        Some("7z") => "application/x-7z-compressed",
        Some("gz") => "application/gzip",
        Some("tar") => "application/x-tar",
        _ => MIME_TYPE_OCTET_STREAM,
    }
}

/// True for MIME types that get thumbnails
#[inline]
pub fn is_image(mime_type: &str) -> bool {
    mime_type.starts_with(IMAGE_MIME_PREFIX)
}

/// True when a requested MIME type asks for a directory
#[inline]
pub fn is_directory_mime(mime_type: &str) -> bool {
    mime_type == MIME_TYPE_DIR
}
