/// File kinds assignable to downloaded content.
///
/// The vocabulary is fixed: every file the store writes carries one
/// of these extensions, and the existence probe checks all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Json,
    Gif,
    Png,
    Jpg,
    Mp4,
    Glb,
    Html,
    Bin,
    Webp,
}

impl FileKind {
    /// Every known kind, in the order the store probes for them.
    pub const ALL: [FileKind; 9] = [
        FileKind::Json,
        FileKind::Gif,
        FileKind::Png,
        FileKind::Jpg,
        FileKind::Mp4,
        FileKind::Glb,
        FileKind::Html,
        FileKind::Bin,
        FileKind::Webp,
    ];

    pub fn ext(self) -> &'static str {
        match self {
            FileKind::Json => ".json",
            FileKind::Gif => ".gif",
            FileKind::Png => ".png",
            FileKind::Jpg => ".jpg",
            FileKind::Mp4 => ".mp4",
            FileKind::Glb => ".glb",
            FileKind::Html => ".html",
            FileKind::Bin => ".bin",
            FileKind::Webp => ".webp",
        }
    }

    pub fn from_ext(ext: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.ext() == ext)
    }

    /// JSON and HTML documents may embed further identifiers; nothing
    /// else is expanded.
    pub fn expandable(self) -> bool {
        matches!(self, FileKind::Json | FileKind::Html)
    }
}

/// Assign a file kind by magic-byte sniffing.
///
/// Binary signatures are checked first; a strict JSON parse runs only
/// after every binary check has failed, so a JSON payload that starts
/// with whitespace still classifies correctly. Anything unrecognized
/// is opaque binary.
pub fn sniff(data: &[u8]) -> FileKind {
    if data.starts_with(b"<!DOCTYPE html") {
        return FileKind::Html;
    }
    if data.starts_with(b"\x89PNG") {
        return FileKind::Png;
    }
    // JPEG, JFIF, and EXIF all share the FF D8 FF prefix.
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return FileKind::Jpg;
    }
    if data.starts_with(b"GIF8") {
        return FileKind::Gif;
    }
    if data.len() >= 12 && &data[..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        return FileKind::Webp;
    }
    if data.len() >= 8 {
        let tag = &data[4..8];
        if tag == b"ftyp" || tag == b"mdat" || tag == b"moov" || tag == b"wide" {
            return FileKind::Mp4;
        }
    }
    if data.starts_with(b"glTF") {
        return FileKind::Glb;
    }
    if serde_json::from_slice::<serde::de::IgnoredAny>(data).is_ok() {
        return FileKind::Json;
    }
    FileKind::Bin
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_each_signature() {
        assert_eq!(sniff(b"<!DOCTYPE html><html></html>"), FileKind::Html);
        assert_eq!(sniff(b"\x89PNG\r\n\x1a\n....."), FileKind::Png);
        assert_eq!(sniff(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00]), FileKind::Jpg);
        assert_eq!(sniff(b"GIF89a......"), FileKind::Gif);
        assert_eq!(sniff(b"RIFF\x00\x00\x00\x00WEBPVP8 "), FileKind::Webp);
        assert_eq!(sniff(b"\x00\x00\x00\x20ftypisom...."), FileKind::Mp4);
        assert_eq!(sniff(b"glTF\x02\x00\x00\x00...."), FileKind::Glb);
    }

    #[test]
    fn json_only_after_binary_checks_fail() {
        assert_eq!(sniff(br#"{"name": "piece #1"}"#), FileKind::Json);
        assert_eq!(sniff(b"  \n[1, 2, 3]"), FileKind::Json);
    }

    #[test]
    fn unknown_bytes_are_opaque() {
        assert_eq!(sniff(b"just some text"), FileKind::Bin);
        assert_eq!(sniff(&[0x00, 0x01, 0x02, 0x03]), FileKind::Bin);
        assert_eq!(sniff(b""), FileKind::Bin);
    }

    #[test]
    fn truncated_container_headers_do_not_panic() {
        assert_eq!(sniff(b"RIFF"), FileKind::Bin);
        assert_eq!(sniff(b"\x00\x00\x00"), FileKind::Bin);
    }

    #[test]
    fn ext_round_trips() {
        for kind in FileKind::ALL {
            assert_eq!(FileKind::from_ext(kind.ext()), Some(kind));
        }
        assert_eq!(FileKind::from_ext(".exe"), None);
    }

    #[test]
    fn only_documents_expand() {
        assert!(FileKind::Json.expandable());
        assert!(FileKind::Html.expandable());
        assert!(!FileKind::Png.expandable());
        assert!(!FileKind::Bin.expandable());
    }
}
