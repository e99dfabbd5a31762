//! Helpers for the location strings stored in the recent-file history.
//!
//! A location is either a plain filesystem path or a `file://` URI with
//! percent-encoded characters.

use crate::history::RecentFiles;
use std::path::{Path, PathBuf};

const FILE_SCHEME: &str = "file://";

/// Filesystem path a location refers to, or `None` for non-file URIs.
pub fn path_of(location: &str) -> Option<PathBuf> {
    if let Some(rest) = strip_scheme(location) {
        let decoded = percent_decode(rest);
        // file:///C:/x keeps a slash before the drive letter
        let trimmed = match decoded.as_bytes() {
            [b'/', drive, b':', ..] if drive.is_ascii_alphabetic() => &decoded[1..],
            _ => decoded.as_str(),
        };
        return Some(PathBuf::from(trimmed));
    }

    if has_scheme(location) {
        None
    } else {
        Some(PathBuf::from(location))
    }
}

pub(crate) fn has_scheme(location: &str) -> bool {
    location.split_once("://").is_some_and(|(scheme, _)| {
        !scheme.is_empty()
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

fn strip_scheme(location: &str) -> Option<&str> {
    let prefix = location.get(..FILE_SCHEME.len())?;
    if prefix.eq_ignore_ascii_case(FILE_SCHEME) {
        Some(&location[FILE_SCHEME.len()..])
    } else {
        None
    }
}

/// Human-facing location text: no scheme, `%XX` escapes decoded.
pub fn clean_location(location: &str) -> String {
    match path_of(location) {
        Some(path) if strip_scheme(location).is_some() => path.display().to_string(),
        _ => percent_decode(location),
    }
}

/// File name without its last extension, taken from the location as
/// written. Scripts are compiled, validated and matched to a start node
/// under this name, so `Intro.yarn.txt` is `Intro.yarn`.
pub fn script_name(location: &str) -> String {
    stem(location)
}

/// [`script_name`] with `%XX` escapes decoded, for titles and menus.
pub fn display_name(location: &str) -> String {
    stem(&clean_location(location))
}

fn stem(location: &str) -> String {
    Path::new(location)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| location.to_string())
}

/// Two-line label for a recent-file menu entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentLabel {
    pub title: String,
    pub detail: String,
}

pub fn recent_label(location: &str) -> RecentLabel {
    RecentLabel {
        title: display_name(location),
        detail: clean_location(location),
    }
}

/// Directory a file picker should open in: the folder of the most recent
/// file, else the desktop.
pub fn picker_start_dir(history: &RecentFiles) -> Option<PathBuf> {
    history
        .most_recent()
        .and_then(path_of)
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .filter(|p| !p.as_os_str().is_empty())
        .or_else(dirs::desktop_dir)
}

/// Absolute `file://` URI for a path, percent-encoding the characters a
/// URI can't carry literally.
pub fn to_file_uri(path: &Path) -> String {
    let path = path.to_string_lossy().replace('\\', "/");
    let mut uri = String::from(FILE_SCHEME);
    if !path.starts_with('/') {
        uri.push('/');
    }
    for c in path.chars() {
        match c {
            ' ' => uri.push_str("%20"),
            '%' => uri.push_str("%25"),
            '#' => uri.push_str("%23"),
            '?' => uri.push_str("%3F"),
            _ => uri.push(c),
        }
    }
    uri
}

fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push(hi << 4 | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_name_keeps_inner_extension() {
        assert_eq!(script_name("file:///s/Intro.yarn.txt"), "Intro.yarn");
        assert_eq!(script_name("file:///s/My%20Story.json"), "My%20Story");
        assert_eq!(script_name("a.yarn"), "a");
        assert_eq!(script_name("noext"), "noext");
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("a.yarn"), "a");
        assert_eq!(display_name("/stories/Intro.json"), "Intro");
        assert_eq!(display_name("file:///home/me/My%20Story.yarn.txt"), "My Story.yarn");
        assert_eq!(display_name("file:///s/My%20Story.json"), "My Story");
        assert_eq!(display_name(".yarn.txt"), ".yarn");
    }

    #[test]
    fn test_path_of() {
        assert_eq!(
            path_of("file:///tmp/a%20b.txt"),
            Some(PathBuf::from("/tmp/a b.txt"))
        );
        assert_eq!(path_of("FILE:///tmp/x"), Some(PathBuf::from("/tmp/x")));
        assert_eq!(path_of("file:///C:/Users/a.txt"), Some(PathBuf::from("C:/Users/a.txt")));
        assert_eq!(path_of("relative/a.txt"), Some(PathBuf::from("relative/a.txt")));
        assert_eq!(path_of("https://example.com/a.txt"), None);
    }

    #[test]
    fn test_percent_decode_leaves_bad_escapes() {
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("%zz%41"), "%zzA");
        assert_eq!(percent_decode("a%2"), "a%2");
    }

    #[test]
    fn test_recent_label() {
        let label = recent_label("file:///home/me/Quest%20Log.json");
        assert_eq!(label.title, "Quest Log");
        assert_eq!(label.detail, "/home/me/Quest Log.json");

        let plain = recent_label("stories/b.yarn");
        assert_eq!(plain.title, "b");
        assert_eq!(plain.detail, "stories/b.yarn");
    }

    #[test]
    fn test_file_uri_round_trips_through_path_of() {
        let path = Path::new("/home/me/100% done #2.yarn.txt");
        let uri = to_file_uri(path);
        assert_eq!(uri, "file:///home/me/100%25%20done%20%232.yarn.txt");
        assert_eq!(path_of(&uri).as_deref(), Some(path));
    }

    #[test]
    fn test_picker_start_dir_uses_most_recent_folder() {
        let mut history = RecentFiles::new(None);
        history.push("file:///stories/old/a.txt");
        history.push("file:///stories/new/b.txt");
        assert_eq!(picker_start_dir(&history), Some(PathBuf::from("/stories/new")));
    }
}
