//! File name validation and containment checks

use crate::error::{Result, ServeError};
use percent_encoding::percent_decode_str;
use std::path::{Component, Path};

/// Decode a percent-encoded route segment into a file name
pub fn decode_file_name(raw: &str) -> Result<String> {
    percent_decode_str(raw)
        .decode_utf8()
        .map(|name| name.into_owned())
        .map_err(|_| ServeError::BadRequest(format!("file name is not valid UTF-8: {raw}")))
}

/// Reject names that could address anything but a direct child of the root
pub fn check_file_name(name: &str) -> Result<()> {
    let rejected = name.is_empty()
        || name.contains(['/', '\\', '\0'])
        || !is_single_normal_component(name);

    if rejected {
        return Err(ServeError::PathTraversal(name.to_string()));
    }
    Ok(())
}

/// Both paths must already be canonical
pub fn is_contained(root: &Path, candidate: &Path) -> bool {
    candidate != root && candidate.starts_with(root)
}

// Catches platform prefixes such as `C:` that the character checks miss
fn is_single_normal_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_names_accepted() {
        for name in ["a.mp3", "My Song (live).flac", "track.01.wav", "été.ogg", ".hidden", "track..mp3", "..intro.mp3"] {
            assert!(check_file_name(name).is_ok(), "{name} should be accepted");
        }
    }

    #[test]
    fn test_traversal_names_rejected() {
        for name in [
            "",
            ".",
            "..",
            "../etc/passwd",
            "../../etc/passwd",
            "/etc/passwd",
            "sub/a.mp3",
            "..\\windows\\win.ini",
            "a..mp3/..",
            "nul\0byte.mp3",
        ] {
            assert!(
                matches!(check_file_name(name), Err(ServeError::PathTraversal(_))),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_decode_file_name() {
        assert_eq!(decode_file_name("a.mp3").unwrap(), "a.mp3");
        assert_eq!(decode_file_name("My%20Song.mp3").unwrap(), "My Song.mp3");
        assert_eq!(decode_file_name("%C3%A9t%C3%A9.ogg").unwrap(), "été.ogg");
        assert_eq!(decode_file_name("..%2F..%2Fetc%2Fpasswd").unwrap(), "../../etc/passwd");
        assert!(matches!(
            decode_file_name("%ff%fe.mp3"),
            Err(ServeError::BadRequest(_))
        ));
    }

    #[test]
    fn test_is_contained() {
        let root = Path::new("/srv/audio");
        assert!(is_contained(root, Path::new("/srv/audio/a.mp3")));
        assert!(!is_contained(root, Path::new("/srv/audio")));
        assert!(!is_contained(root, Path::new("/srv/audio-other/a.mp3")));
        assert!(!is_contained(root, Path::new("/etc/passwd")));
    }
}
