//! Shared key generation for storage backends.
//!
//! Key format: `[{prefix}/]{owner}/{photo_type}_{random8hex}{ext}`. The random
//! part makes every key unique per upload, even for the same owner and photo type.

use std::path::Path;

use uuid::Uuid;

use crate::traits::{StorageError, StorageResult};

const RANDOM_SUFFIX_LEN: usize = 8;
const MAX_EXTENSION_LEN: usize = 10;

/// Generate a storage key for an owner's photo.
///
/// `photo_type` may contain `/` (e.g. `medical-portfolio/education`); every
/// segment of it, and the owner, must be a plain path component.
pub fn generate_photo_key(
    prefix: Option<&str>,
    owner: &str,
    photo_type: &str,
    filename: &str,
) -> StorageResult<String> {
    if !is_safe_segment(owner) {
        return Err(StorageError::InvalidKey(format!(
            "owner '{}' cannot be used in a storage key",
            owner
        )));
    }
    if photo_type.is_empty() || !photo_type.split('/').all(is_safe_segment) {
        return Err(StorageError::InvalidKey(format!(
            "photo type '{}' cannot be used in a storage key",
            photo_type
        )));
    }

    let id = Uuid::new_v4().simple().to_string();
    let name = format!(
        "{}_{}{}",
        photo_type,
        &id[..RANDOM_SUFFIX_LEN],
        extension_of(filename)
    );

    Ok(match prefix.map(|p| p.trim_matches('/')).filter(|p| !p.is_empty()) {
        Some(prefix) => format!("{}/{}/{}", prefix, owner, name),
        None => format!("{}/{}", owner, name),
    })
}

/// Extension of the original filename including the dot, lower-cased.
/// Anything that is not a short alphanumeric extension yields an empty string.
pub fn extension_of(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| {
            !e.is_empty()
                && e.len() <= MAX_EXTENSION_LEN
                && e.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}

/// Keys are relative, `/`-separated and free of `.`/`..` or empty segments.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() || key.starts_with('/') || !key.split('/').all(is_safe_segment) {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}

fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment
            .chars()
            .any(|c| c == '/' || c == '\\' || c.is_control())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_key_layout() {
        let key = generate_photo_key(None, "alice", "profile", "me.PNG").unwrap();
        let (owner, name) = key.split_once('/').unwrap();
        assert_eq!(owner, "alice");
        assert!(name.starts_with("profile_"));
        assert!(name.ends_with(".png"));
        assert_eq!(name.len(), "profile_".len() + 8 + ".png".len());
    }

    #[test]
    fn test_prefixed_key_layout() {
        let key = generate_photo_key(
            Some("profiles"),
            "bob",
            "medical-portfolio/education",
            "diploma.jpg",
        )
        .unwrap();
        assert!(key.starts_with("profiles/bob/medical-portfolio/education_"));
        assert!(key.ends_with(".jpg"));
    }

    #[test]
    fn test_keys_are_unique() {
        let a = generate_photo_key(None, "alice", "profile", "a.png").unwrap();
        let b = generate_photo_key(None, "alice", "profile", "a.png").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_missing_or_odd_extension_is_dropped() {
        assert_eq!(extension_of("photo"), "");
        assert_eq!(extension_of("photo.j p g"), "");
        assert_eq!(extension_of("archive.tar.GZ"), ".gz");
        let key = generate_photo_key(None, "alice", "profile", "photo").unwrap();
        assert!(!key.contains('.'));
    }

    #[test]
    fn test_traversal_is_rejected() {
        assert!(generate_photo_key(None, "..", "profile", "a.png").is_err());
        assert!(generate_photo_key(None, "a/b", "profile", "a.png").is_err());
        assert!(generate_photo_key(None, "alice", "../profile", "a.png").is_err());
        assert!(validate_key("alice/../../etc/passwd").is_err());
        assert!(validate_key("/etc/passwd").is_err());
        assert!(validate_key("alice//x.png").is_err());
        assert!(validate_key("alice/profile_1234abcd.png").is_ok());
    }
}
