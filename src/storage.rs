//! Filesystem storage for uploaded files.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rand::{Rng, distributions::Alphanumeric};
use tokio::{fs, io::AsyncWriteExt};

use crate::error::Result;

/// Namespace (sub-directory) product images are stored under.
pub const IMAGE_NAMESPACE: &str = "image";

const FALLBACK_NAME: &str = "upload";
const SUFFIX_LENGTH: usize = 7;
const MAX_ATTEMPTS: usize = 100;
// Length of the `image` column; also below the usual 255 byte file name limit.
const MAX_STORED_PATH_LENGTH: usize = 255;

#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
    base_url: String,
}

impl MediaStorage {
    pub fn new(root: impl Into<PathBuf>, base_url: &str) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Writes `bytes` under `namespace` and returns the stored path relative to the root.
    ///
    /// Existing files are never overwritten: on a name clash a random suffix is
    /// appended to the stem until the name is free.
    pub async fn save(&self, namespace: &str, file_name: &str, bytes: &[u8]) -> Result<String> {
        let directory = self.root.join(namespace);
        fs::create_dir_all(&directory).await?;

        // room for `namespace/` and a `_XXXXXXX` collision suffix
        let max_name_length = MAX_STORED_PATH_LENGTH
            .saturating_sub(namespace.len() + 1 + SUFFIX_LENGTH + 1)
            .max(FALLBACK_NAME.len());
        let name = truncate_file_name(&valid_file_name(file_name), max_name_length);
        let mut candidate = name.clone();

        for _ in 0..MAX_ATTEMPTS {
            let path = directory.join(&candidate);
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(mut file) => {
                    file.write_all(bytes).await?;
                    file.flush().await?;
                    return Ok(format!("{}/{}", namespace, candidate));
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    candidate = with_random_suffix(&name);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(std::io::Error::new(
            ErrorKind::AlreadyExists,
            format!("no free name for {} in {}", name, namespace),
        )
        .into())
    }

    pub fn url(&self, stored_path: &str) -> String {
        format!("{}/{}", self.base_url, stored_path)
    }

    /// Fails unless the media root is an existing directory that is not read-only.
    pub async fn check_health(&self) -> Result<()> {
        let metadata = fs::metadata(&self.root).await?;

        if !metadata.is_dir() {
            return Err(std::io::Error::new(
                ErrorKind::NotADirectory,
                format!("{} is not a directory", self.root.display()),
            )
            .into());
        }
        if metadata.permissions().readonly() {
            return Err(std::io::Error::new(
                ErrorKind::PermissionDenied,
                format!("{} is read-only", self.root.display()),
            )
            .into());
        }

        Ok(())
    }

    /// Removes files written by [`MediaStorage::save`]. Failures are logged, not returned.
    pub async fn discard(&self, stored_paths: &[String]) {
        for stored_path in stored_paths {
            if let Err(e) = fs::remove_file(self.root.join(stored_path)).await {
                tracing::warn!("Failed to remove stored file {}: {}", stored_path, e);
            }
        }
    }
}

/// Reduces a client supplied file name to a safe base name.
fn valid_file_name(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    let cleaned: String = base
        .chars()
        .map(|c| if c == ' ' { '_' } else { c })
        .filter(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        FALLBACK_NAME.to_string()
    } else {
        cleaned
    }
}

/// Shortens `name` to at most `max_bytes` bytes, cutting the stem and keeping the extension.
fn truncate_file_name(name: &str, max_bytes: usize) -> String {
    if name.len() <= max_bytes {
        return name.to_string();
    }

    let (stem, extension) = match name.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() && extension.len() + 2 <= max_bytes => {
            (stem, format!(".{}", extension))
        }
        _ => (name, String::new()),
    };

    let stem_budget = max_bytes - extension.len();
    let mut end = stem_budget.min(stem.len());
    while !stem.is_char_boundary(end) {
        end -= 1;
    }

    format!("{}{}", &stem[..end], extension)
}

fn with_random_suffix(name: &str) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LENGTH)
        .map(char::from)
        .collect();

    match name.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() => {
            format!("{}_{}.{}", stem, suffix, extension)
        }
        _ => format!("{}_{}", name, suffix),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_are_reduced_to_safe_base_names() {
        assert_eq!(valid_file_name("photo.png"), "photo.png");
        assert_eq!(valid_file_name("../../etc/passwd"), "passwd");
        assert_eq!(valid_file_name(r"C:\Users\me\my photo.jpg"), "my_photo.jpg");
        assert_eq!(valid_file_name("<script>.png"), "script.png");
        assert_eq!(valid_file_name(".."), "upload");
        assert_eq!(valid_file_name(""), "upload");
    }

    #[test]
    fn suffix_goes_before_the_extension() {
        let renamed = with_random_suffix("photo.png");
        assert!(renamed.starts_with("photo_"));
        assert!(renamed.ends_with(".png"));
        assert_eq!(renamed.len(), "photo_.png".len() + SUFFIX_LENGTH);

        let renamed = with_random_suffix("README");
        assert_eq!(renamed.len(), "README_".len() + SUFFIX_LENGTH);
    }

    #[tokio::test]
    async fn save_writes_under_namespace() {
        let dir = tempfile::tempdir().unwrap();
        let storage = MediaStorage::new(dir.path(), "/media/");

        let stored = storage
            .save(IMAGE_NAMESPACE, "front.png", b"front")
            .await
            .unwrap();

        assert_eq!(stored, "image/front.png");
        assert_eq!(std::fs::read(dir.path().join(&stored)).unwrap(), b"front");
        assert_eq!(storage.url(&stored), "/media/image/front.png");
    }

    #[test]
    fn long_names_are_cut_before_the_extension() {
        let name = format!("{}.png", "a".repeat(300));
        let truncated = truncate_file_name(&name, 240);
        assert_eq!(truncated.len(), 240);
        assert!(truncated.ends_with("a.png"));

        // never splits a multibyte character
        let name = format!("{}.jpg", "é".repeat(200));
        let truncated = truncate_file_name(&name, 101);
        assert!(truncated.len() <= 101);
        assert!(truncated.ends_with("é.jpg"));

        assert_eq!(truncate_file_name("short.png", 240), "short.png");
    }

    #[tokio::test]
    async fn save_keeps_long_names_within_column_and_filesystem_limits() {
        let dir = tempfile::tempdir().unwrap();
        let storage = MediaStorage::new(dir.path(), "/media");

        for file_name in [
            format!("{}.png", "a".repeat(300)),
            format!("{}.png", "b".repeat(250)),
            format!("{}.png", "ü".repeat(200)),
        ] {
            let first = storage.save(IMAGE_NAMESPACE, &file_name, b"one").await.unwrap();
            let second = storage.save(IMAGE_NAMESPACE, &file_name, b"two").await.unwrap();

            for stored in [&first, &second] {
                assert!(stored.len() <= MAX_STORED_PATH_LENGTH, "{}", stored.len());
                assert!(stored.starts_with("image/"));
                assert!(stored.ends_with(".png"));
                assert!(dir.path().join(stored).exists());
            }
            assert_ne!(first, second);
        }
    }

    #[tokio::test]
    async fn save_never_overwrites_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        let storage = MediaStorage::new(dir.path(), "/media");

        let first = storage.save(IMAGE_NAMESPACE, "a.png", b"one").await.unwrap();
        let second = storage.save(IMAGE_NAMESPACE, "a.png", b"two").await.unwrap();

        assert_ne!(first, second);
        assert_eq!(std::fs::read(dir.path().join(&first)).unwrap(), b"one");
        assert_eq!(std::fs::read(dir.path().join(&second)).unwrap(), b"two");
    }

    #[tokio::test]
    async fn media_root_must_be_an_existing_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(MediaStorage::new(dir.path(), "/media").check_health().await.is_ok());

        let missing = MediaStorage::new(dir.path().join("missing"), "/media");
        assert!(missing.check_health().await.is_err());

        std::fs::write(dir.path().join("file"), b"").unwrap();
        let file = MediaStorage::new(dir.path().join("file"), "/media");
        assert!(file.check_health().await.is_err());
    }

    #[tokio::test]
    async fn discard_removes_stored_files_and_ignores_missing_ones() {
        let dir = tempfile::tempdir().unwrap();
        let storage = MediaStorage::new(dir.path(), "/media");

        let stored = storage.save(IMAGE_NAMESPACE, "a.png", b"one").await.unwrap();
        storage
            .discard(&[stored.clone(), "image/missing.png".to_string()])
            .await;

        assert!(!dir.path().join(&stored).exists());
    }
}
