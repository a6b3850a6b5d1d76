//! Background picture handling: the upload constraint and the attachment
//! payload. The picture is never decoded; only its size, extension, and
//! leading signature bytes are inspected.

use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::ValidationError;

/// 30 MiB, the largest picture accepted.
pub const MAX_IMAGE_BYTES: u64 = 30 * 1024 * 1024;
/// Extensions accepted for upload, compared case-insensitively.
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];
/// Name given to the attachment regardless of the uploaded file's name.
pub const ATTACHMENT_FILE_NAME: &str = "club_background.jpg";

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

/// Reject sizes above [`MAX_IMAGE_BYTES`].
pub fn check_size(len: u64) -> Result<(), ValidationError> {
    if len > MAX_IMAGE_BYTES {
        Err(ValidationError::ImageTooLarge { size: len })
    } else {
        Ok(())
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct BackgroundImage {
    /// File name as chosen; the attachment is always renamed.
    pub original_name: String,
    pub bytes: Vec<u8>,
}

impl BackgroundImage {
    /// Validate and read the picture at `path`. The extension and size are
    /// checked against the file metadata first, so an oversize file is
    /// rejected without reading any of it.
    pub fn load(path: &Path) -> Result<Self, ValidationError> {
        let extension_ok = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                ACCEPTED_EXTENSIONS
                    .iter()
                    .any(|accepted| ext.eq_ignore_ascii_case(accepted))
            });
        if !extension_ok {
            return Err(ValidationError::UnsupportedImageType);
        }

        let unreadable = |err: std::io::Error| ValidationError::ImageUnreadable {
            path: path.to_path_buf(),
            reason: err.to_string(),
        };
        let metadata = fs::metadata(path).map_err(unreadable)?;
        check_size(metadata.len())?;
        let bytes = fs::read(path).map_err(unreadable)?;
        // The file may have grown between the two calls.
        check_size(bytes.len() as u64)?;

        let original_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            original_name,
            bytes,
        })
    }

    /// MIME type for the attachment part, sniffed from the bytes.
    pub fn content_type(&self) -> &'static str {
        if self.bytes.starts_with(&PNG_SIGNATURE) {
            "image/png"
        } else {
            "image/jpeg"
        }
    }
}

impl fmt::Debug for BackgroundImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackgroundImage")
            .field("original_name", &self.original_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    fn sized_file(dir: &Path, name: &str, len: u64) -> std::path::PathBuf {
        let path = dir.join(name);
        let file = File::create(&path).unwrap();
        file.set_len(len).unwrap();
        path
    }

    #[test]
    fn size_boundary_is_inclusive() {
        assert!(check_size(MAX_IMAGE_BYTES).is_ok());
        assert_eq!(MAX_IMAGE_BYTES, 31_457_280);
        assert_eq!(
            check_size(MAX_IMAGE_BYTES + 1),
            Err(ValidationError::ImageTooLarge {
                size: MAX_IMAGE_BYTES + 1
            })
        );
    }

    #[test]
    fn load_accepts_exactly_thirty_mebibytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = sized_file(dir.path(), "exact.JPG", MAX_IMAGE_BYTES);
        let image = BackgroundImage::load(&path).unwrap();
        assert_eq!(image.bytes.len() as u64, MAX_IMAGE_BYTES);
        assert_eq!(image.original_name, "exact.JPG");
    }

    #[test]
    fn load_rejects_one_byte_over() {
        let dir = tempfile::tempdir().unwrap();
        let path = sized_file(dir.path(), "big.png", MAX_IMAGE_BYTES + 1);
        assert!(matches!(
            BackgroundImage::load(&path),
            Err(ValidationError::ImageTooLarge { .. })
        ));
    }

    #[test]
    fn load_rejects_other_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = sized_file(dir.path(), "photo.gif", 10);
        assert_eq!(
            BackgroundImage::load(&path),
            Err(ValidationError::UnsupportedImageType)
        );
    }

    #[test]
    fn load_reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.jpeg");
        assert!(matches!(
            BackgroundImage::load(&missing),
            Err(ValidationError::ImageUnreadable { .. })
        ));
    }

    #[test]
    fn content_type_follows_signature() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.jpg");
        let mut file = File::create(&path).unwrap();
        file.write_all(&PNG_SIGNATURE).unwrap();
        file.write_all(b"rest").unwrap();
        drop(file);

        let png = BackgroundImage::load(&path).unwrap();
        assert_eq!(png.content_type(), "image/png");

        let jpeg = BackgroundImage {
            original_name: "a.jpg".into(),
            bytes: vec![0xff, 0xd8, 0xff],
        };
        assert_eq!(jpeg.content_type(), "image/jpeg");
    }
}
