//! Streaming SHA-512 content digests.
//!
//! Two files are considered identical iff their sizes and whole-file digests
//! both match; no byte-by-byte comparison is performed afterwards. SHA-512
//! keeps the collision probability negligible for any practical file
//! population.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha2::{Digest as _, Sha512};

use super::HashError;

/// Whole-file SHA-512 digest (64 bytes).
pub type Digest = [u8; 64];

/// Read buffer size for streaming digests.
const BUFFER_SIZE: usize = 64 * 1024;

/// Compute the SHA-512 digest of a file's content.
///
/// Reads the file in [`BUFFER_SIZE`] chunks so memory use stays constant
/// regardless of file size.
///
/// # Errors
///
/// Returns [`HashError::Io`] if the file cannot be opened or read.
pub fn digest_file(path: &Path) -> Result<Digest, HashError> {
    let mut file = File::open(path).map_err(|source| HashError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut hasher = Sha512::new();
    let mut buffer = vec![0u8; BUFFER_SIZE];

    loop {
        let read = file.read(&mut buffer).map_err(|source| HashError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    let mut digest = [0u8; 64];
    digest.copy_from_slice(&hasher.finalize());
    Ok(digest)
}

/// Render a digest as a lowercase hexadecimal string.
#[must_use]
pub fn digest_to_hex(digest: &Digest) -> String {
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_file_with(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_digest_known_vector() {
        // sha512("hello")
        let file = temp_file_with(b"hello");
        let digest = digest_file(file.path()).unwrap();
        assert_eq!(
            digest_to_hex(&digest),
            "9b71d224bd62f3785d96d46ad3ea3d73319bfbc2890caadae2dff72519673ca7\
             2323c3d99ba5c11d7c7acc6e14b8c5da0c4663475c2e5c3adef46f73bcdec043"
        );
    }

    #[test]
    fn test_equal_content_equal_digest() {
        let a = temp_file_with(b"same bytes");
        let b = temp_file_with(b"same bytes");
        assert_eq!(digest_file(a.path()).unwrap(), digest_file(b.path()).unwrap());
    }

    #[test]
    fn test_different_content_different_digest() {
        let a = temp_file_with(b"same length A");
        let b = temp_file_with(b"same length B");
        assert_ne!(digest_file(a.path()).unwrap(), digest_file(b.path()).unwrap());
    }

    #[test]
    fn test_digest_spans_buffer_boundary() {
        let big = vec![0xabu8; BUFFER_SIZE + 17];
        let a = temp_file_with(&big);
        let b = temp_file_with(&big);
        assert_eq!(digest_file(a.path()).unwrap(), digest_file(b.path()).unwrap());
    }

    #[test]
    fn test_digest_missing_file() {
        let err = digest_file(Path::new("/no/such/file")).unwrap_err();
        assert!(matches!(err, HashError::Io { .. }));
    }

    #[test]
    fn test_hex_length() {
        let file = temp_file_with(b"x");
        let digest = digest_file(file.path()).unwrap();
        assert_eq!(digest_to_hex(&digest).len(), 128);
    }
}
