//! Validation of user-supplied names that end up on the file system.

use crate::errors::BananascapeError;
use regex::Regex;
use std::sync::OnceLock;

const MAX_SUBJECT_LEN: usize = 100;

/// Common file-name limit, in bytes.
const MAX_FILE_NAME_BYTES: usize = 255;

/// Longest suffix a stage image adds to the subject: `_5.png`.
const STAGE_SUFFIX_BYTES: usize = "_5.png".len();

fn forbidden_chars() -> Result<&'static Regex, BananascapeError> {
    static FORBIDDEN: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    FORBIDDEN
        .get_or_init(|| Regex::new(r"[/\\\x00-\x1f\x7f]"))
        .as_ref()
        .map_err(|e| BananascapeError::Internal(format!("subject pattern: {e}")))
}

/// Validates a subject name and returns it unchanged.
///
/// The subject becomes a directory under the assets root and part of each
/// stage file name, so it must be a single, non-reserved path component whose
/// longest file name (`<subject>_5.png`) fits in 255 bytes. Surrounding
/// whitespace is rejected rather than trimmed so the files keep the exact name
/// the caller polls for.
pub fn validate_subject(subject: &str) -> Result<&str, BananascapeError> {
    let reject = |reason: &str| BananascapeError::InvalidSubject {
        subject: subject.to_string(),
        reason: reason.to_string(),
    };

    if subject.trim().is_empty() {
        return Err(reject("subject must not be blank"));
    }
    if subject.trim() != subject {
        return Err(reject("subject must not start or end with whitespace"));
    }
    if subject == "." || subject == ".." {
        return Err(reject("subject must not be a relative path marker"));
    }
    if subject.chars().count() > MAX_SUBJECT_LEN {
        return Err(reject("subject is too long"));
    }
    if subject.len() + STAGE_SUFFIX_BYTES > MAX_FILE_NAME_BYTES {
        return Err(reject("subject is too long for a file name"));
    }
    if forbidden_chars()?.is_match(subject) {
        return Err(reject("subject must not contain path separators or control characters"));
    }
    Ok(subject)
}
