use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::foundation::error::{ShelfError, ShelfResult};

/// Suffix appended before the extension when a filename carries no version token.
pub const DEFAULT_VERSION_SUFFIX: &str = "_v001";

static VERSION_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)v([0-9]+)").expect("static version token pattern"));

/// A located `v<digits>` token inside a filename.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VersionToken {
    /// Byte range of the whole token (marker included).
    pub span: std::ops::Range<usize>,
    /// Digits as written, zero padding included.
    pub digits: String,
}

impl VersionToken {
    /// Zero-padding width.
    pub fn width(&self) -> usize {
        self.digits.len()
    }

    /// Numeric value; `None` past `u64::MAX`.
    pub fn number(&self) -> Option<u64> {
        self.digits.parse().ok()
    }

    /// The following version as a token. The marker is always written lowercase.
    ///
    /// The increment is carried out on the decimal digits, so digit runs of any length
    /// version up like short ones.
    pub fn next(&self) -> String {
        format!("v{}", increment_digits(&self.digits))
    }
}

/// Add one to a run of ASCII digits, keeping its width unless every digit carries.
fn increment_digits(digits: &str) -> String {
    let mut out: Vec<u8> = digits.bytes().collect();
    for d in out.iter_mut().rev() {
        if *d == b'9' {
            *d = b'0';
        } else {
            *d += 1;
            return out.into_iter().map(char::from).collect();
        }
    }
    std::iter::once('1')
        .chain(out.into_iter().map(char::from))
        .collect()
}

/// Find the first `v<digits>` token, case-insensitively.
pub fn find_version(filename: &str) -> Option<VersionToken> {
    let caps = VERSION_TOKEN.captures(filename)?;
    Some(VersionToken {
        span: caps.get(0)?.range(),
        digits: caps.get(1)?.as_str().to_string(),
    })
}

/// Increment the first version token of a filename.
///
/// The padding width is preserved and only grows when the digit count overflows
/// (`v09` becomes `v10`, `v99` becomes `v100`), and the marker comes out lowercase
/// (`Shot_V003` becomes `Shot_v004`). Without a token, [`DEFAULT_VERSION_SUFFIX`] is inserted
/// before the extension.
pub fn increment(filename: &str) -> String {
    match find_version(filename) {
        Some(tok) => {
            let mut out = String::with_capacity(filename.len() + 1);
            out.push_str(&filename[..tok.span.start]);
            out.push_str(&tok.next());
            out.push_str(&filename[tok.span.end..]);
            out
        }
        None => {
            let (stem, ext) = split_extension(filename);
            format!("{stem}{DEFAULT_VERSION_SUFFIX}{ext}")
        }
    }
}

/// Split `name.ext` into (`name`, `.ext`); dotfiles and extensionless names keep everything in
/// the stem.
fn split_extension(filename: &str) -> (&str, &str) {
    match filename.rfind('.') {
        Some(idx) if idx > 0 => filename.split_at(idx),
        _ => (filename, ""),
    }
}

/// Next version of a full path; only the file name participates.
pub fn version_up_path(path: &Path) -> ShelfResult<PathBuf> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            ShelfError::validation(format!(
                "path '{}' has no UTF-8 file name to version",
                path.display()
            ))
        })?;
    Ok(path.with_file_name(increment(name)))
}

#[cfg(test)]
#[path = "../../tests/unit/naming/version.rs"]
mod tests;
