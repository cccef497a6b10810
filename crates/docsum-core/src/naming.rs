//! Artifact naming and name validation.
//!
//! Artifacts are named after the second they were created:
//! `riassunto_YYYYMMDD_HHMMSS.txt`. When that name is already taken, a
//! two-digit suffix is added (`riassunto_YYYYMMDD_HHMMSS_01.txt`, ...).
//! Because `.` sorts before `_`, plain byte order of names still follows
//! creation order.

use chrono::NaiveDateTime;

pub const ARTIFACT_PREFIX: &str = "riassunto_";
pub const ARTIFACT_EXTENSION: &str = ".txt";
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Highest collision suffix tried within a single second.
pub const MAX_COLLISION_SUFFIX: u32 = 99;

/// Length of a formatted [`TIMESTAMP_FORMAT`] value.
const TIMESTAMP_LEN: usize = 15;

/// Builds the artifact name for `ts`.
///
/// `attempt == 0` yields the plain timestamp name; higher attempts append
/// `_NN`.
///
/// ```rust
/// use chrono::NaiveDate;
/// use docsum_core::naming::artifact_name;
///
/// let ts = NaiveDate::from_ymd_opt(2024, 3, 9)
///     .unwrap()
///     .and_hms_opt(14, 5, 7)
///     .unwrap();
/// assert_eq!(artifact_name(ts, 0), "riassunto_20240309_140507.txt");
/// assert_eq!(artifact_name(ts, 2), "riassunto_20240309_140507_02.txt");
/// ```
pub fn artifact_name(ts: NaiveDateTime, attempt: u32) -> String {
    let stamp = ts.format(TIMESTAMP_FORMAT);
    if attempt == 0 {
        format!("{}{}{}", ARTIFACT_PREFIX, stamp, ARTIFACT_EXTENSION)
    } else {
        format!(
            "{}{}_{:02}{}",
            ARTIFACT_PREFIX, stamp, attempt, ARTIFACT_EXTENSION
        )
    }
}

/// Iterates every candidate name for `ts`, plain name first.
pub fn candidate_names(ts: NaiveDateTime) -> impl Iterator<Item = String> {
    (0..=MAX_COLLISION_SUFFIX).map(move |attempt| artifact_name(ts, attempt))
}

/// Why a requested name was refused before touching storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsafeName {
    Empty,
    PathSeparator,
    ParentReference,
    NulByte,
    Hidden,
}

impl UnsafeName {
    pub fn reason(&self) -> &'static str {
        match self {
            UnsafeName::Empty => "name is empty",
            UnsafeName::PathSeparator => "name contains a path separator",
            UnsafeName::ParentReference => "name contains a parent-directory reference",
            UnsafeName::NulByte => "name contains a NUL byte",
            UnsafeName::Hidden => "name starts with a dot",
        }
    }
}

/// Rejects names that could escape or probe the output namespace.
pub fn check_safe_name(name: &str) -> Result<(), UnsafeName> {
    if name.is_empty() {
        return Err(UnsafeName::Empty);
    }
    if name.contains('/') || name.contains('\\') {
        return Err(UnsafeName::PathSeparator);
    }
    if name.contains("..") {
        return Err(UnsafeName::ParentReference);
    }
    if name.contains('\0') {
        return Err(UnsafeName::NulByte);
    }
    if name.starts_with('.') {
        return Err(UnsafeName::Hidden);
    }
    Ok(())
}

/// Parses the creation timestamp out of a generated artifact name.
///
/// Returns `None` for anything that is not shaped like a name produced by
/// [`artifact_name`].
pub fn parse_artifact_name(name: &str) -> Option<NaiveDateTime> {
    let stem = name
        .strip_prefix(ARTIFACT_PREFIX)?
        .strip_suffix(ARTIFACT_EXTENSION)?;
    if stem.len() < TIMESTAMP_LEN || !stem.is_char_boundary(TIMESTAMP_LEN) {
        return None;
    }
    let (stamp, suffix) = stem.split_at(TIMESTAMP_LEN);

    if !suffix.is_empty() {
        let digits = suffix.strip_prefix('_')?;
        if digits.len() != 2 || !digits.bytes().all(|b| b.is_ascii_digit()) || digits == "00" {
            return None;
        }
    }

    NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).ok()
}

pub fn is_artifact_name(name: &str) -> bool {
    parse_artifact_name(name).is_some()
}
