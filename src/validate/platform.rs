//! Per-platform path rules

/// Device names Windows reserves regardless of extension.
const WINDOWS_RESERVED: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

const WINDOWS_FORBIDDEN: &str = "<>:\"|?*";

const WINDOWS_MAX_PATH: usize = 260;
const UNIX_MAX_PATH: usize = 4096;

/// Path-safety rules for a target platform.
///
/// The validator takes a profile instead of inspecting the running OS, so
/// every profile can be exercised from any host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformProfile {
    pub name: &'static str,
    /// Base names (extension stripped, compared upper-cased) that are rejected.
    pub reserved_names: &'static [&'static str],
    pub forbidden_chars: &'static str,
    /// Reject names ending in `.` or a space.
    pub reject_trailing_dot_or_space: bool,
    /// Maximum length of a node's full path, in bytes.
    pub max_path_len: usize,
    /// Compare paths case-insensitively when looking for duplicates.
    pub case_insensitive: bool,
}

impl PlatformProfile {
    pub fn windows() -> Self {
        Self {
            name: "windows",
            reserved_names: WINDOWS_RESERVED,
            forbidden_chars: WINDOWS_FORBIDDEN,
            reject_trailing_dot_or_space: true,
            max_path_len: WINDOWS_MAX_PATH,
            case_insensitive: true,
        }
    }

    pub fn unix() -> Self {
        Self {
            name: "unix",
            reserved_names: &[],
            forbidden_chars: "",
            reject_trailing_dot_or_space: false,
            max_path_len: UNIX_MAX_PATH,
            case_insensitive: false,
        }
    }

    /// The profile matching the platform this binary was built for.
    pub fn native() -> Self {
        if cfg!(windows) {
            Self::windows()
        } else {
            Self::unix()
        }
    }

    /// Look a profile up by name (`windows`, `unix`, `native`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "windows" => Some(Self::windows()),
            "unix" | "linux" | "macos" => Some(Self::unix()),
            "native" => Some(Self::native()),
            _ => None,
        }
    }

    /// True if `name` is a reserved device name once its extension is removed.
    pub fn is_reserved(&self, name: &str) -> bool {
        if self.reserved_names.is_empty() {
            return false;
        }
        let stem = match name.rfind('.') {
            Some(idx) => &name[..idx],
            None => name,
        };
        let stem = stem.to_uppercase();
        self.reserved_names.iter().any(|r| *r == stem)
    }

    /// The first forbidden character in `name`, if any.
    pub fn forbidden_char(&self, name: &str) -> Option<char> {
        name.chars().find(|c| self.forbidden_chars.contains(*c))
    }

    /// Key used for duplicate detection.
    pub fn path_key(&self, path: &str) -> String {
        if self.case_insensitive {
            path.to_lowercase()
        } else {
            path.to_string()
        }
    }
}

impl Default for PlatformProfile {
    fn default() -> Self {
        Self::native()
    }
}
