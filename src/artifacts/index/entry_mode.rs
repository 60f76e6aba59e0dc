//! Tree entry modes
//!
//! Only two modes exist: regular files and subdirectories. Executable and
//! symlink bits are not tracked.

/// Mode of a tree entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub enum EntryMode {
    /// Regular file (100644)
    #[default]
    Regular,
    /// Subdirectory, another tree object (040000)
    Directory,
}

impl EntryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryMode::Regular => "100644",
            EntryMode::Directory => "040000",
        }
    }

    pub fn is_tree(&self) -> bool {
        matches!(self, EntryMode::Directory)
    }

    /// Parse the ASCII octal mode of a tree entry
    ///
    /// Executable files are read back as regular files, and the unpadded
    /// `40000` spelling used by git is accepted for directories.
    pub fn from_octal_str(mode: &str) -> anyhow::Result<Self> {
        match mode {
            "100644" | "100755" => Ok(EntryMode::Regular),
            "040000" | "40000" => Ok(EntryMode::Directory),
            _ => anyhow::bail!("unsupported entry mode: {mode}"),
        }
    }
}

impl std::fmt::Display for EntryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
