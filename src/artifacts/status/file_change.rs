use colored::{ColoredString, Colorize};

/// Indent of the entries listed under a status section
const LABEL_WIDTH: usize = 8;

/// How the working tree differs from the index for one path
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum WorkspaceChangeType {
    #[default]
    None,
    Modified,
    Deleted,
}

impl From<&WorkspaceChangeType> for &str {
    fn from(change: &WorkspaceChangeType) -> Self {
        match change {
            WorkspaceChangeType::None => " ",
            WorkspaceChangeType::Modified => "M",
            WorkspaceChangeType::Deleted => "D",
        }
    }
}

/// How the index differs from the HEAD tree for one path
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum IndexChangeType {
    #[default]
    None,
    Added,
    Modified,
    Deleted,
}

impl From<&IndexChangeType> for &str {
    fn from(change: &IndexChangeType) -> Self {
        match change {
            IndexChangeType::None => " ",
            IndexChangeType::Added => "A",
            IndexChangeType::Modified => "M",
            IndexChangeType::Deleted => "D",
        }
    }
}

/// A change as listed in the long status format
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FileChangeType {
    /// Staged, shown in green
    Index(IndexChangeType),
    /// Not staged, shown in red
    Workspace(WorkspaceChangeType),
    Untracked,
}

impl FileChangeType {
    fn label(&self) -> &'static str {
        match self {
            FileChangeType::Index(IndexChangeType::Added) => "new file:   ",
            FileChangeType::Index(IndexChangeType::Modified)
            | FileChangeType::Workspace(WorkspaceChangeType::Modified) => "modified:   ",
            FileChangeType::Index(IndexChangeType::Deleted)
            | FileChangeType::Workspace(WorkspaceChangeType::Deleted) => "deleted:    ",
            FileChangeType::Index(IndexChangeType::None)
            | FileChangeType::Workspace(WorkspaceChangeType::None)
            | FileChangeType::Untracked => "",
        }
    }

    /// Status line for `path`, colored by section
    pub fn format_line(&self, path: &str) -> String {
        let line: ColoredString = match self {
            FileChangeType::Index(_) => format!("{}{path}", self.label()).green(),
            FileChangeType::Workspace(_) | FileChangeType::Untracked => {
                format!("{}{path}", self.label()).red()
            }
        };

        format!("{:>width$}{line}", "", width = LABEL_WIDTH)
    }
}

/// Both sides of a path's change, as shown by the short status format
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct FileChange {
    pub(crate) index_change: IndexChangeType,
    pub(crate) workspace_change: WorkspaceChangeType,
}

impl FileChange {
    pub fn index_change(&self) -> IndexChangeType {
        self.index_change
    }

    pub fn workspace_change(&self) -> WorkspaceChangeType {
        self.workspace_change
    }
}

impl From<&FileChange> for String {
    fn from(change: &FileChange) -> Self {
        let index_str: &str = (&change.index_change).into();
        let workspace_str: &str = (&change.workspace_change).into();
        format!("{index_str}{workspace_str}")
    }
}

impl std::fmt::Display for FileChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let change_str: String = self.into();
        write!(f, "{change_str}")
    }
}
