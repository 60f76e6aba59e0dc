/// Header and hint printed around the paths of one kind of checkout conflict
#[derive(Debug)]
pub struct ConflictMessage {
    pub header: &'static str,
    pub footer: &'static str,
}

impl From<&ConflictType> for ConflictMessage {
    fn from(value: &ConflictType) -> Self {
        match value {
            ConflictType::StaleFile => Self {
                header: "Your local changes to the following files would be overwritten by checkout:",
                footer: "Please commit your changes before you switch branches.",
            },
            ConflictType::StaleDirectory => Self {
                header: "Updating the following directories would lose untracked files in them:",
                footer: "Please move or remove them before you switch branches.",
            },
            ConflictType::UntrackedOverwritten => Self {
                header: "The following untracked working tree files would be overwritten by checkout:",
                footer: "Please move or remove them before you switch branches.",
            },
            ConflictType::UntrackedRemoved => Self {
                header: "The following untracked working tree files would be removed by checkout:",
                footer: "Please move or remove them before you switch branches.",
            },
        }
    }
}

/// Ways a working tree migration could destroy uncommitted work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConflictType {
    /// A tracked file carries changes that are not in the current commit
    StaleFile,
    /// A directory holding untracked files sits where a file goes
    StaleDirectory,
    UntrackedOverwritten,
    UntrackedRemoved,
}

impl ConflictType {
    /// Classify a conflicting path by whether the index tracks it and
    /// whether the target tree keeps it
    pub fn get_conflict_type(tracked: bool, is_directory: bool, kept_in_target: bool) -> Self {
        if tracked {
            ConflictType::StaleFile
        } else if is_directory {
            ConflictType::StaleDirectory
        } else if kept_in_target {
            ConflictType::UntrackedOverwritten
        } else {
            ConflictType::UntrackedRemoved
        }
    }

    /// Render the report for one kind of conflict
    pub fn report<'p>(&self, paths: impl IntoIterator<Item = &'p String>) -> String {
        let ConflictMessage { header, footer } = self.into();
        let paths = paths
            .into_iter()
            .map(|path| format!("\t{path}"))
            .collect::<Vec<_>>()
            .join("\n");

        format!("error: {header}\n{paths}\n{footer}")
    }
}
