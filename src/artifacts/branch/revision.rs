use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::{ANCESTOR_REGEX, HEAD, PARENT_REGEX};
use crate::artifacts::core::error::RepositoryError;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use regex::Regex;
use std::sync::LazyLock;

static PARENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PARENT_REGEX).expect("parent regex is valid"));
static ANCESTOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(ANCESTOR_REGEX).expect("ancestor regex is valid"));

/// Minimum length of an abbreviated object ID
const MIN_OID_PREFIX: usize = 4;

/// A commit named on the command line
///
/// Supports:
/// - `HEAD` (and its alias `@`)
/// - Branch names: `main`, `feature/x`
/// - Full or abbreviated (4+ hex characters) object IDs
/// - Parent notation: `<revision>^`
/// - Ancestor notation: `<revision>~<n>`
///
/// A name that is both a branch and a hex prefix resolves to the branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Revision {
    Head,
    /// A branch name or an object ID prefix, decided during resolution
    Ref(String),
    Parent(Box<Revision>),
    Ancestor(Box<Revision>, usize),
}

impl Revision {
    pub fn try_parse(revision: &str) -> anyhow::Result<Revision> {
        if let Some(caps) = PARENT.captures(revision) {
            let base_revision = Self::try_parse(&caps[1])?;

            Ok(Revision::Parent(Box::new(base_revision)))
        } else if let Some(caps) = ANCESTOR.captures(revision) {
            let generations = caps[2].parse::<usize>().map_err(|_| invalid(revision))?;
            let base_revision = Self::try_parse(&caps[1])?;

            Ok(Revision::Ancestor(Box::new(base_revision), generations))
        } else if revision == HEAD || revision == "@" {
            Ok(Revision::Head)
        } else if BranchName::try_parse(revision.to_string()).is_ok() {
            Ok(Revision::Ref(revision.to_string()))
        } else {
            Err(invalid(revision))
        }
    }

    /// Resolve to a commit ID
    ///
    /// Fails with `InvalidReference` when the name matches no branch with
    /// commits and no commit object.
    pub fn resolve(&self, repository: &Repository) -> anyhow::Result<ObjectId> {
        match self {
            Revision::Head => repository
                .refs()
                .read_head()?
                .ok_or_else(|| invalid(HEAD)),
            Revision::Ref(name) => {
                let branch_name = BranchName::try_parse(name.clone())?;

                if repository.refs().branch_exists(&branch_name) {
                    repository
                        .refs()
                        .read_branch(&branch_name)?
                        .ok_or_else(|| invalid(name))
                } else if Self::looks_like_oid(name) {
                    Self::resolve_oid(name, repository)
                } else {
                    Err(invalid(name))
                }
            }
            Revision::Parent(base_revision) => {
                Self::resolve_commit_parent(base_revision.resolve(repository)?, repository)
            }
            Revision::Ancestor(base_revision, generations) => {
                let mut oid = base_revision.resolve(repository)?;
                for _ in 0..*generations {
                    oid = Self::resolve_commit_parent(oid, repository)?;
                }

                Ok(oid)
            }
        }
    }

    fn resolve_commit_parent(oid: ObjectId, repository: &Repository) -> anyhow::Result<ObjectId> {
        let commit = repository.database().load_commit(&oid)?;

        commit
            .parent()
            .cloned()
            .ok_or_else(|| invalid(&format!("{}^", oid.to_short_oid())))
    }

    fn resolve_oid(oid_prefix: &str, repository: &Repository) -> anyhow::Result<ObjectId> {
        let commit_matches = repository
            .database()
            .find_objects_by_prefix(oid_prefix)?
            .into_iter()
            .filter(|oid| {
                repository
                    .database()
                    .get_object_type(oid)
                    .map(|object_type| object_type == ObjectType::Commit)
                    .unwrap_or(false)
            })
            .collect::<Vec<_>>();

        match commit_matches.as_slice() {
            [] => Err(invalid(oid_prefix)),
            [oid] => Ok(oid.clone()),
            candidates => {
                let mut error_msg =
                    format!("short SHA1 {oid_prefix} is ambiguous\nhint: The candidates are:");
                for oid in candidates {
                    error_msg.push_str(&format!("\nhint:   {} commit", oid.to_short_oid()));
                }
                anyhow::bail!(error_msg)
            }
        }
    }

    fn looks_like_oid(s: &str) -> bool {
        (MIN_OID_PREFIX..=OBJECT_ID_LENGTH).contains(&s.len())
            && s.chars().all(|c| c.is_ascii_hexdigit())
    }
}

fn invalid(name: &str) -> anyhow::Error {
    RepositoryError::InvalidReference {
        name: name.to_string(),
    }
    .into()
}
