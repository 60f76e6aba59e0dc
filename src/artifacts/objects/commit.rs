//! Commit object
//!
//! Commits represent snapshots of the repository at specific points in time.
//! They contain:
//! - A tree object ID (directory snapshot)
//! - Parent commit ID(s): none for the first commit, two for merges
//! - Author and committer information
//! - Commit message
//!
//! ## Format
//!
//! ```text
//! tree <tree-sha>
//! parent <parent-sha>
//! author <name> <email> <timestamp> <timezone>
//! committer <name> <email> <timestamp> <timezone>
//!
//! <commit message>
//! ```
//!
//! Parsing is lenient: only the `tree` line is mandatory, and an identity line
//! that does not match `Name <email> <seconds> ±HHMM` is kept as a bare name.

use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset};
use regex::Regex;
use std::io::BufRead;
use std::sync::LazyLock;

pub const DEFAULT_AUTHOR_NAME: &str = "mygit";
pub const DEFAULT_AUTHOR_EMAIL: &str = "mygit@localhost";

static IDENTITY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+) <(.+)> (\d+) ([+-]\d{4})$").expect("identity regex is valid")
});

/// Author or committer information
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Author {
    name: String,
    email: String,
    /// `None` when the identity line of a stored commit could not be parsed
    timestamp: Option<DateTime<FixedOffset>>,
}

impl Author {
    /// Create a new author with the current timestamp
    pub fn new(name: String, email: String) -> Self {
        Author {
            name,
            email,
            timestamp: Some(chrono::Local::now().fixed_offset()),
        }
    }

    pub fn new_with_timestamp(name: String, email: String, timestamp: DateTime<FixedOffset>) -> Self {
        Author {
            name,
            email,
            timestamp: Some(timestamp),
        }
    }

    /// Load author information from environment variables
    ///
    /// Reads GIT_AUTHOR_NAME, GIT_AUTHOR_EMAIL and GIT_AUTHOR_DATE. Missing
    /// name or email fall back to a fixed local identity, a missing or
    /// unparsable date to the current time.
    pub fn load_from_env() -> Self {
        let name = std::env::var("GIT_AUTHOR_NAME")
            .ok()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_AUTHOR_NAME.to_string());
        let email = std::env::var("GIT_AUTHOR_EMAIL")
            .ok()
            .filter(|email| !email.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_AUTHOR_EMAIL.to_string());
        let timestamp = std::env::var("GIT_AUTHOR_DATE").ok().and_then(|date_str| {
            DateTime::parse_from_rfc2822(&date_str)
                .or_else(|_| DateTime::parse_from_str(&date_str, "%Y-%m-%d %H:%M:%S %z"))
                .ok()
        });

        match timestamp {
            Some(ts) => Author::new_with_timestamp(name, email, ts),
            None => Author::new(name, email),
        }
    }

    /// Parse an identity line, never failing
    ///
    /// A line that is not `Name <email> <seconds> ±HHMM` becomes an author
    /// whose name is the whole line, with an empty email and no timestamp.
    pub fn parse(line: &str) -> Self {
        let parsed = IDENTITY_REGEX.captures(line).and_then(|captures| {
            let seconds = captures[3].parse::<i64>().ok()?;
            let offset = parse_offset(&captures[4])?;
            let timestamp = DateTime::from_timestamp(seconds, 0)?.with_timezone(&offset);

            Some(Author::new_with_timestamp(
                captures[1].to_string(),
                captures[2].to_string(),
                timestamp,
            ))
        });

        parsed.unwrap_or_else(|| {
            tracing::debug!(line, "unparsable identity line");
            Author {
                name: line.to_string(),
                email: String::new(),
                timestamp: None,
            }
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Format author name and email for display
    ///
    /// # Returns
    ///
    /// String in format "Name <email@example.com>"
    pub fn display_name(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }

    /// Format complete author info including timestamp
    ///
    /// # Returns
    ///
    /// String in format "Name <email> timestamp timezone"
    pub fn display(&self) -> String {
        match self.timestamp {
            Some(timestamp) => format!(
                "{} <{}> {} {}",
                self.name,
                self.email,
                timestamp.timestamp(),
                timestamp.format("%z")
            ),
            None => self.name.clone(),
        }
    }

    /// Format timestamp in human-readable form
    ///
    /// # Returns
    ///
    /// String like "Mon Jan 1 12:34:56 2024 +0000", or "unknown date"
    pub fn readable_timestamp(&self) -> String {
        match self.timestamp {
            Some(timestamp) => timestamp.format("%a %b %-d %H:%M:%S %Y %z").to_string(),
            None => "unknown date".to_string(),
        }
    }

    pub fn timestamp(&self) -> Option<DateTime<FixedOffset>> {
        self.timestamp
    }
}

fn parse_offset(offset: &str) -> Option<FixedOffset> {
    let (sign, digits) = offset.split_at(1);
    let hours = digits[..2].parse::<i32>().ok()?;
    let minutes = digits[2..].parse::<i32>().ok()?;
    let seconds = (hours * 3600 + minutes * 60) * if sign == "-" { -1 } else { 1 };

    FixedOffset::east_opt(seconds)
}

/// Commit object
///
/// Parent order matters: the first parent is the branch that was checked out,
/// the second one (merge commits only) is the branch that was merged in.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    parents: Vec<ObjectId>,
    tree_oid: ObjectId,
    author: Author,
    committer: Author,
    message: String,
}

impl Commit {
    /// Create a new commit, using `author` as the committer too
    pub fn new(parents: Vec<ObjectId>, tree_oid: ObjectId, author: Author, message: String) -> Self {
        Commit {
            parents,
            tree_oid,
            author: author.clone(),
            committer: author,
            message,
        }
    }

    /// First line of the commit message
    pub fn short_message(&self) -> String {
        self.message.lines().next().unwrap_or("").to_string()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn committer(&self) -> &Author {
        &self.committer
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut content = format!("tree {}\n", self.tree_oid);
        for parent in &self.parents {
            content.push_str(&format!("parent {parent}\n"));
        }
        content.push_str(&format!("author {}\n", self.author.display()));
        content.push_str(&format!("committer {}\n", self.committer.display()));
        content.push('\n');
        content.push_str(&self.message);
        content.push('\n');

        Ok(Bytes::from(content))
    }
}

impl Unpackable for Commit {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let mut reader = reader;
        let mut content = Vec::new();
        reader.read_to_end(&mut content)?;
        let content = String::from_utf8_lossy(&content);

        let mut tree_oid = None;
        let mut parents = Vec::new();
        let mut author = None;
        let mut committer = None;
        let mut message_lines = Vec::new();
        let mut in_message = false;

        for line in content.lines() {
            if in_message {
                message_lines.push(line);
            } else if line.is_empty() {
                in_message = true;
            } else if let Some(oid) = line.strip_prefix("tree ") {
                tree_oid = Some(ObjectId::try_parse(oid.to_string())?);
            } else if let Some(oid) = line.strip_prefix("parent ") {
                parents.push(ObjectId::try_parse(oid.to_string())?);
            } else if let Some(identity) = line.strip_prefix("author ") {
                author = Some(Author::parse(identity));
            } else if let Some(identity) = line.strip_prefix("committer ") {
                committer = Some(Author::parse(identity));
            }
        }

        let tree_oid = tree_oid.context("Invalid commit object: missing tree line")?;
        let author = author.unwrap_or_else(|| Author::parse(""));
        let committer = committer.unwrap_or_else(|| author.clone());

        Ok(Commit {
            parents,
            tree_oid,
            author,
            committer,
            message: message_lines.join("\n").trim().to_string(),
        })
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }
}
