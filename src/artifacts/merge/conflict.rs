//! Conflict markers and merge messages

pub const OURS_MARKER: &str = "<<<<<<< HEAD";
pub const SEPARATOR_MARKER: &str = "=======";
pub const THEIRS_MARKER: &str = ">>>>>>> incoming";

/// Render a file holding both sides of a conflict between markers
///
/// A missing side renders as empty content. Each non-empty side is closed
/// with a newline so the markers always start a line.
pub fn render_conflict_markers(ours: &str, theirs: &str) -> String {
    let mut rendered = String::with_capacity(ours.len() + theirs.len() + 48);

    rendered.push_str(OURS_MARKER);
    rendered.push('\n');
    push_side(&mut rendered, ours);
    rendered.push_str(SEPARATOR_MARKER);
    rendered.push('\n');
    push_side(&mut rendered, theirs);
    rendered.push_str(THEIRS_MARKER);
    rendered.push('\n');

    rendered
}

fn push_side(rendered: &mut String, side: &str) {
    rendered.push_str(side);
    if !side.is_empty() && !side.ends_with('\n') {
        rendered.push('\n');
    }
}

/// Subject line of a merge commit
pub fn merge_subject(incoming_branch: &str, current_branch: &str) -> String {
    format!("Merge branch '{incoming_branch}' into {current_branch}")
}

/// Message saved for the commit that concludes a conflicted merge
pub fn conflicted_merge_message<'p>(
    incoming_branch: &str,
    current_branch: &str,
    conflicted_paths: impl IntoIterator<Item = &'p String>,
) -> String {
    let mut message = merge_subject(incoming_branch, current_branch);
    message.push_str("\n\nConflicts:\n");
    for path in conflicted_paths {
        message.push_str(&format!("\t{path}\n"));
    }

    message
}
