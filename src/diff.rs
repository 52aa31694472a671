//! Character-level diff between two strings.
//!
//! Implements the greedy shortest-edit-script search: for every edit length `d`
//! the furthest reaching path on each diagonal `k = new_pos - old_pos` is kept,
//! extended by one insertion or removal, and then followed through any run of
//! equal characters. The first path reaching the end of both inputs is minimal.

/// Kind of a diff component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Unchanged,
    Added,
    Removed,
}

/// One run of characters in the edit script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub value: String,
    /// Number of characters in `value`.
    pub count: usize,
    pub kind: ChangeKind,
}

impl Change {
    #[must_use]
    pub const fn is_added(&self) -> bool {
        matches!(self.kind, ChangeKind::Added)
    }

    #[must_use]
    pub const fn is_removed(&self) -> bool {
        matches!(self.kind, ChangeKind::Removed)
    }

    #[must_use]
    pub const fn is_unchanged(&self) -> bool {
        matches!(self.kind, ChangeKind::Unchanged)
    }
}

/// Component without a value, used while searching.
#[derive(Debug, Clone, Copy)]
struct Step {
    count: usize,
    kind: ChangeKind,
}

/// Furthest reaching path on one diagonal.
#[derive(Debug, Clone)]
struct Path {
    /// Index of the last consumed character in the new text, -1 before the start.
    new_pos: isize,
    steps: Vec<Step>,
}

impl Path {
    /// Record one inserted or removed character, merging with the previous step of the same kind.
    fn push(&mut self, kind: ChangeKind) {
        match self.steps.last_mut() {
            Some(last) if last.kind == kind => last.count += 1,
            _ => self.steps.push(Step { count: 1, kind }),
        }
    }

    /// Follow the diagonal through matching characters.
    /// Returns the resulting old text position.
    fn extend_common(&mut self, new: &[char], old: &[char], diagonal: isize) -> isize {
        let new_len = new.len() as isize;
        let old_len = old.len() as isize;
        let mut new_pos = self.new_pos;
        let mut old_pos = new_pos - diagonal;
        let mut common = 0;

        while new_pos + 1 < new_len && old_pos + 1 < old_len && new[(new_pos + 1) as usize] == old[(old_pos + 1) as usize]
        {
            new_pos += 1;
            old_pos += 1;
            common += 1;
        }

        if common > 0 {
            self.steps.push(Step {
                count: common,
                kind: ChangeKind::Unchanged,
            });
        }

        self.new_pos = new_pos;
        old_pos
    }
}

/// Compute the minimal character edit script turning `old` into `new`.
///
/// Concatenating the unchanged and removed values gives back `old`,
/// concatenating the unchanged and added values gives back `new`.
/// Removals are listed before additions at the same position.
///
/// ```rust
/// use episode_align::diff::{ChangeKind, diff_chars};
///
/// let changes = diff_chars("abc", "axc");
/// let kinds: Vec<ChangeKind> = changes.iter().map(|c| c.kind).collect();
/// assert_eq!(
///     kinds,
///     [ChangeKind::Unchanged, ChangeKind::Removed, ChangeKind::Added, ChangeKind::Unchanged]
/// );
/// ```
#[must_use]
pub fn diff_chars(old: &str, new: &str) -> Vec<Change> {
    let old: Vec<char> = old.chars().collect();
    let new: Vec<char> = new.chars().collect();
    let new_len = new.len() as isize;
    let old_len = old.len() as isize;
    let max_edit_length = new_len + old_len;

    let mut first = Path {
        new_pos: -1,
        steps: Vec::new(),
    };
    let old_pos = first.extend_common(&new, &old, 0);
    if first.new_pos + 1 >= new_len && old_pos + 1 >= old_len {
        return vec![Change {
            value: new.iter().collect(),
            count: new.len(),
            kind: ChangeKind::Unchanged,
        }];
    }

    // Dense storage indexed by `diagonal + offset`, one slot of padding on each side.
    let offset = max_edit_length + 1;
    let mut best_paths: Vec<Option<Path>> = vec![None; (2 * offset + 1) as usize];
    best_paths[offset as usize] = Some(first);

    for edit_length in 1..=max_edit_length {
        let mut diagonal = -edit_length;
        while diagonal <= edit_length {
            let slot = (diagonal + offset) as usize;
            // Path on diagonal k - 1 can add, path on k + 1 can remove.
            let add_path = best_paths[slot - 1].take();
            let remove_path = best_paths[slot + 1].as_ref();
            let old_pos = remove_path.map_or(0, |path| path.new_pos) - diagonal;

            let can_add = add_path.as_ref().is_some_and(|path| path.new_pos + 1 < new_len);
            let can_remove = remove_path.is_some() && 0 <= old_pos && old_pos < old_len;

            if !can_add && !can_remove {
                best_paths[slot] = None;
                diagonal += 2;
                continue;
            }

            let prefer_remove = match (&add_path, remove_path) {
                (Some(add), Some(remove)) => !can_add || (can_remove && add.new_pos < remove.new_pos),
                _ => !can_add,
            };

            let mut base_path = if prefer_remove {
                let mut path = remove_path.cloned().unwrap_or(Path {
                    new_pos: -1,
                    steps: Vec::new(),
                });
                path.push(ChangeKind::Removed);
                path
            } else {
                let mut path = add_path.unwrap_or(Path {
                    new_pos: -1,
                    steps: Vec::new(),
                });
                path.new_pos += 1;
                path.push(ChangeKind::Added);
                path
            };

            let old_pos = base_path.extend_common(&new, &old, diagonal);
            if base_path.new_pos + 1 >= new_len && old_pos + 1 >= old_len {
                return build_values(&base_path.steps, &new, &old);
            }
            best_paths[slot] = Some(base_path);
            diagonal += 2;
        }
    }

    // Unreachable: an edit script of length `old_len + new_len` always exists.
    build_values(&[], &new, &old)
}

/// Fill in the component values from the source texts.
fn build_values(steps: &[Step], new: &[char], old: &[char]) -> Vec<Change> {
    let mut changes: Vec<Change> = Vec::with_capacity(steps.len());
    let mut new_pos = 0;
    let mut old_pos = 0;

    for step in steps {
        match step.kind {
            ChangeKind::Removed => {
                let value: String = old[old_pos..old_pos + step.count].iter().collect();
                old_pos += step.count;
                changes.push(Change {
                    value,
                    count: step.count,
                    kind: step.kind,
                });
                // Removals go before additions.
                let len = changes.len();
                if len > 1 && changes[len - 2].is_added() {
                    changes.swap(len - 2, len - 1);
                }
            }
            ChangeKind::Added | ChangeKind::Unchanged => {
                let value: String = new[new_pos..new_pos + step.count].iter().collect();
                new_pos += step.count;
                if step.kind == ChangeKind::Unchanged {
                    old_pos += step.count;
                }
                changes.push(Change {
                    value,
                    count: step.count,
                    kind: step.kind,
                });
            }
        }
    }

    // Drop an empty trailing insertion or removal.
    if changes.len() > 1 && changes.last().is_some_and(|last| !last.is_unchanged() && last.value.is_empty()) {
        changes.pop();
    }

    changes
}
