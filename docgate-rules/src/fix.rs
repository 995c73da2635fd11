//! Application of fix descriptors to text.

use crate::document::{line_ending, split_lines};
use crate::finding::{Deletion, FixInfo, LintFinding};

/// Apply the fixes carried by `findings` to `text` in a single pass.
///
/// Edits are applied bottom-up and right-to-left so earlier columns stay
/// valid. Identical edits are applied once, and an edit that overlaps one
/// already applied on the same line is skipped. The first line ending found
/// in `text` is used for the output, including for `\n` in inserted text.
#[must_use]
pub fn apply_fixes<'a>(text: &str, findings: impl IntoIterator<Item = &'a LintFinding>) -> String {
    let fixes: Vec<&FixInfo> = findings
        .into_iter()
        .filter_map(|finding| finding.fix_info.as_ref())
        .collect();
    apply_fix_infos(text, fixes)
}

fn apply_fix_infos(text: &str, mut fixes: Vec<&FixInfo>) -> String {
    let ending = line_ending(text);
    let mut lines: Vec<Option<String>> = split_lines(text)
        .into_iter()
        .map(|line| Some(line.to_owned()))
        .collect();

    // Line descending; on the same line, partial edits before line deletion,
    // then column descending, then longer inserts first.
    fixes.sort_by(|a, b| {
        b.line_number
            .cmp(&a.line_number)
            .then_with(|| {
                (a.deletion == Deletion::Line).cmp(&(b.deletion == Deletion::Line))
            })
            .then_with(|| b.edit_column.cmp(&a.edit_column))
            .then_with(|| b.insert_text.len().cmp(&a.insert_text.len()))
    });
    fixes.dedup();

    let mut last: Option<(usize, usize)> = None;
    for fix in fixes {
        let Some(line_idx) = fix.line_number.checked_sub(1) else {
            continue;
        };
        let edit_idx = fix.edit_column.saturating_sub(1);
        let apply = match (last, fix.deletion) {
            (_, Deletion::Line) => true,
            (Some((last_line, _)), _) if last_line != line_idx => true,
            (None, _) => true,
            (Some((_, last_edit)), Deletion::Chars(count)) => {
                let bound = if count > 0 { last_edit } else { last_edit.saturating_sub(1) };
                edit_idx + count <= bound && !(count == 0 && last_edit == 0)
            }
        };
        if apply && let Some(slot) = lines.get_mut(line_idx) {
            *slot = slot
                .take()
                .and_then(|line| apply_one(&line, fix, edit_idx, ending));
        }
        last = Some((line_idx, edit_idx));
    }

    lines.into_iter().flatten().collect::<Vec<_>>().join(ending)
}

/// Apply one edit to one line; `None` deletes the line.
fn apply_one(line: &str, fix: &FixInfo, edit_idx: usize, ending: &str) -> Option<String> {
    let Deletion::Chars(count) = fix.deletion else {
        return None;
    };
    let chars: Vec<char> = line.chars().collect();
    let start = edit_idx.min(chars.len());
    let end = (edit_idx + count).min(chars.len());

    let mut out: String = chars[..start].iter().collect();
    out.push_str(&fix.insert_text.replace('\n', ending));
    out.extend(&chars[end..]);
    Some(out)
}

/// Apply the fixes of rule-level violations; used by rule unit tests.
#[cfg(test)]
pub fn apply_violation_fixes(text: &str, violations: &[crate::rules::Violation]) -> String {
    apply_fix_infos(text, violations.iter().filter_map(|v| v.fix.as_ref()).collect())
}
