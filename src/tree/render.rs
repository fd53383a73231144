//! Tree view of an object and everything it owns

use chrono::{DateTime, Utc};
use crossterm::style::{Attribute, Color, Stylize, style};
use std::collections::HashSet;
use unicode_width::UnicodeWidthStr;

use super::age::format_age;
use super::{Object, OwnershipIndex};
use crate::status::{self, ObjectStatus, StatusComputer, Verdict};

const FIRST_ELEM_PREFIX: &str = "├─";
const LAST_ELEM_PREFIX: &str = "└─";
const PIPE: &str = "│ ";
const INDENT: &str = "  ";

const SEPARATOR: &str = "  ";
const HEADER: [&str; 6] = ["NAMESPACE", "NAME", "READY", "REASON", "STATUS", "AGE"];

/// One rendered node
#[derive(Debug, Clone)]
pub struct TreeRow {
    pub namespace: String,
    /// Connector glyphs, already rewritten for display
    pub prefix: String,
    pub kind: String,
    pub name: String,
    pub status: ObjectStatus,
    pub age: String,
    /// The node is one of its own ancestors; its subtree was not walked again
    pub cycle: bool,
}

/// Walks an [`OwnershipIndex`] depth-first from a root object
pub struct TreeRenderer<'a> {
    index: &'a OwnershipIndex,
    condition_types: &'a [String],
    computer: &'a dyn StatusComputer,
    now: DateTime<Utc>,
}

impl<'a> TreeRenderer<'a> {
    pub fn new(
        index: &'a OwnershipIndex,
        condition_types: &'a [String],
        computer: &'a dyn StatusComputer,
    ) -> Self {
        Self {
            index,
            condition_types,
            computer,
            now: Utc::now(),
        }
    }

    /// Compute ages relative to a fixed instant
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Rows for `root` and all of its descendants, in display order
    ///
    /// The root row is always present, even when it owns nothing.
    pub fn rows(&self, root: &Object) -> Vec<TreeRow> {
        let mut rows = Vec::new();
        let mut path = HashSet::new();
        path.insert(root.uid.as_str());
        self.walk(root, "", &mut path, &mut rows);
        rows
    }

    /// Render the tree as an aligned table
    pub fn render(&self, root: &Object, color: bool) -> String {
        format_table(&self.rows(root), color)
    }

    fn walk<'o>(
        &self,
        obj: &'o Object,
        prefix: &str,
        path: &mut HashSet<&'o str>,
        rows: &mut Vec<TreeRow>,
    ) where
        'a: 'o,
    {
        rows.push(self.row(obj, prefix, false));

        let children = self.index.children_of(&obj.uid);
        let last = children.len().saturating_sub(1);
        for (i, child) in children.into_iter().enumerate() {
            let glyph = if i == last {
                LAST_ELEM_PREFIX
            } else {
                FIRST_ELEM_PREFIX
            };
            let child_prefix = format!("{}{}", prefix, glyph);

            if path.contains(child.uid.as_str()) {
                tracing::warn!(
                    kind = %child.kind,
                    name = %child.name,
                    uid = %child.uid,
                    "ownership cycle detected, not descending"
                );
                rows.push(self.row(child, &child_prefix, true));
                continue;
            }

            path.insert(child.uid.as_str());
            self.walk(child, &child_prefix, path, rows);
            path.remove(child.uid.as_str());
        }
    }

    fn row(&self, obj: &Object, prefix: &str, cycle: bool) -> TreeRow {
        TreeRow {
            namespace: obj.namespace.clone(),
            prefix: display_prefix(prefix),
            kind: obj.kind.clone(),
            name: obj.name.clone(),
            status: status::extract(obj, self.condition_types, self.computer),
            age: format_age(obj.creation_timestamp, self.now),
            cycle,
        }
    }
}

/// Rewrite ancestor glyphs so only the node's own connector remains
///
/// Every ancestor branch becomes a continuation bar and every ancestor
/// terminal becomes blank padding.
pub fn display_prefix(prefix: &str) -> String {
    let (ancestors, own) = if let Some(head) = prefix.strip_suffix(FIRST_ELEM_PREFIX) {
        (head, FIRST_ELEM_PREFIX)
    } else if let Some(head) = prefix.strip_suffix(LAST_ELEM_PREFIX) {
        (head, LAST_ELEM_PREFIX)
    } else {
        (prefix, "")
    };
    let mut out = ancestors
        .replace(FIRST_ELEM_PREFIX, PIPE)
        .replace(LAST_ELEM_PREFIX, INDENT);
    out.push_str(own);
    out
}

/// A table cell: plain text for measuring, styled text for printing
struct Cell {
    plain: String,
    styled: String,
}

impl Cell {
    fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            styled: text.clone(),
            plain: text,
        }
    }

    fn colored(text: impl Into<String>, color: Option<Color>) -> Self {
        let text = text.into();
        match color {
            Some(c) => Self {
                styled: style(&text).with(c).to_string(),
                plain: text,
            },
            None => Self::plain(text),
        }
    }
}

fn ready_color(ready: &str) -> Color {
    match ready {
        "True" => Color::Green,
        "False" | "Unknown" => Color::Red,
        _ => Color::DarkGrey,
    }
}

fn verdict_color(verdict: Verdict) -> Color {
    match verdict {
        Verdict::Current => Color::Green,
        Verdict::InProgress => Color::Yellow,
        Verdict::Failed | Verdict::Terminating => Color::Red,
        Verdict::Unknown => Color::DarkGrey,
    }
}

fn row_cells(row: &TreeRow, color: bool) -> Vec<Cell> {
    let ready = if row.status.ready.is_empty() {
        "-"
    } else {
        row.status.ready.as_str()
    };
    let ready_fg = color.then(|| ready_color(&row.status.ready));
    let verdict = row.status.verdict;

    let suffix = if row.cycle { " (cycle)" } else { "" };
    let plain_name = format!("{}{}/{}{}", row.prefix, row.kind, row.name, suffix);
    let name = if color {
        Cell {
            styled: format!(
                "{}{}/{}{}",
                style(&row.prefix).with(Color::DarkGrey),
                row.kind,
                style(&row.name).attribute(Attribute::Bold),
                suffix.yellow()
            ),
            plain: plain_name,
        }
    } else {
        Cell::plain(plain_name)
    };

    vec![
        Cell::plain(row.namespace.clone()),
        name,
        Cell::colored(ready, ready_fg),
        Cell::colored(row.status.reason.clone(), ready_fg),
        Cell::colored(
            verdict.map(|v| v.to_string()).unwrap_or_default(),
            verdict.filter(|_| color).map(verdict_color),
        ),
        Cell::plain(row.age.clone()),
    ]
}

/// Lay rows out under a header, columns left-aligned and two spaces apart
pub fn format_table(rows: &[TreeRow], color: bool) -> String {
    let mut table: Vec<Vec<Cell>> = Vec::with_capacity(rows.len() + 1);
    table.push(HEADER.iter().map(|h| Cell::plain(*h)).collect());
    table.extend(rows.iter().map(|r| row_cells(r, color)));

    let mut widths = vec![0usize; HEADER.len()];
    for cells in &table {
        for (w, cell) in widths.iter_mut().zip(cells) {
            *w = (*w).max(cell.plain.width());
        }
    }

    let mut out = String::new();
    for cells in &table {
        let last = cells.len() - 1;
        for (i, cell) in cells.iter().enumerate() {
            out.push_str(&cell.styled);
            if i < last {
                out.push_str(&" ".repeat(widths[i] - cell.plain.width()));
                out.push_str(SEPARATOR);
            }
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefix_rewrites_ancestors() {
        assert_eq!(display_prefix(""), "");
        assert_eq!(display_prefix("├─"), "├─");
        assert_eq!(display_prefix("└─"), "└─");
        assert_eq!(display_prefix("├─└─"), "│ └─");
        assert_eq!(display_prefix("└─├─"), "  ├─");
        assert_eq!(display_prefix("├─├─├─"), "│ │ ├─");
        assert_eq!(display_prefix("└─└─└─"), "    └─");
        assert_eq!(display_prefix("├─└─├─"), "│   ├─");
    }

    #[test]
    fn test_format_table_alignment() {
        let row = |prefix: &str, kind: &str, name: &str, ready: &str| TreeRow {
            namespace: "ns".to_string(),
            prefix: prefix.to_string(),
            kind: kind.to_string(),
            name: name.to_string(),
            status: ObjectStatus {
                ready: ready.to_string(),
                reason: String::new(),
                verdict: None,
            },
            age: "5m".to_string(),
            cycle: false,
        };
        let out = format_table(
            &[row("", "Deployment", "web", "True"), row("└─", "ReplicaSet", "web-1", "")],
            false,
        );
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "NAMESPACE  NAME                READY  REASON  STATUS  AGE");
        assert_eq!(lines[1], "ns         Deployment/web      True                   5m");
        assert_eq!(lines[2], "ns         └─ReplicaSet/web-1  -                      5m");
    }

    #[test]
    fn test_format_table_colored_keeps_alignment() {
        let row = TreeRow {
            namespace: "ns".to_string(),
            prefix: String::new(),
            kind: "Pod".to_string(),
            name: "p".to_string(),
            status: ObjectStatus {
                ready: "False".to_string(),
                reason: "Crash".to_string(),
                verdict: Some(Verdict::Failed),
            },
            age: "1d".to_string(),
            cycle: false,
        };
        let colored = format_table(&[row.clone()], true);
        assert!(colored.contains('\u{1b}'));

        let plain = format_table(&[row], false);
        assert_eq!(
            plain.lines().nth(1).unwrap(),
            "ns         Pod/p  False  Crash   Failed  1d"
        );
    }
}
