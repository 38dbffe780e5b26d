use serde::Serialize;

use crate::types::{first_text, RichBlock};

/// Structural output for one description block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RenderNode {
    Text(String),
    Bullets(Vec<String>),
}

/// Only the first span of a paragraph or list item is shown.
pub fn render_description(blocks: &[RichBlock]) -> Vec<RenderNode> {
    blocks
        .iter()
        .filter_map(|block| match block {
            RichBlock::Paragraph { children } => first_text(children).map(|t| RenderNode::Text(t.to_string())),
            RichBlock::List { children, .. } => Some(RenderNode::Bullets(
                children.iter().map(|item| first_text(&item.children).unwrap_or_default().to_string()).collect(),
            )),
            RichBlock::Heading { .. } | RichBlock::Unsupported => None,
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GradingTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Parse a pipe-delimited (markdown style) table.
///
/// The second `|` line is always treated as the `---|---` separator and skipped,
/// whatever it contains. Rows are not checked against the header width.
pub fn parse_grading_table(raw: &str) -> Option<GradingTable> {
    let lines: Vec<&str> = raw.trim().split('\n').filter(|l| l.contains('|')).collect();
    let (header, rest) = lines.split_first()?;
    Some(GradingTable {
        header: split_cells(header),
        rows: rest.iter().skip(1).map(|l| split_cells(l)).collect(),
    })
}

fn split_cells(line: &str) -> Vec<String> {
    line.split('|')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{InlineSpan, ListItem};

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn markdown_table() {
        let table = parse_grading_table("A|B\n--|--\n1|2\n3|4").unwrap();
        assert_eq!(table.header, strings(&["A", "B"]));
        assert_eq!(table.rows, vec![strings(&["1", "2"]), strings(&["3", "4"])]);
    }

    #[test]
    fn outer_pipes_and_padding() {
        let raw = "\n| Grade | Points |\n|---|---|\n| AA | 10 |\n| AB | 9 |\n\n";
        let table = parse_grading_table(raw).unwrap();
        assert_eq!(table.header, strings(&["Grade", "Points"]));
        assert_eq!(table.rows[1], strings(&["AB", "9"]));
    }

    #[test]
    fn second_line_skipped_even_without_separator() {
        let table = parse_grading_table("A|B\n1|2\n3|4").unwrap();
        assert_eq!(table.rows, vec![strings(&["3", "4"])]);
    }

    #[test]
    fn lines_without_pipes_ignored_and_ragged_rows_kept() {
        let table = parse_grading_table("Grades below\nA|B|C\n-|-|-\nnote\n1||2").unwrap();
        assert_eq!(table.header, strings(&["A", "B", "C"]));
        assert_eq!(table.rows, vec![strings(&["1", "2"])]);
    }

    #[test]
    fn degenerate_tables() {
        assert_eq!(parse_grading_table(""), None);
        assert_eq!(parse_grading_table("no table here"), None);
        let header_only = parse_grading_table("A|B").unwrap();
        assert!(header_only.rows.is_empty());
    }

    #[test]
    fn description_uses_first_span_only() {
        let blocks = vec![
            RichBlock::Paragraph { children: vec![InlineSpan { text: "Minimum ".into() }, InlineSpan { text: "80%".into() }] },
            RichBlock::List {
                format: Some("unordered".into()),
                children: vec![
                    ListItem { children: vec![InlineSpan { text: "Lectures".into() }, InlineSpan { text: " and labs".into() }] },
                    ListItem { children: vec![] },
                ],
            },
            RichBlock::heading("Ignored"),
            RichBlock::Paragraph { children: vec![] },
            RichBlock::Unsupported,
        ];
        assert_eq!(
            render_description(&blocks),
            vec![RenderNode::Text("Minimum ".into()), RenderNode::Bullets(strings(&["Lectures", ""]))]
        );
    }
}
