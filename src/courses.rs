//! Reconstructs course listings from free-form CMS rich text.
//!
//! The CMS stores each course group as one rich-text field; individual courses
//! are recognised by a course code (`CS3xx`/`CS4xx`) in a heading or in the
//! first line of a paragraph. Everything else that follows a recognised course
//! is folded into its description until the next code appears.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::types::{first_text, RichBlock};

static COURSE_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"CS[34][0-9]{2}").expect("valid course code pattern"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseRecord {
    pub title: String,
    pub description: String,
}

pub fn is_course_code(text: &str) -> bool {
    COURSE_CODE.is_match(text)
}

/// Split `about` into course records, in order of appearance.
pub fn derive_courses(blocks: &[RichBlock]) -> Vec<CourseRecord> {
    let mut out = Vec::new();
    let mut current: Option<CourseRecord> = None;

    for block in blocks {
        match block {
            RichBlock::Paragraph { children } => {
                let text: String = children.iter().map(|c| c.text.as_str()).collect();
                if text.trim().is_empty() {
                    continue;
                }
                if is_course_code(&text) {
                    out.extend(current.take());
                    current = Some(record_from_paragraph(&text));
                } else if let Some(course) = current.as_mut() {
                    append(&mut course.description, text.trim());
                }
            }
            RichBlock::Heading { children, .. } => {
                let Some(title) = first_text(children) else { continue };
                if is_course_code(title) {
                    out.extend(current.take());
                    current = Some(CourseRecord { title: title.trim().to_string(), description: String::new() });
                }
            }
            RichBlock::List { .. } | RichBlock::Unsupported => {}
        }
    }

    out.extend(current);
    out
}

fn record_from_paragraph(text: &str) -> CourseRecord {
    let mut lines = text.split('\n').filter(|l| !l.trim().is_empty());
    let title = lines.next().unwrap_or_default().trim().to_string();
    let description = lines.collect::<Vec<_>>().join(" ").trim().to_string();
    CourseRecord { title, description }
}

fn append(description: &mut String, text: &str) {
    if !description.is_empty() {
        description.push(' ');
    }
    description.push_str(text);
}
