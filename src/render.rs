//! Markdown rendering of the Academics page and its pieces.
//!
//! Each section is rendered from the loader's status so that loading and error
//! states look the same wherever they appear.

use std::fmt::Write;

use crate::courses::derive_courses;
use crate::loader::LoadStatus;
use crate::page::{Section, ACADEMIC_OFFICE_EMAIL, CURRICULUM, FAQS, INTRO, OFFICE_HOURS, TIMETABLE_PDF};
use crate::rules::{parse_grading_table, render_description, GradingTable, RenderNode};
use crate::types::{AcademicData, CourseType, Rule};

const RETRY_HINT: &str = "Please try refreshing the page.";

pub fn render_page(status: &LoadStatus, data: &AcademicData) -> String {
    render_with(|out| write_page(out, status, data))
}

/// A single section with its anchor, as reached from the navigation cards.
pub fn render_section(status: &LoadStatus, data: &AcademicData, s: Section) -> String {
    render_with(|out| write_section(out, status, data, s))
}

/// One course column: placeholder, error, or the derived course list.
pub fn render_courses(status: &LoadStatus, data: &AcademicData, kind: &CourseType) -> String {
    render_with(|out| write_courses(out, status, data, kind))
}

pub fn render_rules(status: &LoadStatus, rules: &[Rule]) -> String {
    render_with(|out| write_rules(out, status, rules))
}

pub fn render_table(table: &GradingTable) -> String {
    render_with(|out| write_table(out, table))
}

fn render_with(body: impl FnOnce(&mut String) -> std::fmt::Result) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = body(&mut out);
    out
}

fn write_page(out: &mut String, status: &LoadStatus, data: &AcademicData) -> std::fmt::Result {
    write_section(out, status, data, Section::Top)?;
    for s in Section::NAV {
        write_section(out, status, data, s)?;
    }
    writeln!(out, "\n[Back to Top](#{})", Section::Top.id())
}

fn write_section(out: &mut String, status: &LoadStatus, data: &AcademicData, s: Section) -> std::fmt::Result {
    if s != Section::Top {
        writeln!(out, "\n<a id=\"{}\"></a>\n## {}\n", s.id(), s.title())?;
    }
    match s {
        Section::Top => {
            writeln!(out, "<a id=\"{}\"></a>", s.id())?;
            writeln!(out, "# {}\n\n{INTRO}\n", s.title())?;
            for nav in Section::NAV {
                writeln!(out, "- [{}](#{})", nav.nav_label(), nav.id())?;
            }
            Ok(())
        }
        Section::Timetable => {
            writeln!(out, "### Current Semester Schedule\n")?;
            writeln!(out, "Timetable: [Open Timetable PDF]({TIMETABLE_PDF})")
        }
        Section::Courses => {
            writeln!(out, "### Core Courses\n")?;
            write_courses(out, status, data, &CourseType::Core)?;
            writeln!(out, "\n### Elective Courses\n")?;
            write_courses(out, status, data, &CourseType::Elective)
        }
        Section::Curriculum => {
            writeln!(out, "### B.Tech Program Structure")?;
            for year in &CURRICULUM {
                writeln!(out, "\n#### {}\n\n{}", year.name, year.summary)?;
                for sem in &year.semesters {
                    writeln!(out, "\n**{}**\n", sem.name)?;
                    for subject in sem.subjects {
                        writeln!(out, "- {subject}")?;
                    }
                }
            }
            Ok(())
        }
        Section::Rules => write_rules(out, status, &data.rules),
        Section::Faq => {
            for faq in &FAQS {
                writeln!(out, "### {}\n\n{}\n", faq.question, faq.answer)?;
            }
            writeln!(out, "Still have questions? Contact the Academic Office at <{ACADEMIC_OFFICE_EMAIL}> ({OFFICE_HOURS}).")
        }
    }
}

fn write_courses(out: &mut String, status: &LoadStatus, data: &AcademicData, kind: &CourseType) -> std::fmt::Result {
    match status {
        LoadStatus::Idle | LoadStatus::Loading => writeln!(out, "_Loading courses..._"),
        LoadStatus::Failed(msg) => writeln!(out, "> Error loading courses: {msg}\n> {RETRY_HINT}"),
        LoadStatus::Ready => {
            for course in data.courses_of(kind) {
                for record in derive_courses(&course.about) {
                    if record.description.is_empty() {
                        writeln!(out, "- **{}**", record.title)?;
                    } else {
                        writeln!(out, "- **{}**: {}", record.title, record.description)?;
                    }
                }
            }
            Ok(())
        }
    }
}

fn write_rules(out: &mut String, status: &LoadStatus, rules: &[Rule]) -> std::fmt::Result {
    match status {
        LoadStatus::Idle | LoadStatus::Loading => writeln!(out, "_Loading academic rules..._"),
        LoadStatus::Failed(msg) => writeln!(out, "> Error loading academic rules: {msg}\n> {RETRY_HINT}"),
        LoadStatus::Ready => {
            for rule in rules {
                writeln!(out, "### {}\n", rule.title)?;
                write_nodes(out, &render_description(&rule.description))?;
                if let Some(table) = rule.grading.as_deref().and_then(parse_grading_table) {
                    writeln!(out)?;
                    write_table(out, &table)?;
                }
                writeln!(out)?;
            }
            Ok(())
        }
    }
}

fn write_nodes(out: &mut String, nodes: &[RenderNode]) -> std::fmt::Result {
    for node in nodes {
        match node {
            RenderNode::Text(t) => writeln!(out, "{t}\n")?,
            RenderNode::Bullets(items) => {
                for item in items {
                    writeln!(out, "- {item}")?;
                }
                writeln!(out)?;
            }
        }
    }
    Ok(())
}

fn write_table(out: &mut String, table: &GradingTable) -> std::fmt::Result {
    writeln!(out, "| {} |", table.header.join(" | "))?;
    writeln!(out, "|{}", "---|".repeat(table.header.len().max(1)))?;
    for row in &table.rows {
        writeln!(out, "| {} |", row.join(" | "))?;
    }
    Ok(())
}
