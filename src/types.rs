use serde::{Deserialize, Serialize};

/// A run of inline text inside a rich-text block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineSpan {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    #[serde(default)]
    pub children: Vec<InlineSpan>,
}

/// One block of CMS rich text, tagged by its `type` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RichBlock {
    Paragraph {
        #[serde(default)]
        children: Vec<InlineSpan>,
    },
    List {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        format: Option<String>,
        #[serde(default)]
        children: Vec<ListItem>,
    },
    Heading {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        level: Option<u8>,
        #[serde(default)]
        children: Vec<InlineSpan>,
    },
    /// Quotes, code, images and anything else the pages do not draw.
    #[serde(other)]
    Unsupported,
}

impl RichBlock {
    pub fn paragraph(text: &str) -> Self {
        Self::Paragraph { children: vec![InlineSpan { text: text.to_string() }] }
    }

    pub fn heading(text: &str) -> Self {
        Self::Heading { level: None, children: vec![InlineSpan { text: text.to_string() }] }
    }

    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let children = items
            .into_iter()
            .map(|s| ListItem { children: vec![InlineSpan { text: s.into() }] })
            .collect();
        Self::List { format: None, children }
    }
}

/// First span's text, if any. Renderers only look at the leading span.
pub(crate) fn first_text(spans: &[InlineSpan]) -> Option<&str> {
    spans.first().map(|s| s.text.as_str())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub id: i64,
    #[serde(rename = "Title", alias = "title", default)]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: Vec<RichBlock>,
    #[serde(default)]
    pub grading: Option<String>,
}

/// Course category as labelled in the CMS.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CourseType {
    Core,
    Elective,
    Other(String),
}

impl CourseType {
    pub fn as_str(&self) -> &str {
        match self {
            CourseType::Core => "core course",
            CourseType::Elective => "elective courses",
            CourseType::Other(s) => s.as_str(),
        }
    }
}

impl From<String> for CourseType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "core course" => CourseType::Core,
            "elective courses" => CourseType::Elective,
            _ => CourseType::Other(s),
        }
    }
}

impl From<CourseType> for String {
    fn from(c: CourseType) -> Self {
        c.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub coursetype: CourseType,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub about: Vec<RichBlock>,
}

/// Both collections as one unit, the shape kept in the cache.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcademicData {
    pub rules: Vec<Rule>,
    pub courses: Vec<Course>,
}

impl AcademicData {
    pub fn courses_of<'a>(&'a self, kind: &'a CourseType) -> impl Iterator<Item = &'a Course> + 'a {
        self.courses.iter().filter(move |c| &c.coursetype == kind)
    }
}

/// `{ "data": [...] }` envelope used by every collection endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: Vec<T>,
}

fn null_as_empty<'de, D, T>(de: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(de)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_cms_blocks() {
        let raw = json!([
            { "type": "heading", "level": 3, "children": [{ "type": "text", "text": "CS301 Algorithms" }] },
            { "type": "paragraph", "children": [{ "type": "text", "text": "Sorting", "bold": true }] },
            { "type": "list", "format": "unordered", "children": [
                { "type": "list-item", "children": [{ "type": "text", "text": "one" }] }
            ] },
            { "type": "quote", "children": [] }
        ]);
        let blocks: Vec<RichBlock> = serde_json::from_value(raw).unwrap();
        assert_eq!(blocks.len(), 4);
        assert!(matches!(&blocks[0], RichBlock::Heading { level: Some(3), .. }));
        assert_eq!(blocks[1], RichBlock::paragraph("Sorting"));
        match &blocks[2] {
            RichBlock::List { format, children } => {
                assert_eq!(format.as_deref(), Some("unordered"));
                assert_eq!(children[0].children[0].text, "one");
            }
            other => panic!("unexpected block {other:?}"),
        }
        assert_eq!(blocks[3], RichBlock::Unsupported);
    }

    #[test]
    fn rule_accepts_capitalised_title_and_null_description() {
        let rule: Rule = serde_json::from_value(json!({
            "id": 4, "Title": "Grading", "description": null, "grading": "A|B"
        }))
        .unwrap();
        assert_eq!(rule.title, "Grading");
        assert!(rule.description.is_empty());
        assert_eq!(rule.grading.as_deref(), Some("A|B"));

        let encoded = serde_json::to_value(&rule).unwrap();
        assert_eq!(encoded["Title"], "Grading");
    }

    #[test]
    fn course_type_labels() {
        let core: Course = serde_json::from_value(json!({ "id": 1, "coursetype": "core course", "about": [] })).unwrap();
        let elective: Course = serde_json::from_value(json!({ "id": 2, "coursetype": "elective courses" })).unwrap();
        let other: Course = serde_json::from_value(json!({ "id": 3, "coursetype": "lab" })).unwrap();
        assert_eq!(core.coursetype, CourseType::Core);
        assert_eq!(elective.coursetype, CourseType::Elective);
        assert_eq!(other.coursetype, CourseType::Other("lab".into()));
        assert_eq!(serde_json::to_value(&elective).unwrap()["coursetype"], "elective courses");

        let data = AcademicData { rules: vec![], courses: vec![core, elective, other] };
        let ids: Vec<i64> = data.courses_of(&CourseType::Core).map(|c| c.id).collect();
        assert_eq!(ids, vec![1]);
    }
}
