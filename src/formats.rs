use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Available,
    Locked,
}

impl Status {
    pub fn is_locked(self) -> bool {
        self == Status::Locked
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Available => "available",
            Status::Locked => "locked",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CatalogFile {
    pub title: String,
    #[serde(default)]
    pub intro: String,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Section {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Chapter {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

impl Chapter {
    pub fn lesson_count(&self) -> usize {
        self.lessons.len()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Lesson {
    pub id: String,
    pub title: String,
    pub description: String,
    pub topics: Vec<String>,
    #[serde(default)]
    pub status: Status,
    /// Markdown shown on the lesson page below the topic list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_defaults_to_available_when_omitted() {
        let lesson: Lesson = serde_yaml::from_str(
            "id: lesson-1\ntitle: X\ndescription: d\ntopics: [a, b]\n",
        )
        .unwrap();
        assert_eq!(lesson.status, Status::Available);
        assert_eq!(lesson.topics, vec!["a".to_owned(), "b".to_owned()]);
        assert!(lesson.body.is_none());
    }

    #[test]
    fn status_is_lowercase_on_the_wire() {
        let json = serde_json::to_string(&Status::Locked).unwrap();
        assert_eq!(json, "\"locked\"");
        let status: Status = serde_yaml::from_str("available").unwrap();
        assert_eq!(status, Status::Available);
    }

    #[test]
    fn lesson_count_follows_owned_lessons() {
        let chapter: Chapter = serde_yaml::from_str(
            "id: c\ntitle: C\ndescription: d\nlessons:\n  - {id: a, title: A, description: d, topics: [t]}\n  - {id: b, title: B, description: d, topics: [t]}\n",
        )
        .unwrap();
        assert_eq!(chapter.lesson_count(), 2);
        assert_eq!(chapter.status, Status::Available);
    }
}
