use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::error::CatalogError;
use crate::formats::{CatalogFile, Chapter, Lesson, Section, Status};

pub const CATALOG_ENV: &str = "LEARNHUB_CATALOG";

static BUILTIN_CATALOG_YAML: &str = include_str!("../catalog/learn.yaml");

/// Validated, read-only course tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    file: CatalogFile,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogStats {
    pub sections: usize,
    pub chapters: usize,
    pub lessons: usize,
    pub locked_chapters: usize,
    pub locked_lessons: usize,
}

impl Catalog {
    pub fn new(file: CatalogFile) -> Result<Self, CatalogError> {
        validate(&file)?;
        Ok(Self { file })
    }

    pub fn builtin() -> anyhow::Result<Self> {
        Self::from_yaml(BUILTIN_CATALOG_YAML).context("load built-in catalog")
    }

    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        let file: CatalogFile = serde_yaml::from_str(yaml).context("parse catalog yaml")?;
        Ok(Self::new(file)?)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("read catalog: {}", path.display()))?;
        Self::from_yaml(&yaml).with_context(|| format!("load catalog: {}", path.display()))
    }

    /// Loads `path`, else the file named by `LEARNHUB_CATALOG`, else the embedded catalog.
    pub fn load_configured(path: Option<&Path>) -> anyhow::Result<Self> {
        let from_env = std::env::var(CATALOG_ENV)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        match path.map(Path::to_path_buf).or(from_env) {
            Some(path) => {
                tracing::info!(path = %path.display(), "loading catalog file");
                Self::load(&path)
            }
            None => {
                tracing::debug!("using built-in catalog");
                Self::builtin()
            }
        }
    }

    pub fn title(&self) -> &str {
        &self.file.title
    }

    pub fn intro(&self) -> &str {
        &self.file.intro
    }

    pub fn sections(&self) -> &[Section] {
        &self.file.sections
    }

    pub fn section(&self, section_id: &str) -> Result<&Section, CatalogError> {
        self.file
            .sections
            .iter()
            .find(|s| s.id == section_id)
            .ok_or_else(|| CatalogError::UnknownSection(section_id.to_owned()))
    }

    pub fn chapter(
        &self,
        section_id: &str,
        chapter_id: &str,
    ) -> Result<(&Section, &Chapter), CatalogError> {
        let section = self.section(section_id)?;
        let chapter = section
            .chapters
            .iter()
            .find(|c| c.id == chapter_id)
            .ok_or_else(|| CatalogError::UnknownChapter {
                section: section_id.to_owned(),
                chapter: chapter_id.to_owned(),
            })?;
        Ok((section, chapter))
    }

    pub fn lesson(
        &self,
        section_id: &str,
        chapter_id: &str,
        lesson_id: &str,
    ) -> Result<(&Section, &Chapter, &Lesson), CatalogError> {
        let (section, chapter) = self.chapter(section_id, chapter_id)?;
        let lesson = chapter
            .lessons
            .iter()
            .find(|l| l.id == lesson_id)
            .ok_or_else(|| CatalogError::UnknownLesson {
                section: section_id.to_owned(),
                chapter: chapter_id.to_owned(),
                lesson: lesson_id.to_owned(),
            })?;
        Ok((section, chapter, lesson))
    }

    pub fn stats(&self) -> CatalogStats {
        let mut stats = CatalogStats {
            sections: self.file.sections.len(),
            ..CatalogStats::default()
        };
        for chapter in self.file.sections.iter().flat_map(|s| &s.chapters) {
            stats.chapters += 1;
            if chapter.status == Status::Locked {
                stats.locked_chapters += 1;
            }
            for lesson in &chapter.lessons {
                stats.lessons += 1;
                if lesson.status == Status::Locked {
                    stats.locked_lessons += 1;
                }
            }
        }
        stats
    }
}

fn validate(file: &CatalogFile) -> Result<(), CatalogError> {
    if file.title.trim().is_empty() {
        return Err(CatalogError::invalid("catalog", "title is empty"));
    }

    let mut section_ids = HashSet::new();
    for section in &file.sections {
        check_node("section", &section.id, &section.title)?;
        if !section_ids.insert(section.id.as_str()) {
            return Err(CatalogError::invalid(
                format!("section {}", section.id),
                "duplicate section id",
            ));
        }

        let mut chapter_ids = HashSet::new();
        for chapter in &section.chapters {
            let location = format!("{}/{}", section.id, chapter.id);
            check_node(&location, &chapter.id, &chapter.title)?;
            if !chapter_ids.insert(chapter.id.as_str()) {
                return Err(CatalogError::invalid(location, "duplicate chapter id"));
            }

            let mut lesson_ids = HashSet::new();
            for lesson in &chapter.lessons {
                let location = format!("{}/{}/{}", section.id, chapter.id, lesson.id);
                check_node(&location, &lesson.id, &lesson.title)?;
                if !lesson_ids.insert(lesson.id.as_str()) {
                    return Err(CatalogError::invalid(location, "duplicate lesson id"));
                }
                if lesson.topics.is_empty() {
                    return Err(CatalogError::invalid(location, "lesson has no topics"));
                }
            }
        }
    }

    Ok(())
}

fn check_node(location: &str, id: &str, title: &str) -> Result<(), CatalogError> {
    if !is_slug(id) {
        return Err(CatalogError::invalid(
            location,
            format!("id is not a url slug: {id:?}"),
        ));
    }
    if title.trim().is_empty() {
        return Err(CatalogError::invalid(location, "title is empty"));
    }
    Ok(())
}

/// Lowercase ascii letters, digits and inner single dashes.
pub fn is_slug(id: &str) -> bool {
    !id.is_empty()
        && !id.starts_with('-')
        && !id.ends_with('-')
        && !id.contains("--")
        && id
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
title: Learn
sections:
  - id: app-router
    title: App Router
    description: d
    chapters:
      - id: basics
        title: Basics
        description: d
        lessons:
          - id: lesson-1
            title: X
            description: d
            topics: [a, b]
"#;

    #[test]
    fn builtin_catalog_is_valid_and_has_four_sections() {
        let catalog = Catalog::builtin().unwrap();
        let ids = catalog
            .sections()
            .iter()
            .map(|s| s.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(
            ids,
            vec!["app-router", "pages-router", "comparison", "recent-updates"]
        );
        let stats = catalog.stats();
        assert!(stats.chapters > 0);
        assert!(stats.lessons > stats.chapters);
    }

    #[test]
    fn lookups_walk_the_tree() {
        let catalog = Catalog::from_yaml(MINIMAL).unwrap();
        let (section, chapter, lesson) = catalog.lesson("app-router", "basics", "lesson-1").unwrap();
        assert_eq!(section.title, "App Router");
        assert_eq!(chapter.title, "Basics");
        assert_eq!(lesson.title, "X");
    }

    #[test]
    fn lookups_name_the_missing_id() {
        let catalog = Catalog::from_yaml(MINIMAL).unwrap();
        assert_eq!(
            catalog.section("nope").unwrap_err(),
            CatalogError::UnknownSection("nope".to_owned())
        );
        assert_eq!(
            catalog.chapter("app-router", "nope").unwrap_err(),
            CatalogError::UnknownChapter {
                section: "app-router".to_owned(),
                chapter: "nope".to_owned(),
            }
        );
        let err = catalog.lesson("app-router", "basics", "nope").unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn rejects_duplicate_lesson_ids() {
        let yaml = MINIMAL.to_owned()
            + "          - id: lesson-1\n            title: Y\n            description: d\n            topics: [c]\n";
        let err = Catalog::from_yaml(&yaml).unwrap_err();
        let err = err.downcast::<CatalogError>().unwrap();
        assert!(matches!(err, CatalogError::Invalid { ref reason, .. } if reason == "duplicate lesson id"));
    }

    #[test]
    fn rejects_empty_topics() {
        let yaml = MINIMAL.replace("topics: [a, b]", "topics: []");
        let err = Catalog::from_yaml(&yaml).unwrap_err();
        let err = err.downcast::<CatalogError>().unwrap();
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("app-router/basics/lesson-1"));
    }

    #[test]
    fn rejects_misspelled_keys() {
        let yaml = MINIMAL.replace(
            "        title: Basics\n",
            "        title: Basics\n        stauts: locked\n",
        );
        let err = Catalog::from_yaml(&yaml).unwrap_err();
        assert!(format!("{err:#}").contains("stauts"), "{err:#}");

        let yaml = MINIMAL.replace(
            "        title: Basics\n",
            "        title: Basics\n        lessonCount: 99\n",
        );
        assert!(Catalog::from_yaml(&yaml).is_err());
    }

    #[test]
    fn rejects_ids_that_are_not_slugs() {
        let yaml = MINIMAL.replace("id: basics", "id: Basics Chapter");
        assert!(Catalog::from_yaml(&yaml).is_err());
    }

    #[test]
    fn rejects_missing_title_field() {
        let yaml = MINIMAL.replace("title: X\n", "");
        assert!(Catalog::from_yaml(&yaml).is_err());
    }

    #[test]
    fn slug_rules() {
        assert!(is_slug("lesson-1"));
        assert!(is_slug("app-router"));
        assert!(!is_slug(""));
        assert!(!is_slug("-lead"));
        assert!(!is_slug("trail-"));
        assert!(!is_slug("double--dash"));
        assert!(!is_slug("Upper"));
        assert!(!is_slug("with/slash"));
    }

    #[test]
    fn load_reads_file_from_disk() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("catalog.yaml");
        std::fs::write(&path, MINIMAL).unwrap();
        let catalog = Catalog::load(&path).unwrap();
        assert_eq!(catalog.title(), "Learn");
        assert_eq!(catalog.stats().lessons, 1);
    }
}
