use crate::catalog::Catalog;
use crate::error::CatalogError;
use crate::formats::{Chapter, Lesson, Section};

pub const LEARN_ROOT: &str = "/learn";

/// One node of the `/learn` URL hierarchy, identified by ids only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Hub,
    Section {
        section: String,
    },
    Chapter {
        section: String,
        chapter: String,
    },
    Lesson {
        section: String,
        chapter: String,
        lesson: String,
    },
}

impl Route {
    pub fn section(section: &str) -> Self {
        Self::Section {
            section: section.to_owned(),
        }
    }

    pub fn chapter(section: &str, chapter: &str) -> Self {
        Self::Chapter {
            section: section.to_owned(),
            chapter: chapter.to_owned(),
        }
    }

    pub fn lesson(section: &str, chapter: &str, lesson: &str) -> Self {
        Self::Lesson {
            section: section.to_owned(),
            chapter: chapter.to_owned(),
            lesson: lesson.to_owned(),
        }
    }

    /// Accepts the canonical path with at most one trailing slash.
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.strip_suffix('/').unwrap_or(path);
        let rest = path.strip_prefix(LEARN_ROOT)?;
        if rest.is_empty() {
            return Some(Self::Hub);
        }
        let rest = rest.strip_prefix('/')?;

        let segments = rest.split('/').collect::<Vec<_>>();
        if segments.iter().any(|s| s.is_empty()) {
            return None;
        }
        match segments.as_slice() {
            [section] => Some(Self::section(section)),
            [section, chapter] => Some(Self::chapter(section, chapter)),
            [section, chapter, lesson] => Some(Self::lesson(section, chapter, lesson)),
            _ => None,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Self::Hub => LEARN_ROOT.to_owned(),
            Self::Section { section } => format!("{LEARN_ROOT}/{section}"),
            Self::Chapter { section, chapter } => format!("{LEARN_ROOT}/{section}/{chapter}"),
            Self::Lesson {
                section,
                chapter,
                lesson,
            } => format!("{LEARN_ROOT}/{section}/{chapter}/{lesson}"),
        }
    }

    pub fn resolve<'a>(&self, catalog: &'a Catalog) -> Result<Page<'a>, CatalogError> {
        match self {
            Self::Hub => Ok(Page::Hub {
                sections: catalog.sections(),
            }),
            Self::Section { section } => Ok(Page::Section(catalog.section(section)?)),
            Self::Chapter { section, chapter } => {
                let (section, chapter) = catalog.chapter(section, chapter)?;
                Ok(Page::Chapter { section, chapter })
            }
            Self::Lesson {
                section,
                chapter,
                lesson,
            } => {
                let (section, chapter, lesson) = catalog.lesson(section, chapter, lesson)?;
                Ok(Page::Lesson {
                    section,
                    chapter,
                    lesson,
                })
            }
        }
    }
}

/// A route resolved against the catalog.
#[derive(Debug, Clone, Copy)]
pub enum Page<'a> {
    Hub {
        sections: &'a [Section],
    },
    Section(&'a Section),
    Chapter {
        section: &'a Section,
        chapter: &'a Chapter,
    },
    Lesson {
        section: &'a Section,
        chapter: &'a Chapter,
        lesson: &'a Lesson,
    },
}

/// Every route of the catalog: the hub, then a depth-first walk in catalog order.
pub fn all_routes(catalog: &Catalog) -> Vec<Route> {
    let mut routes = vec![Route::Hub];
    for section in catalog.sections() {
        routes.push(Route::section(&section.id));
        for chapter in &section.chapters {
            routes.push(Route::chapter(&section.id, &chapter.id));
            for lesson in &chapter.lessons {
                routes.push(Route::lesson(&section.id, &chapter.id, &lesson.id));
            }
        }
    }
    routes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_level() {
        assert_eq!(Route::parse("/learn"), Some(Route::Hub));
        assert_eq!(Route::parse("/learn/"), Some(Route::Hub));
        assert_eq!(
            Route::parse("/learn/app-router"),
            Some(Route::section("app-router"))
        );
        assert_eq!(
            Route::parse("/learn/app-router/routing-fundamentals/"),
            Some(Route::chapter("app-router", "routing-fundamentals"))
        );
        assert_eq!(
            Route::parse("/learn/app-router/routing-fundamentals/lesson-1"),
            Some(Route::lesson("app-router", "routing-fundamentals", "lesson-1"))
        );
    }

    #[test]
    fn rejects_paths_outside_the_hierarchy() {
        assert_eq!(Route::parse("/"), None);
        assert_eq!(Route::parse("/learning"), None);
        assert_eq!(Route::parse("/learn//x"), None);
        assert_eq!(Route::parse("/learn/a/b/c/d"), None);
        assert_eq!(Route::parse("/other/learn"), None);
    }

    #[test]
    fn path_round_trips_through_parse() {
        let catalog = Catalog::builtin().unwrap();
        for route in all_routes(&catalog) {
            assert_eq!(Route::parse(&route.path()), Some(route.clone()));
        }
    }

    #[test]
    fn all_routes_resolve_in_catalog_order() {
        let catalog = Catalog::builtin().unwrap();
        let routes = all_routes(&catalog);
        assert_eq!(routes[0], Route::Hub);
        assert_eq!(routes[1], Route::section("app-router"));
        assert_eq!(
            routes[2],
            Route::chapter("app-router", "routing-fundamentals")
        );
        let stats = catalog.stats();
        assert_eq!(
            routes.len(),
            1 + stats.sections + stats.chapters + stats.lessons
        );
        for route in &routes {
            assert!(route.resolve(&catalog).is_ok(), "{}", route.path());
        }
    }

    #[test]
    fn resolve_reports_the_first_missing_id() {
        let catalog = Catalog::builtin().unwrap();
        let err = Route::lesson("missing", "also-missing", "x")
            .resolve(&catalog)
            .unwrap_err();
        assert_eq!(err, CatalogError::UnknownSection("missing".to_owned()));
    }
}
