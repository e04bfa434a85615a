use pulldown_cmark::{Options, Parser};

use crate::catalog::Catalog;
use crate::error::CatalogError;
use crate::formats::{Chapter, Lesson, Section, Status};
use crate::routes::{LEARN_ROOT, Page, Route};

const STYLE_CSS: &str = "body{font-family:system-ui,sans-serif;max-width:56rem;margin:0 auto;padding:1rem}\
.cards{list-style:none;padding:0;display:grid;gap:1rem}\
.card{border:1px solid #ccc;border-radius:.5rem;padding:1rem}\
.card-link{display:block;color:inherit;text-decoration:none}\
.card--locked{opacity:.5;cursor:not-allowed}\
.breadcrumbs ol{list-style:none;padding:0;display:flex;gap:.5rem}";

/// A catalog record that can be shown in a listing.
pub trait Card {
    fn id(&self) -> &str;
    fn title(&self) -> &str;
    fn description(&self) -> &str;

    fn topics(&self) -> &[String] {
        &[]
    }

    fn status(&self) -> Status {
        Status::Available
    }

    /// Short secondary line, e.g. a lesson count.
    fn meta(&self) -> Option<String> {
        None
    }
}

impl Card for Section {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn meta(&self) -> Option<String> {
        Some(count_label(self.chapters.len(), "chapter"))
    }
}

impl Card for Chapter {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn status(&self) -> Status {
        self.status
    }

    fn meta(&self) -> Option<String> {
        Some(count_label(self.lesson_count(), "lesson"))
    }
}

impl Card for Lesson {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn topics(&self) -> &[String] {
        &self.topics
    }

    fn status(&self) -> Status {
        self.status
    }
}

fn count_label(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("1 {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

/// Renders one card per item, in input order, each linking to `{base_path}/{id}`.
pub fn render_card_list<C: Card>(base_path: &str, items: &[C]) -> String {
    let mut out = String::from("<ul class=\"cards\">\n");
    for item in items {
        out.push_str(&render_card(base_path, item));
    }
    out.push_str("</ul>\n");
    out
}

fn render_card<C: Card>(base_path: &str, item: &C) -> String {
    let status = item.status();
    let mut out = String::new();

    if status.is_locked() {
        out.push_str("<li class=\"card card--locked\" aria-disabled=\"true\">");
        out.push_str("<div class=\"card-link\">\n");
    } else {
        out.push_str(&format!(
            "<li class=\"card card--{}\"><a class=\"card-link\" href=\"{}/{}\">\n",
            status.as_str(),
            html_escape(base_path),
            html_escape(item.id())
        ));
    }

    out.push_str(&format!(
        "<h2 class=\"card-title\">{}</h2>\n",
        html_escape(item.title())
    ));
    out.push_str(&format!(
        "<p class=\"card-description\">{}</p>\n",
        html_escape(item.description())
    ));
    if let Some(meta) = item.meta() {
        out.push_str(&format!(
            "<p class=\"card-meta\">{}</p>\n",
            html_escape(&meta)
        ));
    }
    if !item.topics().is_empty() {
        out.push_str(&render_topics(item.topics()));
    }
    if status.is_locked() {
        out.push_str("<p class=\"card-status\">Locked</p>\n");
        out.push_str("</div></li>\n");
    } else {
        out.push_str("</a></li>\n");
    }
    out
}

fn render_topics(topics: &[String]) -> String {
    let mut out = String::from("<ul class=\"topics\">");
    for topic in topics {
        out.push_str(&format!("<li>{}</li>", html_escape(topic)));
    }
    out.push_str("</ul>\n");
    out
}

pub fn render_route(catalog: &Catalog, route: &Route) -> Result<String, CatalogError> {
    let page = route.resolve(catalog)?;
    Ok(render_page(catalog, &page))
}

pub fn render_page(catalog: &Catalog, page: &Page<'_>) -> String {
    let hub = Crumb::new(catalog.title(), Route::Hub);
    match *page {
        Page::Hub { sections } => {
            let mut body = format!("<h1>{}</h1>\n", html_escape(catalog.title()));
            if !catalog.intro().is_empty() {
                body.push_str(&format!(
                    "<p class=\"intro\">{}</p>\n",
                    html_escape(catalog.intro())
                ));
            }
            body.push_str(&render_card_list(LEARN_ROOT, sections));
            wrap_document(catalog.title(), &[], &body)
        }
        Page::Section(section) => {
            let route = Route::section(&section.id);
            let mut body = heading(&section.title, &section.description);
            body.push_str(&render_card_list(&route.path(), &section.chapters));
            wrap_document(&section.title, &[hub], &body)
        }
        Page::Chapter { section, chapter } => {
            let route = Route::chapter(&section.id, &chapter.id);
            let mut body = heading(&chapter.title, &chapter.description);
            body.push_str(&render_card_list(&route.path(), &chapter.lessons));
            let crumbs = [hub, Crumb::new(&section.title, Route::section(&section.id))];
            wrap_document(&chapter.title, &crumbs, &body)
        }
        Page::Lesson {
            section,
            chapter,
            lesson,
        } => {
            let mut body = heading(&lesson.title, &lesson.description);
            body.push_str("<h2>Topics</h2>\n");
            body.push_str(&render_topics(&lesson.topics));
            if let Some(md) = lesson.body.as_deref() {
                body.push_str("<article class=\"lesson-body\">\n");
                body.push_str(&markdown_to_html_fragment(md));
                body.push_str("</article>\n");
            }
            let crumbs = [
                hub,
                Crumb::new(&section.title, Route::section(&section.id)),
                Crumb::new(&chapter.title, Route::chapter(&section.id, &chapter.id)),
            ];
            wrap_document(&lesson.title, &crumbs, &body)
        }
    }
}

/// `path` names the missing page when known; the exported `404.html` passes `None`.
pub fn render_not_found(catalog: &Catalog, path: Option<&str>) -> String {
    let mut body = String::from("<h1>Page not found</h1>\n");
    match path {
        Some(path) => body.push_str(&format!(
            "<p>No page exists at <code>{}</code>.</p>\n",
            html_escape(path)
        )),
        None => body.push_str("<p>The page you asked for does not exist.</p>\n"),
    }
    body.push_str(&format!(
        "<p><a href=\"{LEARN_ROOT}\">Back to {}</a></p>\n",
        html_escape(catalog.title())
    ));
    wrap_document("Page not found", &[], &body)
}

fn heading(title: &str, description: &str) -> String {
    format!(
        "<h1>{}</h1>\n<p class=\"description\">{}</p>\n",
        html_escape(title),
        html_escape(description)
    )
}

struct Crumb<'a> {
    label: &'a str,
    route: Route,
}

impl<'a> Crumb<'a> {
    fn new(label: &'a str, route: Route) -> Self {
        Self { label, route }
    }
}

fn wrap_document(title: &str, crumbs: &[Crumb<'_>], body: &str) -> String {
    let mut out = String::new();
    out.push_str("<!doctype html>\n");
    out.push_str("<html lang=\"en\">\n");
    out.push_str("<head>\n");
    out.push_str("  <meta charset=\"utf-8\">\n");
    out.push_str("  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    out.push_str(&format!("  <title>{}</title>\n", html_escape(title)));
    out.push_str(&format!("  <style>{STYLE_CSS}</style>\n"));
    out.push_str("</head>\n");
    out.push_str("<body>\n");
    if !crumbs.is_empty() {
        out.push_str("<nav class=\"breadcrumbs\" aria-label=\"Breadcrumb\"><ol>");
        for crumb in crumbs {
            out.push_str(&format!(
                "<li><a href=\"{}\">{}</a></li>",
                html_escape(&crumb.route.path()),
                html_escape(crumb.label)
            ));
        }
        out.push_str("</ol></nav>\n");
    }
    out.push_str("<main>\n");
    out.push_str(body);
    out.push_str("</main>\n");
    out.push_str("</body>\n");
    out.push_str("</html>\n");
    out
}

fn markdown_to_html_fragment(md: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);

    let parser = Parser::new_ext(md, options);
    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, parser);
    html
}

pub fn html_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
