//! HTML templates.
//!
//! Templates are plain HTML files with two kinds of placeholder: `{{name}}`
//! is replaced with an HTML-escaped value, `{{{name}}}` with an already
//! rendered fragment. The files are embedded in the binary; a directory on
//! disk can be used instead while working on the markup.

use rust_embed::Embed;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use thiserror::Error;
use wallie_core::backlog::{Backlog, Group, Story};

#[derive(Embed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template not found: {0}")]
    NotFound(String),

    #[error("template '{template}' has no value for '{key}'")]
    MissingValue { template: String, key: String },

    #[error("template '{0}' is not valid UTF-8")]
    Encoding(String),

    #[error("template lock poisoned")]
    Poisoned,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum TemplateSource {
    Embedded,
    Directory(PathBuf),
}

// ---------------------------------------------------------------------------
// Templates: one immutable snapshot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Templates {
    sources: HashMap<String, String>,
}

impl Templates {
    pub fn load(source: &TemplateSource) -> Result<Self, TemplateError> {
        match source {
            TemplateSource::Embedded => Self::load_embedded(),
            TemplateSource::Directory(dir) => Self::load_dir(dir),
        }
    }

    fn load_embedded() -> Result<Self, TemplateError> {
        let mut sources = HashMap::new();
        for file in EmbeddedTemplates::iter() {
            let Some(content) = EmbeddedTemplates::get(&file) else {
                continue;
            };
            let text = String::from_utf8(content.data.into_owned())
                .map_err(|_| TemplateError::Encoding(file.to_string()))?;
            sources.insert(template_name(Path::new(file.as_ref())), text);
        }
        Ok(Self { sources })
    }

    fn load_dir(dir: &Path) -> Result<Self, TemplateError> {
        let mut sources = HashMap::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("html") {
                continue;
            }
            sources.insert(template_name(&path), std::fs::read_to_string(&path)?);
        }
        Ok(Self { sources })
    }

    pub fn from_sources<I, K, V>(sources: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            sources: sources
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn render(&self, name: &str, vars: &[(&str, &str)]) -> Result<String, TemplateError> {
        let source = self
            .sources
            .get(name)
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))?;
        substitute(name, source, vars)
    }

    // -- pages and fragments --

    pub fn login(&self, action: &str) -> Result<String, TemplateError> {
        self.render("login", &[("action", action)])
    }

    pub fn login_redirect(&self, target: &str) -> Result<String, TemplateError> {
        self.render("login_redirect", &[("target", target)])
    }

    pub fn story_card(&self, backlog: &Backlog, story: &Story) -> Result<String, TemplateError> {
        let link = backlog.link(story);
        self.render(
            "story_card",
            &[
                ("id", story.id.as_str()),
                ("title", story.title.as_str()),
                ("description", story.description.as_str()),
                ("author", story.author.as_str()),
                ("size", story.size.label()),
                ("link", link.as_str()),
            ],
        )
    }

    pub fn story_group(&self, backlog: &Backlog, group: &Group) -> Result<String, TemplateError> {
        let mut cards = String::new();
        for story in &group.stories {
            cards.push_str(&self.story_card(backlog, story)?);
        }
        let count = group.stories.len().to_string();
        self.render(
            "story_group",
            &[
                ("name", group.name.heading()),
                ("size", group.name.label()),
                ("count", count.as_str()),
                ("cards", cards.as_str()),
            ],
        )
    }

    pub fn backlog_estimation(&self, backlog: &Backlog) -> Result<String, TemplateError> {
        let groups = self.groups(backlog)?;
        self.render(
            "backlog_estimation",
            &[("project", backlog.project.as_str()), ("groups", groups.as_str())],
        )
    }

    pub fn story_estimate_dialogue(&self, backlog: &Backlog) -> Result<String, TemplateError> {
        let mut sizes = String::new();
        for size in backlog.sizes() {
            sizes.push_str(&self.render(
                "size_option",
                &[("size", size.label()), ("name", size.heading())],
            )?);
        }
        self.render(
            "story_estimate_dialogue",
            &[("project", backlog.project.as_str()), ("sizes", sizes.as_str())],
        )
    }

    /// Full estimation page: the board plus the edit dialogue.
    pub fn story_estimation_page(&self, backlog: &Backlog) -> Result<String, TemplateError> {
        let board = self.backlog_estimation(backlog)?;
        let dialogue = self.story_estimate_dialogue(backlog)?;
        self.render(
            "story_estimation_page",
            &[
                ("project", backlog.project.as_str()),
                ("board", board.as_str()),
                ("dialogue", dialogue.as_str()),
            ],
        )
    }

    pub fn sizing_board(&self, backlog: &Backlog) -> Result<String, TemplateError> {
        let groups = self.groups(backlog)?;
        let total = backlog.stories.len().to_string();
        self.render(
            "sizing_board",
            &[
                ("project", backlog.project.as_str()),
                ("total", total.as_str()),
                ("groups", groups.as_str()),
            ],
        )
    }

    pub fn flow(&self) -> Result<String, TemplateError> {
        self.render("flow", &[])
    }

    fn groups(&self, backlog: &Backlog) -> Result<String, TemplateError> {
        let mut out = String::new();
        for group in backlog.by_size() {
            out.push_str(&self.story_group(backlog, &group)?);
        }
        Ok(out)
    }
}

fn template_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string()
}

fn substitute(name: &str, source: &str, vars: &[(&str, &str)]) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let (raw, open, close) = if tail.starts_with("{{{") {
            (true, 3, "}}}")
        } else {
            (false, 2, "}}")
        };
        let Some(len) = tail[open..].find(close) else {
            out.push_str(tail);
            return Ok(out);
        };

        let key = tail[open..open + len].trim();
        let value = vars
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
            .ok_or_else(|| TemplateError::MissingValue {
                template: name.to_string(),
                key: key.to_string(),
            })?;
        if raw {
            out.push_str(value);
        } else {
            out.push_str(&escape(value));
        }
        rest = &tail[open + len + close.len()..];
    }

    out.push_str(rest);
    Ok(out)
}

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// TemplateProvider: shared handle with explicit reload
// ---------------------------------------------------------------------------

/// Hands out template snapshots to handlers.
///
/// A reload builds a complete new snapshot and swaps it in; a snapshot that
/// a handler already holds never changes underneath it.
#[derive(Debug)]
pub struct TemplateProvider {
    source: TemplateSource,
    always_reload: bool,
    current: RwLock<Arc<Templates>>,
}

impl TemplateProvider {
    pub fn new(source: TemplateSource, always_reload: bool) -> Result<Self, TemplateError> {
        let templates = Templates::load(&source)?;
        Ok(Self {
            source,
            always_reload,
            current: RwLock::new(Arc::new(templates)),
        })
    }

    /// Current snapshot, reloaded first when `always_reload` is set.
    pub fn current(&self) -> Result<Arc<Templates>, TemplateError> {
        if self.always_reload {
            return self.reload();
        }
        let guard = self.current.read().map_err(|_| TemplateError::Poisoned)?;
        Ok(Arc::clone(&guard))
    }

    pub fn reload(&self) -> Result<Arc<Templates>, TemplateError> {
        let fresh = Arc::new(Templates::load(&self.source)?);
        let mut guard = self.current.write().map_err(|_| TemplateError::Poisoned)?;
        *guard = Arc::clone(&fresh);
        tracing::debug!(source = ?self.source, "templates reloaded");
        Ok(fresh)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use wallie_core::size::Size;

    fn embedded() -> Templates {
        Templates::load(&TemplateSource::Embedded).unwrap()
    }

    fn nathan_story() -> Story {
        Story {
            author: "Nathan Fisher".into(),
            description: "something something something blah blah blah".into(),
            id: "ABC-1234".into(),
            size: Size::ExtraExtraLarge,
            title: "Create service skeleton".into(),
        }
    }

    fn contains_attr(component: &str, key: &str, value: &str) -> bool {
        component.contains(&format!(r#"{key}="{value}""#))
    }

    #[test]
    fn all_named_templates_are_embedded() {
        let t = embedded();
        for name in [
            "login",
            "login_redirect",
            "backlog_estimation",
            "story_group",
            "story_card",
            "story_estimate_dialogue",
            "size_option",
            "story_estimation_page",
            "sizing_board",
            "flow",
        ] {
            assert!(t.sources.contains_key(name), "missing template {name}");
        }
    }

    #[test]
    fn substitutes_escaped_and_raw_values() {
        let t = Templates::from_sources([("page", "<p>{{ text }}</p>{{{html}}}")]);
        let out = t
            .render("page", &[("text", "<b>&\"'"), ("html", "<i>ok</i>")])
            .unwrap();
        assert_eq!(out, "<p>&lt;b&gt;&amp;&#34;&#39;</p><i>ok</i>");
    }

    #[test]
    fn inserted_values_are_not_expanded_again() {
        let t = Templates::from_sources([("page", "{{a}}|{{b}}")]);
        let out = t.render("page", &[("a", "{{b}}"), ("b", "x")]).unwrap();
        assert_eq!(out, "{{b}}|x");
    }

    #[test]
    fn missing_value_is_an_error() {
        let t = Templates::from_sources([("page", "{{nope}}")]);
        assert!(matches!(
            t.render("page", &[]),
            Err(TemplateError::MissingValue { .. })
        ));
        assert!(matches!(t.render("other", &[]), Err(TemplateError::NotFound(_))));
    }

    #[test]
    fn unterminated_placeholder_is_left_alone() {
        let t = Templates::from_sources([("page", "a {{ b")]);
        assert_eq!(t.render("page", &[]).unwrap(), "a {{ b");
    }

    #[test]
    fn dialogue_offers_six_sizes_and_one_textarea() {
        let backlog = Backlog {
            project: "Wallie".into(),
            ..Backlog::default()
        };
        let component = embedded().story_estimate_dialogue(&backlog).unwrap();
        assert_eq!(component.matches(r#"class="column""#).count(), 6);
        assert_eq!(component.matches("<textarea").count(), 1);
        assert_eq!(component.matches("<input").count(), 2);
    }

    #[test]
    fn backlog_renders_seven_columns() {
        let backlog = Backlog {
            project: "Wallie".into(),
            ..Backlog::default()
        };
        let component = embedded().backlog_estimation(&backlog).unwrap();
        assert_eq!(component.matches(r#"class="column""#).count(), 7);
    }

    #[test]
    fn group_shows_heading_and_cards() {
        let backlog = Backlog::default();
        let group = Group {
            name: Size::ExtraExtraLarge,
            stories: vec![nathan_story()],
        };
        let component = embedded().story_group(&backlog, &group).unwrap();
        assert!(component.contains("XXL"));
        assert!(contains_attr(&component, "data-author", "Nathan Fisher"));
    }

    #[test]
    fn card_carries_story_attributes() {
        let story = nathan_story();
        let backlog = Backlog {
            base_url: "https://jira.example.com/browse/".into(),
            ..Backlog::default()
        };
        let component = embedded().story_card(&backlog, &story).unwrap();
        for (key, value) in [
            ("data-author", story.author.as_str()),
            ("data-description", story.description.as_str()),
            ("data-id", story.id.as_str()),
            ("data-size", story.size.label()),
            ("data-title", story.title.as_str()),
            ("href", "https://jira.example.com/browse/ABC-1234"),
        ] {
            assert!(contains_attr(&component, key, value), "missing {key}");
        }
    }

    #[test]
    fn card_escapes_story_text() {
        let mut story = nathan_story();
        story.title = r#"<script>alert("x")</script>"#.into();
        let component = embedded().story_card(&Backlog::default(), &story).unwrap();
        assert!(!component.contains("<script>"));
    }

    #[test]
    fn provider_reload_picks_up_directory_changes() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("flow.html"), "v1").unwrap();
        let provider =
            TemplateProvider::new(TemplateSource::Directory(dir.path().to_path_buf()), false)
                .unwrap();
        let before = provider.current().unwrap();

        std::fs::write(dir.path().join("flow.html"), "v2").unwrap();
        assert_eq!(provider.current().unwrap().flow().unwrap(), "v1");

        provider.reload().unwrap();
        assert_eq!(provider.current().unwrap().flow().unwrap(), "v2");
        assert_eq!(before.flow().unwrap(), "v1");
    }

    #[test]
    fn always_reload_reads_fresh_on_every_call() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("flow.html"), "v1").unwrap();
        let provider =
            TemplateProvider::new(TemplateSource::Directory(dir.path().to_path_buf()), true)
                .unwrap();
        std::fs::write(dir.path().join("flow.html"), "v2").unwrap();
        assert_eq!(provider.current().unwrap().flow().unwrap(), "v2");
    }
}
