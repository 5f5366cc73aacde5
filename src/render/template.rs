//! Minimal template engine for manifest fragments
//!
//! Supported actions:
//! - `{{ .name }}` substitutes `vars["name"]`
//! - `{{/* ... */}}` is removed
//! - `{{-` trims whitespace before the action, `-}}` trims whitespace after it
//!
//! Any other action is copied to the output unchanged so that the post-render
//! guard rejects it.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

static VARIABLE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\.([A-Za-z_][A-Za-z0-9_]*)$").ok());

/// Template failure without file context
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unclosed action starting on line {line}")]
    UnclosedAction { line: usize },

    #[error("unclosed comment starting on line {line}")]
    UnclosedComment { line: usize },

    #[error("comment ends before closing delimiter on line {line}")]
    CommentNotClosed { line: usize },

    #[error("map has no entry for key \"{name}\"")]
    UndefinedVariable { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Variable(String),
    Verbatim(String),
}

/// A parsed template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parse template source
    ///
    /// Fails only on unterminated actions and comments.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut parser = Parser::default();
        let mut rest = source;
        let mut consumed = 0;

        while let Some(start) = rest.find(OPEN) {
            parser.text(&rest[..start]);
            let line = line_of(source, consumed + start);
            let action = &rest[start..];
            let len = parser.action(action, line)?;
            consumed += start + len;
            rest = &rest[start + len..];
        }
        parser.text(rest);

        Ok(Self {
            segments: parser.segments,
        })
    }

    /// Render against `vars`
    pub fn render(&self, vars: &BTreeMap<String, String>) -> Result<String, TemplateError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) | Segment::Verbatim(text) => out.push_str(text),
                Segment::Variable(name) => {
                    let value = vars
                        .get(name)
                        .ok_or_else(|| TemplateError::UndefinedVariable { name: name.clone() })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }

    /// Variable names referenced, in order of first use
    pub fn variables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Variable(name) = segment {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }
}

#[derive(Default)]
struct Parser {
    segments: Vec<Segment>,
    trim_next: bool,
}

impl Parser {
    fn text(&mut self, text: &str) {
        let text = if std::mem::take(&mut self.trim_next) {
            text.trim_start()
        } else {
            text
        };
        if !text.is_empty() {
            self.segments.push(Segment::Text(text.to_string()));
        }
    }

    fn trim_previous(&mut self) {
        if let Some(Segment::Text(text)) = self.segments.last_mut() {
            let trimmed = text.trim_end().len();
            text.truncate(trimmed);
            if text.is_empty() {
                self.segments.pop();
            }
        }
    }

    /// Consume one action at the start of `source`, returning its byte length
    fn action(&mut self, source: &str, line: usize) -> Result<usize, TemplateError> {
        let inner = &source[OPEN.len()..];
        let left_trim = has_left_trim(inner);
        let body_start = if left_trim { 1 } else { 0 };

        if inner[body_start..].trim_start().starts_with("/*") {
            return self.comment(source, left_trim, line);
        }

        let close = inner
            .find(CLOSE)
            .ok_or(TemplateError::UnclosedAction { line })?;
        let len = OPEN.len() + close + CLOSE.len();
        let raw = &inner[..close];
        let right_trim = has_right_trim(raw);
        let body_end = if right_trim { raw.len() - 1 } else { raw.len() };
        let body = raw[body_start..body_end].trim();

        let variable = VARIABLE
            .as_ref()
            .and_then(|re| re.captures(body))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string());

        match variable {
            Some(name) => {
                if left_trim {
                    self.trim_previous();
                }
                self.segments.push(Segment::Variable(name));
                self.trim_next = right_trim;
            }
            None => {
                self.trim_next = false;
                self.segments
                    .push(Segment::Verbatim(source[..len].to_string()));
            }
        }
        Ok(len)
    }

    fn comment(&mut self, source: &str, left_trim: bool, line: usize) -> Result<usize, TemplateError> {
        let end = source
            .find("*/")
            .ok_or(TemplateError::UnclosedComment { line })?;
        let after = &source[end + 2..];
        let tail = after.trim_start();
        let right_trim = tail.starts_with('-') && tail[1..].starts_with(CLOSE) && tail.len() < after.len();
        let close_at = if right_trim { 1 } else { 0 };
        if !tail[close_at..].starts_with(CLOSE) {
            return Err(TemplateError::CommentNotClosed { line });
        }

        if left_trim {
            self.trim_previous();
        }
        self.trim_next = right_trim;
        Ok(source.len() - tail.len() + close_at + CLOSE.len())
    }
}

fn has_left_trim(inner: &str) -> bool {
    let mut chars = inner.chars();
    chars.next() == Some('-') && chars.next().is_some_and(char::is_whitespace)
}

fn has_right_trim(raw: &str) -> bool {
    let mut chars = raw.chars().rev();
    chars.next() == Some('-') && chars.next().is_some_and(char::is_whitespace)
}

fn line_of(source: &str, offset: usize) -> usize {
    source[..offset].matches('\n').count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn render(source: &str, pairs: &[(&str, &str)]) -> Result<String, TemplateError> {
        Template::parse(source)?.render(&vars(pairs))
    }

    #[test]
    fn test_substitutes_variables() {
        let out = render(
            "namespace: {{ .namespace }}\nimage: {{.registry}}/cache\n",
            &[("namespace", "dev"), ("registry", "hub.local")],
        )
        .unwrap();
        assert_eq!(out, "namespace: dev\nimage: hub.local/cache\n");
    }

    #[test]
    fn test_plain_text_is_unchanged() {
        let source = "apiVersion: v1\nkind: ConfigMap\n";
        assert_eq!(render(source, &[]).unwrap(), source);
    }

    #[test]
    fn test_undefined_variable() {
        let err = render("a: {{ .missing }}", &[]).unwrap_err();
        assert_eq!(
            err,
            TemplateError::UndefinedVariable {
                name: "missing".to_string()
            }
        );
    }

    #[test]
    fn test_unclosed_action_reports_line() {
        let err = Template::parse("a: 1\nb: {{ .x\n").unwrap_err();
        assert_eq!(err, TemplateError::UnclosedAction { line: 2 });
    }

    #[test]
    fn test_comments_are_removed() {
        let out = render("a{{/* note {{ */}}b{{- /* trimmed */ -}}  \n c", &[]).unwrap();
        assert_eq!(out, "abc");
    }

    #[test]
    fn test_unclosed_comment() {
        let err = Template::parse("{{/* never closed").unwrap_err();
        assert_eq!(err, TemplateError::UnclosedComment { line: 1 });
    }

    #[test]
    fn test_comment_without_delimiter() {
        let err = Template::parse("{{/* note */ .x }}").unwrap_err();
        assert_eq!(err, TemplateError::CommentNotClosed { line: 1 });
    }

    #[test]
    fn test_trim_markers() {
        let out = render("key:   {{- .v -}}  \n next", &[("v", "x")]).unwrap();
        assert_eq!(out, "key:xnext");
    }

    #[test]
    fn test_dash_without_space_is_not_a_trim_marker() {
        let out = render("k: {{.v}}-", &[("v", "1")]).unwrap();
        assert_eq!(out, "k: 1-");
    }

    #[test]
    fn test_unknown_actions_are_left_verbatim() {
        let source = "{{ if .debug }}on{{ end }} {{ .a.b }}";
        let out = render(source, &[("debug", "true")]).unwrap();
        assert_eq!(out, source);
    }

    #[test]
    fn test_variables_in_first_use_order() {
        let template = Template::parse("{{ .b }} {{ .a }} {{ .b }}").unwrap();
        assert_eq!(template.variables(), vec!["b", "a"]);
    }
}
