use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::assembler::sources::SourceStore;
use crate::foundation::error::{PlasmaError, PlasmaResult};

/// Placeholder substitutions for one fragment. Keys match `<KEY>` case-insensitively.
pub type TemplateArgs = BTreeMap<String, String>;

pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 10;

const ANNOTATION: &str = "//////////";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DirectiveKind {
    Include,
    ApplyTemplate,
}

impl DirectiveKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Include => "#include",
            Self::ApplyTemplate => "#apply_template",
        }
    }
}

#[derive(Debug)]
struct Directive<'a> {
    kind: DirectiveKind,
    name: &'a str,
    args: Option<&'a str>,
}

/// Resolves `#include` / `#apply_template` directives and `<PLACEHOLDER>` tokens into a
/// single program text.
///
/// Each `(fragment, arguments)` pair is emitted once per resolution; later requests for the
/// same pair expand to nothing.
pub struct TemplateResolver<'a> {
    store: &'a dyn SourceStore,
    max_include_depth: usize,
    annotate_sources: bool,
}

#[derive(Default)]
struct ResolveState {
    included: HashSet<(String, TemplateArgs)>,
    path: Vec<String>,
}

impl<'a> TemplateResolver<'a> {
    pub fn new(store: &'a dyn SourceStore) -> Self {
        Self {
            store,
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
            annotate_sources: false,
        }
    }

    pub fn with_max_include_depth(mut self, depth: usize) -> Self {
        self.max_include_depth = depth;
        self
    }

    /// Wrap every resolved fragment in `FILE` / `END FILE` comments.
    pub fn with_annotations(mut self, on: bool) -> Self {
        self.annotate_sources = on;
        self
    }

    #[tracing::instrument(skip(self, args), fields(args = args.len()))]
    pub fn resolve(&self, name: &str, args: &TemplateArgs) -> PlasmaResult<String> {
        let mut state = ResolveState::default();
        self.include(name, args, 1, &mut state)
    }

    fn include(
        &self,
        name: &str,
        args: &TemplateArgs,
        depth: usize,
        state: &mut ResolveState,
    ) -> PlasmaResult<String> {
        if depth > self.max_include_depth {
            return Err(PlasmaError::assembly(format!(
                "maximum include depth of {} exceeded while including '{name}'",
                self.max_include_depth
            )));
        }

        let key = (name.to_owned(), args.clone());
        if state.included.contains(&key) {
            tracing::debug!(fragment = name, "skipping already included fragment");
            return Ok(String::new());
        }

        if name.contains(['*', '?']) {
            return self.include_wildcard(name, args, depth, state);
        }

        let content = self.store.load(name)?;
        let content = apply_template_args(&content, args).map_err(|e| {
            PlasmaError::assembly(format!("error applying template arguments in '{name}': {e}"))
        })?;

        state.path.push(name.to_owned());
        state.included.insert(key);
        let body = self.expand_directives(&content, depth, state)?;
        state.path.pop();

        tracing::debug!(fragment = name, depth, "resolved fragment");

        if self.annotate_sources {
            let mut out = format!("\n{ANNOTATION} FILE: \"{name}\"\n");
            if !args.is_empty() {
                out.push_str(&format!("{ANNOTATION} {}\n", format_args_list(args)));
            }
            out.push('\n');
            out.push_str(&body);
            out.push_str(&format!("\n{ANNOTATION} END FILE: \"{name}\"\n"));
            return Ok(out);
        }
        Ok(body)
    }

    fn include_wildcard(
        &self,
        pattern: &str,
        args: &TemplateArgs,
        depth: usize,
        state: &mut ResolveState,
    ) -> PlasmaResult<String> {
        tracing::debug!(pattern, "resolving wildcard include");
        let mut parts = Vec::new();
        for name in self.store.list()? {
            if wildcard_match(pattern, &name) {
                parts.push(self.include(&name, args, depth, state)?);
            }
        }
        Ok(parts.join("\n\n"))
    }

    fn expand_directives(
        &self,
        content: &str,
        depth: usize,
        state: &mut ResolveState,
    ) -> PlasmaResult<String> {
        let mut out = String::with_capacity(content.len());
        for line in content.split_inclusive('\n') {
            let Some(directive) = parse_directive(line).map_err(|e| self.in_parent(state, line, &e))?
            else {
                out.push_str(line);
                continue;
            };

            tracing::debug!(
                directive = directive.kind.as_str(),
                fragment = directive.name,
                "found directive"
            );

            let args = match (directive.kind, directive.args) {
                (DirectiveKind::Include, Some(_)) => {
                    return Err(self.in_parent(
                        state,
                        line,
                        "template arguments are not allowed for #include directive",
                    ));
                }
                (DirectiveKind::ApplyTemplate, None) => {
                    return Err(self.in_parent(
                        state,
                        line,
                        "missing template arguments for #apply_template directive",
                    ));
                }
                (_, Some(text)) => {
                    parse_template_args(text).map_err(|e| self.in_parent(state, line, &e))?
                }
                (_, None) => TemplateArgs::new(),
            };

            if state.path.iter().any(|p| p == directive.name) {
                return Err(self.in_parent(state, line, "circular include detected"));
            }

            let body = self.include(directive.name, &args, depth + 1, state)?;
            out.push_str(&body);
            if line.ends_with('\n') && !body.ends_with('\n') {
                out.push('\n');
            }
        }
        Ok(out)
    }

    fn in_parent(&self, state: &ResolveState, line: &str, msg: &str) -> PlasmaError {
        let parent = state.path.last().map(String::as_str).unwrap_or("<root>");
        PlasmaError::assembly(format!("error in '{parent}': {msg}\n  {}", line.trim_end()))
    }
}

fn format_args_list(args: &TemplateArgs) -> String {
    args.iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn is_word(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(is_word_byte)
}

/// Recognize a directive line. Lines starting with other `#` words are plain text.
fn parse_directive(line: &str) -> Result<Option<Directive<'_>>, String> {
    let trimmed = line.trim_start();
    if !trimmed.starts_with('#') {
        return Ok(None);
    }
    let word_end = trimmed
        .find(|c: char| c.is_whitespace() || c == '"')
        .unwrap_or(trimmed.len());
    let word = &trimmed[..word_end];
    let kind = if word.eq_ignore_ascii_case("#include") {
        DirectiveKind::Include
    } else if word.eq_ignore_ascii_case("#apply_template") {
        DirectiveKind::ApplyTemplate
    } else {
        return Ok(None);
    };

    let after = trimmed[word_end..].trim_start();
    let Some(quoted) = after.strip_prefix('"') else {
        return Err(format!("malformed {} directive: expected a quoted name", kind.as_str()));
    };
    let Some(close) = quoted.find('"') else {
        return Err(format!("malformed {} directive: unterminated name", kind.as_str()));
    };
    let name = quoted[..close].trim();
    if name.is_empty() {
        return Err(format!("malformed {} directive: empty name", kind.as_str()));
    }
    let args = quoted[close + 1..]
        .trim_start()
        .strip_prefix(',')
        .map(str::trim)
        .filter(|a| !a.is_empty());

    Ok(Some(Directive { kind, name, args }))
}

/// Parse `KEY=VALUE, KEY=VALUE`. Keys and values must be identifiers.
fn parse_template_args(text: &str) -> Result<TemplateArgs, String> {
    let mut out = TemplateArgs::new();
    for pair in text.split(',') {
        let Some((k, v)) = pair.split_once('=') else {
            return Err(format!("malformed template argument '{}'", pair.trim()));
        };
        let (k, v) = (k.trim(), v.trim());
        if !is_word(k) || !is_word(v) {
            return Err(format!("malformed template argument '{}'", pair.trim()));
        }
        if out.insert(k.to_owned(), v.to_owned()).is_some() {
            return Err(format!("duplicate template argument '{k}'"));
        }
    }
    Ok(out)
}

/// Replace every `<WORD>` with its argument. Unmatched placeholders and unused arguments are
/// both errors.
pub(crate) fn apply_template_args(content: &str, args: &TemplateArgs) -> Result<String, String> {
    let lookup: BTreeMap<String, &str> = args
        .iter()
        .map(|(k, v)| (k.to_ascii_lowercase(), v.as_str()))
        .collect();
    let mut found = BTreeSet::new();

    let bytes = content.as_bytes();
    let mut out = String::with_capacity(content.len());
    let mut copied = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'<' {
            let start = i + 1;
            let mut end = start;
            while end < bytes.len() && is_word_byte(bytes[end]) {
                end += 1;
            }
            if end > start && end < bytes.len() && bytes[end] == b'>' {
                let key = content[start..end].to_ascii_lowercase();
                let Some(value) = lookup.get(&key) else {
                    return Err(format!(
                        "unmatched placeholder detected: <{}>",
                        &content[start..end]
                    ));
                };
                out.push_str(&content[copied..i]);
                out.push_str(value);
                found.insert(key);
                i = end + 1;
                copied = i;
                continue;
            }
        }
        i += 1;
    }
    out.push_str(&content[copied..]);

    let unused: Vec<&str> = lookup
        .keys()
        .filter(|k| !found.contains(*k))
        .map(String::as_str)
        .collect();
    if !unused.is_empty() {
        return Err(format!("unused template arguments: {}", unused.join(", ")));
    }
    Ok(out)
}

/// Glob match supporting `*` (any run, including `/`) and `?` (one character).
pub(crate) fn wildcard_match(pattern: &str, name: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let n: Vec<char> = name.chars().collect();
    let (mut pi, mut ni) = (0, 0);
    let mut star: Option<(usize, usize)> = None;
    while ni < n.len() {
        if pi < p.len() && (p[pi] == '?' || p[pi] == n[ni]) {
            pi += 1;
            ni += 1;
        } else if pi < p.len() && p[pi] == '*' {
            star = Some((pi, ni));
            pi += 1;
        } else if let Some((sp, sn)) = star {
            pi = sp + 1;
            ni = sn + 1;
            star = Some((sp, sn + 1));
        } else {
            return false;
        }
    }
    p[pi..].iter().all(|&c| c == '*')
}

#[cfg(test)]
#[path = "../../tests/unit/assembler/template.rs"]
mod tests;
