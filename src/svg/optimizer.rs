//! Structural SVG optimizer.
//!
//! Two passes over the token stream. The first collects id definitions and
//! references; the second writes a compacted document:
//!
//! - drops comments, the XML declaration, doctype, processing instructions,
//!   `<metadata>` and editor (`inkscape:`, `sodipodi:`) elements/attributes
//! - drops whitespace-only text outside text content
//! - root: strips `width`/`height`, keeps or derives `viewBox`, adds the
//!   optional `aria-label`
//! - renames referenced ids to `svg-a`, `svg-b`, … and rewrites `#id`,
//!   `url(#id)` and `aria-labelledby`/`aria-describedby` references;
//!   unreferenced ids are removed, ids named in a stylesheet are left alone
//! - converts concrete `fill`/`stroke` colours to `currentColor`
//! - minifies `<style>` text
//!
//! `<title>` and `<desc>` are kept.

use super::{SvgError, xml_err};
use crate::config::SvgConfig;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesCData, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::collections::{HashMap, HashSet};

/// Per-call optimizer settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizeOptions {
    pub id_prefix: String,
    pub current_color: bool,
    pub aria_label: Option<String>,
}

impl OptimizeOptions {
    /// Settings for the favicon SVG.
    pub fn favicon(config: &SvgConfig) -> Self {
        Self {
            current_color: config.current_color,
            aria_label: config.aria_label.clone().filter(|l| !l.is_empty()),
            ..Self::default()
        }
    }
}

impl Default for OptimizeOptions {
    fn default() -> Self {
        Self {
            id_prefix: "svg-".to_string(),
            current_color: true,
            aria_label: None,
        }
    }
}

/// Rewrites SVG markup into a smaller equivalent.
pub trait SvgOptimizer: Sync {
    fn optimize(&self, svg: &str, options: &OptimizeOptions) -> Result<String, SvgError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralOptimizer;

impl StructuralOptimizer {
    pub fn new() -> Self {
        Self
    }
}

impl SvgOptimizer for StructuralOptimizer {
    fn optimize(&self, svg: &str, options: &OptimizeOptions) -> Result<String, SvgError> {
        let refs = collect_references(svg)?;
        let ids = IdMap::build(&refs, &options.id_prefix);
        rewrite(svg, &ids, options)
    }
}

// =============================================================================
// Pass 1: references
// =============================================================================

#[derive(Debug, Default)]
struct References {
    /// In document order.
    defined: Vec<String>,
    referenced: HashSet<String>,
    styled: HashSet<String>,
}

fn collect_references(svg: &str) -> Result<References, SvgError> {
    let mut reader = Reader::from_str(svg);
    let mut refs = References::default();
    let mut in_style = false;

    loop {
        match reader.read_event().map_err(xml_err)? {
            Event::Start(e) | Event::Empty(e) => {
                if e.local_name().as_ref() == b"style" {
                    in_style = true;
                }
                for attr in e.attributes() {
                    let attr = attr.map_err(xml_err)?;
                    let key = attr.key.as_ref();
                    let value = attr.unescape_value().map_err(xml_err)?;
                    if key == b"id" {
                        refs.defined.push(value.to_string());
                    } else if is_href(key) {
                        if let Some(id) = value.strip_prefix('#') {
                            refs.referenced.insert(id.to_string());
                        }
                    } else if is_id_list(key) {
                        refs.referenced
                            .extend(value.split_whitespace().map(str::to_string));
                    }
                    map_url_refs(&value, |id| {
                        refs.referenced.insert(id.to_string());
                        None
                    });
                }
            }
            Event::End(e) if e.local_name().as_ref() == b"style" => in_style = false,
            Event::Text(t) if in_style => {
                let css = t.unescape().map_err(xml_err)?;
                refs.styled.extend(hash_idents(&css));
            }
            Event::CData(t) if in_style => {
                refs.styled.extend(hash_idents(&String::from_utf8_lossy(&t)));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(refs)
}

fn is_href(key: &[u8]) -> bool {
    key == b"href" || key == b"xlink:href"
}

/// Attributes holding a space-separated list of bare ids.
fn is_id_list(key: &[u8]) -> bool {
    key == b"aria-labelledby" || key == b"aria-describedby"
}

/// `#ident` tokens in CSS text.
fn hash_idents(css: &str) -> Vec<String> {
    css.split('#')
        .skip(1)
        .map(|rest| {
            rest.chars()
                .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
                .collect::<String>()
        })
        .filter(|s| !s.is_empty())
        .collect()
}

/// Apply `f` to every `url(#id)` target in `value`, replacing the id when
/// `f` returns `Some`. Quoted forms `url('#id')` are handled.
fn map_url_refs(value: &str, mut f: impl FnMut(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(pos) = rest.find("url(") {
        let after = pos + "url(".len();
        let inner = &rest[after..];
        let skip = inner.len()
            - inner
                .trim_start_matches(|c: char| c == '\'' || c == '"' || c.is_whitespace())
                .len();
        out.push_str(&rest[..after + skip]);
        let tail = &inner[skip..];
        match tail.strip_prefix('#') {
            Some(target) => {
                let end = target
                    .find(|c: char| c == ')' || c == '\'' || c == '"' || c.is_whitespace())
                    .unwrap_or(target.len());
                let id = &target[..end];
                out.push('#');
                match f(id) {
                    Some(new) => out.push_str(&new),
                    None => out.push_str(id),
                }
                rest = &target[end..];
            }
            None => rest = tail,
        }
    }
    out.push_str(rest);
    out
}

// =============================================================================
// Id renaming
// =============================================================================

#[derive(Debug, Default)]
struct IdMap {
    renamed: HashMap<String, String>,
    kept: HashSet<String>,
}

impl IdMap {
    fn build(refs: &References, prefix: &str) -> Self {
        let mut map = IdMap {
            kept: refs
                .defined
                .iter()
                .filter(|id| refs.styled.contains(*id))
                .cloned()
                .collect(),
            ..IdMap::default()
        };

        let mut next = 0usize;
        for id in &refs.defined {
            if map.kept.contains(id)
                || map.renamed.contains_key(id)
                || !refs.referenced.contains(id)
            {
                continue;
            }
            let name = loop {
                let candidate = format!("{prefix}{}", short_name(next));
                next += 1;
                if !map.kept.contains(&candidate) {
                    break candidate;
                }
            };
            map.renamed.insert(id.clone(), name);
        }
        map
    }

    /// New value for an `id` attribute, or `None` to drop it.
    fn resolve(&self, id: &str) -> Option<String> {
        if self.kept.contains(id) {
            return Some(id.to_string());
        }
        self.renamed.get(id).cloned()
    }

    fn rewrite_href(&self, value: &str) -> String {
        match value.strip_prefix('#').and_then(|id| self.renamed.get(id)) {
            Some(new) => format!("#{new}"),
            None => value.to_string(),
        }
    }

    fn rewrite_id_list(&self, value: &str) -> String {
        value
            .split_whitespace()
            .map(|id| self.renamed.get(id).map_or(id, String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn rewrite_urls(&self, value: &str) -> String {
        map_url_refs(value, |id| self.renamed.get(id).cloned())
    }
}

/// 0 → `a`, 25 → `z`, 26 → `aa`, …
fn short_name(mut n: usize) -> String {
    let mut out = String::new();
    loop {
        out.insert(0, (b'a' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    out
}

// =============================================================================
// Pass 2: rewrite
// =============================================================================

fn is_editor_name(name: &[u8]) -> bool {
    name.starts_with(b"inkscape:") || name.starts_with(b"sodipodi:")
}

fn is_editor_attr(key: &[u8]) -> bool {
    is_editor_name(key) || key == b"xmlns:inkscape" || key == b"xmlns:sodipodi"
}

fn is_removed_element(e: &BytesStart<'_>) -> bool {
    e.local_name().as_ref() == b"metadata" || is_editor_name(e.name().as_ref())
}

/// Elements whose whitespace is content.
fn is_text_content(name: &[u8]) -> bool {
    matches!(
        name,
        b"text" | b"tspan" | b"textPath" | b"title" | b"desc"
    )
}

fn is_concrete_color(value: &str) -> bool {
    let v = value.trim().to_ascii_lowercase();
    !(v.is_empty()
        || matches!(
            v.as_str(),
            "none"
                | "currentcolor"
                | "inherit"
                | "initial"
                | "unset"
                | "transparent"
                | "context-fill"
                | "context-stroke"
        )
        || v.starts_with("url(")
        || v.starts_with("var("))
}

fn parse_length(value: &str) -> Option<f64> {
    let v = value.trim().trim_end_matches("px");
    v.parse::<f64>().ok().filter(|n| *n > 0.0)
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

fn rewrite_element(
    e: &BytesStart<'_>,
    is_root: bool,
    ids: &IdMap,
    options: &OptimizeOptions,
) -> Result<BytesStart<'static>, SvgError> {
    let name = std::str::from_utf8(e.name().as_ref())
        .map_err(xml_err)?
        .to_string();

    let mut attrs: Vec<(String, String)> = Vec::new();
    let mut width = None;
    let mut height = None;
    let mut has_view_box = false;
    let mut has_label = false;

    for attr in e.attributes() {
        let attr = attr.map_err(xml_err)?;
        let key_bytes = attr.key.as_ref();
        if is_editor_attr(key_bytes) {
            continue;
        }
        let key = std::str::from_utf8(key_bytes).map_err(xml_err)?.to_string();
        let value = attr.unescape_value().map_err(xml_err)?.into_owned();

        if is_root && (key == "width" || key == "height") {
            if key == "width" {
                width = Some(value);
            } else {
                height = Some(value);
            }
            continue;
        }
        has_view_box |= key == "viewBox";
        has_label |= key == "aria-label";

        let value = match key.as_str() {
            "id" => match ids.resolve(&value) {
                Some(id) => id,
                None => continue,
            },
            "href" | "xlink:href" => ids.rewrite_href(&value),
            "aria-labelledby" | "aria-describedby" => ids.rewrite_id_list(&value),
            "fill" | "stroke" if options.current_color && is_concrete_color(&value) => {
                "currentColor".to_string()
            }
            _ => ids.rewrite_urls(&value),
        };
        attrs.push((key, value));
    }

    if is_root {
        if !has_view_box {
            let w = width.as_deref().and_then(parse_length);
            let h = height.as_deref().and_then(parse_length);
            match (w, h) {
                (Some(w), Some(h)) => attrs.push((
                    "viewBox".to_string(),
                    format!("0 0 {} {}", format_number(w), format_number(h)),
                )),
                // Without a viewBox the dimensions are the only scale.
                _ => {
                    if let Some(w) = width {
                        attrs.push(("width".to_string(), w));
                    }
                    if let Some(h) = height {
                        attrs.push(("height".to_string(), h));
                    }
                }
            }
        }
        let label = options.aria_label.as_deref().filter(|l| !l.is_empty());
        if let (false, Some(label)) = (has_label, label) {
            attrs.push(("aria-label".to_string(), label.to_string()));
        }
    }

    let mut out = BytesStart::new(name);
    for (k, v) in &attrs {
        out.push_attribute((k.as_str(), v.as_str()));
    }
    Ok(out)
}

fn rewrite(svg: &str, ids: &IdMap, options: &OptimizeOptions) -> Result<String, SvgError> {
    let mut reader = Reader::from_str(svg);
    let mut writer = Writer::new(Vec::with_capacity(svg.len()));
    let mut skip_depth = 0usize;
    let mut text_depth = 0usize;
    let mut in_style = false;
    let mut seen_root = false;

    loop {
        let event = reader.read_event().map_err(xml_err)?;
        let out = match event {
            Event::Eof => break,
            Event::Decl(_) | Event::PI(_) | Event::DocType(_) | Event::Comment(_) => continue,
            Event::Start(e) => {
                if skip_depth > 0 || is_removed_element(&e) {
                    skip_depth += 1;
                    continue;
                }
                let local = e.local_name();
                in_style |= local.as_ref() == b"style";
                if is_text_content(local.as_ref()) {
                    text_depth += 1;
                }
                let elem = rewrite_element(&e, !seen_root, ids, options)?;
                seen_root = true;
                Event::Start(elem)
            }
            Event::Empty(e) => {
                if skip_depth > 0 || is_removed_element(&e) {
                    continue;
                }
                let elem = rewrite_element(&e, !seen_root, ids, options)?;
                seen_root = true;
                Event::Empty(elem)
            }
            Event::End(e) => {
                if skip_depth > 0 {
                    skip_depth -= 1;
                    continue;
                }
                let local = e.local_name();
                if local.as_ref() == b"style" {
                    in_style = false;
                }
                if is_text_content(local.as_ref()) {
                    text_depth = text_depth.saturating_sub(1);
                }
                Event::End(e)
            }
            Event::Text(t) => {
                if skip_depth > 0 {
                    continue;
                }
                let blank = String::from_utf8_lossy(&t).trim().is_empty();
                if blank && text_depth == 0 {
                    continue;
                }
                if in_style {
                    let css = minify_css(&t.unescape().map_err(xml_err)?);
                    Event::Text(BytesText::from_escaped(
                        partial_escape(css.as_str()).into_owned(),
                    ))
                } else {
                    Event::Text(t)
                }
            }
            Event::CData(c) => {
                if skip_depth > 0 {
                    continue;
                }
                if in_style {
                    Event::CData(BytesCData::new(minify_css(&String::from_utf8_lossy(&c))))
                } else {
                    Event::CData(c)
                }
            }
        };
        writer.write_event(out).map_err(xml_err)?;
    }

    if !seen_root {
        return Err(SvgError::Optimize("document has no root element".into()));
    }
    String::from_utf8(writer.into_inner()).map_err(xml_err)
}

/// Collapse whitespace and drop comments in CSS text.
///
/// Whitespace before `:` is kept in selectors, where it is a descendant
/// combinator.
pub(crate) fn minify_css(css: &str) -> String {
    const TIGHT: &str = "{};:,>";

    let mut stripped = String::with_capacity(css.len());
    let mut rest = css;
    while let Some(start) = rest.find("/*") {
        stripped.push_str(&rest[..start]);
        rest = match rest[start + 2..].find("*/") {
            Some(end) => &rest[start + 2 + end + 2..],
            None => "",
        };
    }
    stripped.push_str(rest);

    let mut out = String::with_capacity(stripped.len());
    let mut pending_space = false;
    for (i, c) in stripped.char_indices() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if c == ':' && pending_space && in_selector(&stripped[i..]) {
            out.push(' ');
            out.push(c);
        } else if TIGHT.contains(c) {
            if c == '}' && out.ends_with(';') {
                out.pop();
            }
            out.push(c);
        } else {
            if pending_space && !out.is_empty() && !out.ends_with(|p: char| TIGHT.contains(p)) {
                out.push(' ');
            }
            out.push(c);
        }
        pending_space = false;
    }
    out
}

/// A selector or at-rule prelude runs up to a `{`; a declaration ends at
/// `;` or `}` first.
fn in_selector(rest: &str) -> bool {
    rest.find(['{', ';', '}'])
        .is_some_and(|pos| rest[pos..].starts_with('{'))
}

/// Parse `svg` completely: one root element, every element closed.
pub fn check_well_formed(svg: &str) -> Result<(), SvgError> {
    let mut reader = Reader::from_str(svg);
    let mut depth = 0usize;
    let mut roots = 0usize;

    loop {
        match reader.read_event().map_err(xml_err)? {
            Event::Start(_) => {
                if depth == 0 {
                    roots += 1;
                }
                depth += 1;
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Empty(_) if depth == 0 => roots += 1,
            Event::Text(t) if depth == 0 => {
                if !String::from_utf8_lossy(&t).trim().is_empty() {
                    return Err(SvgError::Xml("text outside the root element".into()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth != 0 {
        return Err(SvgError::Xml("unclosed element".into()));
    }
    if roots != 1 {
        return Err(SvgError::Xml(format!("expected one root element, found {roots}")));
    }
    Ok(())
}
