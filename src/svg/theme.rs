//! Light/dark theme support for the favicon SVG.
//!
//! Detection and injection go through the XML tokenizer rather than string
//! search, so a `>` inside a quoted attribute or the marker text appearing in
//! a comment does not confuse them.

use super::{SvgError, xml_err};
use crate::config::ThemeConfig;
use quick_xml::Reader;
use quick_xml::events::Event;

/// Substring that identifies a theme media rule.
pub const THEME_RULE_MARKER: &str = "prefers-color-scheme";

/// Fill/stroke colours for each colour scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeColors {
    pub dark: String,
    pub light: String,
}

impl ThemeColors {
    pub fn from_config(config: &ThemeConfig) -> Self {
        Self {
            dark: config.dark.clone(),
            light: config.light.clone(),
        }
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self::from_config(&ThemeConfig::default())
    }
}

/// The two-rule stylesheet injected into source SVGs, scoped to
/// `.theme-adaptive`.
pub fn theme_stylesheet(colors: &ThemeColors) -> String {
    format!(
        "<style>\n\
         @media (prefers-color-scheme: dark) {{\n  \
         .theme-adaptive {{ fill: {dark}; stroke: {dark}; }}\n\
         }}\n\
         @media (prefers-color-scheme: light) {{\n  \
         .theme-adaptive {{ fill: {light}; stroke: {light}; }}\n\
         }}\n\
         </style>",
        dark = colors.dark,
        light = colors.light,
    )
}

/// Circular badge used when no vector source exists.
pub fn placeholder_svg(colors: &ThemeColors, letter: &str) -> String {
    let letter = quick_xml::escape::escape(letter);
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
  <style>
    @media (prefers-color-scheme: dark) {{
      .icon {{ fill: {dark}; stroke: {dark}; }}
      .bg {{ fill: #1a1a1a; }}
    }}
    @media (prefers-color-scheme: light) {{
      .icon {{ fill: {light}; stroke: {light}; }}
      .bg {{ fill: #ffffff; }}
    }}
    .ring {{ fill: none; }}
  </style>
  <circle class="bg" cx="50" cy="50" r="50"/>
  <circle class="icon ring" cx="50" cy="50" r="30" stroke-width="3"/>
  <text x="50" y="58" text-anchor="middle" font-family="Arial" font-size="28" font-weight="bold" class="icon">{letter}</text>
</svg>
"##,
        dark = colors.dark,
        light = colors.light,
    )
}

fn is_style(name: &[u8]) -> bool {
    name == b"style"
}

/// True if a `<style>` element's text contains a colour-scheme media rule.
///
/// Unparseable markup counts as having no rule.
pub fn has_theme_rule(svg: &str) -> bool {
    find_theme_style(svg).ok().flatten().is_some()
}

/// The first `<style>…</style>` element carrying the theme rule, verbatim.
pub fn extract_theme_style(svg: &str) -> Option<String> {
    find_theme_style(svg)
        .ok()
        .flatten()
        .map(|(start, end)| svg[start..end].to_string())
}

/// Byte range of the theme `<style>` element.
fn find_theme_style(svg: &str) -> Result<Option<(usize, usize)>, SvgError> {
    let mut reader = Reader::from_str(svg);
    let mut style_start: Option<usize> = None;
    let mut has_rule = false;

    loop {
        let before = reader.buffer_position() as usize;
        match reader.read_event().map_err(xml_err)? {
            Event::Start(e) if is_style(e.local_name().as_ref()) => {
                style_start = Some(before);
                has_rule = false;
            }
            Event::Text(t) if style_start.is_some() => {
                if String::from_utf8_lossy(&t).contains(THEME_RULE_MARKER) {
                    has_rule = true;
                }
            }
            Event::CData(t) if style_start.is_some() => {
                if String::from_utf8_lossy(&t).contains(THEME_RULE_MARKER) {
                    has_rule = true;
                }
            }
            Event::End(e) if is_style(e.local_name().as_ref()) => {
                if let Some(start) = style_start.take() {
                    if has_rule {
                        return Ok(Some((start, reader.buffer_position() as usize)));
                    }
                }
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

/// Insert `block` as the first child of the root `<svg>` element.
///
/// A self-closing root is expanded into a start/end pair.
pub fn inject_after_root(svg: &str, block: &str) -> Result<String, SvgError> {
    let mut reader = Reader::from_str(svg);

    loop {
        let before = reader.buffer_position() as usize;
        match reader.read_event().map_err(xml_err)? {
            Event::Start(e) if e.local_name().as_ref() == b"svg" => {
                let at = reader.buffer_position() as usize;
                return Ok(format!("{}{}{}", &svg[..at], block, &svg[at..]));
            }
            Event::Empty(e) if e.local_name().as_ref() == b"svg" => {
                let end = reader.buffer_position() as usize;
                let tag = &svg[before..end];
                let open = tag.trim_end_matches("/>").trim_end();
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                return Ok(format!(
                    "{}{}>{}</{}>{}",
                    &svg[..before],
                    open,
                    block,
                    name,
                    &svg[end..]
                ));
            }
            Event::Start(_) | Event::Empty(_) => {
                return Err(SvgError::Xml("root element is not <svg>".into()));
            }
            Event::Eof => return Err(SvgError::Xml("no <svg> root element".into())),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svg::check_well_formed;

    #[test]
    fn stylesheet_has_both_schemes() {
        let css = theme_stylesheet(&ThemeColors::default());
        assert!(css.contains("@media (prefers-color-scheme: dark)"));
        assert!(css.contains(".theme-adaptive { fill: #ffffff; stroke: #ffffff; }"));
        assert!(css.contains("@media (prefers-color-scheme: light)"));
        assert!(css.contains(".theme-adaptive { fill: #3c2252; stroke: #3c2252; }"));
    }

    #[test]
    fn placeholder_is_valid_and_themed() {
        let svg = placeholder_svg(&ThemeColors::default(), "K");
        check_well_formed(&svg).unwrap();
        assert!(svg.contains(r#"viewBox="0 0 100 100""#));
        assert!(svg.contains("prefers-color-scheme: dark"));
        assert!(svg.contains("prefers-color-scheme: light"));
        assert!(svg.contains(">K</text>"));
        assert!(has_theme_rule(&svg));
    }

    #[test]
    fn placeholder_escapes_letter() {
        let svg = placeholder_svg(&ThemeColors::default(), "<&>");
        check_well_formed(&svg).unwrap();
        assert!(svg.contains("&lt;&amp;&gt;"));
    }

    #[test]
    fn rule_in_comment_does_not_count() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"><!-- prefers-color-scheme --><rect/></svg>"#;
        assert!(!has_theme_rule(svg));
    }

    #[test]
    fn rule_in_attribute_does_not_count() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" data-x="prefers-color-scheme"/>"#;
        assert!(!has_theme_rule(svg));
    }

    #[test]
    fn rule_in_second_style_is_found() {
        let svg = concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg">"#,
            "<style>.a{fill:red}</style>",
            "<style>@media (prefers-color-scheme: dark){.a{fill:#fff}}</style>",
            "</svg>"
        );
        assert!(has_theme_rule(svg));
        assert_eq!(
            extract_theme_style(svg).unwrap(),
            "<style>@media (prefers-color-scheme: dark){.a{fill:#fff}}</style>"
        );
    }

    #[test]
    fn rule_in_cdata_is_found() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"><style><![CDATA[@media (prefers-color-scheme: light){}]]></style></svg>"#;
        assert!(has_theme_rule(svg));
    }

    #[test]
    fn extract_keeps_attributes_verbatim() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"><style type="text/css">@media (prefers-color-scheme: dark) { .a { fill: #fff } }</style><path d="M0 0"/></svg>"#;
        assert_eq!(
            extract_theme_style(svg).unwrap(),
            r#"<style type="text/css">@media (prefers-color-scheme: dark) { .a { fill: #fff } }</style>"#
        );
    }

    #[test]
    fn inject_after_root_start_tag() {
        let svg = r#"<?xml version="1.0"?><svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 10"><rect/></svg>"#;
        let out = inject_after_root(svg, "<style/>").unwrap();
        assert_eq!(
            out,
            r#"<?xml version="1.0"?><svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 10"><style/><rect/></svg>"#
        );
    }

    #[test]
    fn inject_survives_quoted_gt() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" data-note="a > b"><rect/></svg>"#;
        let out = inject_after_root(svg, "<style/>").unwrap();
        assert!(out.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" data-note="a > b"><style/>"#));
        check_well_formed(&out).unwrap();
    }

    #[test]
    fn inject_expands_self_closing_root() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 1 1" />"#;
        let out = inject_after_root(svg, "<style/>").unwrap();
        assert_eq!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 1 1"><style/></svg>"#
        );
        check_well_formed(&out).unwrap();
    }

    #[test]
    fn inject_requires_svg_root() {
        assert!(inject_after_root("<html><svg/></html>", "<style/>").is_err());
        assert!(inject_after_root("just text", "<style/>").is_err());
    }

    #[test]
    fn injected_theme_is_detected() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"><path class="theme-adaptive" d="M0 0"/></svg>"#;
        let out = inject_after_root(svg, &theme_stylesheet(&ThemeColors::default())).unwrap();
        assert!(has_theme_rule(&out));
        check_well_formed(&out).unwrap();
    }
}
