//! Case-insensitive tag scanning over raw document text.
//!
//! These helpers match the fixed tag shapes the extractor works with:
//! - `<name ...>` open tags (and `</name ...>` close tags when asked)
//! - `<name ...>...</name>` elements, shortest span, non-nesting
//!
//! A tag runs from its `<` to the first `>` after it. Names are matched as
//! prefixes, so `<head` also matches `<header`; the extractor relies on the
//! closing tag to tell them apart.

/// Which tag forms [`strip_tags`] removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TagForm {
    /// Only `<name...>`.
    Open,
    /// Both `<name...>` and `</name...>`.
    OpenOrClose,
}

/// Finds `needle` in `haystack` at or after `from`, ignoring ASCII case.
///
/// `needle` must be ASCII, so every match starts on a char boundary.
pub(crate) fn find_ignore_case(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let hay = haystack.as_bytes();
    let needle = needle.as_bytes();
    if needle.is_empty() || from > hay.len() || hay.len() - from < needle.len() {
        return None;
    }
    (from..=hay.len() - needle.len()).find(|&i| hay[i..i + needle.len()].eq_ignore_ascii_case(needle))
}

/// Returns true if `text` starts with `prefix`, ignoring ASCII case.
pub(crate) fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.len() >= prefix.len()
        && text.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

/// A matched `<name ...>content</name>` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ElementMatch {
    /// Offset of the opening `<`.
    pub start: usize,
    /// Offset of the first byte of content.
    pub content_start: usize,
    /// Offset of the closing tag's `<`.
    pub content_end: usize,
    /// Offset just past the closing tag's `>`.
    pub end: usize,
}

/// Finds the first `<name ...>...</name>` element at or after `from`.
///
/// When an opening tag has no `>` or no closing tag follows it, no later
/// opening tag can match either, so the search stops there.
pub(crate) fn find_element(text: &str, name: &str, from: usize) -> Option<ElementMatch> {
    let open_pattern = format!("<{name}");
    let close_pattern = format!("</{name}>");

    let start = find_ignore_case(text, &open_pattern, from)?;
    let tag_end = start + text[start..].find('>')?;
    let content_start = tag_end + 1;
    let content_end = find_ignore_case(text, &close_pattern, content_start)?;

    Some(ElementMatch {
        start,
        content_start,
        content_end,
        end: content_end + close_pattern.len(),
    })
}

/// Removes every `<name ...>...</name>` element, handing each element's
/// content to `on_content` in document order.
pub(crate) fn excise_elements(text: &str, name: &str, mut on_content: impl FnMut(&str)) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;

    while let Some(element) = find_element(text, name, cursor) {
        on_content(&text[element.content_start..element.content_end]);
        out.push_str(&text[cursor..element.start]);
        cursor = element.end;
    }

    out.push_str(&text[cursor..]);
    out
}

/// Removes every `<name ...>` tag (and `</name ...>` for
/// [`TagForm::OpenOrClose`]), keeping whatever sits between tags.
pub(crate) fn strip_tags(text: &str, name: &str, form: TagForm) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    let mut search = 0;

    while let Some(offset) = text[search..].find('<') {
        let lt = search + offset;
        let mut name_start = lt + 1;
        if form == TagForm::OpenOrClose && text[name_start..].starts_with('/') {
            name_start += 1;
        }

        if !starts_with_ignore_case(&text[name_start..], name) {
            search = lt + 1;
            continue;
        }

        let Some(gt) = text[name_start..].find('>') else {
            break;
        };
        let end = name_start + gt + 1;

        out.push_str(&text[cursor..lt]);
        cursor = end;
        search = end;
    }

    out.push_str(&text[cursor..]);
    out
}

/// Collapses every whitespace run holding three or more line breaks down to
/// exactly two, so at most one blank line separates content lines.
///
/// Whitespace before the run's first break and after its last break is kept.
pub(crate) fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(ws_start) = rest.find(char::is_whitespace) {
        out.push_str(&rest[..ws_start]);
        let run_len = rest[ws_start..]
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(rest.len() - ws_start);
        let run = &rest[ws_start..ws_start + run_len];

        if run.matches('\n').count() >= 3 {
            let first = run.find('\n').unwrap_or(0);
            let last = run.rfind('\n').unwrap_or(run.len() - 1);
            out.push_str(&run[..first]);
            out.push_str("\n\n");
            out.push_str(&run[last + 1..]);
        } else {
            out.push_str(run);
        }

        rest = &rest[ws_start + run_len..];
    }

    out.push_str(rest);
    out
}
