//! Markup helpers shared by the extraction strategies: reasoning-block
//! removal, fenced code blocks, and horizontal rules.

/// Strip all `<think>...</think>` and `<thinking>...</thinking>` blocks from text.
///
/// Handles complete blocks, incomplete blocks (no closing tag),
/// and multiple sequential blocks.
///
/// # Examples
///
/// ```
/// use storycircuit::extract::strip_think_tags;
///
/// assert_eq!(strip_think_tags("<think>reasoning</think>result"), "result");
/// assert_eq!(strip_think_tags("<think>no closing tag"), "");
/// assert_eq!(strip_think_tags("<thinking>also works</thinking>done"), "done");
/// ```
pub fn strip_think_tags(text: &str) -> String {
    let result = strip_tag_variant(text, "<think>", "</think>");
    strip_tag_variant(&result, "<thinking>", "</thinking>")
}

/// Copy `text` without any `open`...`close` block. An unclosed block runs to
/// the end of the text.
fn strip_tag_variant(text: &str, open: &str, close: &str) -> String {
    let mut kept = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(open) {
        kept.push_str(&rest[..start]);
        match rest[start..].find(close) {
            Some(end) => rest = &rest[start + end + close.len()..],
            None => return kept,
        }
    }
    kept.push_str(rest);
    kept
}

/// Extract content from the first code block fenced with the given language.
///
/// e.g., `extract_code_block_for(text, "json")` looks for `` ```json `` blocks.
/// Bare fences and other languages are skipped.
///
/// # Examples
///
/// ```
/// use storycircuit::extract::markup::extract_code_block_for;
///
/// let input = "Here you go:\n```json\n{\"notes\": \"n\"}\n```";
/// assert_eq!(extract_code_block_for(input, "json"), Some("{\"notes\": \"n\"}"));
/// ```
pub fn extract_code_block_for<'a>(text: &'a str, lang: &str) -> Option<&'a str> {
    let mut search_from = 0;
    while let Some(fence_start) = text[search_from..].find("```") {
        let after_backticks = search_from + fence_start + 3;

        let line_end = text[after_backticks..].find('\n')?;
        let lang_str = text[after_backticks..after_backticks + line_end].trim();
        let content_start = after_backticks + line_end + 1;
        let close_offset = text[content_start..].find("```")?;

        if lang_str.eq_ignore_ascii_case(lang) {
            return Some(text[content_start..content_start + close_offset].trim());
        }

        // Skip the whole block so its closing fence is not read as an opener.
        search_from = content_start + close_offset + 3;
    }
    None
}

/// Whether a line is a markdown horizontal rule (`---`, `***`, `___`).
pub fn is_rule(line: &str) -> bool {
    let line = line.trim();
    let mut chars = line.chars();
    match chars.next() {
        Some(first @ ('-' | '*' | '_')) => line.len() >= 3 && chars.all(|c| c == first),
        _ => false,
    }
}

/// Trim text and drop horizontal rules hugging either end.
pub fn trim_rules(text: &str) -> &str {
    let mut text = text.trim();
    loop {
        let (first, rest) = text.split_once('\n').unwrap_or((text, ""));
        if !is_rule(first) {
            break;
        }
        text = rest.trim();
    }
    loop {
        let (rest, last) = text.rsplit_once('\n').unwrap_or(("", text));
        if !is_rule(last) {
            break;
        }
        text = rest.trim();
    }
    text
}
