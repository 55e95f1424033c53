//! Helpers for Telegram's legacy Markdown dialect.
//!
//! Only `_`, `*`, `` ` `` and `[` are significant outside of entities, and
//! backslash escapes are only honoured there. Inside an entity every
//! character is literal, so link labels are never escaped; brackets are
//! dropped from them instead.

/// Scheme and path of a Telegram user mention target.
const MENTION_PREFIX: &str = "tg://user?id=";

/// Escapes user-supplied text for interpolation outside of entities.
#[must_use]
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + s.len() / 4);
    for c in s.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Renders text as a preformatted block.
///
/// Escapes are not interpreted inside a block, so backticks (the only
/// character that can terminate it) are replaced by a prime.
#[must_use]
pub fn preformatted(s: &str) -> String {
    format!("```\n{}\n```", s.trim_end_matches('\n').replace('`', "\u{2032}"))
}

/// Renders an inline link.
///
/// The label is emitted verbatim minus `[` and `]`. The URL must already be
/// percent-encoded; `)` is encoded so it cannot terminate the link target.
#[must_use]
pub fn link(label: &str, url: &str) -> String {
    format!(
        "[{}]({})",
        label.replace(['[', ']'], ""),
        url.replace(')', "%29")
    )
}

/// Splits a Telegram user mention `[Name](tg://user?id=N)` into its name
/// and target. Anything else yields `None`.
#[must_use]
pub fn parse_mention(s: &str) -> Option<(&str, &str)> {
    let rest = s.trim().strip_prefix('[')?;
    let (name, target) = rest.split_once("](")?;
    let target = target.strip_suffix(')')?;
    let id = target.strip_prefix(MENTION_PREFIX)?;
    let valid = !name.contains(['[', ']'])
        && !id.is_empty()
        && id.bytes().all(|b| b.is_ascii_digit());
    valid.then_some((name, target))
}

/// Renders a name that may be a user mention: mentions stay links, other
/// text is escaped.
#[must_use]
pub fn mention_or_text(s: &str) -> String {
    match parse_mention(s) {
        Some((name, target)) => link(name, target),
        None => escape(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn escape_special_chars() {
        assert_eq!(escape("disk_usage"), "disk\\_usage");
        assert_eq!(escape("a*b`c"), "a\\*b\\`c");
        assert_eq!(escape("[x]"), "\\[x]");
        assert_eq!(escape("plain text (ok)."), "plain text (ok).");
        assert_eq!(escape(""), "");
    }

    #[test]
    fn preformatted_neutralizes_backticks() {
        let block = preformatted("CRITICAL - ```oops```\n");
        assert!(block.starts_with("```\n"));
        assert!(block.ends_with("\n```"));
        assert_eq!(block.matches('`').count(), 6);
    }

    #[test]
    fn link_keeps_label_literal() {
        assert_eq!(
            link("db_server_01", "https://x/show?host=db_server_01"),
            "[db_server_01](https://x/show?host=db_server_01)"
        );
        assert_eq!(link("web [prod]", "https://x/a(1)"), "[web prod](https://x/a(1%29)");
    }

    #[test]
    fn mentions_are_recognized() {
        assert_eq!(
            parse_mention("[Alice Smith](tg://user?id=42)"),
            Some(("Alice Smith", "tg://user?id=42"))
        );
        assert_eq!(parse_mention("icinga_admin"), None);
        assert_eq!(parse_mention("[x](https://evil.example)"), None);
        assert_eq!(parse_mention("[x](tg://user?id=4a)"), None);
        assert_eq!(parse_mention("[a]b](tg://user?id=1)"), None);
    }

    #[test]
    fn mention_or_text_renders_link_or_escaped_text() {
        assert_eq!(
            mention_or_text("[Alice Smith](tg://user?id=42)"),
            "[Alice Smith](tg://user?id=42)"
        );
        assert_eq!(mention_or_text("icinga_admin"), "icinga\\_admin");
    }

    proptest! {
        #[test]
        fn escaped_text_has_no_bare_markup(s in "[^\\\\]*") {
            let escaped = escape(&s);
            let mut prev_backslash = false;
            for c in escaped.chars() {
                if matches!(c, '_' | '*' | '`' | '[') {
                    prop_assert!(prev_backslash);
                }
                prev_backslash = c == '\\' && !prev_backslash;
            }
        }

        #[test]
        fn link_label_cannot_close_early(label in ".*") {
            let rendered = link(&label, "https://x");
            prop_assert_eq!(rendered.matches(']').count(), 1);
            prop_assert!(rendered.ends_with("](https://x)"));
        }

        #[test]
        fn preformatted_body_has_no_backticks(s in ".*") {
            let block = preformatted(&s);
            let body = &block[4..block.len() - 4];
            prop_assert!(!body.contains('`'));
        }
    }
}
