//! Cell-width aware string truncation.
//!
//! Table cells are budgeted in terminal columns, not bytes or chars: a CJK
//! character or an emoji occupies two columns. These helpers never split a
//! character and never exceed the budget.

use std::borrow::Cow;

use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

pub const ELLIPSIS: char = '…';

/// Number of terminal columns `s` occupies.
#[inline]
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Longest prefix of `s` that fits in `max_width` columns.
pub fn take_width_prefix(s: &str, max_width: usize) -> &str {
    let mut used = 0;
    for (i, ch) in s.char_indices() {
        let w = ch.width().unwrap_or(0);
        if used + w > max_width {
            return &s[..i];
        }
        used += w;
    }
    s
}

/// Fit `s` into `max_width` columns, replacing the tail with `…` when it
/// does not fit. Borrowed when no truncation is needed.
pub fn truncate_with_ellipsis(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }
    if max_width == 0 {
        return Cow::Borrowed("");
    }
    let prefix = take_width_prefix(s, max_width - 1);
    let mut out = String::with_capacity(prefix.len() + ELLIPSIS.len_utf8());
    out.push_str(prefix);
    out.push(ELLIPSIS);
    Cow::Owned(out)
}
