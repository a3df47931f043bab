//! Tab-indented XML fragments.
//!
//! Every element sits on its own line, prefixed by the caller's indentation;
//! nesting adds one tab per level.

/// `{tab}<{name}>\n`
pub(crate) fn open(tab: &str, name: &str) -> String {
    format!("{tab}<{name}>\n")
}

/// `{tab}</{name}>\n`
pub(crate) fn close(tab: &str, name: &str) -> String {
    format!("{tab}</{name}>\n")
}

/// `{tab}<{name}>{value}</{name}>\n`
pub(crate) fn element(tab: &str, name: &str, value: impl std::fmt::Display) -> String {
    format!("{tab}<{name}>{value}</{name}>\n")
}

/// `{tab}{text}\n`
pub(crate) fn line(tab: &str, text: impl std::fmt::Display) -> String {
    format!("{tab}{text}\n")
}

/// Indentation one level below `tab`.
pub(crate) fn indent(tab: &str) -> String {
    format!("{tab}\t")
}

/// Flags render as `1` / `0`.
pub(crate) fn flag(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}

/// Wraps `body` between an opening and a closing `name` tag at `tab`.
pub(crate) fn wrap(tab: &str, name: &str, body: &str) -> String {
    let mut out = open(tab, name);
    out.push_str(body);
    out.push_str(&close(tab, name));
    out
}
