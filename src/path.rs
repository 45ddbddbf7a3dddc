/// Split a path expression into its tokens.
///
/// Names are separated by `.`, and bracketed tokens address sequence
/// indexes or mapping keys: `"logger[file].limit"` gives
/// `["logger", "file", "limit"]`. Empty tokens are dropped, so `""`, `"."`
/// and `"[]"` all address the whole value.
///
/// There is no escaping: a key that contains `.`, `[` or `]` cannot be
/// addressed.
pub fn parse(path: &str) -> Vec<&str> {
    path.split(['.', '[', ']'])
        .filter(|token| !token.is_empty())
        .collect()
}

/// Split an assignment target into its dot-separated segments.
///
/// Unlike [`parse`], empty segments are kept: `"a..b"` is a malformed target,
/// not a shorter one.
pub fn target_segments(target: &str) -> Vec<&str> {
    target.split('.').collect()
}
