//! The entity table shared with the renderer, and the `view-source`
//! transform built on it.

/// Named entities understood by the renderer, as `(entity, character)`.
pub const ENTITIES: [(&str, char); 3] = [("&lt;", '<'), ("&gt;", '>'), ("&amp;", '&')];

/// Replace `<`, `>` and `&` with their named entities.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match ENTITIES.iter().find(|(_, ch)| *ch == c) {
            Some((entity, _)) => out.push_str(entity),
            None => out.push(c),
        }
    }
    out
}

/// Replace known entities with their characters in a single left-to-right
/// pass, so `&amp;lt;` becomes `&lt;` and not `<`. Unknown `&` sequences
/// are kept as-is.
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(i) = rest.find('&') {
        out.push_str(&rest[..i]);
        rest = &rest[i..];
        match ENTITIES.iter().find(|(entity, _)| rest.starts_with(*entity)) {
            Some((entity, ch)) => {
                out.push(*ch);
                rest = &rest[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Present a body as source: escape markup and wrap it in `<body>` so the
/// renderer shows it as text.
pub fn view_source(body: &str) -> String {
    format!("<body>{}</body>", escape(body))
}
