use serde::Deserialize;

/// One translated piece of a request, as returned by the service.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct Fragment {
    pub src: String,
    pub dst: String,
}

/// Substitute each fragment's `dst` for its `src` inside `text`.
///
/// Fragments are matched in order, each one searched for only after the
/// end of the previous match, so text that repeats a fragment or that
/// contains an earlier fragment's translation is left alone. A fragment
/// that cannot be found is skipped.
pub fn apply_fragments(text: &str, fragments: &[Fragment]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;

    for fragment in fragments {
        if fragment.src.is_empty() {
            continue;
        }
        match text[cursor..].find(&fragment.src) {
            Some(found) => {
                let start = cursor + found;
                out.push_str(&text[cursor..start]);
                out.push_str(&fragment.dst);
                cursor = start + fragment.src.len();
            },
            None => {
                tracing::debug!(src = %fragment.src, "translated fragment not found in source text");
            },
        }
    }

    out.push_str(&text[cursor..]);
    out
}
