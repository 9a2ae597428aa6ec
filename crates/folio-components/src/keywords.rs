//! Skills panel, printed like an R character vector

use leptos::prelude::*;

/// Console width R wraps vectors at
pub const CONSOLE_WIDTH: usize = 72;

/// One printed line: right-aligned `[i]` index and the quoted entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorLine {
    pub prefix: String,
    pub text: String,
}

/// Sort keywords case-insensitively, ties broken by the raw text
pub fn sort_keywords(keywords: &[String]) -> Vec<String> {
    let mut sorted = keywords.to_vec();
    sorted.sort_by(|a, b| {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    });
    sorted
}

/// Lay out already-sorted `entries` the way `print()` shows a character
/// vector: quoted, space separated, wrapped at `width` columns, each line
/// prefixed with the 1-based index of its first entry.
pub fn format_r_vector(entries: &[String], width: usize) -> Vec<VectorLine> {
    let mut lines: Vec<Vec<String>> = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut used = 0;

    for entry in entries {
        let quoted = format!("\"{}\"", entry);
        let len = quoted.chars().count();
        let needed = if current.is_empty() { len } else { len + 1 };

        if used + needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            used = len;
        } else {
            used += needed;
        }
        current.push(quoted);
    }
    if !current.is_empty() {
        lines.push(current);
    }

    let mut index = 1;
    lines
        .into_iter()
        .map(|line| {
            let prefix = format!("{:>4}", format!("[{}]", index));
            index += line.len();
            VectorLine {
                prefix,
                text: line.join(" "),
            }
        })
        .collect()
}

#[component]
pub fn KeywordsPanel(
    #[prop(into)] keywords: Signal<Vec<String>>,
    /// Name printed in the prompt line, e.g. `print(profile$skills)`
    #[prop(into, default = "profile$skills".to_string())]
    variable: String,
) -> impl IntoView {
    let sorted = Memo::new(move |_| keywords.with(|k| sort_keywords(k)));

    view! {
        <div class="gg-panel">
            <div class="gg-terminal">
                <div class="gg-term-line">
                    <span class="gg-term-prompt">"> "</span>
                    <span class="gg-term-code">{format!("print({})", variable)}</span>
                </div>
                {move || {
                    sorted.with(|entries| format_r_vector(entries, CONSOLE_WIDTH))
                        .into_iter()
                        .map(|line| view! {
                            <div class="gg-term-line">
                                <span class="gg-term-index">{line.prefix}</span>
                                <span class="gg-term-string">" "{line.text}</span>
                            </div>
                        })
                        .collect_view()
                }}
                <div class="gg-term-line">
                    <span class="gg-term-comment">
                        {move || format!("# class: character | length: {}", sorted.with(Vec::len))}
                    </span>
                </div>
            </div>
        </div>
    }
}
