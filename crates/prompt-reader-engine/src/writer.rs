/// Line ending used when appending to a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    CrLf,
}

impl LineEnding {
    /// Uses the ending of the document's first line; `Lf` when there is none.
    pub fn detect(text: &str) -> Self {
        match text.find('\n') {
            Some(i) if text[..i].ends_with('\r') => LineEnding::CrLf,
            _ => LineEnding::Lf,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// Makes sure a prompt body starts with a bullet marker.
pub fn normalize_prompt_body(body: &str) -> String {
    if body.trim().starts_with('-') {
        body.to_string()
    } else {
        format!("- {body}")
    }
}

/// Appends a new prompt entry to `existing`.
///
/// `existing` is kept byte-for-byte; only a separator, the normalized entry
/// and a closing blank line are added after it, so the previous last block
/// is always closed before the new bullet starts.
pub fn append_prompt(existing: &str, body: &str) -> String {
    let nl = LineEnding::detect(existing).as_str();
    let entry = normalize_prompt_body(body);

    let double = nl.repeat(2);
    let separator = if existing.is_empty() || existing.ends_with(&double) {
        ""
    } else if existing.ends_with(nl) {
        nl
    } else {
        double.as_str()
    };

    let mut out =
        String::with_capacity(existing.len() + separator.len() + entry.len() + double.len());
    out.push_str(existing);
    out.push_str(separator);
    out.push_str(&entry);
    out.push_str(&double);
    out
}
