use isolang::Language;

/// Language display helpers
///
/// The pipeline never validates target language codes (an invalid code is the
/// translation endpoint's failure to report), so everything here is
/// best-effort and only feeds log output.
/// Look up an English display name for an ISO 639 language code.
///
/// Accepts 2-letter (639-1) and 3-letter (639-3) codes; anything else, or an
/// unknown code, yields `None` and callers fall back to printing the raw code.
pub fn display_name(code: &str) -> Option<String> {
    let normalized = code.trim().to_lowercase();

    let language = match normalized.len() {
        2 => Language::from_639_1(&normalized),
        3 => Language::from_639_3(&normalized),
        _ => None,
    }?;

    Some(language.to_name().to_string())
}

/// `"Spanish (es)"` when the code is known, the bare code otherwise.
pub fn describe(code: &str) -> String {
    match display_name(code) {
        Some(name) => format!("{} ({})", name, code),
        None => code.to_string(),
    }
}
