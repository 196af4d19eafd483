//! SQL literal and identifier quoting.
//!
//! Literal quoting is the only escaping the generated script relies on: every piece of caller-supplied text
//! (paths, directories, callback names) reaches the script as a single-quoted literal with embedded quotes
//! doubled. Identifiers that cannot be verified as plain names are never spliced in raw.

use pgmi_core::sql::MAX_IDENTIFIER_LEN;

use super::errors::CallbackNameError;

/// Double every single quote in `s`.
pub fn escape_literal(s: &str) -> String {
    s.replace('\'', "''")
}

/// Render `s` as a single-quoted SQL literal.
pub fn quote_literal(s: &str) -> String {
    format!("'{}'", escape_literal(s))
}

/// Render an optional value as a literal, or as the bare `NULL` keyword when absent.
pub fn quote_nullable(s: Option<&str>) -> String {
    match s {
        Some(s) => quote_literal(s),
        None => "NULL".to_string(),
    }
}

/// Escape a single identifier.
///
/// Simple lowercase identifiers are returned as-is; anything else is wrapped in double quotes with embedded double
/// quotes doubled.
pub fn escape_identifier(s: &str) -> String {
    if is_simple_identifier(s) {
        return s.to_string();
    }
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Escape each part of a dot-separated name (`schema.object`).
pub fn escape_qualified_name(name: &str) -> String {
    name.split('.').map(escape_identifier).collect::<Vec<_>>().join(".")
}

/// Whether `name` is one or two dot-separated plain identifiers and can be spliced into SQL verbatim.
pub fn is_plain_qualified_name(name: &str) -> bool {
    let parts: Vec<&str> = name.split('.').collect();
    parts.len() <= 2 && parts.iter().all(|p| is_plain_identifier(p))
}

/// Validate that `callback` is a `function` or `schema.function` reference.
///
/// An empty callback means "no observer" and is valid.
pub fn validate_callback_name(callback: &str) -> Result<(), CallbackNameError> {
    if callback.is_empty() {
        return Ok(());
    }

    let parts: Vec<&str> = callback.split('.').collect();
    if parts.len() > 2 {
        return Err(CallbackNameError::TooManyParts {
            name: callback.to_string(),
        });
    }

    for part in parts {
        if part.is_empty() {
            return Err(CallbackNameError::EmptyIdentifier {
                name: callback.to_string(),
            });
        }
        if part.len() > MAX_IDENTIFIER_LEN {
            return Err(CallbackNameError::IdentifierTooLong {
                name: callback.to_string(),
                part: part.to_string(),
                limit: MAX_IDENTIFIER_LEN,
            });
        }
        let valid = part.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_')
            && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid {
            return Err(CallbackNameError::InvalidIdentifier {
                name: callback.to_string(),
                part: part.to_string(),
            });
        }
    }

    Ok(())
}

/// Choose a dollar-quote delimiter for `body`.
///
/// Returns `$<tag>$` unless that sequence occurs in `body`, in which case `$<tag>_1$`, `$<tag>_2$`, … are tried.
/// The choice depends only on `body`, so output stays deterministic.
pub fn dollar_tag(body: &str, tag: &str) -> String {
    let mut delimiter = format!("${tag}$");
    let mut n = 1;
    while body.contains(&delimiter) {
        delimiter = format!("${tag}_{n}$");
        n += 1;
    }
    delimiter
}

/// Whether `tag` can appear between the dollar signs of a dollar-quote delimiter.
///
/// The empty tag (`$$`) is valid.
pub fn is_valid_dollar_tag(tag: &str) -> bool {
    tag.is_empty()
        || (tag.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_')
            && tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'))
}

fn is_simple_identifier(s: &str) -> bool {
    s.starts_with(|c: char| c.is_ascii_lowercase() || c == '_')
        && s.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

fn is_plain_identifier(s: &str) -> bool {
    s.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_')
        && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
