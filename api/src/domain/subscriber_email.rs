/// An email address with the shape `local@domain.tld`.
///
/// Only the shape is checked: no whitespace, exactly one `@`, and a domain
/// holding a `.` with at least one character on each side. The address is
/// kept exactly as submitted, case included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    pub fn parse(s: String) -> Result<SubscriberEmail, String> {
        if has_email_shape(&s) {
            Ok(Self(s))
        } else {
            Err(format!("{} is not a valid subscriber email", s))
        }
    }

    pub fn inner(&self) -> &str {
        self.0.as_str()
    }
}

fn has_email_shape(s: &str) -> bool {
    if s.chars().any(is_blank) {
        return false;
    }

    let (local, domain) = match s.split_once('@') {
        Some(parts) => parts,
        None => return false,
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    // The dot may not open or close the domain.
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// The `\s` class of browser regular expressions: Unicode `White_Space`
/// without NEL (U+0085), plus the byte order mark (U+FEFF).
fn is_blank(c: char) -> bool {
    match c {
        '\u{85}' => false,
        '\u{feff}' => true,
        c => c.is_whitespace(),
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriberEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
