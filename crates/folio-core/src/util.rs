//! MediaWiki-compatible URL encoding.

use std::borrow::Cow;

// Sequences MediaWiki re-inlines after percent-encoding a title.
const WIKI_VERBATIM: [(&str, &str); 11] = [
    ("%3B", ";"),
    ("%40", "@"),
    ("%24", "$"),
    ("%21", "!"),
    ("%2A", "*"),
    ("%28", "("),
    ("%29", ")"),
    ("%2C", ","),
    ("%2F", "/"),
    ("%7E", "~"),
    ("%3A", ":"),
];

/// Encodes a page title the way MediaWiki builds wiki URLs: spaces become
/// underscores, then percent-encoding with the characters MediaWiki keeps
/// verbatim restored.
pub fn wiki_urlencode(title: &str) -> String {
    let underscored = title.replace(' ', "_");
    let mut encoded = urlencoding::encode(&underscored).into_owned();
    for (sequence, verbatim) in WIKI_VERBATIM {
        if encoded.contains(sequence) {
            encoded = encoded.replace(sequence, verbatim);
        }
    }
    encoded
}

/// Decodes a percent-encoded title segment. `+` counts as a space,
/// underscores are left alone, and undecodable bytes degrade to the
/// replacement character instead of failing.
pub fn wiki_urldecode(encoded: &str) -> String {
    let spaced: Cow<'_, str> = if encoded.contains('+') {
        Cow::Owned(encoded.replace('+', " "))
    } else {
        Cow::Borrowed(encoded)
    };
    let bytes = urlencoding::decode_binary(spaced.as_bytes());
    String::from_utf8_lossy(&bytes).into_owned()
}
