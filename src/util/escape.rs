//! Percent escaping of tokens
//!
//! Tokens are standard base64, so `+`, `/` and the `=` padding do not
//! survive being dropped into a query string. The escaped form uses the
//! same character set as a javascript `querystring.escape`.

use crate::error::Error;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

const QUERY_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// An escaped token has its padding written as `%3D`.
pub fn is_escaped(token: &str) -> bool {
    token.contains("%3D")
}

pub fn maybe_unescape(token: &str) -> Result<String, Error> {
    if !is_escaped(token) {
        return Ok(token.to_owned());
    }
    percent_decode_str(token)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| Error::MalformedReceipt("escaped token is not valid UTF-8".into()))
}

pub fn maybe_escape(token: &str) -> String {
    if is_escaped(token) {
        return token.to_owned();
    }
    utf8_percent_encode(token, QUERY_ESCAPE).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "AYYP.jgaMXV5sFyqanZgzy8yFN++HcsFYbdUyKOWxmEqCZ3U=.cmQcWcq9eoX8XyLF7T1vUeCJnhljvCngH9OJXmEt7UY=.G93u/wARIjNY+Z/RIiIiIiIiIiIiIiIiIiIiIiIiIiI=";

    #[test]
    fn test_escape() -> Result<(), Error> {
        assert!(!is_escaped(TOKEN));
        let escaped = maybe_escape(TOKEN);
        assert!(is_escaped(&escaped));
        assert!(escaped.starts_with("AYYP.jgaMXV5sFyqanZgzy8yFN%2B%2BHcsFYbdUyKOWxmEqCZ3U%3D."));
        assert!(!escaped.contains('/'));

        // idempotent in both directions
        assert_eq!(maybe_escape(&escaped), escaped);
        assert_eq!(maybe_unescape(&escaped)?, TOKEN);
        assert_eq!(maybe_unescape(TOKEN)?, TOKEN);
        Ok(())
    }

    #[test]
    fn test_unescape_invalid_utf8() {
        assert!(matches!(
            maybe_unescape("%FF%3D"),
            Err(Error::MalformedReceipt(_))
        ));
    }
}
