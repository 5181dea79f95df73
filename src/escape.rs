//! The single-character escape table, shared by the scanner and the
//! printers so the two directions cannot drift apart.

/// Decoded form of the character following a backslash, or `None` if
/// the character is not a recognized escape code.
///
/// An escaped line ending (LF, or CR as the first half of CRLF) decodes
/// to nothing: the string simply continues on the next line.
pub(crate) fn decode(code: char) -> Option<&'static str> {
    Some(match code {
        'b' => "\u{8}",
        't' => "\t",
        'v' => "\u{b}",
        'n' => "\n",
        'f' => "\u{c}",
        'r' => "\r",
        '"' => "\"",
        '\'' => "'",
        '\\' => "\\",
        '\r' | '\n' => "",
        _ => return None,
    })
}

/// Encodes a decoded string back to source form, quotes included.
/// Every character with a one-letter escape code is written escaped;
/// everything else is written verbatim.
pub(crate) fn escape_string(str: &str) -> String {
    let mut output = String::with_capacity(str.len() + 2);
    output.push('"');

    for c in str.chars() {
        match c {
            '\u{8}' => output.push_str(r"\b"),
            '\t' => output.push_str(r"\t"),
            '\u{b}' => output.push_str(r"\v"),
            '\n' => output.push_str(r"\n"),
            '\u{c}' => output.push_str(r"\f"),
            '\r' => output.push_str(r"\r"),
            '"' => output.push_str(r#"\""#),
            '\\' => output.push_str(r"\\"),
            c => output.push(c),
        }
    }

    output.push('"');
    output
}
