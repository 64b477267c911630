use std::fmt::Write;

/// Escapes a message for console output.
///
/// Invalid UTF-8 bytes become `\xNN`. Valid characters that are not printable
/// become `\uNNNN` (or `\UNNNNNNNN` above the BMP); newline, carriage return
/// and tab pass through.
pub fn escape_message(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        for c in chunk.valid().chars() {
            push_char(&mut out, c);
        }
        for byte in chunk.invalid() {
            let _ = write!(out, "\\x{byte:02x}");
        }
    }
    out
}

fn push_char(out: &mut String, c: char) {
    if matches!(c, '\n' | '\r' | '\t') || !c.is_control() {
        out.push(c);
    } else if (c as u32) < 0x10000 {
        let _ = write!(out, "\\u{:04x}", c as u32);
    } else {
        let _ = write!(out, "\\U{:08x}", c as u32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(escape_message(b"hello\tworld\n"), "hello\tworld\n");
        assert_eq!(escape_message("héllo".as_bytes()), "héllo");
    }

    #[test]
    fn test_gibberish_bytes() {
        assert_eq!(
            escape_message(b"bla bla \x9e\x9f\x0190"),
            "bla bla \\x9e\\x9f\\u000190"
        );
    }

    #[test]
    fn test_truncated_sequence_escapes_each_byte() {
        assert_eq!(escape_message(b"a\xe2\x82"), "a\\xe2\\x82");
    }

    #[test]
    fn test_control_characters() {
        assert_eq!(escape_message(b"\x1b[31m"), "\\u001b[31m");
        assert_eq!(escape_message("\u{85}".as_bytes()), "\\u0085");
    }
}
