//! C-style backslash unescaping for quoted catalog strings.

/// Resolves C escape sequences in `s`.
///
/// Supports the single-character escapes (`\n`, `\t`, `\r`, `\a`, `\b`, `\f`,
/// `\v`), octal `\NNN` (up to three digits) and hex `\xHH` (up to two digits).
/// Any other escaped character stands for itself, and a trailing lone
/// backslash is kept. Octal and hex escapes produce raw bytes, so the result
/// is decoded as UTF-8 lossily.
pub fn unescape(s: &str) -> String {
    if !s.contains('\\') {
        return s.to_string();
    }

    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b != b'\\' || i + 1 == bytes.len() {
            out.push(b);
            i += 1;
            continue;
        }

        i += 1;
        match bytes[i] {
            b'n' => out.push(b'\n'),
            b't' => out.push(b'\t'),
            b'r' => out.push(b'\r'),
            b'a' => out.push(0x07),
            b'b' => out.push(0x08),
            b'f' => out.push(0x0c),
            b'v' => out.push(0x0b),
            b'0'..=b'7' => {
                let start = i;
                let mut value: u32 = 0;
                while i < bytes.len() && i - start < 3 && (b'0'..=b'7').contains(&bytes[i]) {
                    value = value * 8 + u32::from(bytes[i] - b'0');
                    i += 1;
                }
                out.push((value & 0xff) as u8);
                continue;
            }
            b'x' if bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit) => {
                i += 1;
                let start = i;
                let mut value: u32 = 0;
                while i < bytes.len() && i - start < 2 && bytes[i].is_ascii_hexdigit() {
                    // is_ascii_hexdigit guarantees to_digit succeeds
                    value = value * 16 + char::from(bytes[i]).to_digit(16).unwrap_or(0);
                    i += 1;
                }
                out.push(value as u8);
                continue;
            }
            other => out.push(other),
        }
        i += 1;
    }

    match String::from_utf8(out) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}
