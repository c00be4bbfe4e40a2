/// Decodes a percent-encoded string (`%XX`) and converts `+` to space.
///
/// Decoded bytes are reassembled as UTF-8 so multi-byte characters survive;
/// invalid sequences become U+FFFD.
pub fn url_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len() => {
                let (hi, lo) = (bytes[i + 1], bytes[i + 2]);
                if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() {
                    out.push((hex_value(hi) << 4) | hex_value(lo));
                    i += 3;
                } else {
                    out.push(b'%');
                    i += 1;
                }
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        _           => digit - b'A' + 10,
    }
}

/// Parses `key=value&key2=value2` into `(key, value)` pairs.
pub fn parse_form(body: &str) -> Vec<(String, String)> {
    body.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            (url_decode(k), url_decode(v))
        })
        .collect()
}

/// Looks up a key in parsed form pairs, returning the value if found.
pub fn form_get<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_plus_and_percent() {
        assert_eq!(url_decode("Brown+Spot%21"), "Brown Spot!");
        assert_eq!(url_decode("caf%C3%A9"), "café");
    }

    #[test]
    fn malformed_escapes_pass_through() {
        assert_eq!(url_decode("100%"), "100%");
        assert_eq!(url_decode("%zz1"), "%zz1");
        assert_eq!(url_decode("%4"), "%4");
    }

    #[test]
    fn parses_pairs() {
        let pairs = parse_form("sample=3&note=&flag");
        assert_eq!(form_get(&pairs, "sample"), Some("3"));
        assert_eq!(form_get(&pairs, "note"), Some(""));
        assert_eq!(form_get(&pairs, "flag"), Some(""));
        assert_eq!(form_get(&pairs, "missing"), None);
    }
}
