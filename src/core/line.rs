/// Decode one raw line read from the device.
///
/// Invalid UTF-8 sequences are dropped rather than replaced, then the result
/// is trimmed. Returns `None` for lines that are blank after trimming.
pub fn decode_line(bytes: &[u8]) -> Option<String> {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }

    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_strips_line_terminators() {
        assert_eq!(decode_line(b"boot ok\r\n").as_deref(), Some("boot ok"));
        assert_eq!(decode_line(b"  [I] wifi up\t\n").as_deref(), Some("[I] wifi up"));
    }

    #[test]
    fn test_blank_lines_are_suppressed() {
        assert_eq!(decode_line(b""), None);
        assert_eq!(decode_line(b"\r\n"), None);
        assert_eq!(decode_line(b" \t \n"), None);
    }

    #[test]
    fn test_invalid_bytes_are_dropped() {
        assert_eq!(decode_line(b"temp\xff=21\xc3\n").as_deref(), Some("temp=21"));
        assert_eq!(decode_line(b"\xfe\xfe\r\n"), None);
    }

    #[test]
    fn test_multibyte_text_survives() {
        let line = "日志读取完成\r\n".as_bytes();
        assert_eq!(decode_line(line).as_deref(), Some("日志读取完成"));
    }

    proptest! {
        #[test]
        fn prop_valid_text_is_trimmed(s in "\\PC*") {
            let expected = s.trim();
            let decoded = decode_line(s.as_bytes());
            if expected.is_empty() {
                prop_assert_eq!(decoded, None);
            } else {
                prop_assert_eq!(decoded.as_deref(), Some(expected));
            }
        }

        #[test]
        fn prop_invalid_bytes_vanish(a in "\\PC*", b in "\\PC*", junk in 1usize..4) {
            let mut bytes = a.as_bytes().to_vec();
            bytes.extend(std::iter::repeat(0xFFu8).take(junk));
            bytes.extend_from_slice(b.as_bytes());

            let joined = format!("{a}{b}");
            let expected = joined.trim();
            let decoded = decode_line(&bytes);
            if expected.is_empty() {
                prop_assert_eq!(decoded, None);
            } else {
                prop_assert_eq!(decoded.as_deref(), Some(expected));
            }
        }
    }
}
