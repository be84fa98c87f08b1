// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for SOA serial extraction and comparison

#[cfg(test)]
mod tests {
    use crate::serial::{extract_serial, Serial, SerialError, SERIAL_OFFSET};
    use std::cmp::Ordering;

    // ========== Extraction ==========

    #[test]
    fn test_single_line_synthetic_record() {
        let zone = "name IN SOA ns admin ( 2024010100 3600 600 604800 86400 )";
        assert_eq!(extract_serial(zone).unwrap(), Serial::new("2024010100"));
    }

    #[test]
    fn test_multi_line_record_with_comments() {
        let zone = r#"$TTL 3600
$ORIGIN example.com.
@   IN  SOA ns1.example.com. hostmaster.example.com. (
        2025010101  ; Serial
        3600        ; Refresh
        600         ; Retry
        604800      ; Expire
        86400 )     ; Negative TTL

@   IN  NS  ns1.example.com.
www IN  A   192.0.2.1
"#;
        assert_eq!(extract_serial(zone).unwrap().as_str(), "2025010101");
    }

    #[test]
    fn test_record_with_ttl_before_class() {
        let zone = "@ 3600 IN SOA ns1 admin (\n 7 1 1 1 1 )\n";
        assert_eq!(extract_serial(zone).unwrap().as_str(), "7");
    }

    #[test]
    fn test_lowercase_soa_keyword() {
        let zone = "@ in soa ns1 admin ( 42 1 1 1 1 )";
        assert_eq!(extract_serial(zone).unwrap().as_str(), "42");
    }

    #[test]
    fn test_zone_file_generated_by_bind_tools() {
        // Layout written by typical zone generators: braces on the SOA line,
        // closing brace after the last value followed by a comment
        let zone = "$TTL 3600\n\n\
                    @ IN SOA ns1.example.com. admin.example.com. (\n    \
                    2025120601  ; Serial\n    \
                    3600  ; Refresh\n    \
                    600  ; Retry\n    \
                    604800  ; Expire\n    \
                    86400 ); Negative TTL\n\n\
                    @ IN NS ns1.example.com.\n";
        assert_eq!(extract_serial(zone).unwrap().as_str(), "2025120601");
    }

    #[test]
    fn test_quoted_mailbox_spanning_lines() {
        let zone = "@ IN SOA ns1 \"admin\n.example.com.\" (\n 99 1 1 1 1 )\n";
        assert_eq!(extract_serial(zone).unwrap().as_str(), "99");
    }

    #[test]
    fn test_non_numeric_serial_is_still_returned() {
        let zone = "@ IN SOA ns1 admin ( SERIAL 1 1 1 1 )";
        let serial = extract_serial(zone).unwrap();
        assert_eq!(serial.as_str(), "SERIAL");
        assert!(!serial.is_numeric());
    }

    #[test]
    fn test_no_soa_record() {
        let zone = "@ IN NS ns1.example.com.\nwww IN A 192.0.2.1\n";
        assert_eq!(extract_serial(zone), Err(SerialError::NotFound));
        assert_eq!(extract_serial(""), Err(SerialError::NotFound));
    }

    #[test]
    fn test_soa_inside_comment_is_ignored() {
        let zone = "; SOA record below\n@ IN SOA ns1 admin ( 5 1 1 1 1 )\n";
        assert_eq!(extract_serial(zone).unwrap().as_str(), "5");
    }

    #[test]
    fn test_soa_as_part_of_a_token_is_ignored() {
        let zone = "soa-host IN A 192.0.2.1\n";
        assert_eq!(extract_serial(zone), Err(SerialError::NotFound));
    }

    #[test]
    fn test_record_closed_too_early() {
        let zone = "@ IN SOA ns1 ( )\n";
        assert_eq!(
            extract_serial(zone),
            Err(SerialError::OutOfRange {
                line: 1,
                index: 2 + SERIAL_OFFSET,
                len: 6
            })
        );
    }

    #[test]
    fn test_unterminated_record() {
        let zone = "@ IN SOA ns1 admin (\n 1 2 3\n";
        assert_eq!(
            extract_serial(zone),
            Err(SerialError::Unterminated { line: 1 })
        );
    }

    #[test]
    fn test_unterminated_quote() {
        let zone = "@ IN SOA ns1 \"admin ( 1 2 3 4 5 )\n";
        assert_eq!(
            extract_serial(zone),
            Err(SerialError::Unterminated { line: 1 })
        );
    }

    #[test]
    fn test_excess_closing_brace() {
        let zone = "@ IN SOA ns1 admin ( 1 ) )\n";
        assert_eq!(extract_serial(zone), Err(SerialError::Malformed { line: 1 }));
    }

    #[test]
    fn test_later_soa_line_is_tried_after_failed_attempt() {
        let zone = "@ IN SOA ( )\n@ IN SOA ns1 admin ( 12 1 1 1 1 )\n";
        assert_eq!(extract_serial(zone).unwrap().as_str(), "12");
    }

    #[test]
    fn test_first_failure_is_reported() {
        let zone = "@ IN SOA ( )\n@ IN SOA ns1 admin (\n";
        assert!(matches!(
            extract_serial(zone),
            Err(SerialError::OutOfRange { line: 1, .. })
        ));
    }

    #[test]
    fn test_first_successful_record_wins() {
        let zone = "@ IN SOA a b ( 1 1 1 1 1 )\n@ IN SOA a b ( 2 1 1 1 1 )\n";
        assert_eq!(extract_serial(zone).unwrap().as_str(), "1");
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let zone = "@ IN SOA ns1 admin ( 2024010100 1 1 1 1 )";
        let first = extract_serial(zone);
        let second = extract_serial(zone);
        assert_eq!(first, second);
    }

    // ========== Serial Values ==========

    #[test]
    fn test_serial_is_numeric() {
        assert!(Serial::new("0").is_numeric());
        assert!(Serial::new("2024010100").is_numeric());
        assert!(!Serial::new("").is_numeric());
        assert!(!Serial::new("-1").is_numeric());
        assert!(!Serial::new("12a").is_numeric());
        assert!(!Serial::new("+5").is_numeric());
    }

    #[test]
    fn test_serial_numeric_comparison() {
        let a = Serial::new("9");
        let b = Serial::new("10");
        // Lexically "9" > "10", numerically it is smaller
        assert_eq!(a.numeric_cmp(&b), Some(Ordering::Less));
        assert_eq!(Serial::new("007").numeric_cmp(&Serial::new("7")), Some(Ordering::Equal));
        assert_eq!(Serial::new("000").numeric_cmp(&Serial::new("0")), Some(Ordering::Equal));
        assert_eq!(a.numeric_cmp(&Serial::new("x")), None);
    }

    #[test]
    fn test_serial_comparison_beyond_u64() {
        let big = Serial::new("123456789012345678901234567890");
        let bigger = Serial::new("123456789012345678901234567891");
        assert_eq!(bigger.is_incremented_from(&big), Some(true));
        assert_eq!(big.is_incremented_from(&bigger), Some(false));
    }

    #[test]
    fn test_serial_increment() {
        let pre = Serial::new("2024010100");
        let post = Serial::new("2024010101");
        assert_eq!(post.is_incremented_from(&pre), Some(true));
        assert_eq!(pre.is_incremented_from(&post), Some(false));
        assert_eq!(pre.is_incremented_from(&pre), Some(false));
    }

    #[test]
    fn test_serial_display_and_serde() {
        let serial = Serial::new("2025010101");
        assert_eq!(serial.to_string(), "2025010101");
        assert_eq!(serde_json::to_string(&serial).unwrap(), r#""2025010101""#);
    }
}
