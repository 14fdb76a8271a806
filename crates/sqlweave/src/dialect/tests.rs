use super::*;
use chrono::TimeZone;

#[test]
fn test_postgres_quote_ident() {
    for (input, want) in [
        ("table.col", r#""table"."col""#),
        ("col", r#""col""#),
        ("s.t.c", r#""s"."t"."c""#),
        ("t.*", r#""t".*"#),
        ("", r#""""#),
    ] {
        assert_eq!(POSTGRES.quote_ident(input), want, "input: {input}");
    }
}

#[test]
fn test_quote_char_is_doubled() {
    assert_eq!(POSTGRES.quote_ident(r#"we"ird"#), r#""we""ird""#);
    assert_eq!(MYSQL.quote_ident("we`ird"), "`we``ird`");
    assert_eq!(MSSQL.quote_ident("we]ird"), "[we]]ird]");
    assert_eq!(MSSQL.quote_ident("dbo.users"), "[dbo].[users]");
}

#[test]
fn test_encode_string() {
    assert_eq!(POSTGRES.encode_string("it's"), "'it''s'");
    assert_eq!(SQLITE3.encode_string("it's"), "'it''s'");
    assert_eq!(MYSQL.encode_string("it's\n\\"), r"'it\'s\n\\'");
    assert_eq!(MSSQL.encode_string("x"), "N'x'");
}

#[test]
fn test_encode_bool() {
    assert_eq!(POSTGRES.encode_bool(true), "TRUE");
    assert_eq!(POSTGRES.encode_bool(false), "FALSE");
    assert_eq!(MYSQL.encode_bool(true), "1");
    assert_eq!(SQLITE3.encode_bool(false), "0");
}

#[test]
fn test_encode_time() {
    let t = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    assert_eq!(MYSQL.encode_time(&t), "'2024-01-02 03:04:05.000000'");
    assert_eq!(POSTGRES.encode_time(&t), "'2024-01-02 03:04:05.000000'");
}

#[test]
fn test_encode_bytes() {
    let b = [0x01u8, 0xab];
    assert_eq!(MYSQL.encode_bytes(&b), "0x01ab");
    assert_eq!(POSTGRES.encode_bytes(&b), r"E'\\x01ab'");
    assert_eq!(SQLITE3.encode_bytes(&b), "X'01ab'");
}

#[test]
fn test_placeholder() {
    assert_eq!(MYSQL.placeholder(0), "?");
    assert_eq!(SQLITE3.placeholder(5), "?");
    assert_eq!(POSTGRES.placeholder(0), "$1");
    assert_eq!(POSTGRES.placeholder(9), "$10");
    assert_eq!(MSSQL.placeholder(1), "@p2");
}

#[test]
fn test_from_name() {
    assert_eq!(from_name("postgresql").map(|d| d.name()), Some("postgres"));
    assert_eq!(from_name(" MySQL ").map(|d| d.name()), Some("mysql"));
    assert_eq!(from_name("sqlite").map(|d| d.name()), Some("sqlite3"));
    assert!(from_name("oracle").is_none());
}
