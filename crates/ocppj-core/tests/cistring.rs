//! Bounded string constructors and their boundary law.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use proptest::prelude::*;

use ocppj_core::types::{CiString, CiString20, CiString25, CiString255, CiString50, CiString500, Violation};

fn printable(len: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(0x20u8..=0x7E, len).prop_map(|b| b.into_iter().map(char::from).collect())
}

fn bad_char() -> impl Strategy<Value = char> {
    prop_oneof![
        (0u32..0x20).prop_map(|c| char::from_u32(c).unwrap()),
        Just('\u{7F}'),
        Just('é'),
        Just('€'),
        Just('\u{1F600}'),
    ]
}

fn boundary_law<const N: usize>() {
    proptest!(|(exact in printable(N))| {
        let s = CiString::<N>::new(exact.clone()).unwrap();
        prop_assert_eq!(s.as_str(), exact.as_str());
        prop_assert_eq!(s.max_len(), N);
    });

    proptest!(|(over in printable(N + 1))| {
        let err = CiString::<N>::new(over).unwrap_err();
        prop_assert_eq!(err, Violation::TooLong { max: N, actual: N + 1 });
    });

    proptest!(|(prefix in printable(N / 2), ch in bad_char(), suffix in printable(N / 4))| {
        let raw = format!("{prefix}{ch}{suffix}");
        let err = CiString::<N>::new(raw).unwrap_err();
        prop_assert_eq!(err, Violation::InvalidChar { ch, position: prefix.len() });
    });
}

#[test]
fn boundary_law_20() {
    boundary_law::<20>();
}

#[test]
fn boundary_law_25() {
    boundary_law::<25>();
}

#[test]
fn boundary_law_50() {
    boundary_law::<50>();
}

#[test]
fn boundary_law_255() {
    boundary_law::<255>();
}

#[test]
fn boundary_law_500() {
    boundary_law::<500>();
}

#[test]
fn empty_string_is_valid() {
    assert_eq!(CiString20::new("").unwrap().as_str(), "");
}

#[test]
fn aliases_carry_their_bound() {
    assert_eq!(CiString20::MAX_LEN, 20);
    assert_eq!(CiString25::MAX_LEN, 25);
    assert_eq!(CiString50::MAX_LEN, 50);
    assert_eq!(CiString255::MAX_LEN, 255);
    assert_eq!(CiString500::MAX_LEN, 500);
}

#[test]
fn length_is_checked_before_charset() {
    let raw = format!("{}\u{1}", "a".repeat(20));
    assert_eq!(
        CiString20::new(raw).unwrap_err(),
        Violation::TooLong { max: 20, actual: 21 }
    );
}

#[test]
fn length_counts_chars_not_bytes() {
    // 20 chars, one of them two bytes wide: charset error, not length
    let raw = format!("{}é", "a".repeat(19));
    assert_eq!(
        CiString20::new(raw).unwrap_err(),
        Violation::InvalidChar { ch: 'é', position: 19 }
    );
}

#[test]
fn serde_validates_on_deserialize() {
    let ok: CiString20 = serde_json::from_str(r#""D0431F35""#).unwrap();
    assert_eq!(ok.to_string(), "D0431F35");
    assert_eq!(serde_json::to_string(&ok).unwrap(), r#""D0431F35""#);

    let err = serde_json::from_str::<CiString20>(r#""0123456789012345678901""#).unwrap_err();
    assert!(err.to_string().contains("exceeds maximum of 20"));
}

#[test]
fn conversions() {
    let s: CiString50 = "AuthorizeRemoteTxRequests".parse().unwrap();
    assert!(s.eq_ignore_case("authorizeremotetxrequests"));
    assert_eq!(&*s, "AuthorizeRemoteTxRequests");
    let back: String = s.into();
    assert_eq!(back, "AuthorizeRemoteTxRequests");
    assert!(CiString20::try_from("tab\there").is_err());
}
