use pkinames::*;

fn parse(s: &str, format: DnFormat) -> DistinguishedName {
    DistinguishedName::parse(s, format, &StringMap::new()).unwrap()
}

#[test]
fn round_trip_in_each_dialect() {
    let cases = [
        (
            DnFormat::Default,
            vec![
                "CN=Bob Smith, OU=Sales + L=Paris, O=\"Acme, Inc.\", C=US",
                "cn=alice;o=Example;c=GB",
                "EMAILADDRESS=bob@example.com, DC=example, DC=com",
                "CN=#0C03616263, O=Example",
            ],
        ),
        (
            DnFormat::Rfc1779,
            vec![
                "CN=Bob Smith, O=\"Acme; Inc.\", C=US",
                "OID.2.5.4.3=Carol, L=Berlin",
                "CN=x + OU=y, O=z",
            ],
        ),
        (
            DnFormat::Rfc2253,
            vec![
                "CN=Bob\\, Jr.,O=Acme\\+Co,C=US",
                "CN=\\ lead,O=trail\\ ,C=US",
                "1.2.3.4=#0403414243,UID=jsmith,DC=example,DC=net",
                "CN=\\#hash,O=a\\\"b\\\\c",
                "OU=Sales+CN=J. Smith,O=Widget Inc.,C=US",
            ],
        ),
    ];

    for (format, strings) in cases {
        for s in strings {
            let dn = parse(s, format);
            let rendered = dn.to_string_in(format);
            let reparsed = parse(&rendered, format);
            assert_eq!(
                reparsed.to_rfc2253_canonical_string(),
                dn.to_rfc2253_canonical_string(),
                "{:?} round trip of {} via {}",
                format,
                s,
                rendered
            );
            assert_eq!(reparsed, dn);
        }
    }
}

#[test]
fn case_and_whitespace_invariance() {
    let a = parse("CN=Bob,O=Example", DnFormat::Default);
    let b = parse("cn = Bob , o = Example", DnFormat::Default);
    assert_eq!(
        a.to_rfc2253_canonical_string(),
        b.to_rfc2253_canonical_string()
    );
    assert_eq!(a, b);
    assert_eq!(a.to_rfc2253_canonical_string(), "cn=bob,o=example");
}

#[test]
fn rdn_member_order_is_ignored() {
    assert_eq!(
        parse("OU=X+CN=Y", DnFormat::Default),
        parse("CN=Y+OU=X", DnFormat::Default)
    );
    assert_eq!(
        parse("OU=X+CN=Y,O=Z", DnFormat::Rfc2253),
        parse("CN=Y+OU=X,O=Z", DnFormat::Rfc2253)
    );
}

#[test]
fn hex_escapes_decode() {
    let dn = parse("CN=\\48\\65\\6c\\6c\\6f", DnFormat::Rfc2253);
    assert_eq!(dn.common_name().unwrap(), "Hello");
    let dn = parse("CN=\\48\\65\\6c\\6c\\6f", DnFormat::Default);
    assert_eq!(dn.common_name().unwrap(), "Hello");
    // UTF-8 sequences split over several escapes
    let dn = parse("CN=Lu\\C4\\8Di\\C4\\87", DnFormat::Rfc2253);
    assert_eq!(dn.common_name().unwrap(), "Lučić");
}

#[test]
fn malformed_strings() {
    let none = StringMap::new();
    for (s, format) in [
        ("CN=Bob,,O=Example", DnFormat::Default),
        ("CN=\"Bob", DnFormat::Default),
        ("CN", DnFormat::Rfc2253),
        ("CN=Bob+", DnFormat::Rfc2253),
        ("NOTAKEYWORD=x", DnFormat::Rfc2253),
        ("CN=\\4", DnFormat::Rfc2253),
        ("CN=\\zz", DnFormat::Rfc2253),
    ] {
        assert!(
            DistinguishedName::parse(s, format, &none).is_err(),
            "{} should not parse as {:?}",
            s,
            format
        );
    }
}

#[test]
fn containment() {
    let prefix = parse("O=Acme,C=US", DnFormat::Default);
    let names = [
        "CN=Bob,OU=Sales,O=Acme,C=US",
        "OU=Sales,O=Acme,C=US",
        "CN=Carol+UID=c1,O=Acme,C=US",
    ];
    for s in names {
        let dn = parse(s, DnFormat::Default);
        assert!(dn.is_within_subtree(&prefix));
        assert_eq!(prefix.constrains(&dn), NameRelation::Narrows);
        assert_eq!(dn.constrains(&prefix), NameRelation::Widens);
    }
    assert!(prefix.is_within_subtree(&prefix));
    assert_eq!(prefix.constrains(&prefix.clone()), NameRelation::Match);

    let other = parse("O=Other,C=US", DnFormat::Default);
    assert!(!other.is_within_subtree(&prefix));
    assert_eq!(prefix.constrains(&other), NameRelation::SameType);
}

#[test]
fn keyword_maps() {
    let mut keywords = StringMap::new();
    keywords.insert("ROLE".to_string(), "2.5.4.72".to_string());
    let dn = DistinguishedName::parse("ROLE=admin,O=Example", DnFormat::Rfc2253, &keywords).unwrap();
    assert_eq!(dn.to_rfc2253_string(), "2.5.4.72=#130561646d696e,O=Example");

    let mut oid_map = StringMap::new();
    oid_map.insert("2.5.4.72".to_string(), "ROLE".to_string());
    assert_eq!(
        dn.to_rfc2253_string_with(&oid_map).unwrap(),
        "ROLE=admin,O=Example"
    );
    assert_eq!(dn.to_string(), "OID.2.5.4.72=admin, O=Example");
}

#[test]
fn conversion_between_dialects() {
    let loose = parse("CN=\"a#b; c+d\", O=Example", DnFormat::Default);
    assert_eq!(loose.common_name().unwrap(), "a#b; c+d");
    let rfc2253 = loose.to_string_in(DnFormat::Rfc2253);
    assert_eq!(rfc2253, "CN=a#b\\; c\\+d,O=Example");
    assert_eq!(parse(&rfc2253, DnFormat::Rfc2253), loose);
    let rfc1779 = loose.to_string_in(DnFormat::Rfc1779);
    assert_eq!(parse(&rfc1779, DnFormat::Rfc1779), loose);

    let leading = parse("CN=\"#tag\", O=Example", DnFormat::Default);
    let rfc2253 = leading.to_string_in(DnFormat::Rfc2253);
    assert_eq!(rfc2253, "CN=\\#tag,O=Example");
    assert_eq!(parse(&rfc2253, DnFormat::Rfc2253), leading);

    for format in [DnFormat::Default, DnFormat::Rfc1779, DnFormat::Rfc2253] {
        let strict = parse("CN=x\\,y,OU=a#b,O=c\\#d", DnFormat::Rfc2253);
        assert_eq!(strict.common_name().unwrap(), "x,y");
        let rendered = strict.to_string_in(format);
        assert_eq!(parse(&rendered, format), strict);
    }
}
