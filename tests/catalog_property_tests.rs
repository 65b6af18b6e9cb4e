use std::collections::BTreeMap;

use pocatalog::{Catalog, Translation, parse};
use proptest::prelude::*;

fn key_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9 _]{0,15}").expect("valid key regex")
}

fn value_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex(r#"[A-Za-z0-9 _.,!?%éü"\\\n\t-]{0,30}"#)
        .expect("valid value regex")
}

fn translation_strategy() -> impl Strategy<Value = Translation> {
    prop_oneof![
        Just(Translation::Untranslated),
        value_strategy().prop_map(Translation::Singular),
        prop::collection::vec(value_strategy(), 1..4).prop_map(Translation::Plural),
    ]
}

fn catalog_strategy() -> impl Strategy<Value = BTreeMap<String, Translation>> {
    prop::collection::btree_map(key_strategy(), translation_strategy(), 0..8)
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str(r"\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str(r"\n"),
            '\t' => out.push_str(r"\t"),
            c => out.push(c),
        }
    }
    out
}

/// Writes `s` as a quoted string, splitting it over a continuation line when long enough.
fn quoted(keyword: &str, s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() < 4 {
        return format!("{keyword} \"{}\"\n", escape(s));
    }
    let (head, tail) = chars.split_at(chars.len() / 2);
    let head: String = head.iter().collect();
    let tail: String = tail.iter().collect();
    format!("{keyword} \"{}\"\n\"{}\"\n", escape(&head), escape(&tail))
}

fn render(entries: &BTreeMap<String, Translation>) -> String {
    let mut out = String::from("# generated\n\n");
    for (key, value) in entries {
        out.push_str(&quoted("msgid", key));
        match value {
            Translation::Untranslated => {}
            Translation::Singular(s) => out.push_str(&quoted("msgstr", s)),
            Translation::Plural(forms) => {
                out.push_str(&quoted("msgid_plural", &format!("{key}s")));
                for (index, form) in forms.iter().enumerate() {
                    out.push_str(&quoted(&format!("msgstr[{index}]"), form));
                }
            }
        }
        out.push_str("\n# next\n");
    }
    out
}

proptest! {
    #[test]
    fn parse_recovers_every_value(entries in catalog_strategy()) {
        let catalog = parse(&render(&entries)).expect("well-formed catalog");
        let expected: Catalog = entries.clone().into_iter().collect();
        prop_assert_eq!(catalog, expected);
    }

    #[test]
    fn parse_is_idempotent(entries in catalog_strategy()) {
        let text = render(&entries);
        let first = parse(&text).expect("first parse");
        let second = parse(&text).expect("second parse");
        prop_assert_eq!(first, second);
    }

    #[test]
    fn comment_and_blank_lines_are_inert(entries in catalog_strategy()) {
        let text = render(&entries);
        let noisy: String = text
            .lines()
            .flat_map(|line| [line.to_string(), "   ".to_string(), "#. noise".to_string()])
            .collect::<Vec<_>>()
            .join("\n");
        prop_assert_eq!(parse(&noisy).expect("noisy parse"), parse(&text).expect("plain parse"));
    }

    #[test]
    fn duplicate_translated_key_always_fails(key in key_strategy(), a in value_strategy(), b in value_strategy()) {
        let text = format!(
            "{}{}{}{}",
            quoted("msgid", &key),
            quoted("msgstr", &a),
            quoted("msgid", &key),
            quoted("msgstr", &b),
        );
        prop_assert!(parse(&text).is_err());
    }
}
