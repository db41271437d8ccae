//! Property-based tests for the tokenizer and the interface extractor

use proptest::prelude::*;
use std::io::Cursor;
use swiftpub_core::{
    extract_public_interface, extract_with_config, tokenize, BufferedReader, ExtractConfig,
    InterfaceError, TokenKind,
};
use swiftpub_core::lexer::KEYWORDS;

const KEYWORDS_FOR_TESTS: [&str; 9] = {
    let mut words = [""; 9];
    let mut i = 0;
    while i < KEYWORDS.len() {
        words[i] = KEYWORDS[i].0;
        i += 1;
    }
    words
};

fn reader(src: &str) -> BufferedReader<Cursor<Vec<u8>>> {
    BufferedReader::new(Cursor::new(src.as_bytes().to_vec()))
}

fn extract(src: &str) -> Result<String, InterfaceError> {
    extract_public_interface(&mut reader(src))
}

/// Identifier-shaped words, keywords included
fn word() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z_][a-zA-Z0-9_]{0,10}",
        prop::sample::select(KEYWORDS_FOR_TESTS.to_vec()).prop_map(str::to_string),
    ]
}

fn punctuation() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["(", ")", "{", "}", "[", "]", "<", ">"]).prop_map(str::to_string)
}

fn lexeme() -> impl Strategy<Value = String> {
    prop_oneof![3 => word(), 1 => punctuation()]
}

fn separator() -> impl Strategy<Value = String> {
    prop::sample::select(vec![" ", "\n", "\t", "  ", "\r\n", " // note\n", " /* c /* d */ */ "])
        .prop_map(str::to_string)
}

/// Declaration-ish fragments that exercise every state transition
fn fragment() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "public", "open", "private", "internal", "class", "struct", "actor", "func", "init",
        "name", "(", ")", "<", ">", "[", "]", "{", "}",
    ])
}

/// A well-formed nested public type
fn public_scope() -> impl Strategy<Value = String> {
    let member = prop_oneof![
        Just("public func run ( ) { let x = 1 }".to_string()),
        Just("public init ( ) { }".to_string()),
        Just("private func hide ( ) { if a { b } }".to_string()),
        Just("internal struct Detail { var a = 0 }".to_string()),
        Just("fileprivate func helper ( ) { }".to_string()),
    ];
    member.prop_recursive(3, 24, 4, |inner| {
        (
            prop::sample::select(vec!["public class", "open class", "public struct", "public actor"]),
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(head, members)| format!("{} Node {{\n{}\n}}", head, members.join("\n")))
    })
}

proptest! {
    #[test]
    fn tokens_reconstruct_the_source(
        pieces in prop::collection::vec((lexeme(), separator()), 0..40)
    ) {
        let src: String = pieces.iter().map(|(l, s)| format!("{}{}", l, s)).collect();
        let tokens = tokenize(&mut reader(&src)).unwrap();

        let lexemes: Vec<String> = tokens
            .iter()
            .filter(|t| !t.is_eof())
            .map(|t| t.text().into_owned())
            .collect();
        let expected: Vec<String> = pieces.into_iter().map(|(l, _)| l).collect();
        prop_assert_eq!(lexemes, expected);
    }

    #[test]
    fn end_of_file_is_last_and_only_empty_token(
        pieces in prop::collection::vec((lexeme(), separator()), 0..40)
    ) {
        let src: String = pieces.iter().map(|(l, s)| format!("{}{}", l, s)).collect();
        let tokens = tokenize(&mut reader(&src)).unwrap();

        let last = tokens.last().unwrap();
        prop_assert_eq!(last.kind(), TokenKind::EndOfFile);
        prop_assert!(last.lexeme().is_empty());
        prop_assert_eq!(tokens.iter().filter(|t| t.is_eof()).count(), 1);
        prop_assert!(tokens[..tokens.len() - 1].iter().all(|t| !t.lexeme().is_empty()));
    }

    #[test]
    fn keywords_are_case_sensitive(
        index in 0..KEYWORDS_FOR_TESTS.len(),
        mask in prop::collection::vec(any::<bool>(), 8)
    ) {
        let keyword = KEYWORDS_FOR_TESTS[index];
        let variant: String = keyword
            .chars()
            .zip(mask.iter().cycle())
            .map(|(c, &upper)| if upper { c.to_ascii_uppercase() } else { c })
            .collect();

        let tokens = tokenize(&mut reader(&variant)).unwrap();
        let expected = if variant == keyword {
            TokenKind::from_word(keyword.as_bytes())
        } else {
            TokenKind::Identifier
        };
        prop_assert_eq!(tokens[0].kind(), expected);
    }

    #[test]
    fn chunk_size_does_not_change_tokens(
        pieces in prop::collection::vec((lexeme(), separator()), 0..30),
        capacity in 1usize..17
    ) {
        let src: String = pieces.iter().map(|(l, s)| format!("{}{}", l, s)).collect();
        let texts = |tokens: Vec<swiftpub_core::Token>| -> Vec<(String, TokenKind, usize)> {
            tokens.iter().map(|t| (t.text().into_owned(), t.kind(), t.line())).collect()
        };

        let mut small = BufferedReader::from_source(Cursor::new(src.as_bytes().to_vec()), capacity);
        let chunked = texts(tokenize(&mut small).unwrap());
        let whole = texts(tokenize(&mut reader(&src)).unwrap());
        prop_assert_eq!(chunked, whole);
    }

    #[test]
    fn extraction_is_idempotent(
        fragments in prop::collection::vec(fragment(), 0..40)
    ) {
        let src = fragments.join(" ");
        prop_assert_eq!(extract(&src), extract(&src));
    }

    #[test]
    fn mixed_declaration_keywords_never_panic(
        fragments in prop::collection::vec(fragment(), 0..60)
    ) {
        let src = fragments.join(" ");
        // Any outcome is acceptable as long as it is a value
        let _ = extract(&src);
    }

    #[test]
    fn well_formed_scopes_close_balanced(src in public_scope()) {
        let iface = extract_with_config(&mut reader(&src), &ExtractConfig::default()).unwrap();

        prop_assert_eq!(iface.unclosed_scopes, 0);
        prop_assert_eq!(iface.text.matches('{').count(), iface.text.matches('}').count());
        prop_assert!(!iface.text.contains("private"));
        prop_assert!(!iface.text.contains("internal"));
        prop_assert!(!iface.text.contains("fileprivate"));
        prop_assert!(!iface.text.contains("let"));
    }

    #[test]
    fn interface_lines_are_indented_by_depth(src in public_scope()) {
        let text = extract(&src).unwrap();
        let mut depth = 0usize;
        for line in text.lines() {
            if line == "}" || line.trim_start() == "}" {
                depth -= 1;
                prop_assert_eq!(line.len() - 1, depth * 4);
                continue;
            }
            let indent = line.len() - line.trim_start().len();
            prop_assert_eq!(indent, depth * 4);
            if line.ends_with('{') {
                depth += 1;
            }
        }
        prop_assert_eq!(depth, 0);
    }
}
