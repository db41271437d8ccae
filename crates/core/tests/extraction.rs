//! End-to-end extraction over real files

use std::fs;
use std::path::PathBuf;
use swiftpub_core::{
    extract_file, format_output, tokenize_file, ExtractConfig, InterfaceError, InterfaceScanner,
    OutputFormat, ScanConfig, ScanError, TokenKind,
};
use tempfile::TempDir;

const LIBRARY: &str = r#"
import Foundation

/// A cache of rendered frames.
/* the store /* keeps */ its own lock */
open class FrameCache<Key> {
    public init(limit: Int) {
        self.limit = limit
    }

    public func frame(for key: Key) -> Frame? {
        return store[key]
    }

    private func evict() {
        store.removeAll()
    }

    public struct Stats {
        public func summary() -> String { "\(hits)" }
    }
}

internal struct Helper {
    func help() {}
}

public actor Renderer {
    public func render() async { }
}
"#;

fn write_source(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_library_interface() {
    let dir = TempDir::new().unwrap();
    let path = write_source(&dir, "FrameCache.swift", LIBRARY);

    // Type annotations in signatures are stray punctuation
    let err = extract_file(&path, &ExtractConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        ScanError::InterfaceError(InterfaceError::LexicalError { ref lexeme, line: 7 }) if lexeme == ":"
    ));
}

#[test]
fn test_plain_signatures() {
    let dir = TempDir::new().unwrap();
    let src = "open class FrameCache < Key > {\n    public init ( limit ) {\n        self.limit = limit\n    }\n\n    public func frame ( key ) {\n        return store[key]\n    }\n\n    private func evict ( ) {\n        store.removeAll()\n    }\n\n    public struct Stats {\n        public func summary ( ) { \"\\(hits)\" }\n    }\n}\n\ninternal struct Helper {\n    func help ( ) { }\n}\n\npublic actor Renderer {\n    public func render ( ) { }\n}\n";
    let path = write_source(&dir, "FrameCache.swift", src);

    let iface = extract_file(&path, &ExtractConfig::default()).unwrap();
    assert_eq!(
        iface.text,
        "open class FrameCache < Key > {\n    public init ( limit )\n    public func frame ( key )\n    public struct Stats {\n        public func summary ( )\n    }\n}\npublic actor Renderer {\n    public func render ( )\n}"
    );
    assert_eq!(iface.unclosed_scopes, 0);
    assert_eq!(iface.line_count(), 10);
}

#[test]
fn test_comments_are_invisible() {
    let dir = TempDir::new().unwrap();
    let path = write_source(
        &dir,
        "Commented.swift",
        "// public class Ghost {\n/* public func ghost() /* nested */ still comment **/\npublic func real ( )\n",
    );

    let iface = extract_file(&path, &ExtractConfig::default()).unwrap();
    assert_eq!(iface.text, "public func real ( )");
}

#[test]
fn test_regex_in_body_strict_and_lenient() {
    let dir = TempDir::new().unwrap();
    let path = write_source(
        &dir,
        "Math.swift",
        "public func half ( x ) {\n    return x / 2\n}\n",
    );

    let strict = extract_file(&path, &ExtractConfig::default());
    assert!(matches!(
        strict,
        Err(ScanError::InterfaceError(InterfaceError::Lex(_)))
    ));

    let lenient = extract_file(&path, &ExtractConfig::default().with_lenient_bodies(true)).unwrap();
    assert_eq!(lenient.text, "public func half ( x )");
}

#[test]
fn test_truncated_file_is_tolerated() {
    let dir = TempDir::new().unwrap();
    let path = write_source(&dir, "Cut.swift", "public class Cut {\n    public func a ( ) {\n        let");

    let iface = extract_file(&path, &ExtractConfig::default()).unwrap();
    assert_eq!(iface.text, "public class Cut {\n    public func a ( )");
    assert_eq!(iface.unclosed_scopes, 1);
}

#[test]
fn test_small_read_buffer_matches_default() {
    let dir = TempDir::new().unwrap();
    let src = "open class Foo {\n    public func bar() {\n        let x = 1\n    }\n    private func baz() {}\n}\n";
    let path = write_source(&dir, "Foo.swift", src);

    let default = extract_file(&path, &ExtractConfig::default()).unwrap();
    let tiny = extract_file(&path, &ExtractConfig::default().with_read_buffer_size(3)).unwrap();
    assert_eq!(default, tiny);
    assert_eq!(default.text, "open class Foo {\n    public func bar ( )\n}");
}

#[test]
fn test_token_dump_lines() {
    let dir = TempDir::new().unwrap();
    let path = write_source(&dir, "Tiny.swift", "public func f()\n{ }\n");

    let tokens = tokenize_file(&path, &ExtractConfig::default()).unwrap();
    let dump: Vec<String> = tokens.iter().map(|t| t.display()).collect();
    assert_eq!(
        dump,
        vec![
            "public PUBLIC",
            "func FUNC",
            "f ID",
            "( OPEN_BR",
            ") CLOSING_BR",
            "{ OPEN_CBR",
            "} CLOSING_CBR",
            " EOF",
        ]
    );
    assert_eq!(tokens[5].line, 2);
    assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::EndOfFile));
}

#[test]
fn test_scan_and_format() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("Sources/Kit")).unwrap();
    fs::write(
        dir.path().join("Sources/Kit/Api.swift"),
        "public struct Api {\n    public func call ( ) { }\n}\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("Sources/Kit/Impl.swift"),
        "struct Impl { func go ( ) { } }\n",
    )
    .unwrap();
    fs::create_dir_all(dir.path().join("Generated")).unwrap();
    fs::write(dir.path().join("Generated/Out.swift"), "public class Out { }\n").unwrap();

    let config = ScanConfig::new(dir.path().to_path_buf())
        .with_ignore_patterns(vec!["**/Generated/**".to_string()])
        .with_threads(2);
    let result = InterfaceScanner::new(config).unwrap().scan().unwrap();

    assert_eq!(result.stats.total_files, 2);
    assert_eq!(result.stats.files_with_public_api, 1);
    assert!(!result.has_failures());

    let text = format_output(&result, OutputFormat::Text).unwrap();
    assert_eq!(
        text,
        "// Sources/Kit/Api.swift\npublic struct Api {\n    public func call ( )\n}"
    );

    let json = format_output(&result, OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["stats"]["files_with_public_api"], 1);
    assert!(value.get("failures").is_none());
}
