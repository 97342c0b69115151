//! Keyword-scoring language detector.

use snipvault_core::traits::LanguageDetector;

/// Tag returned when nothing scores.
pub const FALLBACK_LANGUAGE: &str = "plaintext";

/// Languages and their indicative tokens (matched case-insensitively).
///
/// Ties go to the earlier entry, so supersets precede the languages they
/// extend (typescript before javascript, cpp before c).
const KEYWORDS: &[(&str, &[&str])] = &[
    (
        "rust",
        &[
            "fn ", "let mut ", "impl ", "pub fn", "use std::", "println!", "&mut ", "::new(",
            "-> result<",
        ],
    ),
    (
        "typescript",
        &[
            "interface ", ": string", ": number", ": boolean", "export type", "implements ",
            "readonly ",
        ],
    ),
    (
        "javascript",
        &["function ", "const ", "let ", "=> ", "console.log", "require(", "document.", "var "],
    ),
    (
        "python",
        &["def ", "import ", "from ", "self.", "elif ", "print(", "__init__", "lambda "],
    ),
    ("go", &["package ", "func ", ":= ", "fmt.", "go func", "chan "]),
    (
        "java",
        &[
            "public class", "public static void", "system.out", "import java", "@override",
            "private final",
        ],
    ),
    (
        "cpp",
        &["std::", "#include <iostream>", "cout <<", "template<", "namespace ", "nullptr"],
    ),
    ("c", &["#include <stdio.h>", "printf(", "malloc(", "int main(", "#include"]),
    (
        "sql",
        &[
            "select ", "insert into", "create table", "where ", "from ", "join ", "group by",
            "order by",
        ],
    ),
    ("css", &["color:", "margin:", "padding:", "font-size:", "display:", "border:"]),
    ("bash", &["echo ", "fi\n", "then\n", "$(", "esac", "done\n", "#!/bin/bash", "#!/bin/sh"]),
    ("markdown", &["\n## ", "```", "](http", "\n- [ ]", "**"]),
];

/// Scores content against a small keyword table.
#[derive(Debug, Clone, Default)]
pub struct KeywordLanguageDetector;

impl KeywordLanguageDetector {
    /// Creates a new detector.
    pub fn new() -> Self {
        Self
    }

    fn structural(content: &str) -> Option<&'static str> {
        let trimmed = content.trim_start();
        if (trimmed.starts_with('{') || trimmed.starts_with('['))
            && serde_json::from_str::<serde_json::Value>(trimmed).is_ok()
        {
            return Some("json");
        }

        let head = trimmed.get(..64).unwrap_or(trimmed).to_ascii_lowercase();
        if head.starts_with("<!doctype html") || head.starts_with("<html") {
            return Some("html");
        }
        if head.starts_with("#!") {
            if head.contains("python") {
                return Some("python");
            }
            if head.contains("bash") || head.contains("/sh") {
                return Some("bash");
            }
        }
        None
    }
}

impl LanguageDetector for KeywordLanguageDetector {
    fn detect(&self, content: &str) -> String {
        if let Some(language) = Self::structural(content) {
            return language.to_string();
        }

        let lowered = content.to_lowercase();
        let mut best: Option<(&str, usize)> = None;
        for &(language, tokens) in KEYWORDS {
            let score = tokens.iter().filter(|t| lowered.contains(*t)).count();
            if score > 0 && best.is_none_or(|(_, top)| score > top) {
                best = Some((language, score));
            }
        }

        let markup = lowered.contains("</div>") || lowered.contains("</p>");
        if markup && best.is_none_or(|(_, top)| top < 2) {
            return "html".to_string();
        }

        best.map(|(language, _)| language)
            .unwrap_or(FALLBACK_LANGUAGE)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(content: &str) -> String {
        KeywordLanguageDetector::new().detect(content)
    }

    #[test]
    fn test_common_languages() {
        assert_eq!(
            detect("fn main() {\n    let mut x = 5;\n    println!(\"{}\", x);\n}"),
            "rust"
        );
        assert_eq!(detect("def add(a, b):\n    return a + b\n"), "python");
        assert_eq!(
            detect("SELECT id, name FROM users WHERE active = true;"),
            "sql"
        );
        assert_eq!(
            detect("package main\n\nimport \"fmt\"\n\nfunc main() {\n\tfmt.Println(\"hi\")\n}"),
            "go"
        );
        assert_eq!(detect("console.log('hi');"), "javascript");
    }

    #[test]
    fn test_typescript_beats_javascript_on_tie() {
        assert_eq!(detect("const name: string = 'x';"), "typescript");
    }

    #[test]
    fn test_structural_formats() {
        assert_eq!(detect("{\"a\": [1, 2, 3]}"), "json");
        assert_eq!(detect("<!DOCTYPE html>\n<html></html>"), "html");
        assert_eq!(detect("#!/usr/bin/env python3\nx = 1"), "python");
        assert_eq!(detect("#!/bin/bash\nls"), "bash");
    }

    #[test]
    fn test_fallback() {
        assert_eq!(detect("hello world"), FALLBACK_LANGUAGE);
    }
}
