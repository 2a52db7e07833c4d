use serde::{Deserialize, Serialize};

/// Languages the judge service can execute.
/// Serialized/deserialized in `lowercase` for request JSON.
/// Common aliases are accepted (e.g., "c++", "js", "c#", "golang").
///
/// Deserialization doubles as validation: a language outside this set is a
/// client-side 400 and is never forwarded to the judge service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,                              // "python"
    Java,                                // "java"
    #[serde(alias = "cc", alias = "c++")]
    Cpp,                                 // "cpp"
    C,                                   // "c"
    #[serde(alias = "js", alias = "node")]
    JavaScript,                          // "javascript"
    #[serde(alias = "c#")]
    CSharp,                              // "csharp"
    #[serde(alias = "golang")]
    Go,                                  // "go"
    Rust,                                // "rust"
}

impl Language {
    /// Backend language id expected by the Judge0-compatible API.
    pub fn judge_id(self) -> i32 {
        match self {
            Language::Python => 71,     // Python 3.8
            Language::Java => 62,       // OpenJDK 13
            Language::Cpp => 54,        // GCC 9, C++17
            Language::C => 50,          // GCC 9
            Language::JavaScript => 63, // Node 12
            Language::CSharp => 51,     // Mono 6
            Language::Go => 60,         // Go 1.13
            Language::Rust => 73,       // Rust 1.40
        }
    }

    /// Canonical lowercase name, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Java => "java",
            Language::Cpp => "cpp",
            Language::C => "c",
            Language::JavaScript => "javascript",
            Language::CSharp => "csharp",
            Language::Go => "go",
            Language::Rust => "rust",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.to_lowercase()))
            .map_err(|_| format!("unsupported language: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn judge_ids_are_fixed() {
        assert_eq!(Language::Python.judge_id(), 71);
        assert_eq!(Language::Java.judge_id(), 62);
        assert_eq!(Language::Cpp.judge_id(), 54);
        assert_eq!(Language::C.judge_id(), 50);
        assert_eq!(Language::JavaScript.judge_id(), 63);
        assert_eq!(Language::CSharp.judge_id(), 51);
        assert_eq!(Language::Go.judge_id(), 60);
        assert_eq!(Language::Rust.judge_id(), 73);
    }

    #[test]
    fn aliases_parse() {
        assert_eq!(Language::from_str("c++").unwrap(), Language::Cpp);
        assert_eq!(Language::from_str("js").unwrap(), Language::JavaScript);
        assert_eq!(Language::from_str("golang").unwrap(), Language::Go);
        assert_eq!(Language::from_str("C#").unwrap(), Language::CSharp);
    }

    #[test]
    fn unknown_language_is_rejected() {
        assert!(Language::from_str("brainfuck").is_err());
    }

    #[test]
    fn round_trips_through_serde() {
        let json = serde_json::to_string(&Language::JavaScript).unwrap();
        assert_eq!(json, "\"javascript\"");
        let back: Language = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Language::JavaScript);
    }
}
