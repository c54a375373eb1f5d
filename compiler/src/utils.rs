use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

/// JSON-quotes `text`. The result doubles as a C++ string literal.
pub fn quote(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("\"{}\"", text))
}

pub fn is_identifier(text: &str) -> bool {
    IDENTIFIER.is_match(text)
}

/// Enumeration constant name: `k` followed by the capitalized source name
/// (first letter upper case, the rest lower case), e.g. `UTF8` -> `kUtf8`.
pub fn as_enum_constant(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        None => "k".to_string(),
        Some(first) => format!("k{}{}", first.to_uppercase(), chars.as_str().to_lowercase()),
    }
}

/// Escapes C++ reserved keywords by suffixing with an underscore.
pub fn escape_cpp_keyword(s: &str) -> String {
    let keywords = [
        "alignas", "alignof", "and", "asm", "auto", "bool", "break", "case",
        "catch", "char", "class", "const", "constexpr", "continue", "default",
        "delete", "do", "double", "else", "enum", "explicit", "export", "extern",
        "false", "float", "for", "friend", "goto", "if", "inline", "int", "long",
        "mutable", "namespace", "new", "noexcept", "not", "nullptr", "operator",
        "or", "private", "protected", "public", "register", "return", "short",
        "signed", "sizeof", "static", "struct", "switch", "template", "this",
        "throw", "true", "try", "typedef", "typeid", "typename", "union",
        "unsigned", "using", "virtual", "void", "volatile", "while", "xor",
    ];
    if keywords.contains(&s) {
        format!("{}_", s)
    } else {
        s.to_string()
    }
}

fn sanitize(line: &str) -> String {
    line.replace("/*", "/\\*").replace("*/", "*\\/")
}

/// Splits documentation into a `/** ... */` block.
pub fn doc_block(text: &str) -> Vec<String> {
    let mut lines = vec!["/**".to_string()];
    for line in text.lines() {
        if line.is_empty() {
            lines.push(" *".to_string());
        } else {
            lines.push(format!(" * {}", sanitize(line)));
        }
    }
    lines.push(" */".to_string());
    lines
}

/// Splits documentation into `//` line comments.
pub fn line_comments(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                "//".to_string()
            } else {
                format!("// {}", sanitize(line))
            }
        })
        .collect()
}
