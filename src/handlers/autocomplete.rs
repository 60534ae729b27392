use axum::Json;
use tracing::debug;

use crate::models::{AutocompleteRequest, AutocompleteResponse};

/// Rule-based autocomplete endpoint
pub async fn autocomplete(Json(payload): Json<AutocompleteRequest>) -> Json<AutocompleteResponse> {
    let suggestion = suggest(&payload.code, payload.cursor_position);
    debug!(
        "Autocomplete at position {}: '{}'",
        payload.cursor_position, suggestion
    );
    Json(AutocompleteResponse { suggestion })
}

/// What a rule gets to look at: the current line up to the cursor.
struct LineCtx<'a> {
    /// Current line, trimmed
    line: &'a str,
    /// Last whitespace-separated token on the line
    last_word: &'a str,
}

type Rule = fn(&LineCtx) -> Option<String>;

/// Ordered rule table; the first rule that matches wins. Each rule only sees
/// the line context, never connection or session state.
const RULES: &[Rule] = &[
    empty_line,
    import_stmt,
    from_stmt,
    def_stmt,
    class_stmt,
    print_stmt,
    return_stmt,
    if_stmt,
    for_stmt,
    while_stmt,
    keyword_prefix,
];

/// Suggest a completion for `code` at `cursor_position` (a character offset).
/// Returns an empty string when no rule applies.
pub fn suggest(code: &str, cursor_position: usize) -> String {
    let before: String = code.chars().take(cursor_position).collect();
    let current_line = before.rsplit('\n').next().unwrap_or("");
    let line = current_line.trim();
    let last_word = line.split_whitespace().last().unwrap_or("");

    let ctx = LineCtx { line, last_word };
    RULES.iter().find_map(|rule| rule(&ctx)).unwrap_or_default()
}

fn empty_line(ctx: &LineCtx) -> Option<String> {
    ctx.line.is_empty().then(|| "def main():".to_string())
}

fn import_stmt(ctx: &LineCtx) -> Option<String> {
    (ctx.line == "import" || ctx.line.ends_with("import")).then(|| " os".to_string())
}

fn from_stmt(ctx: &LineCtx) -> Option<String> {
    (ctx.line == "from" || ctx.line.ends_with("from")).then(|| " os import".to_string())
}

fn def_stmt(ctx: &LineCtx) -> Option<String> {
    if ctx.line == "def" {
        return Some(" main():".to_string());
    }
    if !ctx.line.starts_with("def") {
        return None;
    }
    if !ctx.line.contains('(') {
        Some("():".to_string())
    } else if !ctx.line.contains(')') {
        Some("):".to_string())
    } else if !ctx.line.contains(':') {
        Some(":".to_string())
    } else {
        None
    }
}

fn class_stmt(ctx: &LineCtx) -> Option<String> {
    if ctx.line == "class" {
        return Some(" MyClass:".to_string());
    }
    (ctx.line.starts_with("class") && !ctx.line.contains(':')).then(|| ":".to_string())
}

fn print_stmt(ctx: &LineCtx) -> Option<String> {
    if ctx.line == "print" {
        return Some("()".to_string());
    }
    if ctx.line.contains("print(") {
        // An odd quote means the cursor sits inside a string literal.
        if ctx.line.matches('"').count() == 1 {
            return Some("\")".to_string());
        }
        if !ctx.line.contains(')') {
            return Some(")".to_string());
        }
    }
    None
}

fn return_stmt(ctx: &LineCtx) -> Option<String> {
    if ctx.line == "return" {
        return Some(" \"Hello, World!\"".to_string());
    }
    (ctx.line.starts_with("return") && ctx.line.matches('"').count() == 1)
        .then(|| "\"".to_string())
}

fn if_stmt(ctx: &LineCtx) -> Option<String> {
    if ctx.line == "if" {
        return Some(" True:".to_string());
    }
    (ctx.line.starts_with("if") && !ctx.line.contains(':')).then(|| ":".to_string())
}

fn for_stmt(ctx: &LineCtx) -> Option<String> {
    if ctx.line == "for" {
        return Some(" i in range(10):".to_string());
    }
    if !ctx.line.starts_with("for") {
        return None;
    }
    if !ctx.line.contains(" in ") {
        Some(" in range(10):".to_string())
    } else if !ctx.line.contains(':') {
        Some(":".to_string())
    } else {
        None
    }
}

fn while_stmt(ctx: &LineCtx) -> Option<String> {
    if ctx.line == "while" {
        return Some(" True:".to_string());
    }
    (ctx.line.starts_with("while") && !ctx.line.contains(':')).then(|| ":".to_string())
}

/// Completions for partially typed keywords; all ASCII, so byte slicing by
/// prefix length is safe.
fn keyword_prefix(ctx: &LineCtx) -> Option<String> {
    let word = ctx.last_word;
    if word.is_empty() {
        return None;
    }
    let completion = match word {
        "d" | "de" => "def main():"[word.len()..].to_string(),
        "pri" | "prin" => "print()"[word.len()..].to_string(),
        "imp" | "impo" | "impor" => format!("{} os", &"import"[word.len()..]),
        "cla" | "clas" => format!("{} MyClass:", &"class"[word.len()..]),
        "fo" => "r i in range(10):".to_string(),
        "ret" | "retu" | "retur" => format!("{} True", &"return"[word.len()..]),
        _ => return None,
    };
    Some(completion)
}

#[cfg(test)]
mod tests {
    use super::suggest;

    #[test]
    fn empty_line_suggests_a_function() {
        assert_eq!(suggest("", 0), "def main():");
        assert_eq!(suggest("x = 1\n", 6), "def main():");
    }

    #[test]
    fn statement_openers() {
        assert_eq!(suggest("def ", 4), " main():");
        assert_eq!(suggest("import", 6), " os");
        assert_eq!(suggest("from", 4), " os import");
        assert_eq!(suggest("class", 5), " MyClass:");
        assert_eq!(suggest("print", 5), "()");
        assert_eq!(suggest("return", 6), " \"Hello, World!\"");
        assert_eq!(suggest("if", 2), " True:");
        assert_eq!(suggest("for", 3), " i in range(10):");
        assert_eq!(suggest("while", 5), " True:");
    }

    #[test]
    fn def_progresses_towards_a_full_signature() {
        assert_eq!(suggest("def main", 8), "():");
        assert_eq!(suggest("def main(", 9), "):");
        assert_eq!(suggest("def main()", 10), ":");
        assert_eq!(suggest("def main():", 11), "");
    }

    #[test]
    fn open_string_inside_print_is_closed() {
        assert_eq!(suggest("print(\"hi", 9), "\")");
        assert_eq!(suggest("print(x", 7), ")");
    }

    #[test]
    fn loops_complete_their_headers() {
        assert_eq!(suggest("for i", 5), " in range(10):");
        assert_eq!(suggest("for i in range(3)", 17), ":");
        assert_eq!(suggest("while x < 3", 11), ":");
    }

    #[test]
    fn partial_keywords_are_completed() {
        assert_eq!(suggest("de", 2), "f main():");
        assert_eq!(suggest("prin", 4), "t()");
        assert_eq!(suggest("impo", 4), "rt os");
        assert_eq!(suggest("fo", 2), "r i in range(10):");
        assert_eq!(suggest("retu", 4), "rn True");
    }

    #[test]
    fn only_the_current_line_matters() {
        assert_eq!(suggest("def done():\n    pass\nwhile", 26), " True:");
    }

    #[test]
    fn unknown_text_yields_nothing() {
        assert_eq!(suggest("x = 42", 6), "");
    }

    #[test]
    fn cursor_is_a_char_offset_and_clamps() {
        // Multi-byte characters before the cursor must not panic.
        assert_eq!(suggest("αβγ\n", 4), "def main():");
        // A cursor past the end sees the whole text.
        assert_eq!(suggest("if", 100), " True:");
    }
}
