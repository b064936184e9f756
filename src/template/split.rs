// src/template/split.rs

/// Split an expanded argument string into individual arguments.
///
/// Rules:
/// - Unquoted whitespace separates arguments.
/// - Double quotes group text (including whitespace) and are removed.
/// - `\"` is a literal double quote.
/// - `""` on its own is an empty argument.
///
/// Unbalanced quotes are closed implicitly at the end of the input.
pub fn split_arguments(input: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut in_quotes = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'"') => {
                chars.next();
                current.push('"');
                in_token = true;
            }
            '"' => {
                in_quotes = !in_quotes;
                in_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if in_token {
                    args.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if in_token {
        args.push(current);
    }

    args
}
