// src/exec/command_line.rs

//! Command-line string helpers.
//!
//! Command lines are carried as a single string, Windows style. Only two
//! things ever need to look inside one: error messages (which want the
//! program token) and the portable backend (which needs an argv).

/// Extract the program token from a command line.
///
/// - `"a b" x y` gives `a b` (text between the first pair of quotes; an
///   unterminated quote runs to the end).
/// - `ab x y` gives `ab` (text up to the first space).
pub fn program_name_from_command_line(command_line: &str) -> &str {
    if let Some(rest) = command_line.strip_prefix('"') {
        match rest.find('"') {
            Some(end) => &rest[..end],
            None => rest,
        }
    } else {
        match command_line.find(' ') {
            Some(end) => &command_line[..end],
            None => command_line,
        }
    }
}

/// Wrap `s` in double quotes.
pub fn quote(s: &str) -> String {
    format!("\"{s}\"")
}

/// Strip one pair of surrounding double quotes, if present.
pub fn unquote(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(s)
}

/// Join command-line fragments with single spaces, skipping empty ones.
pub fn join_fragments<'a>(fragments: impl IntoIterator<Item = &'a str>) -> String {
    fragments
        .into_iter()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Quote one argument so that [`split_command_line`] (and the Windows C
/// runtime) read it back unchanged.
///
/// Arguments without whitespace or double quotes pass through as-is. Others
/// are wrapped in quotes; embedded quotes become `\"` and backslashes that
/// end up in front of a quote are doubled.
pub fn quote_argument(arg: &str) -> String {
    if !arg.is_empty() && !arg.chars().any(|c| c.is_whitespace() || c == '"') {
        return arg.to_string();
    }

    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    let mut backslashes = 0usize;
    for ch in arg.chars() {
        match ch {
            '\\' => backslashes += 1,
            '"' => {
                quoted.extend(std::iter::repeat_n('\\', backslashes * 2 + 1));
                quoted.push('"');
                backslashes = 0;
            }
            c => {
                quoted.extend(std::iter::repeat_n('\\', backslashes));
                quoted.push(c);
                backslashes = 0;
            }
        }
    }
    quoted.extend(std::iter::repeat_n('\\', backslashes * 2));
    quoted.push('"');
    quoted
}

/// Quote each argument with [`quote_argument`] and join them with spaces.
pub fn join_arguments<S: AsRef<str>>(args: &[S]) -> String {
    args.iter()
        .map(|arg| quote_argument(arg.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split a command line into arguments.
///
/// Whitespace separates arguments; double quotes group text (including
/// whitespace) and are removed. `""` produces an empty argument.
///
/// Backslashes are literal unless they precede a double quote: `2n`
/// backslashes and a quote give `n` backslashes and toggle quoting, `2n + 1`
/// give `n` backslashes and a literal quote.
pub fn split_command_line(command_line: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;
    let mut backslashes = 0usize;

    for ch in command_line.chars() {
        if ch == '\\' {
            backslashes += 1;
            has_token = true;
            continue;
        }

        if ch == '"' {
            current.extend(std::iter::repeat_n('\\', backslashes / 2));
            if backslashes % 2 == 1 {
                current.push('"');
            } else {
                in_quotes = !in_quotes;
            }
            backslashes = 0;
            has_token = true;
            continue;
        }

        current.extend(std::iter::repeat_n('\\', backslashes));
        backslashes = 0;

        if ch.is_whitespace() && !in_quotes {
            if has_token {
                args.push(std::mem::take(&mut current));
                has_token = false;
            }
        } else {
            current.push(ch);
            has_token = true;
        }
    }

    current.extend(std::iter::repeat_n('\\', backslashes));
    if has_token {
        args.push(current);
    }

    args
}
