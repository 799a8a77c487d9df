//! Parsing of stdin lines into user inputs.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Plain line: the new search box text.
    Query(String),
    Open(i64),
    Close,
    Review(String),
    Quit,
    Invalid(String),
}

impl Input {
    pub fn parse(line: &str) -> Self {
        let Some(rest) = line.strip_prefix(':') else {
            return Input::Query(line.to_string());
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest.trim(), ""),
        };

        match name {
            "open" => arg
                .parse()
                .map(Input::Open)
                .unwrap_or_else(|_| Input::Invalid(format!("expected a movie id, got `{arg}`"))),
            "close" => Input::Close,
            "review" => Input::Review(arg.to_string()),
            "quit" | "q" => Input::Quit,
            other => Input::Invalid(format!("unknown command `:{other}`")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lines_are_query_edits() {
        assert_eq!(Input::parse("batman"), Input::Query("batman".into()));
        assert_eq!(Input::parse("  "), Input::Query("  ".into()));
    }

    #[test]
    fn commands_take_arguments() {
        assert_eq!(Input::parse(":open 2"), Input::Open(2));
        assert_eq!(Input::parse(":close"), Input::Close);
        assert_eq!(Input::parse(":review Loved it"), Input::Review("Loved it".into()));
        assert_eq!(Input::parse(":review"), Input::Review(String::new()));
        assert_eq!(Input::parse(":quit"), Input::Quit);
    }

    #[test]
    fn bad_commands_are_reported() {
        assert!(matches!(Input::parse(":open two"), Input::Invalid(_)));
        assert!(matches!(Input::parse(":play"), Input::Invalid(_)));
    }
}
