/// A parsed command line: the lowercase first token plus positional arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Intent {
    /// Lowercased first whitespace-delimited token; empty for a blank line.
    pub verb: String,
    /// Remaining tokens, case preserved.
    pub args: Vec<String>,
}

impl Intent {
    pub fn is_empty(&self) -> bool {
        self.verb.is_empty()
    }
}

pub fn parse_command(raw: &str) -> Intent {
    let mut it = raw.split_whitespace();
    let Some(verb) = it.next() else {
        return Intent::default();
    };

    Intent {
        verb: verb.to_lowercase(),
        args: it.map(str::to_string).collect(),
    }
}
