//! Directory listing filters.
//!
//! Syntax: `;`-separated tokens.
//!
//! | token          | admits                                         |
//! |----------------|------------------------------------------------|
//! | empty / `*`    | everything                                     |
//! | `DIR`          | directories                                    |
//! | `.ext`         | files with that extension (case-insensitive)   |
//! | contains `*?`  | entries whose file name matches the wildcard   |
//! | anything else  | entries with exactly that file name            |

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Any,
    Dir,
    Ext(String),
    Wildcard(String),
    Exact(String),
}

/// Parsed filter string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    tokens: Vec<Token>,
}

impl Filter {
    pub fn parse(filter: &str) -> Self {
        let tokens: Vec<Token> = filter
            .split(';')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| {
                if t == "*" {
                    Token::Any
                } else if t == "DIR" {
                    Token::Dir
                } else if t.contains(['*', '?']) {
                    Token::Wildcard(t.to_string())
                } else if let Some(ext) = t.strip_prefix('.') {
                    Token::Ext(ext.to_ascii_lowercase())
                } else {
                    Token::Exact(t.to_string())
                }
            })
            .collect();

        if tokens.is_empty() {
            Self { tokens: vec![Token::Any] }
        } else {
            Self { tokens }
        }
    }

    pub fn admits_everything(&self) -> bool {
        self.tokens.contains(&Token::Any)
    }

    /// Whether an entry called `name` passes the filter.
    pub fn admits(&self, name: &str, is_dir: bool) -> bool {
        self.tokens.iter().any(|t| match t {
            Token::Any => true,
            Token::Dir => is_dir,
            Token::Ext(ext) => !is_dir && extension_matches(name, ext),
            Token::Wildcard(p) => wildcard_match(p, name),
            Token::Exact(n) => n == name,
        })
    }
}

impl Default for Filter {
    fn default() -> Self {
        Self::parse("")
    }
}

fn extension_matches(name: &str, ext: &str) -> bool {
    match name.rsplit_once('.') {
        Some((stem, e)) => !stem.is_empty() && e.eq_ignore_ascii_case(ext),
        None => false,
    }
}

/// `*` matches any run (including empty), `?` exactly one character.
pub fn wildcard_match(pattern: &str, name: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let s: Vec<char> = name.chars().collect();

    let (mut pi, mut si) = (0usize, 0usize);
    // Last `*` seen and the name position it was tried against.
    let mut star: Option<(usize, usize)> = None;

    while si < s.len() {
        if pi < p.len() && (p[pi] == '?' || p[pi] == s[si]) {
            pi += 1;
            si += 1;
        } else if pi < p.len() && p[pi] == '*' {
            star = Some((pi, si));
            pi += 1;
        } else if let Some((sp, ss)) = star {
            pi = sp + 1;
            si = ss + 1;
            star = Some((sp, ss + 1));
        } else {
            return false;
        }
    }

    p[pi..].iter().all(|&c| c == '*')
}
