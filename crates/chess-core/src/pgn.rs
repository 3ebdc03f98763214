//! PGN export of a session's history, plus the SAN token shape check.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::rules::PlayedMove;

const MAX_LINE_LEN: usize = 80;

static SAN_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[KQRBN]?[a-h]?[1-8]?x?[a-h][1-8](?:=[QRBN])?|O-O-O|O-O)[+#]?$").unwrap()
});

/// Whether `token` has the shape of a single SAN move. Says nothing about
/// legality.
pub fn is_san_token(token: &str) -> bool {
    SAN_TOKEN.is_match(token)
}

/// Seven-tag-roster style headers.
#[derive(Debug, Clone)]
pub struct PgnHeaders {
    pub event: String,
    pub site: String,
    pub date: NaiveDate,
    pub white: String,
    pub black: String,
}

/// Render the history as PGN. `result` is `1-0`, `0-1`, `1/2-1/2` or `*`.
pub fn to_pgn(headers: &PgnHeaders, history: &[PlayedMove], result: &str) -> String {
    let date = headers.date.format("%Y.%m.%d").to_string();
    let mut out = String::new();
    for (key, value) in [
        ("Event", headers.event.as_str()),
        ("Site", headers.site.as_str()),
        ("Date", date.as_str()),
        ("Round", "-"),
        ("White", headers.white.as_str()),
        ("Black", headers.black.as_str()),
        ("Result", result),
    ] {
        out.push_str(&format!("[{key} \"{}\"]\n", escape(value)));
    }
    out.push('\n');

    let mut tokens = Vec::with_capacity(history.len() * 3 / 2 + 1);
    for (ply, mv) in history.iter().enumerate() {
        if ply % 2 == 0 {
            tokens.push(format!("{}.", ply / 2 + 1));
        }
        tokens.push(mv.san.clone());
    }
    tokens.push(result.to_string());

    let mut line = String::new();
    for token in tokens {
        if !line.is_empty() && line.len() + 1 + token.len() > MAX_LINE_LEN {
            out.push_str(&line);
            out.push('\n');
            line.clear();
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(&token);
    }
    out.push_str(&line);
    out.push('\n');
    out
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
