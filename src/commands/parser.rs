//! Address-prefix normalization
//!
//! Every accepted way of addressing the bot is rewritten to `!feature <rest>`
//! so the rest of the interpreter only parses one grammar.

use crate::identity::BotIdentity;

pub const COMMAND_PREFIX: &str = "!feature";

/// Canonical `!feature ...` form of `body`, or `None` when the bot is not addressed.
///
/// Accepted forms:
/// - `!feature ...`
/// - `<localpart>: ...`, `<display name>: ...`, `<user id>: ...`
/// - `<user id> ...` (a bare mention followed by whitespace)
///
/// After a mention, a leading `!feature` is dropped so that
/// `@bot:server !feature status` reads the same as `!feature status`.
pub fn normalize_command(body: &str, identity: &BotIdentity) -> Option<String> {
    if body.starts_with(COMMAND_PREFIX) {
        return Some(body.to_string());
    }

    let rest = strip_mention(body, identity)?.trim_start();
    let rest = rest.strip_prefix(COMMAND_PREFIX).unwrap_or(rest).trim_start();

    if rest.is_empty() {
        Some(COMMAND_PREFIX.to_string())
    } else {
        Some(format!("{COMMAND_PREFIX} {rest}"))
    }
}

fn strip_mention<'a>(body: &'a str, identity: &BotIdentity) -> Option<&'a str> {
    let mut names = vec![identity.user_id.as_str(), identity.localpart.as_str()];
    if let Some(display_name) = identity.display_name.as_deref() {
        names.push(display_name);
    }
    // Longest first so a display name that extends the localpart still matches fully
    names.sort_by_key(|n| std::cmp::Reverse(n.len()));

    for name in names.into_iter().filter(|n| !n.is_empty()) {
        if let Some(rest) = body.strip_prefix(name).and_then(|r| r.strip_prefix(':')) {
            return Some(rest);
        }
    }

    // A bare user id is unambiguous, unlike a bare localpart
    body.strip_prefix(identity.user_id.as_str())
        .filter(|rest| rest.starts_with(char::is_whitespace))
}

/// Tokens following the command prefix
pub fn command_args(canonical: &str) -> Vec<String> {
    canonical
        .split_whitespace()
        .skip(1)
        .map(str::to_string)
        .collect()
}
