//! Destination naming.
//!
//! A destination is a dot-separated routing key. Keys are built from static
//! prefixes plus player identities; building one never needs a lookup.

use serde::{Deserialize, Serialize};

pub const DEFAULT_WAR_RECOGNITIONS_PREFIX: &str = "warrecognitions";
pub const DEFAULT_GAME_LOG_SLUG: &str = "game_logs";
pub const DEFAULT_ARMY_MOVES_PREFIX: &str = "army_moves";
pub const DEFAULT_PAUSE_KEY: &str = "pause";

/// Static prefixes used to build destinations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    pub war_recognitions_prefix: String,
    pub game_log_slug: String,
    pub army_moves_prefix: String,
    pub pause_key: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            war_recognitions_prefix: DEFAULT_WAR_RECOGNITIONS_PREFIX.to_string(),
            game_log_slug: DEFAULT_GAME_LOG_SLUG.to_string(),
            army_moves_prefix: DEFAULT_ARMY_MOVES_PREFIX.to_string(),
            pause_key: DEFAULT_PAUSE_KEY.to_string(),
        }
    }
}

impl RoutingConfig {
    /// `<war prefix>.<attacker>`
    pub fn war_recognition(&self, attacker: &str) -> String {
        format!("{}.{}", self.war_recognitions_prefix, attacker)
    }

    /// Binding that receives every war recognition.
    pub fn war_recognitions_binding(&self) -> String {
        format!("{}.*", self.war_recognitions_prefix)
    }

    /// Game logs go to the bare slug.
    pub fn game_log(&self) -> String {
        self.game_log_slug.clone()
    }

    /// `<army moves prefix>.<username>`
    pub fn army_moves(&self, username: &str) -> String {
        format!("{}.{}", self.army_moves_prefix, username)
    }

    pub fn army_moves_binding(&self) -> String {
        format!("{}.*", self.army_moves_prefix)
    }

    pub fn pause(&self) -> String {
        self.pause_key.clone()
    }
}

/// Topic-style match of a routing key against a binding pattern.
///
/// `*` matches exactly one word, `#` matches zero or more words.
pub fn matches(pattern: &str, key: &str) -> bool {
    let pattern: Vec<&str> = pattern.split('.').collect();
    let key: Vec<&str> = key.split('.').collect();
    matches_words(&pattern, &key)
}

fn matches_words(pattern: &[&str], key: &[&str]) -> bool {
    match pattern.split_first() {
        None => key.is_empty(),
        Some((&"#", rest)) => (0..=key.len()).any(|skip| matches_words(rest, &key[skip..])),
        Some((&word, rest)) => match key.split_first() {
            Some((first, key_rest)) if word == "*" || word == *first => {
                matches_words(rest, key_rest)
            }
            _ => false,
        },
    }
}
