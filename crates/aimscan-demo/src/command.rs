//! Text command parsing.
//!
//! Server commands may carry config-string updates (`cs <index> <payload>`).
//! Client commands may carry fire-state toggles (`+attack`/`-attack`),
//! weapon selection (`weapon <id>`), and raw mouse deltas
//! (`mdelta <dpitch> <dyaw>`). Anything else is audit-trail only.

use crate::{CS_PLAYERS, MAX_CLIENTS};

/// A config-string update carried by a server command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigStringUpdate {
    /// Config-string index.
    pub index: i32,
    /// Payload with surrounding quotes removed.
    pub payload: String,
}

/// A recorder input change carried by a client command.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputChange {
    /// The attack button was pressed (`true`) or released (`false`).
    Fire(bool),
    /// A weapon was selected.
    Weapon(i32),
    /// Raw per-tick mouse movement.
    MouseDelta {
        /// Pitch delta.
        pitch: f32,
        /// Yaw delta.
        yaw: f32,
    },
}

/// Player identity decoded from a player config string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlayerInfo {
    /// Display name (`n` key), if present and non-empty.
    pub name: Option<String>,
    /// Team number (`t` key), if present and numeric.
    pub team: Option<i32>,
}

/// Parse a server command as a config-string update.
///
/// # Examples
///
/// ```
/// use aimscan_demo::command::parse_server_command;
///
/// let update = parse_server_command(r#"cs 545 "n\Bob\t\2""#).unwrap();
/// assert_eq!(update.index, 545);
/// assert_eq!(update.payload, r"n\Bob\t\2");
/// assert!(parse_server_command("print hello").is_none());
/// ```
pub fn parse_server_command(text: &str) -> Option<ConfigStringUpdate> {
    let rest = text.trim_start().strip_prefix("cs ")?;
    let rest = rest.trim_start();
    let (index, payload) = match rest.split_once(char::is_whitespace) {
        Some((index, payload)) => (index, payload.trim()),
        None => (rest, ""),
    };
    let index = index.parse().ok()?;
    let payload = payload
        .strip_prefix('"')
        .and_then(|p| p.strip_suffix('"'))
        .unwrap_or(payload);
    Some(ConfigStringUpdate {
        index,
        payload: payload.to_string(),
    })
}

/// Parse a client command into an input change.
///
/// Only the first whitespace-separated token selects the directive.
pub fn parse_client_command(text: &str) -> Option<InputChange> {
    let mut tokens = text.split_whitespace();
    match tokens.next()? {
        "+attack" => Some(InputChange::Fire(true)),
        "-attack" => Some(InputChange::Fire(false)),
        "weapon" => tokens.next()?.parse().ok().map(InputChange::Weapon),
        "mdelta" => {
            let pitch = tokens.next()?.parse().ok()?;
            let yaw = tokens.next()?.parse().ok()?;
            Some(InputChange::MouseDelta { pitch, yaw })
        }
        _ => None,
    }
}

/// The client id owning a config-string index, if it is a player slot.
pub fn player_slot(index: i32) -> Option<i32> {
    (CS_PLAYERS..CS_PLAYERS + MAX_CLIENTS)
        .contains(&index)
        .then(|| index - CS_PLAYERS)
}

/// Parse a backslash-delimited `key\value\key\value` player payload.
///
/// A leading backslash is tolerated. Unknown keys are ignored.
pub fn parse_player_info(payload: &str) -> PlayerInfo {
    let mut info = PlayerInfo::default();
    let mut parts = payload.strip_prefix('\\').unwrap_or(payload).split('\\');
    while let Some(key) = parts.next() {
        let value = parts.next().unwrap_or("");
        match key {
            "n" if !value.is_empty() => info.name = Some(value.to_string()),
            "t" => info.team = value.trim().parse().ok().or(info.team),
            _ => {}
        }
    }
    info
}

/// Format a player config-string payload.
pub fn format_player_info(name: &str, team: i32) -> String {
    format!("n\\{name}\\t\\{team}")
}

/// Format a `cs` server command setting a player's config string.
pub fn format_player_config_command(client_id: i32, name: &str, team: i32) -> String {
    format!(
        "cs {} \"{}\"",
        CS_PLAYERS + client_id,
        format_player_info(name, team)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cs_without_quotes() {
        let u = parse_server_command(r"cs 544 n\Alice\t\1").unwrap();
        assert_eq!(u.index, 544);
        assert_eq!(u.payload, r"n\Alice\t\1");
    }

    #[test]
    fn cs_needs_numeric_index() {
        assert!(parse_server_command("cs abc payload").is_none());
        assert!(parse_server_command("css 544 x").is_none());
    }

    #[test]
    fn client_directives() {
        assert_eq!(parse_client_command("+attack"), Some(InputChange::Fire(true)));
        assert_eq!(parse_client_command(" -attack "), Some(InputChange::Fire(false)));
        assert_eq!(parse_client_command("weapon 7"), Some(InputChange::Weapon(7)));
        assert_eq!(parse_client_command("weapon x"), None);
        assert_eq!(
            parse_client_command("mdelta 0.5 -1.25"),
            Some(InputChange::MouseDelta {
                pitch: 0.5,
                yaw: -1.25
            })
        );
        assert_eq!(parse_client_command("say hi"), None);
        assert_eq!(parse_client_command(""), None);
    }

    #[test]
    fn player_slot_range() {
        assert_eq!(player_slot(543), None);
        assert_eq!(player_slot(544), Some(0));
        assert_eq!(player_slot(607), Some(63));
        assert_eq!(player_slot(608), None);
    }

    #[test]
    fn player_info_keys() {
        let info = parse_player_info(r"n\Alice\t\2\c\0");
        assert_eq!(info.name.as_deref(), Some("Alice"));
        assert_eq!(info.team, Some(2));

        let info = parse_player_info(r"\t\1\n\");
        assert_eq!(info.name, None);
        assert_eq!(info.team, Some(1));
    }

    #[test]
    fn formatted_command_parses_back() {
        let cmd = format_player_config_command(3, "Zed", 2);
        let u = parse_server_command(&cmd).unwrap();
        assert_eq!(player_slot(u.index), Some(3));
        let info = parse_player_info(&u.payload);
        assert_eq!(info.name.as_deref(), Some("Zed"));
        assert_eq!(info.team, Some(2));
    }
}
