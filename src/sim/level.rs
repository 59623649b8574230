//! Level descriptions and the level state machine
//!
//! A level is plain text, one command per line:
//!
//! ```text
//! # tag  args
//! h 10 20          # hero spawn
//! w 0 50           # solid platform
//! d 200 50 level1  # door leading to level1
//! k 120 30         # key
//! c 30 20          # coin
//! ```
//!
//! Parsing is strict: unknown tags, wrong argument counts and non-integer
//! coordinates fail the whole level, so a scene is never half built.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::error::{LevelParseError, ParseErrorKind};

/// One parsed level line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelCommand {
    Platform { x: i32, y: i32 },
    Door { x: i32, y: i32, next_level: String },
    Key { x: i32, y: i32 },
    Hero { x: i32, y: i32 },
    Coin { x: i32, y: i32 },
}

impl LevelCommand {
    pub fn position(&self) -> Vec2 {
        let (x, y) = match self {
            LevelCommand::Platform { x, y }
            | LevelCommand::Door { x, y, .. }
            | LevelCommand::Key { x, y }
            | LevelCommand::Hero { x, y }
            | LevelCommand::Coin { x, y } => (*x, *y),
        };
        Vec2::new(x as f32, y as f32)
    }

    /// Build the entity this command describes
    pub fn into_entity(self) -> Entity {
        let position = self.position();
        match self {
            LevelCommand::Platform { .. } => Entity::platform(position),
            LevelCommand::Door { next_level, .. } => Entity::door(position, next_level),
            LevelCommand::Key { .. } => Entity::key(position),
            LevelCommand::Hero { .. } => Entity::hero(position),
            LevelCommand::Coin { .. } => Entity::coin(position),
        }
    }
}

/// Number of arguments each tag takes
fn arity(tag: &str) -> Option<usize> {
    match tag {
        "w" | "k" | "h" | "c" => Some(2),
        "d" => Some(3),
        _ => None,
    }
}

fn coordinate(token: &str) -> Result<i32, ParseErrorKind> {
    token
        .parse::<i32>()
        .map_err(|_| ParseErrorKind::InvalidNumber(token.to_string()))
}

/// Parse a single line. Blank and comment-only lines yield `Ok(None)`.
fn parse_line(line: &str) -> Result<Option<LevelCommand>, (String, ParseErrorKind)> {
    let content = line.split('#').next().unwrap_or_default().trim();
    let mut words = content.split_whitespace();
    let Some(tag) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();
    let fail = |kind| (tag.to_string(), kind);

    let expected = arity(tag).ok_or_else(|| fail(ParseErrorKind::UnknownTag))?;
    if args.len() != expected {
        return Err(fail(ParseErrorKind::WrongArity {
            expected,
            found: args.len(),
        }));
    }

    let x = coordinate(args[0]).map_err(fail)?;
    let y = coordinate(args[1]).map_err(fail)?;
    let command = match tag {
        "w" => LevelCommand::Platform { x, y },
        "d" => LevelCommand::Door {
            x,
            y,
            next_level: args[2].to_string(),
        },
        "k" => LevelCommand::Key { x, y },
        "h" => LevelCommand::Hero { x, y },
        "c" => LevelCommand::Coin { x, y },
        _ => return Err(fail(ParseErrorKind::UnknownTag)),
    };
    Ok(Some(command))
}

/// Parse a whole level description, stopping at the first bad line
pub fn parse_level(text: &str) -> Result<Vec<LevelCommand>, LevelParseError> {
    let mut commands = Vec::new();
    for (index, line) in text.lines().enumerate() {
        match parse_line(line) {
            Ok(Some(command)) => commands.push(command),
            Ok(None) => {}
            Err((tag, kind)) => {
                return Err(LevelParseError {
                    line: index + 1,
                    tag,
                    kind,
                });
            }
        }
    }
    Ok(commands)
}

/// Level state machine
///
/// `Idle` until a load is requested; a pending load is applied at the start
/// of the next scene update, within that same update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelTransition {
    #[default]
    Idle,
    Pending(String),
}

impl LevelTransition {
    pub fn pending(&self) -> Option<&str> {
        match self {
            LevelTransition::Idle => None,
            LevelTransition::Pending(name) => Some(name),
        }
    }

    /// Take the pending level name, returning to `Idle`
    pub fn take(&mut self) -> Option<String> {
        match std::mem::take(self) {
            LevelTransition::Idle => None,
            LevelTransition::Pending(name) => Some(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_example_level() {
        let commands = parse_level("h 10 20\nw 0 50 # ground\nc 30 20").unwrap();
        assert_eq!(
            commands,
            vec![
                LevelCommand::Hero { x: 10, y: 20 },
                LevelCommand::Platform { x: 0, y: 50 },
                LevelCommand::Coin { x: 30, y: 20 },
            ]
        );
    }

    #[test]
    fn test_comments_blanks_and_whitespace() {
        let text = "# level header\n\n   \n\tk   -5\t 7  \n  # indented comment\nd 1 2 level1#trailing";
        let commands = parse_level(text).unwrap();
        assert_eq!(
            commands,
            vec![
                LevelCommand::Key { x: -5, y: 7 },
                LevelCommand::Door {
                    x: 1,
                    y: 2,
                    next_level: "level1".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_unknown_tag_is_an_error() {
        let err = parse_level("h 0 0\nz 1 1").unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.tag, "z");
        assert_eq!(err.kind, ParseErrorKind::UnknownTag);
    }

    #[test]
    fn test_wrong_arity() {
        let err = parse_level("d 10 20").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::WrongArity {
                expected: 3,
                found: 2
            }
        );

        let err = parse_level("\nw 1 2 3").unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(
            err.kind,
            ParseErrorKind::WrongArity {
                expected: 2,
                found: 3
            }
        );
    }

    #[test]
    fn test_non_integer_coordinate() {
        let err = parse_level("c 1.5 2").unwrap_err();
        assert_eq!(err.tag, "c");
        assert_eq!(err.kind, ParseErrorKind::InvalidNumber("1.5".to_string()));
    }

    #[test]
    fn test_command_into_entity() {
        let door = LevelCommand::Door {
            x: 40,
            y: 8,
            next_level: "level2".to_string(),
        }
        .into_entity();
        assert_eq!(door.position, Vec2::new(40.0, 8.0));
        assert_eq!(
            door.kind,
            crate::sim::EntityKind::Door {
                next_level: "level2".to_string(),
                unlocked: false
            }
        );
    }

    #[test]
    fn test_transition_take() {
        let mut transition = LevelTransition::Pending("level0".to_string());
        assert_eq!(transition.pending(), Some("level0"));
        assert_eq!(transition.take(), Some("level0".to_string()));
        assert_eq!(transition, LevelTransition::Idle);
        assert_eq!(transition.take(), None);
    }
}
