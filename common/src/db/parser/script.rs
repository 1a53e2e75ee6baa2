//! Line-based edit scripts. One command per line, `#` starts a comment:
//!
//! ```text
//! reset
//! width 8
//! regs 4
//! alus 2
//! move control 28 12
//! rotate alu0
//! block keepout1 50 50 1 1
//! remove keepout1
//! ```

use crate::db::command::EditCommand;
use crate::geom::Vec2;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read script: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: unknown command '{word}'")]
    UnknownCommand { line: usize, word: String },
    #[error("line {line}: '{command}' expects {expected} argument(s)")]
    BadArity {
        line: usize,
        command: String,
        expected: usize,
    },
    #[error("line {line}: '{value}' is not a number")]
    BadNumber { line: usize, value: String },
}

pub fn parse_file(path: &Path) -> Result<Vec<EditCommand>, ScriptError> {
    parse(&fs::read_to_string(path)?)
}

pub fn parse(input: &str) -> Result<Vec<EditCommand>, ScriptError> {
    let mut commands = Vec::new();
    for (i, raw) in input.lines().enumerate() {
        let line = i + 1;
        let text = raw.split('#').next().unwrap_or("").trim();
        if text.is_empty() {
            continue;
        }
        let words: Vec<&str> = text.split_whitespace().collect();
        let (head, args) = (words[0], &words[1..]);
        let command = match head {
            "reset" => {
                expect_arity(line, head, args, 0)?;
                EditCommand::Reset
            }
            "recompute" => {
                expect_arity(line, head, args, 0)?;
                EditCommand::Recompute
            }
            "width" => EditCommand::SetDataWidth(one_number(line, head, args)?),
            "regs" => EditCommand::SetNumRegs(one_number(line, head, args)?),
            "alus" => EditCommand::SetNumAlus(one_number(line, head, args)?),
            "add-alu" => {
                expect_arity(line, head, args, 0)?;
                EditCommand::AddAlu
            }
            "remove-alu" => {
                expect_arity(line, head, args, 0)?;
                EditCommand::RemoveAlu
            }
            "move" => {
                expect_arity(line, head, args, 3)?;
                EditCommand::Move {
                    name: args[0].to_string(),
                    to: Vec2::new(number(line, args[1])? as i32, number(line, args[2])? as i32),
                }
            }
            "rotate" => {
                expect_arity(line, head, args, 1)?;
                EditCommand::Rotate {
                    name: args[0].to_string(),
                }
            }
            "block" => {
                expect_arity(line, head, args, 5)?;
                EditCommand::AddBlockage {
                    name: args[0].to_string(),
                    center: Vec2::new(number(line, args[1])? as i32, number(line, args[2])? as i32),
                    hsize: number(line, args[3])? as i32,
                    vsize: number(line, args[4])? as i32,
                }
            }
            "remove" => {
                expect_arity(line, head, args, 1)?;
                EditCommand::Remove {
                    name: args[0].to_string(),
                }
            }
            word => {
                return Err(ScriptError::UnknownCommand {
                    line,
                    word: word.to_string(),
                });
            }
        };
        commands.push(command);
    }
    Ok(commands)
}

fn expect_arity(
    line: usize,
    command: &str,
    args: &[&str],
    expected: usize,
) -> Result<(), ScriptError> {
    if args.len() != expected {
        return Err(ScriptError::BadArity {
            line,
            command: command.to_string(),
            expected,
        });
    }
    Ok(())
}

fn one_number(line: usize, command: &str, args: &[&str]) -> Result<i64, ScriptError> {
    expect_arity(line, command, args, 1)?;
    number(line, args[0])
}

fn number(line: usize, value: &str) -> Result<i64, ScriptError> {
    value.parse().map_err(|_| ScriptError::BadNumber {
        line,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_and_skips_comments() {
        let script = "\
# initial configuration
reset
width 16   # widen the datapath
alus 3

move control 28 12
";
        let commands = parse(script).unwrap();
        assert_eq!(
            commands,
            vec![
                EditCommand::Reset,
                EditCommand::SetDataWidth(16),
                EditCommand::SetNumAlus(3),
                EditCommand::Move {
                    name: "control".to_string(),
                    to: Vec2::new(28, 12),
                },
            ]
        );
    }

    #[test]
    fn blockage_line() {
        let commands = parse("block wall 10 10 0 5").unwrap();
        assert_eq!(
            commands,
            vec![EditCommand::AddBlockage {
                name: "wall".to_string(),
                center: Vec2::new(10, 10),
                hsize: 0,
                vsize: 5,
            }]
        );
    }

    #[test]
    fn reports_line_numbers() {
        let err = parse("reset\nwobble 3").unwrap_err();
        match err {
            ScriptError::UnknownCommand { line, word } => {
                assert_eq!(line, 2);
                assert_eq!(word, "wobble");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_bad_arity_and_numbers() {
        assert!(matches!(
            parse("move control 5").unwrap_err(),
            ScriptError::BadArity { .. }
        ));
        assert!(matches!(
            parse("width lots").unwrap_err(),
            ScriptError::BadNumber { .. }
        ));
    }
}
