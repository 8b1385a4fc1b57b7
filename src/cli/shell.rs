//! Interactive session, flip-card viewer and JSON-lines server.
//!
//! The tree lives only in memory, so these loops are where a sequence of
//! edits is useful: every command in one session runs against the same store.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use tracing::debug;

use crate::application::protocol::{self, Request, Response};
use crate::application::services::TreeStore;
use crate::cli::error::{CliError, CliResult};
use crate::domain::{Node, StudySession, TreeDisplay};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

const PROMPT: &str = "cardtree> ";

const HELP: &str = "\
commands:
  ls [ids]                                   show the tree
  add <target> <directory|cards> <name>      add a node (target `root` = root directory)
  rm <id>                                    remove a node and its subtree
  find <id>                                  show a node and its parent
  study <deck-id>                            flip through a deck
  export <path>                              write the tree to a JSON snapshot
  help                                       this text
  quit                                       leave the session";

/// One parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Empty,
    List { ids: bool },
    Add {
        target: String,
        file_type: String,
        name: String,
    },
    Remove { id: String },
    Find { id: String },
    Study { deck: String },
    Export { path: PathBuf },
    Help,
    Quit,
}

/// Split off the first whitespace-separated token.
fn next_token(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    match s.find(char::is_whitespace) {
        Some(idx) => Some((&s[..idx], &s[idx..])),
        None => Some((s, "")),
    }
}

fn single_arg<'a>(rest: &'a str, usage: &str) -> Result<&'a str, String> {
    match next_token(rest) {
        Some((arg, tail)) if tail.trim().is_empty() => Ok(arg),
        _ => Err(format!("usage: {usage}")),
    }
}

/// Parse one input line.
///
/// The name of `add` is everything after the file type, so names may contain
/// spaces.
pub fn parse_line(line: &str) -> Result<ShellCommand, String> {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some((word, rest)) = next_token(line) else {
        return Ok(ShellCommand::Empty);
    };

    match word {
        "ls" | "list" => match rest.trim() {
            "" => Ok(ShellCommand::List { ids: false }),
            "ids" | "-i" | "--ids" => Ok(ShellCommand::List { ids: true }),
            _ => Err("usage: ls [ids]".into()),
        },
        "add" => {
            let usage = || "usage: add <target> <directory|cards> <name>".to_string();
            let (target, rest) = next_token(rest).ok_or_else(usage)?;
            let (file_type, rest) = next_token(rest).ok_or_else(usage)?;
            Ok(ShellCommand::Add {
                target: target.to_string(),
                file_type: file_type.to_string(),
                name: rest.trim_start().to_string(),
            })
        }
        "rm" | "remove" => Ok(ShellCommand::Remove {
            id: single_arg(rest, "rm <id>")?.to_string(),
        }),
        "find" => Ok(ShellCommand::Find {
            id: single_arg(rest, "find <id>")?.to_string(),
        }),
        "study" => Ok(ShellCommand::Study {
            deck: single_arg(rest, "study <deck-id>")?.to_string(),
        }),
        "export" => match rest.trim() {
            "" => Err("usage: export <path>".into()),
            path => Ok(ShellCommand::Export {
                path: PathBuf::from(path),
            }),
        },
        "help" | "?" => Ok(ShellCommand::Help),
        "quit" | "exit" | "q" => Ok(ShellCommand::Quit),
        other => Err(format!("unknown command '{other}', try 'help'")),
    }
}

/// `root` names the root directory; anything else is passed through as an id.
pub fn resolve_target(raw: &str, store: &TreeStore) -> String {
    if raw.eq_ignore_ascii_case("root") {
        store.root_id().to_string()
    } else {
        raw.to_string()
    }
}

fn io_err(e: io::Error) -> CliError {
    CliError::Infra(InfraError::io("terminal i/o", e))
}

/// Interactive command loop over one store.
pub struct Shell<'a, R, W> {
    container: &'a ServiceContainer,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(container: &'a ServiceContainer, input: R, output: W) -> Self {
        Self {
            container,
            input,
            output,
        }
    }

    /// Run until `quit` or end of input.
    pub fn run(&mut self) -> CliResult<()> {
        loop {
            write!(self.output, "{PROMPT}").map_err(io_err)?;
            self.output.flush().map_err(io_err)?;

            let mut line = String::new();
            if self.input.read_line(&mut line).map_err(io_err)? == 0 {
                writeln!(self.output).map_err(io_err)?;
                return Ok(());
            }

            match parse_line(&line) {
                Ok(ShellCommand::Quit) => return Ok(()),
                Ok(command) => self.execute(command)?,
                Err(msg) => writeln!(self.output, "error: {msg}").map_err(io_err)?,
            }
        }
    }

    fn execute(&mut self, command: ShellCommand) -> CliResult<()> {
        debug!("shell: {:?}", command);
        let container = self.container;
        let store = &container.store;
        match command {
            ShellCommand::Empty | ShellCommand::Quit => {}
            ShellCommand::Help => writeln!(self.output, "{HELP}").map_err(io_err)?,
            ShellCommand::List { ids } => {
                let ids = ids || container.settings.show_ids;
                write!(self.output, "{}", store.get_all().to_tree_string(ids)).map_err(io_err)?;
            }
            ShellCommand::Add {
                target,
                file_type,
                name,
            } => {
                let request = Request::Add {
                    id: resolve_target(&target, store),
                    file_type,
                    name,
                };
                match protocol::dispatch(store, request) {
                    Response::Ok { id: Some(id), .. } => {
                        writeln!(self.output, "added {id}").map_err(io_err)?
                    }
                    response => self.report(response)?,
                }
            }
            ShellCommand::Remove { id } => {
                let request = Request::Remove {
                    id: resolve_target(&id, store),
                };
                match protocol::dispatch(store, request) {
                    Response::Ok { .. } => writeln!(self.output, "removed").map_err(io_err)?,
                    response => self.report(response)?,
                }
            }
            ShellCommand::Find { id } => {
                let request = Request::Find {
                    id: resolve_target(&id, store),
                };
                match protocol::dispatch(store, request) {
                    Response::Ok {
                        node: Some(node),
                        parent,
                        ..
                    } => {
                        write!(self.output, "{}", describe(&node, true)).map_err(io_err)?;
                        let written = match parent {
                            Some(parent) => writeln!(self.output, "parent: {parent}"),
                            None => writeln!(self.output, "parent: none (root)"),
                        };
                        written.map_err(io_err)?;
                    }
                    response => self.report(response)?,
                }
            }
            ShellCommand::Study { deck } => {
                let deck = match protocol::parse_id(&deck).and_then(|id| store.deck(id)) {
                    Ok(deck) => deck,
                    Err(e) => return self.report(Response::from(e)),
                };
                run_study(StudySession::new(deck), &mut self.input, &mut self.output)
                    .map_err(io_err)?;
            }
            ShellCommand::Export { path } => {
                let written = match container.snapshots.save(&path, &store.get_all()) {
                    Ok(()) => writeln!(self.output, "exported to {}", path.display()),
                    Err(e) => writeln!(self.output, "error: {e}"),
                };
                written.map_err(io_err)?;
            }
        }
        Ok(())
    }

    fn report(&mut self, response: Response) -> CliResult<()> {
        let written = match response {
            Response::Error {
                message,
                field: Some(field),
                ..
            } => writeln!(self.output, "error: {field}: {message}"),
            Response::Error { message, .. } => writeln!(self.output, "error: {message}"),
            Response::Ok { .. } => writeln!(self.output, "ok"),
        };
        written.map_err(io_err)
    }
}

/// Flip through a deck: Enter or `f` flips, `n`/`p` move, `q` leaves.
pub fn run_study<R: BufRead, W: Write>(
    mut session: StudySession,
    input: &mut R,
    output: &mut W,
) -> io::Result<()> {
    writeln!(output, "== {} ({} cards) ==", session.deck_name(), session.len())?;
    if session.is_empty() {
        writeln!(output, "No cards here...")?;
        return Ok(());
    }

    loop {
        let side = if session.is_flipped() { "back" } else { "front" };
        writeln!(
            output,
            "[{}/{}] {}:\n{}",
            session.position() + 1,
            session.len(),
            side,
            session.visible_text().unwrap_or_default()
        )?;
        write!(output, "(f)lip (n)ext (p)revious (q)uit> ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(());
        }
        match line.trim() {
            "" | "f" => session.flip(),
            "n" => {
                if !session.next() {
                    writeln!(output, "(last card)")?;
                }
            }
            "p" => {
                if !session.previous() {
                    writeln!(output, "(first card)")?;
                }
            }
            "q" => return Ok(()),
            other => writeln!(output, "unknown key '{other}'")?,
        }
    }
}

/// Answer one JSON request per input line with one JSON response line.
pub fn serve<R: BufRead, W: Write>(store: &TreeStore, input: R, mut output: W) -> io::Result<()> {
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        writeln!(output, "{}", protocol::handle_json(store, &line))?;
        output.flush()?;
    }
    Ok(())
}

/// Render a node for a single-node view.
pub fn describe(node: &Node, show_ids: bool) -> String {
    node.to_tree_string(show_ids).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", ShellCommand::Empty)]
    #[case("   \n", ShellCommand::Empty)]
    #[case("ls", ShellCommand::List { ids: false })]
    #[case("ls ids", ShellCommand::List { ids: true })]
    #[case("rm abc", ShellCommand::Remove { id: "abc".into() })]
    #[case("quit", ShellCommand::Quit)]
    #[case("?", ShellCommand::Help)]
    fn given_line_when_parsing_then_recognizes_command(#[case] line: &str, #[case] expected: ShellCommand) {
        assert_eq!(parse_line(line).unwrap(), expected);
    }

    #[test]
    fn given_add_with_spaces_in_name_when_parsing_then_keeps_whole_name() {
        let command = parse_line("add root cards RW Test (2025)\n").unwrap();
        assert_eq!(
            command,
            ShellCommand::Add {
                target: "root".into(),
                file_type: "cards".into(),
                name: "RW Test (2025)".into(),
            }
        );
    }

    #[test]
    fn given_add_without_name_when_parsing_then_passes_empty_name_through() {
        let command = parse_line("add root cards").unwrap();
        assert!(matches!(command, ShellCommand::Add { name, .. } if name.is_empty()));
    }

    #[rstest]
    #[case("add root")]
    #[case("rm")]
    #[case("rm a b")]
    #[case("export")]
    #[case("frobnicate")]
    fn given_malformed_line_when_parsing_then_error(#[case] line: &str) {
        assert!(parse_line(line).is_err());
    }

    #[test]
    fn given_deck_when_studying_then_flips_and_moves() {
        use crate::domain::{Card, CardFile, NodeName};

        let deck = CardFile::new(NodeName::parse("Kochen").unwrap()).with_cards(vec![
            Card::new("Wo kocht man Wasser?", "Am Herd!"),
            Card::new("second", "zweite"),
        ]);
        let mut input = "f\nn\nn\nq\n".as_bytes();
        let mut output = Vec::new();

        run_study(StudySession::new(deck), &mut input, &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("[1/2] front:\nWo kocht man Wasser?"));
        assert!(text.contains("[1/2] back:\nAm Herd!"));
        assert!(text.contains("[2/2] front:\nsecond"));
        assert!(text.contains("(last card)"));
    }

    #[test]
    fn given_empty_deck_when_studying_then_says_so() {
        use crate::domain::{CardFile, NodeName};

        let deck = CardFile::new(NodeName::parse("Tiere").unwrap());
        let mut output = Vec::new();
        run_study(StudySession::new(deck), &mut "".as_bytes(), &mut output).unwrap();
        assert!(String::from_utf8(output).unwrap().contains("No cards here..."));
    }
}
