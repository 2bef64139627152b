//! Command line flags and interactive prompts.

use crate::role::Role;
use clap::{CommandFactory, Parser};
use std::ffi::OsString;
use std::io::{BufRead, Write};

#[derive(Debug, Parser)]
#[command(disable_version_flag = true)]
struct Args {
    /// the identifying radio number
    #[arg(short, long, value_name = "{0,1}", value_parser = clap::value_parser!(u8).range(0..=1))]
    node: Option<u8>,

    /// '1' specifies the TX role. '0' specifies the RX role.
    #[arg(short, long, value_name = "{0,1}", value_parser = clap::value_parser!(u8).range(0..=1))]
    role: Option<u8>,
}

/// Index of this radio in the address pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node(u8);

impl Node {
    pub const ZERO: Node = Node(0);
    pub const ONE: Node = Node(1);

    /// Index of the address this node transmits on.
    pub fn index(&self) -> usize {
        self.0 as usize
    }

    /// Index of the address the other node transmits on.
    pub fn peer_index(&self) -> usize {
        1 - self.index()
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Print the rendered usage and run nothing.
    Usage(String),
    /// Run the demo. Missing values are asked for interactively.
    Run {
        program: String,
        node: Option<Node>,
        role: Option<Role>,
    },
}

/// Parses the process arguments, the first one being the program name.
///
/// Every flag takes exactly one value, so an odd number of tokens after the program name is a
/// usage error. So are unknown flags, values other than `0` and `1`, and `-h`/`--help`.
pub fn parse<I, S>(args: I, about: &'static str) -> Invocation
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let program = args
        .first()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("nrf24"));
    let usage = || {
        Args::command()
            .bin_name(program.clone())
            .about(about)
            .render_help()
            .to_string()
    };

    let flags = args.len().saturating_sub(1);
    if flags % 2 != 0 {
        return Invocation::Usage(usage());
    }
    let parsed = match Args::try_parse_from(&args) {
        Ok(parsed) => parsed,
        Err(_) => return Invocation::Usage(usage()),
    };
    if flags > 0 && parsed.node.is_none() && parsed.role.is_none() {
        return Invocation::Usage(usage());
    }

    Invocation::Run {
        program,
        node: parsed.node.map(Node),
        role: parsed.role.map(Role::from_flag),
    }
}

/// Asks which radio this is. Only an answer starting with `1` selects node 1.
pub fn prompt_node<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> std::io::Result<Node> {
    write!(out, "Which radio is this? Enter '0' or '1'. Defaults to '0' ")?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(if line.starts_with('1') {
        Node::ONE
    } else {
        Node::ZERO
    })
}

/// One answer to the role prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start(Role),
    Quit,
    /// First character of an unrecognized answer.
    Invalid(char),
    /// Nothing was typed, the prompt is shown again.
    Empty,
}

impl Command {
    /// Only the first character counts, case-insensitively.
    pub fn parse(line: &str) -> Self {
        match line.trim_end_matches(['\r', '\n']).chars().next() {
            None => Command::Empty,
            Some('T' | 't') => Command::Start(Role::Transmitter),
            Some('R' | 'r') => Command::Start(Role::Receiver),
            Some('Q' | 'q') => Command::Quit,
            Some(c) => Command::Invalid(c),
        }
    }
}

/// Shows the role prompt and reads one answer. End of input reads as [`Command::Quit`].
pub fn prompt_role<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> std::io::Result<Command> {
    writeln!(out, "*** PRESS 'T' to begin transmitting to the other node")?;
    writeln!(out, "*** PRESS 'R' to begin receiving from the other node")?;
    writeln!(out, "*** PRESS 'Q' to exit")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(Command::Quit);
    }
    Ok(Command::parse(&line))
}
