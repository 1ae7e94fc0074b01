//! Interactive test menu
//!
//! One key per line selects an action. Failed actions are logged and the
//! menu keeps running on the same session.

use std::io::{self, BufRead, Write};

use tftlink_hal::SerialTx;
use tftlink_protocol::ImageSource;

use crate::image_source::ImageLoadError;
use crate::session::Session;

/// Menu actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Clear,
    Block,
    Text,
    Image,
    Raw,
    SquareBatch,
    TestWrite,
    TestProgram,
    Exit,
}

// Menu keys
const KEY_CLEAR: char = 'c';
const KEY_BLOCK: char = 'b';
const KEY_TEXT: char = 't';
const KEY_IMAGE: char = 'i';
const KEY_RAW: char = 'r';
const KEY_SQUARE_BATCH: char = 's';
const KEY_TEST_WRITE: char = 'w';
const KEY_TEST_PROGRAM: char = '`';
const KEY_EXIT: char = 'x';

impl Action {
    /// Menu order
    pub const ALL: [Action; 9] = [
        Action::Clear,
        Action::Block,
        Action::Text,
        Action::Image,
        Action::Raw,
        Action::SquareBatch,
        Action::TestWrite,
        Action::TestProgram,
        Action::Exit,
    ];

    /// Parse an action from its menu key
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            KEY_CLEAR => Some(Action::Clear),
            KEY_BLOCK => Some(Action::Block),
            KEY_TEXT => Some(Action::Text),
            KEY_IMAGE => Some(Action::Image),
            KEY_RAW => Some(Action::Raw),
            KEY_SQUARE_BATCH => Some(Action::SquareBatch),
            KEY_TEST_WRITE => Some(Action::TestWrite),
            KEY_TEST_PROGRAM => Some(Action::TestProgram),
            KEY_EXIT => Some(Action::Exit),
            _ => None,
        }
    }

    pub fn key(self) -> char {
        match self {
            Action::Clear => KEY_CLEAR,
            Action::Block => KEY_BLOCK,
            Action::Text => KEY_TEXT,
            Action::Image => KEY_IMAGE,
            Action::Raw => KEY_RAW,
            Action::SquareBatch => KEY_SQUARE_BATCH,
            Action::TestWrite => KEY_TEST_WRITE,
            Action::TestProgram => KEY_TEST_PROGRAM,
            Action::Exit => KEY_EXIT,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Action::Clear => "Clear Display",
            Action::Block => "Send Block",
            Action::Text => "Send Text",
            Action::Image => "Send Image",
            Action::Raw => "Send Raw",
            Action::SquareBatch => "Send Repeated Block",
            Action::TestWrite => "Send Test Packet",
            Action::TestProgram => "Test Program",
            Action::Exit => "Exit",
        }
    }
}

fn parse_line(line: &str) -> Option<Action> {
    let mut chars = line.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(key), None) => Action::from_key(key),
        _ => None,
    }
}

fn print_menu<W: Write>(output: &mut W) -> io::Result<()> {
    writeln!(output)?;
    for action in Action::ALL {
        writeln!(output, "{} - {}", action.key(), action.label())?;
    }
    write!(output, "--> ")?;
    output.flush()
}

/// Run the interactive menu until exit or end of input
pub fn run<C, I, R, W>(session: &mut Session<C, I>, input: R, mut output: W) -> io::Result<()>
where
    C: SerialTx<Error = io::Error>,
    I: ImageSource<Error = ImageLoadError>,
    R: BufRead,
    W: Write,
{
    let mut lines = input.lines();
    loop {
        print_menu(&mut output)?;

        let Some(line) = lines.next() else {
            break;
        };
        match parse_line(&line?) {
            Some(Action::Exit) => break,
            Some(action) => {
                session.perform_logged(action);
            }
            None => {
                writeln!(output)?;
                writeln!(output, "Invalid input")?;
            }
        }
    }

    writeln!(output)?;
    writeln!(output, "Exit")
}

/// Run a sequence of action keys without prompting
///
/// Stops at the first failure or at `x`. Unknown keys are skipped.
pub fn run_keys<C, I>(session: &mut Session<C, I>, keys: &str) -> Result<(), crate::SessionError>
where
    C: SerialTx<Error = io::Error>,
    I: ImageSource<Error = ImageLoadError>,
{
    for key in keys.chars().filter(|c| !c.is_whitespace()) {
        match Action::from_key(key) {
            Some(Action::Exit) => break,
            Some(action) => session.perform(action)?,
            None => log::warn!("Ignoring unknown action key {:?}", key),
        }
    }
    Ok(())
}
