//! Drawing commands for the display protocol
//!
//! Every command is a parameter sequence whose first byte is the command
//! type. The packet is framed as soon as the command is built, so callers
//! can inspect either form without a further step.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::color::Color;
use crate::field::put_u16;
use crate::frame::{frame, FrameError, LengthWidth};
use crate::image::{Bitmap, ImageSource};

// Command type IDs. New codes are additive, never reused.
pub const CMD_BLOCK: u8 = 0x00;
pub const CMD_IMAGE: u8 = 0x01;
pub const CMD_STRING: u8 = 0x02;
pub const CMD_CLEAR: u8 = 0x03;
pub const CMD_RAW: u8 = 0x04;
pub const CMD_SQUARE_BATCH: u8 = 0x05;

/// Screen coordinate
///
/// Not bounds-checked; the controller clips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Position {
    pub x: u16,
    pub y: u16,
}

impl Position {
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

impl From<(u16, u16)> for Position {
    fn from((x, y): (u16, u16)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Width and height of a drawn square
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Command type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandKind {
    /// Fill a rectangle
    Block,
    /// Draw a full-color image
    Image,
    /// Draw text
    String,
    /// Clear the screen
    Clear,
    /// Pass a controller sub-command through untouched
    Raw,
    /// Draw the same square at many positions
    SquareBatch,
}

impl CommandKind {
    /// Parse a command type from its wire byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            CMD_BLOCK => Some(CommandKind::Block),
            CMD_IMAGE => Some(CommandKind::Image),
            CMD_STRING => Some(CommandKind::String),
            CMD_CLEAR => Some(CommandKind::Clear),
            CMD_RAW => Some(CommandKind::Raw),
            CMD_SQUARE_BATCH => Some(CommandKind::SquareBatch),
            _ => None,
        }
    }

    /// Convert to wire byte
    pub fn to_byte(self) -> u8 {
        match self {
            CommandKind::Block => CMD_BLOCK,
            CommandKind::Image => CMD_IMAGE,
            CommandKind::String => CMD_STRING,
            CommandKind::Clear => CMD_CLEAR,
            CommandKind::Raw => CMD_RAW,
            CommandKind::SquareBatch => CMD_SQUARE_BATCH,
        }
    }
}

/// Errors from building an image command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageCommandError<E> {
    /// The image source could not load the image
    Load(E),
    /// The decoded image does not fit a frame
    Frame(FrameError),
}

impl<E: fmt::Display> fmt::Display for ImageCommandError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageCommandError::Load(e) => write!(f, "image load failed: {}", e),
            ImageCommandError::Frame(e) => write!(f, "image framing failed: {}", e),
        }
    }
}

impl<E> core::error::Error for ImageCommandError<E>
where
    E: core::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            ImageCommandError::Load(e) => Some(e),
            ImageCommandError::Frame(e) => Some(e),
        }
    }
}

/// A built command and its framed packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    description: String,
    kind: CommandKind,
    width: LengthWidth,
    params: Vec<u8>,
    packet: Vec<u8>,
}

impl Command {
    fn new(description: String, width: LengthWidth, params: Vec<u8>) -> Result<Self, FrameError> {
        let kind = params
            .first()
            .copied()
            .and_then(CommandKind::from_byte)
            .ok_or(FrameError::EmptyParameters)?;
        let packet = frame(&params, width)?;

        Ok(Self {
            description,
            kind,
            width,
            params,
            packet,
        })
    }

    /// Human-readable summary, never transmitted
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    /// Length field width the packet was framed with
    pub fn width(&self) -> LengthWidth {
        self.width
    }

    /// Parameter sequence, type byte first
    pub fn params(&self) -> &[u8] {
        &self.params
    }

    /// Framed packet, ready to transmit
    pub fn packet(&self) -> &[u8] {
        &self.packet
    }

    /// Rebuild a raw command with a new sub-command and data
    ///
    /// Returns a new command framed with the same width, or `None` if this
    /// is not a raw command. The original is left untouched.
    pub fn rebuild_raw(&self, sub_command: u8, data: &[u8]) -> Option<Result<Command, FrameError>> {
        match self.kind {
            CommandKind::Raw => Some(CommandBuilder::new(self.width).raw(sub_command, data)),
            _ => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

/// Builds commands framed for one protocol revision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommandBuilder {
    width: LengthWidth,
}

fn put_position(params: &mut Vec<u8>, pos: Position) {
    put_u16(params, pos.x);
    put_u16(params, pos.y);
}

impl CommandBuilder {
    pub const fn new(width: LengthWidth) -> Self {
        Self { width }
    }

    pub fn width(&self) -> LengthWidth {
        self.width
    }

    /// Clear the screen
    pub fn clear(&self) -> Result<Command, FrameError> {
        Command::new(String::from("Clear display"), self.width, alloc::vec![CMD_CLEAR])
    }

    /// Fill the rectangle spanning `pos0` to `pos1`
    ///
    /// Payload: [x0][y0][x1][y1][color], 2 bytes each
    pub fn block(&self, pos0: Position, pos1: Position, color: Color) -> Result<Command, FrameError> {
        let mut params = Vec::with_capacity(11);
        params.push(CMD_BLOCK);
        put_position(&mut params, pos0);
        put_position(&mut params, pos1);
        put_u16(&mut params, color.raw());

        let description = format!("Fill rectangle at {} to {} with {}", pos0, pos1, color);
        Command::new(description, self.width, params)
    }

    /// Draw `text` at `pos`
    ///
    /// Payload: [x][y] (2 bytes each), [font size], [color] (2 bytes), then
    /// one byte per character. Characters outside Latin-1 keep only their
    /// low byte.
    pub fn string(
        &self,
        pos: Position,
        font_size: u8,
        color: Color,
        text: &str,
    ) -> Result<Command, FrameError> {
        let mut params = Vec::with_capacity(8 + text.len());
        params.push(CMD_STRING);
        put_position(&mut params, pos);
        params.push(font_size);
        put_u16(&mut params, color.raw());
        params.extend(text.chars().map(|c| (u32::from(c) & 0xFF) as u8));

        let description = format!(
            "Display {} at {} with font size {} and color {}",
            text, pos, font_size, color
        );
        Command::new(description, self.width, params)
    }

    /// Draw a decoded bitmap with its top-left corner at `pos`
    ///
    /// Payload: [x][y][width][height], 2 bytes each, then one RGB565 value
    /// per pixel in row-major order.
    pub fn bitmap(&self, pos: Position, bitmap: &Bitmap) -> Result<Command, FrameError> {
        let mut params = Vec::with_capacity(9 + bitmap.pixels.len() * 2);
        params.push(CMD_IMAGE);
        put_position(&mut params, pos);
        put_u16(&mut params, bitmap.width);
        put_u16(&mut params, bitmap.height);
        for &[r, g, b] in &bitmap.pixels {
            put_u16(&mut params, Color::from_rgb(r, g, b).raw());
        }

        let description = format!(
            "Draw {}x{} image at {}",
            bitmap.width, bitmap.height, pos
        );
        Command::new(description, self.width, params)
    }

    /// Load `path` through `source` and draw it at `pos`
    ///
    /// A load failure is returned as-is and no command is built.
    pub fn image<S: ImageSource>(
        &self,
        pos: Position,
        path: &str,
        source: &mut S,
    ) -> Result<Command, ImageCommandError<S::Error>> {
        let bitmap = source.load(path).map_err(ImageCommandError::Load)?;
        self.bitmap(pos, &bitmap).map_err(ImageCommandError::Frame)
    }

    /// Pass `sub_command` and `data` straight through to the controller
    pub fn raw(&self, sub_command: u8, data: &[u8]) -> Result<Command, FrameError> {
        let mut params = Vec::with_capacity(2 + data.len());
        params.push(CMD_RAW);
        params.push(sub_command);
        params.extend_from_slice(data);

        let description = format!(
            "Raw command {:#04X} with {} data bytes",
            sub_command,
            data.len()
        );
        Command::new(description, self.width, params)
    }

    /// Draw a `size` square of `color` at each of `positions`
    ///
    /// Payload: [ref x][ref y][count][width][height][color], 2 bytes each,
    /// then [x][y] per position. The count is masked to 16 bits.
    pub fn square_batch(
        &self,
        reference: Position,
        size: Size,
        color: Color,
        positions: &[Position],
    ) -> Result<Command, FrameError> {
        let mut params = Vec::with_capacity(13 + positions.len() * 4);
        params.push(CMD_SQUARE_BATCH);
        put_position(&mut params, reference);
        put_u16(&mut params, positions.len() as u16);
        put_u16(&mut params, size.width);
        put_u16(&mut params, size.height);
        put_u16(&mut params, color.raw());
        for &pos in positions {
            put_position(&mut params, pos);
        }

        let description = format!(
            "Draw {} {} squares from {} with {}",
            positions.len(),
            size,
            reference,
            color
        );
        Command::new(description, self.width, params)
    }
}
