//! Session context
//!
//! A [`Session`] owns the transport driver, the command builder, the image
//! source and the prebuilt demo commands. The binary constructs one and
//! passes it by `&mut` into every menu action.

use std::thread;
use std::time::Duration;

use log::{error, info};
use tftlink_hal::SerialTx;
use tftlink_protocol::{
    Color, Command, CommandBuilder, FrameError, ImageCommandError, ImageSource, Position, Size,
};

use crate::image_source::ImageLoadError;
use crate::menu::Action;
use crate::transport::{TransportDriver, TransportError};

/// Packet sent by the test-write action: a 2-byte-length clear
pub const TEST_PACKET: [u8; 5] = [0x02, 0x03, 0x00, 0x00, 0x03];

/// Errors from a single session action
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("cannot build command: {0}")]
    Frame(#[from] FrameError),
    #[error(transparent)]
    Image(#[from] ImageLoadError),
}

impl From<ImageCommandError<ImageLoadError>> for SessionError {
    fn from(e: ImageCommandError<ImageLoadError>) -> Self {
        match e {
            ImageCommandError::Load(e) => SessionError::Image(e),
            ImageCommandError::Frame(e) => SessionError::Frame(e),
        }
    }
}

/// Session tuning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    /// Image drawn by the image action
    pub image_path: String,
    /// Pause between test program steps
    pub pause: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            image_path: String::from("test.bmp"),
            pause: Duration::from_millis(500),
        }
    }
}

/// Demo commands built once per session
struct Demo {
    clear: Command,
    blocks: [Command; 2],
    strings: [Command; 2],
    squares: Command,
}

impl Demo {
    fn build(builder: &CommandBuilder) -> Result<Self, FrameError> {
        let positions = [
            Position::new(0, 0),
            Position::new(100, 100),
            Position::new(190, 270),
        ];

        Ok(Self {
            clear: builder.clear()?,
            blocks: [
                builder.block(Position::new(100, 100), Position::new(200, 200), Color::RED)?,
                builder.block(Position::new(10, 100), Position::new(50, 200), Color::BLUE)?,
            ],
            strings: [
                builder.string(Position::new(100, 100), 3, Color::YELLOW, "HELLO")?,
                builder.string(Position::new(10, 200), 3, Color::GREEN, "TESTING")?,
            ],
            squares: builder.square_batch(
                Position::new(0, 0),
                Size::new(50, 50),
                Color::WHITE,
                &positions,
            )?,
        })
    }
}

/// Everything a menu action needs
pub struct Session<C, I> {
    driver: TransportDriver<C>,
    builder: CommandBuilder,
    images: I,
    settings: SessionSettings,
    demo: Demo,
}

impl<C, I> Session<C, I>
where
    C: SerialTx<Error = std::io::Error>,
    I: ImageSource<Error = ImageLoadError>,
{
    pub fn new(
        driver: TransportDriver<C>,
        builder: CommandBuilder,
        images: I,
        settings: SessionSettings,
    ) -> Result<Self, SessionError> {
        let demo = Demo::build(&builder)?;
        Ok(Self {
            driver,
            builder,
            images,
            settings,
            demo,
        })
    }

    pub fn driver(&self) -> &TransportDriver<C> {
        &self.driver
    }

    pub fn images(&self) -> &I {
        &self.images
    }

    /// Run one menu action
    pub fn perform(&mut self, action: Action) -> Result<(), SessionError> {
        match action {
            Action::Clear => self.clear(),
            Action::Block => self.blocks(),
            Action::Text => self.strings(),
            Action::Image => self.image(),
            Action::Raw => self.raw(),
            Action::SquareBatch => self.square_batch(),
            Action::TestWrite => self.test_write(),
            Action::TestProgram => self.test_program(),
            Action::Exit => Ok(()),
        }
    }

    /// Like [`perform`](Self::perform), but logs a failure instead of
    /// returning it
    ///
    /// Returns true if the action succeeded.
    pub fn perform_logged(&mut self, action: Action) -> bool {
        match self.perform(action) {
            Ok(()) => true,
            Err(e) => {
                error!("{} failed: {}", action.label(), e);
                false
            }
        }
    }

    fn send(&mut self, command: &Command) -> Result<(), SessionError> {
        self.driver.transmit(command)?;
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), SessionError> {
        self.driver.transmit(&self.demo.clear)?;
        Ok(())
    }

    pub fn blocks(&mut self) -> Result<(), SessionError> {
        for block in &self.demo.blocks {
            self.driver.transmit(block)?;
        }
        Ok(())
    }

    pub fn strings(&mut self) -> Result<(), SessionError> {
        for string in &self.demo.strings {
            self.driver.transmit(string)?;
        }
        Ok(())
    }

    /// Load the configured image and draw it at the origin
    ///
    /// The image is loaded on every call, so a missing file fails only this
    /// action.
    pub fn image(&mut self) -> Result<(), SessionError> {
        let command = self.builder.image(
            Position::new(0, 0),
            &self.settings.image_path,
            &mut self.images,
        )?;
        self.send(&command)
    }

    /// Send a raw command, then rebuild it twice with new sub-commands
    pub fn raw(&mut self) -> Result<(), SessionError> {
        let first = self.builder.raw(0x2A, &[0, 0, 0, 100])?;
        self.send(&first)?;

        let second = rebuild(&first, 0x2B, &[0, 0, 0, 100])?;
        self.send(&second)?;

        // 10000 red RGB565 pixels
        let data = [0xF8, 0x00].repeat(10_000);
        let third = rebuild(&second, 0x2C, &data)?;
        self.send(&third)
    }

    pub fn square_batch(&mut self) -> Result<(), SessionError> {
        self.driver.transmit(&self.demo.squares)?;
        Ok(())
    }

    /// Write the fixed test packet without going through the builder
    pub fn test_write(&mut self) -> Result<(), SessionError> {
        info!("Sending test packet");
        self.driver.transmit_packet(&TEST_PACKET)?;
        Ok(())
    }

    /// Clear, blocks, strings, clear, image, pausing between steps
    pub fn test_program(&mut self) -> Result<(), SessionError> {
        let pause = self.settings.pause;
        self.clear()?;
        thread::sleep(pause);
        self.blocks()?;
        thread::sleep(pause);
        self.strings()?;
        thread::sleep(pause);
        self.clear()?;
        thread::sleep(pause);
        self.image()
    }
}

fn rebuild(command: &Command, sub_command: u8, data: &[u8]) -> Result<Command, FrameError> {
    // Only called on raw commands built above
    command
        .rebuild_raw(sub_command, data)
        .unwrap_or(Err(FrameError::EmptyParameters))
}
