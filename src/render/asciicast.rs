use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::{ensure, Context, Result};
use serde::Serialize;

use super::Renderer;
use crate::memory::Transition;

/// Clear the screen and move the cursor home
const CLEAR: &str = "\x1b[2J\x1b[H";

#[derive(Serialize)]
struct Header<'a> {
    version: u8,
    width: usize,
    height: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
}

/// Renders trajectories as [asciinema v2](https://docs.asciinema.org/manual/asciicast/v2/) recordings
///
/// Each transition becomes one output event that redraws the board, followed by a status line.
#[derive(Debug, Clone)]
pub struct AsciicastRenderer {
    frame_delay: f64,
    title: Option<String>,
}

impl Default for AsciicastRenderer {
    fn default() -> Self {
        Self {
            frame_delay: 0.2,
            title: None,
        }
    }
}

impl AsciicastRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds between consecutive frames
    pub fn with_frame_delay(mut self, seconds: f64) -> Self {
        self.frame_delay = seconds;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    fn status(transition: &Transition) -> String {
        let mut status = format!(
            "length: {}  step: {}",
            transition.snake_length, transition.step_count
        );
        if transition.truncated {
            status.push_str(" (truncated)");
        }
        status
    }

    fn frame(transition: &Transition) -> String {
        let board = transition.board.to_string().replace('\n', "\r\n");
        format!("{CLEAR}{board}\r\n{}", Self::status(transition))
    }
}

impl Renderer for AsciicastRenderer {
    fn extension(&self) -> &str {
        "cast"
    }

    fn render(&mut self, path: &Path, trajectory: &[Transition]) -> Result<()> {
        ensure!(!trajectory.is_empty(), "cannot render an empty trajectory");

        let size = trajectory
            .iter()
            .map(|t| t.board.size())
            .max()
            .unwrap_or_default();
        let status_width = trajectory
            .iter()
            .map(|t| Self::status(t).len())
            .max()
            .unwrap_or_default();
        let header = Header {
            version: 2,
            width: (size + 2).max(status_width),
            height: size + 3,
            title: self.title.as_deref(),
        };

        let file = File::create(path)
            .with_context(|| format!("failed to create recording {}", path.display()))?;
        let mut writer = BufWriter::new(file);

        serde_json::to_writer(&mut writer, &header)?;
        writeln!(writer)?;
        for (i, transition) in trajectory.iter().enumerate() {
            let time = i as f64 * self.frame_delay;
            serde_json::to_writer(&mut writer, &(time, "o", Self::frame(transition)))?;
            writeln!(writer)?;
        }

        writer
            .flush()
            .with_context(|| format!("failed to write recording {}", path.display()))
    }
}
