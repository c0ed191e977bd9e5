//! Rendering backend that reports the HUD as plain text lines.

use std::io::Write;

use anyhow::{Context, Result};
use waypoint_defence_rendering::{RenderingBackend, Scene};

/// Writes a HUD line every `report_every` frames and a summary at the end.
#[derive(Debug)]
pub(crate) struct TextBackend<W> {
    out: W,
    report_every: u64,
    frame: u64,
}

impl<W: Write> TextBackend<W> {
    /// Creates a backend writing to `out`; a zero period only reports the summary.
    pub(crate) fn new(out: W, report_every: u64) -> Self {
        Self {
            out,
            report_every,
            frame: 0,
        }
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn present(&mut self, scene: &Scene) -> Result<()> {
        self.frame += 1;
        if self.report_every == 0 || self.frame % self.report_every != 0 {
            return Ok(());
        }

        writeln!(
            self.out,
            "[frame {:>6}] {} | enemies {} | towers {}",
            self.frame,
            scene.hud_line(),
            scene.enemies.len(),
            scene.towers.len()
        )
        .context("failed to write HUD line")
    }

    fn finish(&mut self, scene: &Scene) -> Result<()> {
        writeln!(self.out, "{}", scene.hud_line()).context("failed to write final HUD")?;
        if let Some(overlay) = scene.overlay {
            writeln!(self.out, "{}: {}", overlay.title, overlay.message)
                .context("failed to write outcome")?;
        }
        self.out.flush().context("failed to flush output")
    }
}
