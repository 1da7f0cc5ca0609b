use std::io::Write;

use log::warn;

use crate::presenter::{LabelBoard, Slot, StepDisplay};

/// Text display that keeps the current labels and echoes every change.
pub struct ConsoleDisplay<W: Write> {
    board: LabelBoard,
    out: W,
}

impl<W: Write> ConsoleDisplay<W> {
    pub fn new(out: W) -> Self {
        Self {
            board: LabelBoard::default(),
            out,
        }
    }

    pub fn board(&self) -> &LabelBoard {
        &self.board
    }

    pub fn println(&mut self, text: &str) {
        if let Err(err) = writeln!(self.out, "{text}").and_then(|_| self.out.flush()) {
            warn!("Failed to write to console: {err}");
        }
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> StepDisplay for ConsoleDisplay<W> {
    fn show(&mut self, slot: Slot, text: &str) {
        self.board.show(slot, text);
        self.println(&format!("[{}] {}", slot.label_id(), text));
    }
}
