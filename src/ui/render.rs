//! Drawing the panel to the terminal.
//!
//! Text assembly is kept in pure functions so it can be tested without a
//! terminal; the `draw_*` functions only position and color it.

use crate::error::AppError;
use crate::panel::format::slot_text;
use crate::panel::{AttributeSlot, DisplayWindow, SlotStatus};
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io::Write;

const TITLE: &str = "INSTANCE DETAILS";
const TITLE_FG: Color = Color::AnsiValue(51);
const LABEL_FG: Color = Color::AnsiValue(231);
const LOADING_FG: Color = Color::AnsiValue(245);
const ERROR_FG: Color = Color::AnsiValue(226);
const CONTROLS: &str = "space/enter/click = next   q = quit";

/// `"<first> | <second>"`, or a single entry when one slot fills the window
pub fn format_window_line(window: &DisplayWindow) -> String {
    window
        .slots()
        .map(slot_text)
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Position indicator such as `3/7`
pub fn position_text(window: &DisplayWindow, total: usize) -> String {
    format!("{}/{}", window.cursor + 1, total.max(1))
}

fn status_color(slot: &AttributeSlot) -> Color {
    match slot.status {
        SlotStatus::Ready => LABEL_FG,
        SlotStatus::Loading => LOADING_FG,
        SlotStatus::Error => ERROR_FG,
    }
}

/// Draws the visible window, one slot per row under a title bar.
pub fn draw_panel<W: Write>(
    out: &mut W,
    window: &DisplayWindow,
    total_slots: usize,
) -> Result<(), AppError> {
    queue!(
        out,
        Clear(ClearType::All),
        MoveTo(0, 0),
        SetForegroundColor(TITLE_FG),
        SetAttribute(Attribute::Bold),
        Print(format!("{TITLE}  {}", position_text(window, total_slots))),
        SetAttribute(Attribute::Reset),
        ResetColor
    )?;

    for (row, slot) in window.slots().enumerate() {
        queue!(
            out,
            MoveTo(0, 2 + row as u16),
            SetForegroundColor(LOADING_FG),
            Print(format!("{:<14}", slot.label)),
            SetForegroundColor(status_color(slot)),
            Print(slot_text(slot)),
            ResetColor
        )?;
    }

    queue!(
        out,
        MoveTo(0, 5),
        SetForegroundColor(LOADING_FG),
        Print(CONTROLS),
        ResetColor
    )?;
    out.flush()?;
    Ok(())
}

/// Panel-level error shown when the initial load fails
pub fn draw_load_error<W: Write>(out: &mut W, message: &str) -> Result<(), AppError> {
    queue!(
        out,
        Clear(ClearType::All),
        MoveTo(0, 0),
        SetForegroundColor(TITLE_FG),
        Print(TITLE),
        MoveTo(0, 2),
        SetForegroundColor(ERROR_FG),
        Print(format!("Unable to load instance details: {message}")),
        MoveTo(0, 4),
        SetForegroundColor(LOADING_FG),
        Print("q = quit"),
        ResetColor
    )?;
    out.flush()?;
    Ok(())
}
