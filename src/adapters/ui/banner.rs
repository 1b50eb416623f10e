//! Start-up banner and coloured dispatch reports.

use crate::domain::DispatchOutcome;
use crossterm::ExecutableCommand;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use std::io::{Write, stdout};

/// Brand navy.
const NAVY: (u8, u8, u8) = (0x00, 0x3d, 0xa5);
/// Brand orange.
const ORANGE: (u8, u8, u8) = (0xf9, 0x73, 0x16);

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb { r, g, b }
}

fn print_colored(color: Color, text: &str) {
    let mut out = stdout();
    let _ = out.execute(SetForegroundColor(color));
    let _ = out.execute(Print(text));
    let _ = out.execute(ResetColor);
    let _ = out.flush();
}

/// Name, version, and a rule in the brand colours.
pub fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    print_colored(rgb(NAVY), "MEMBER MAILER");
    print_colored(rgb(ORANGE), &format!("  v{}\r\n", version));
    print_colored(rgb(ORANGE), &format!("{}\r\n", "─".repeat(40)));
}

/// Green on full delivery, yellow on a dry run or when some batches failed.
pub fn print_outcome(outcome: &DispatchOutcome) {
    let color = if outcome.overall_succeeded && !outcome.dry_run {
        Color::Green
    } else {
        Color::Yellow
    };
    print_colored(color, &format!("{}\r\n", outcome.summary()));

    for batch in outcome.batch_results.iter().filter(|b| !b.succeeded) {
        print_colored(
            Color::DarkYellow,
            &format!(
                "  batch {} ({} recipients): {}\r\n",
                batch.batch_index + 1,
                batch.size,
                batch.error.as_deref().unwrap_or("unknown error")
            ),
        );
    }
}

pub fn print_error(message: &str) {
    print_colored(Color::Red, &format!("{}\r\n", message));
}
