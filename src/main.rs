// Entry point for the mouse-driven terminal Minesweeper
// Parses the start-time grid parameters and launches the UI loop

use std::error::Error;

use clap::Parser;

// Module declarations
mod field; // Minefield state machine: seeding, reveal/flood-fill, flags
mod input; // Pointer-to-cell resolution and press/release commit logic
mod palette; // Terminal color matching
mod ui; // Rendering and the event-polling loop

/// A terminal Minesweeper played with the mouse: press and release the left
/// button on a cell to reveal it (drag off to cancel), right-click to flag.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Field width in cells
    #[arg(long, default_value_t = 8)]
    width: i32,

    /// Field height in cells
    #[arg(long, default_value_t = 10)]
    height: i32,

    /// Number of mines to seed
    #[arg(long, default_value_t = 10)]
    mines: usize,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    // Reject impossible parameters before touching the terminal, instead of
    // letting the seeding loop spin forever later.
    field::Minefield::new(args.width, args.height, args.mines)?;

    ui::run(args.width, args.height, args.mines)
}
