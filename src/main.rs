use std::{
    io::{self, Write},
    time::Duration,
};

use clap::Parser;
use crossterm::{
    QueueableCommand,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
};
use match_three::{
    Battle, Board, BoardConfig, BoardEvent, Cell, Monster, PieceType, SwapPolicy,
};

/// Plays a match-three board on its own, always taking the first legal swap, and fights a
/// line of monsters with the pieces it clears.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Seed for the board's random source.
    #[arg(short, long, default_value_t = 0)]
    seed: u64,
    #[arg(long, default_value_t = 6)]
    columns: usize,
    #[arg(long, default_value_t = 6)]
    rows: usize,
    /// Number of piece kinds in play.
    #[arg(short, long, default_value_t = 6)]
    kinds: usize,
    /// Swaps to play before stopping.
    #[arg(short, long, default_value_t = 20)]
    moves: u32,
    /// Swap back moves that clear nothing.
    #[arg(long)]
    require_match: bool,
    /// Simulation step in milliseconds.
    #[arg(long, default_value_t = 16)]
    step_ms: u64,
}

const MAX_STEPS: u32 = 100_000;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = BoardConfig {
        columns: args.columns,
        rows: args.rows,
        piece_kinds: args.kinds,
        swap_policy: if args.require_match {
            SwapPolicy::RequireMatch
        } else {
            SwapPolicy::Permissive
        },
        ..Default::default()
    };

    let step = Duration::from_millis(args.step_ms.max(1));
    let mut board = Board::seeded(config, args.seed)?;
    let mut battle = Battle::new(vec![
        Monster::new("Slime", 30),
        Monster::new("Goblin", 60),
        Monster::new("Dragon", 120),
    ]);

    let mut stdout = io::stdout();

    for turn in 1..=args.moves {
        let Some((a, b)) = board.highlight_hint() else {
            println!("No legal move left");
            break;
        };

        print_board(&mut stdout, &board)?;
        board.attempt_swap(a, b);
        let steps = board.run_until_settled(step, MAX_STEPS)?;
        println!("Turn {turn}: {a} <-> {b}, settled after {steps} steps");

        for event in board.drain_events() {
            match event {
                BoardEvent::Cleared(clear) => {
                    let Some(damage) = battle.apply_clear(&clear) else {
                        continue;
                    };

                    let monster = &battle.monsters()[damage.monster];
                    println!(
                        "  chain {}: {} x{} hit {monster} for {}",
                        clear.chain,
                        clear.kind,
                        clear.pieces.len(),
                        damage.amount
                    );
                }
                BoardEvent::Deadlocked => println!("  deadlocked"),
                BoardEvent::Reshuffled => println!("  reshuffled"),
                _ => {}
            }
        }

        if battle.is_over() {
            println!("All monsters defeated after {turn} turns");
            break;
        }
    }

    print_board(&mut stdout, &board)?;
    Ok(())
}

fn print_board(stdout: &mut impl Write, board: &Board) -> io::Result<()> {
    let grid = board.grid();

    for row in 0..grid.rows() {
        for column in 0..grid.columns() {
            let piece = grid.get(Cell::new(column, row));
            let (glyph, color) = match piece {
                Some(piece) => (piece.kind().glyph(), get_color(piece.kind())),
                None => ('.', Color::DarkGrey),
            };

            if piece.is_some_and(|piece| piece.highlighted) {
                stdout.queue(SetBackgroundColor(Color::DarkGrey))?;
            } else {
                stdout.queue(SetBackgroundColor(Color::Reset))?;
            }

            stdout
                .queue(SetForegroundColor(color))?
                .queue(Print(glyph))?
                .queue(SetBackgroundColor(Color::Reset))?
                .queue(Print(' '))?
                .queue(ResetColor)?;
        }

        stdout.queue(Print('\n'))?;
    }

    stdout.flush()
}

fn get_color(kind: PieceType) -> Color {
    match kind {
        PieceType::Diamond => Color::Cyan,
        PieceType::Square => Color::Blue,
        PieceType::Circle => Color::Yellow,
        PieceType::Pentagon => Color::Magenta,
        PieceType::Jewel => Color::Green,
        PieceType::Star => Color::Red,
    }
}
