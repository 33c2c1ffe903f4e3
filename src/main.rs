use center_solver::{
    config::DEFAULT_MAX_DEPTH, parse_moves, solution::format_moves, Color, Face, PuzzleState,
    SolveRequest, Solver, SolverConfig,
};
use clap::Parser;
use crossterm::style::{Color as TermColor, Stylize};
use rand::{rngs::StdRng, thread_rng, Rng, SeedableRng};
use std::time::Duration;

/// Brings two opposite center colors of a 4x4x4 onto a chosen pair of faces
/// in as few moves as possible
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Face the first color should end up on; the second goes opposite
    #[arg(short, long, default_value = "U")]
    target: Face,
    /// 24 color letters (W Y G B R O, '.' for unset) in U F R D L B slot order
    #[arg(long)]
    state: Option<PuzzleState>,
    /// Moves applied to the starting state, e.g. "Rw U2 Fw'"
    #[arg(long)]
    scramble: Option<String>,
    /// Apply this many random layer moves to the starting state
    #[arg(long)]
    random: Option<usize>,
    /// Seed for --random
    #[arg(long)]
    seed: Option<u64>,
    /// Move prefix the solution must not use; can be repeated
    #[arg(long = "ban")]
    banned: Vec<String>,
    /// Deepest IDA* bound to try
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: u8,
    /// Give up after this many milliseconds
    #[arg(long)]
    time_limit_ms: Option<u64>,
}

fn term_color(color: Color) -> TermColor {
    match color {
        Color::WHITE => TermColor::White,
        Color::YELLOW => TermColor::Yellow,
        Color::GREEN => TermColor::Green,
        Color::BLUE => TermColor::Blue,
        Color::RED => TermColor::Red,
        Color::ORANGE => TermColor::DarkYellow,
        _ => TermColor::Grey,
    }
}

fn render(puzzle: &PuzzleState) -> String {
    let mut out = String::new();
    for row in 0..2 {
        for face in [Face::U, Face::F, Face::R, Face::D, Face::L, Face::B] {
            let label = if row == 0 { face.letter() } else { ' ' };
            out.push_str(&format!("{label} "));
            for slot in &face.slots()[row * 2..row * 2 + 2] {
                let cell = match puzzle.get(*slot) {
                    Some(color) => color.to_string().with(term_color(color)).bold().to_string(),
                    None => ".".dark_grey().to_string(),
                };
                out.push_str(&format!(" {cell}"));
            }
            out.push_str("    ");
        }
        out.push('\n');
    }
    out
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    pretty_env_logger::init();
    let args = Args::parse();

    let solved = PuzzleState::solved(args.target, Color::WHITE, Color::YELLOW);
    let mut puzzle = args.state.clone().unwrap_or(solved);
    if let Some(scramble) = &args.scramble {
        puzzle.apply_moves(&parse_moves(scramble)?);
    }
    if let Some(len) = args.random {
        let seed = args.seed.unwrap_or_else(|| thread_rng().gen());
        let scramble = puzzle.scramble(&mut StdRng::seed_from_u64(seed), len);
        println!("Scramble (seed {seed}): {}", format_moves(&scramble));
    }
    println!("Initial puzzle:\n{}", render(&puzzle));

    let mut config = SolverConfig::default().with_max_depth(args.max_depth);
    if let Some(ms) = args.time_limit_ms {
        config = config.with_time_limit(Duration::from_millis(ms));
    }
    let solver = Solver::new(config);
    let request = SolveRequest::new(puzzle.clone(), args.target)
        .with_banned_prefixes(args.banned);
    let result = solver.solve(&request)?;

    if result.is_solved() {
        println!("Solution: {}", result.forward_string());
        println!("Setup:    {}", result.setup_string());
        println!("{}", result.summary());

        puzzle.apply_moves(&result.forward);
        println!("\n{}", render(&puzzle));
    } else {
        println!("{}", result.summary());
    }
    Ok(())
}
