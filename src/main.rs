use std::io::{self, Read, Write};

use aho_corasick::AhoCorasick;
use anyhow::Context;
use clap::Parser;
use lib_2048::{Direction, Game};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod render;

/// Arrow keys in `Direction` order, then the quit key.
const KEY_SEQUENCES: [&[u8]; 5] = [b"\x1b[A", b"\x1b[B", b"\x1b[C", b"\x1b[D", b"q"];

#[derive(Parser, Debug)]
#[command(name = "play-2048", about = "Play 2048 in the terminal")]
struct Args {
    /// Seed for tile spawns. A random seed is used when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Play these moves without a terminal, e.g. "up left left down" or "k,h,h,j".
    #[arg(long)]
    script: Option<String>,
    /// Print the final session as JSON (script mode only).
    #[arg(long, requires = "script")]
    json: bool,
    /// Tracing filter, e.g. "debug" or "lib_2048=trace". Logs go to stderr.
    #[arg(long, default_value = "warn")]
    log: String,
}

fn play_interactive<R: Rng>(
    out: &mut impl Write,
    input: &mut impl Read,
    game: &mut Game<R>,
) -> anyhow::Result<()> {
    let input_searcher =
        AhoCorasick::new(KEY_SEQUENCES).context("failed to build key searcher")?;

    let mut buf = [0u8; 128];
    let mut buf_len = 0;

    let session = game.session();
    render::draw_board(out, session.board, session.score)?;

    'game: while !game.is_over() {
        let read = input.read(&mut buf[buf_len..])?;

        if read == 0 {
            break;
        }

        buf_len += read;

        for key in input_searcher
            .find_iter(&buf[..buf_len])
            .map(|m| m.pattern().as_usize())
        {
            let Some(direction) = Direction::iter().nth(key) else {
                break 'game;
            };

            let before = *game.session();

            if game.apply(direction) {
                let after = game.session();

                render::redraw_board(out, before.board, after.board, before.score, after.score)?;
            }
        }

        // Keep a partially read escape sequence for the next read.
        buf_len = match &buf[..buf_len] {
            [.., 0x1b, b'['] => {
                buf[..2].copy_from_slice(b"\x1b[");
                2
            }
            [.., 0x1b] => {
                buf[0] = 0x1b;
                1
            }
            _ => 0,
        }
    }

    let session = game.session();

    if session.game_over {
        writeln!(out, "Game over")?;
    }

    writeln!(out, "Final score: {}", session.score)?;

    Ok(())
}

/// Applies whitespace- or comma-separated direction tokens, skipping any that do not parse.
fn play_script<R: Rng>(
    out: &mut impl Write,
    game: &mut Game<R>,
    script: &str,
    json: bool,
) -> anyhow::Result<()> {
    let tokens = script
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty());

    for token in tokens {
        if game.is_over() {
            info!("game over, ignoring remaining moves");
            break;
        }

        match token.parse::<Direction>() {
            Ok(direction) => {
                game.apply(direction);
            }
            Err(err) => warn!("{err}, skipping"),
        }
    }

    let session = game.session();

    if json {
        serde_json::to_writer(&mut *out, session).context("failed to serialize session")?;
        writeln!(out)?;
    } else {
        write!(out, "{}", session.board)?;
        writeln!(out, "Score: {}", session.score)?;

        if session.game_over {
            writeln!(out, "Game over")?;
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_new(&args.log).context("invalid --log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let seed = args.seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!(seed, "starting game");

    let mut game = Game::new(ChaCha8Rng::seed_from_u64(seed));
    let mut stdout = io::stdout().lock();

    match args.script {
        Some(script) => play_script(&mut stdout, &mut game, &script, args.json),
        None => {
            let mut stdin = io::stdin().lock();
            let termios = render::setup_terminal(&stdin).context("stdin is not a terminal")?;

            let result = play_interactive(&mut stdout, &mut stdin, &mut game);

            render::restore_terminal(&stdin, &termios)?;

            result
        }
    }
}
