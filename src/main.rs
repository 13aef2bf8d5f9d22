
use diffdrill::session::{DrillSession, Grade, SessionConfig};

use anyhow::{Context, Result};
use rand_chacha::ChaCha8Rng;
use rand::SeedableRng;

use std::env;
use std::io::{self, BufRead, Write};

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
    )
    .init();

  let mut args = env::args();
  let _program_name = args.next();
  let rng = match args.next() {
    Some(seed) => {
      let seed: u64 = seed.parse().context("seed must be an unsigned integer")?;
      ChaCha8Rng::seed_from_u64(seed)
    }
    None => ChaCha8Rng::from_entropy(),
  };

  let mut session = DrillSession::generate(rng, &SessionConfig::default());
  let stdin = io::stdin();
  let mut lines = stdin.lock().lines();

  loop {
    let Some(equation) = session.current_equation().map(str::to_owned) else { break };
    let position = session.current_index() + 1;
    let total = session.equations().len();
    println!("[{position}/{total}] y = {equation}");
    print!("dy/dx = ");
    io::stdout().flush()?;

    let Some(line) = lines.next() else {
      println!();
      break;
    };
    let answer = line.context("failed to read from stdin")?;

    match session.submit(&answer) {
      Grade::Rejected { reason } => {
        println!("rejected: {reason}");
      }
      Grade::Correct { .. } => {
        println!("correct");
      }
      Grade::Incorrect { mismatch, .. } => {
        println!(
          "incorrect: at x = {}, expected {} but your answer gives {}",
          mismatch.point, mismatch.expected, mismatch.actual,
        );
      }
    }
  }

  if session.is_complete() {
    println!("session complete with {} strike(s)", session.strikes());
  }
  Ok(())
}
