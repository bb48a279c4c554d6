pub mod cli;
pub mod commands;
pub mod config;
pub mod datetime;
pub mod render;

use std::ffi::OsString;
use std::fs::File;
use std::io::{
  self,
  BufReader,
  IsTerminal
};

use anyhow::Context;
use clap::Parser;
use tracing::{
  debug,
  info
};

#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
  let cli =
    cli::GlobalCli::parse_from(raw_args);

  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    "starting weekgrid"
  );

  let mut cfg = config::Config::load(
    cli.config.as_deref()
  )?;
  cfg
    .apply_overrides(
      cli
        .rc_overrides
        .into_iter()
        .map(|kv| (kv.key, kv.value))
    )
    .context(
      "failed to apply --rc overrides"
    )?;
  cfg.sanitize();
  debug!(?cfg, "effective config");

  let today = datetime::resolve_today(
    cli.today, &cfg
  );
  let reference =
    cli.week.unwrap_or(today);
  info!(%today, %reference, "resolved dates");

  let renderer =
    render::Renderer::new(&cfg);
  let stdout = io::stdout();

  match cli.script {
    | Some(path) => {
      let file = File::open(&path)
        .with_context(|| {
          format!(
            "failed to open script {}",
            path.display()
          )
        })?;
      let mut session =
        commands::Session::new(
          &cfg,
          today,
          reference,
          renderer,
          stdout.lock()
        );
      session
        .run_lines(BufReader::new(file))?;
    }
    | None => {
      let stdin = io::stdin();
      let interactive =
        stdin.is_terminal();
      let mut session =
        commands::Session::new(
          &cfg,
          today,
          reference,
          renderer,
          stdout.lock()
        )
        .with_prompt(interactive);
      session.run_lines(stdin.lock())?;
    }
  }

  info!("done");
  Ok(())
}
