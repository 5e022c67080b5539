pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod orbit;
pub mod panel;
pub mod picking;
pub mod render;
pub mod scene;
pub mod timer;
pub mod ui;
pub mod world;

use std::ffi::OsString;

use clap::Parser;
use tracing::{
  debug,
  info
};

#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
  let cli = cli::GlobalCli::parse_from(
    raw_args
  );

  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    "starting orrery session"
  );

  let mut cfg = config::Config::load(
    cli.orreryrc.as_deref()
  )?;
  cfg.apply_overrides(
    cli
      .rc_overrides
      .into_iter()
      .map(|kv| (kv.key, kv.value))
  );
  debug!(
    pomodoro_seconds =
      cfg.pomodoro_seconds(),
    "configuration resolved"
  );

  let mut renderer =
    render::Renderer::new(&cfg)?;

  let world = match cli.seed {
    Some(seed) => {
      world::World::with_seed(seed)
    }
    None => world::World::new()
  };

  let shell = ui::TerminalShell::new(
    renderer.clone()
  );
  let mut app = app::App::new(
    world,
    scene::FlatScene::new(),
    shell,
    cfg.pomodoro_seconds()
  );

  commands::run_session(
    &mut app,
    &mut renderer,
    cli.script.as_deref()
  )?;

  info!("session ended");
  Ok(())
}
