mod cli;
mod inspect;
mod paths;
mod run;
mod scene;

use anyhow::Result;
use cli::{Command, SceneArgs, TimelineArgs};
use paths::AppPaths;
use scene::load_scene;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();

    match cli.command {
        Some(Command::Run(args)) => run::run(args),
        Some(Command::Timeline(args)) => run_timeline(args),
        Some(Command::Debug(args)) => run_debug(args),
        Some(Command::Where) => run_where(),
        None => run::run(cli.run),
    }
}

fn run_timeline(args: TimelineArgs) -> Result<()> {
    let paths = AppPaths::discover()?;
    let loaded = load_scene(args.scene.config.as_deref(), &paths)?;
    inspect::print_timeline(&loaded.config, args.fps)
}

fn run_debug(args: SceneArgs) -> Result<()> {
    let paths = AppPaths::discover()?;
    // Loaded only to reject a broken scene file before printing.
    load_scene(args.config.as_deref(), &paths)?;
    inspect::print_debug_panel()
}

fn run_where() -> Result<()> {
    let paths = AppPaths::discover()?;
    let scene_file = paths.scene_file();
    println!("Configuration directories:");
    println!("  config:     {}", paths.config_dir().display());
    println!("  data:       {}", paths.data_dir().display());
    println!(
        "  scene:      {} ({})",
        scene_file.display(),
        if scene_file.is_file() {
            "present"
        } else {
            "missing, defaults apply"
        }
    );
    Ok(())
}
