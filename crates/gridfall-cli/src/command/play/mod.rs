use std::path::PathBuf;

use self::screen::PlayScreen;

mod screen;

const DEFAULT_SAVE_FILE: &str = "./data/saves/gridfall.txt";

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Path of the save file used by the save and load keys
    #[clap(long, default_value = DEFAULT_SAVE_FILE)]
    save_file: PathBuf,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            save_file: PathBuf::from(DEFAULT_SAVE_FILE),
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg { save_file } = arg;

    let mut screen = PlayScreen::new(save_file.clone());

    ratatui::run(|terminal| screen.run(terminal))?;

    Ok(())
}
