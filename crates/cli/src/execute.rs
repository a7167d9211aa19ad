use crate::commands::{check, run, warm, Commands};
use warmstart_config::Config;

impl Commands {
    pub fn execute(self, config: &Config) -> eyre::Result<()> {
        match self {
            Commands::Run { stdin } => run::execute(config, stdin),
            Commands::Warm { list, label } => warm::execute(config, &list, &label),
            Commands::Check => check::execute(config),
        }
    }
}
