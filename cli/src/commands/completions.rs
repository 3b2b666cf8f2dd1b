use clap::CommandFactory;
use clap_complete::Shell;

use crate::args::CliArgs;

pub fn completions_cmd(shell: Shell) {
    let mut command = CliArgs::command();
    let name = command.get_name().to_string();

    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
}
