use clap::Parser;
use miette::Result as MietteResult;
use mo_relay_cli::commands::{RunArgs, run};

#[derive(Parser)]
#[command(name = "mo-relay")]
#[command(about = "Propagate changed gettext entries from a reference catalog to every language")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    args: RunArgs,
}

fn main() -> MietteResult<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))
    .ok();

    let cli = Cli::parse();

    mo_relay_cli::utils::ui::init_logging();

    run(cli.args).map_err(miette::Report::new)
}
