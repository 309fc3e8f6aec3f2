use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = pagegen::cli::Cli::parse();
    if !cli.quiet {
        pagegen::init(cli.verbose);
    }

    let stdout = std::io::stdout();
    pagegen::cli::run(cli, &mut stdout.lock())
}
