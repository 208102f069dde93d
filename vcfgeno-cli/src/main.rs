mod filter;

use anyhow::Result;
use clap::Command;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "vcfgeno";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Filter a VCF genotype matrix and convert it into a continuously-encoded (0/1/2) genotype table.")
        .subcommand_required(true)
        .subcommand(filter::cli::create_filter_cli())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let app = build_parser();
    let matches = app.get_matches();

    match matches.subcommand() {
        //
        // FILTER CASCADE
        //
        Some((filter::cli::FILTER_CMD, matches)) => {
            filter::handlers::run_filter(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
