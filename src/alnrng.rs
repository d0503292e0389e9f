extern crate clap;
use clap::*;

mod cmd_alnrng;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let app = Command::new("alnrng")
        .version(crate_version!())
        .author(crate_authors!())
        .about("`alnrng` - Aligned ranges between two sequences")
        .propagate_version(true)
        .arg_required_else_help(true)
        .color(ColorChoice::Auto)
        .subcommand(cmd_alnrng::normalize::make_subcommand())
        .subcommand(cmd_alnrng::lift::make_subcommand())
        .subcommand(cmd_alnrng::cover::make_subcommand())
        .after_help(
            r###"Subcommands:

    * normalize - Sort, merge abutting ranges and report the state
    * lift      - Translate positions between the two sequences
    * cover     - Positions covered on one sequence, as a runlist

Ranges are given as FIRST:SECOND:LENGTH[:+|-], 0-based starts.

Set RUST_LOG=debug to see what the collections do.

"###,
        );

    // Check which subcomamnd the user ran...
    match app.get_matches().subcommand() {
        Some(("normalize", sub_matches)) => cmd_alnrng::normalize::execute(sub_matches),
        Some(("lift", sub_matches)) => cmd_alnrng::lift::execute(sub_matches),
        Some(("cover", sub_matches)) => cmd_alnrng::cover::execute(sub_matches),
        _ => unreachable!(),
    }?;

    Ok(())
}
