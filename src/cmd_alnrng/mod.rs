//! Subcommand modules for the `alnrng` binary.

pub mod cover;
pub mod lift;
pub mod normalize;

use alnrng::libs::{AlignRange, Flags, RangeCollection};
use clap::*;

/// Arguments every subcommand takes: the ranges, the backend, the policy
/// switches and the output file.
pub fn common_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("ranges")
            .required(true)
            .num_args(1..)
            .index(1)
            .help("Aligned ranges, FIRST:SECOND:LENGTH[:+|-]"),
    )
    .arg(
        Arg::new("backend")
            .long("backend")
            .num_args(1)
            .default_value("array")
            .value_parser(["array", "list"])
            .help("Collection implementation"),
    )
    .arg(
        Arg::new("allow_mixed_dir")
            .long("allow-mixed-dir")
            .action(ArgAction::SetTrue)
            .help("Accept direct and reversed ranges together"),
    )
    .arg(
        Arg::new("allow_overlap")
            .long("allow-overlap")
            .action(ArgAction::SetTrue)
            .help("Accept ranges overlapping on the first sequence"),
    )
    .arg(
        Arg::new("allow_abutting")
            .long("allow-abutting")
            .action(ArgAction::SetTrue)
            .help("Do not merge abutting ranges on insert; normalize still merges them"),
    )
    .arg(
        Arg::new("no_keep_normalized")
            .long("no-keep-normalized")
            .action(ArgAction::SetTrue)
            .help("Insert ranges as they are; conflicts only show up in the state"),
    )
    .arg(
        Arg::new("outfile")
            .long("outfile")
            .short('o')
            .num_args(1)
            .default_value("stdout")
            .help("Output filename. [stdout] for screen"),
    )
}

pub fn policy(args: &ArgMatches) -> Flags {
    let mut policy = Flags::empty();
    policy.set(Flags::KEEP_NORMALIZED, !args.get_flag("no_keep_normalized"));
    policy.set(Flags::ALLOW_MIXED_DIR, args.get_flag("allow_mixed_dir"));
    policy.set(Flags::ALLOW_OVERLAP, args.get_flag("allow_overlap"));
    policy.set(Flags::ALLOW_ABUTTING, args.get_flag("allow_abutting"));
    policy
}

pub fn ranges(args: &ArgMatches) -> anyhow::Result<Vec<AlignRange>> {
    let mut ranges = vec![];
    for token in args.get_many::<String>("ranges").unwrap() {
        ranges.push(token.parse::<AlignRange>()?);
    }
    Ok(ranges)
}

/// Builds a collection from the command line. Each range goes to its sorted
/// position; under the default policy a conflict is an error.
pub fn build<C>(args: &ArgMatches) -> anyhow::Result<C>
where
    C: RangeCollection + Default,
{
    let mut coll = C::default();
    coll.set_policy_flags(policy(args));

    for range in ranges(args)? {
        coll.insert(range)?;
    }
    log::debug!("built {} ranges, flags {}", coll.len(), coll.flags());

    Ok(coll)
}

pub fn use_list(args: &ArgMatches) -> bool {
    args.get_one::<String>("backend").unwrap() == "list"
}
