use alnrng::libs::{ArrayCollection, ListCollection, RangeCollection};
use clap::*;
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    let cmd = Command::new("normalize")
        .about("Sorts ranges, merges abutting ones and reports the state")
        .after_help(
            r###"
Output is one range per line, tab separated:

    first_from  second_from  length  strand

followed by a `#state` line with the state flags of the collection.

Examples:
1. Two abutting ranges become one:
   alnrng normalize 0:100:10 10:110:10

2. Overlapping ranges are kept as they are:
   alnrng normalize 0:100:10 5:200:10 --allow-overlap

3. Reversed ranges, with the list backend:
   alnrng normalize 10:100:10:- 0:110:10:- --backend list

"###,
        );
    super::common_args(cmd)
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    if super::use_list(args) {
        run::<ListCollection>(args)
    } else {
        run::<ArrayCollection>(args)
    }
}

fn run<C>(args: &ArgMatches) -> anyhow::Result<()>
where
    C: RangeCollection + Default,
{
    //----------------------------
    // Args
    //----------------------------
    let mut writer = intspan::writer(args.get_one::<String>("outfile").unwrap());

    //----------------------------
    // Operating
    //----------------------------
    let mut coll: C = super::build(args)?;
    let state = coll.normalize()?;

    //----------------------------
    // Output
    //----------------------------
    for r in coll.iter() {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}",
            r.first_from(),
            r.second_from(),
            r.length(),
            if r.is_direct() { '+' } else { '-' }
        )?;
    }
    writeln!(writer, "#state\t{}", state)?;

    Ok(())
}
