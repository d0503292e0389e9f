use alnrng::libs::{ArrayCollection, ListCollection, Position, RangeCollection};
use clap::*;
use intspan::IntSpan;
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    let cmd = Command::new("cover")
        .about("Positions covered on one sequence, as a runlist")
        .after_help(
            r###"
Ranges are 0-based, the runlist is 1-based and closed, as in intspan:
0:100:10 covers 1-10 on the first sequence and 101-110 on the second.

Examples:
1. Coverage on the first sequence:
   alnrng cover 0:100:10 20:150:10

2. Coverage on the second sequence:
   alnrng cover 0:100:10 20:150:10 --axis second

"###,
        )
        .arg(
            Arg::new("axis")
                .long("axis")
                .num_args(1)
                .default_value("first")
                .value_parser(["first", "second"])
                .help("Sequence to report"),
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
    let on_second = args.get_one::<String>("axis").unwrap() == "second";

    //----------------------------
    // Operating
    //----------------------------
    let coll: C = super::build(args)?;

    let mut ints = IntSpan::new();
    for r in coll.iter() {
        let span = if on_second {
            r.second_range()
        } else {
            r.first_range()
        };
        ints.merge(&IntSpan::from_pair(
            to_runlist_pos(span.start + 1)?,
            to_runlist_pos(span.end)?,
        ));
    }

    //----------------------------
    // Output
    //----------------------------
    writeln!(writer, "{}", ints.to_string())?;

    Ok(())
}

fn to_runlist_pos(pos: Position) -> anyhow::Result<i32> {
    i32::try_from(pos).map_err(|_| anyhow::anyhow!("Position {} is out of runlist range", pos))
}
