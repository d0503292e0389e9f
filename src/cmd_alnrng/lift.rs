use alnrng::libs::{
    ArrayCollection, ListCollection, Position, RangeCollection, RangeExtender, SearchDirection,
};
use clap::*;
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    let cmd = Command::new("lift")
        .about("Translates positions between the two sequences")
        .after_help(
            r###"
Positions are 0-based. Each one is printed with its translation, tab
separated; `-` marks a position that cannot be translated.

--dir tells where to look when a position falls outside every range:
    none      no fallback
    forward   the next range along the first sequence
    backward  the previous range along the first sequence
    right     the nearest range at larger coordinates
    left      the nearest range at smaller coordinates

With --to first, forward and backward follow the first sequence, so for a
reversed range they point the other way on the second one.

Examples:
1. First to second:
   alnrng lift 0:100:10 20:150:10 --pos 5 25

2. Gap positions snap to the next range:
   alnrng lift 0:100:10 20:150:10 --pos 15 --dir forward

3. Second to first on a reversed alignment:
   alnrng lift 0:120:10:- 20:100:10:- --to first --pos 129 115 --dir backward

"###,
        )
        .arg(
            Arg::new("pos")
                .long("pos")
                .short('p')
                .required(true)
                .num_args(1..)
                .value_parser(value_parser!(Position))
                .help("Positions to translate"),
        )
        .arg(
            Arg::new("to")
                .long("to")
                .num_args(1)
                .default_value("second")
                .value_parser(["first", "second"])
                .help("Sequence to translate into"),
        )
        .arg(
            Arg::new("dir")
                .long("dir")
                .num_args(1)
                .default_value("none")
                .value_parser(["none", "forward", "backward", "left", "right"])
                .help("Fallback for positions outside every range"),
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

    let to_first = args.get_one::<String>("to").unwrap() == "first";
    let dir: SearchDirection = args.get_one::<String>("dir").unwrap().parse()?;
    let positions: Vec<Position> = args
        .get_many::<Position>("pos")
        .unwrap()
        .copied()
        .collect();

    //----------------------------
    // Operating
    //----------------------------
    let coll: C = super::build(args)?;

    let mut ext = RangeExtender::new();
    ext.init(&coll);

    for pos in positions {
        let lifted = if !to_first {
            coll.second_pos_by_first_pos(pos, dir)
        } else if dir == SearchDirection::None {
            ext.find_on_second(pos)
                .and_then(|r| r.first_pos_by_second_pos(pos))
        } else {
            coll.first_pos_by_second_pos(pos, dir)
        };

        match lifted {
            Some(p) => writeln!(writer, "{}\t{}", pos, p)?,
            None => writeln!(writer, "{}\t-", pos)?,
        }
    }

    Ok(())
}
