extern crate clap;
#[macro_use] extern crate log;
extern crate fern;
extern crate chrono;
extern crate regex;
extern crate term_grid;
extern crate thiserror;

pub mod assembler;

use clap::{Arg, ArgMatches, App};
use term_grid::{Grid, GridOptions, Direction, Filling, Cell};

use std::fs::File;
use std::path::Path;

use assembler::ast::Instruction;
use assembler::emitter;

fn main() {
    let args = process_arguments();
    initialize_logging(args.occurrences_of("verbose"));

    // Both arguments carry clap defaults.
    let ifile = args.value_of("INPUT").unwrap();
    let ofile = args.value_of("output").unwrap();

    debug!("Arguments:\n\tVerbosity: {}\n\tBinary Output: {}\n\tOutfile: {}\n\tInfile: {}",
        level_for(args.occurrences_of("verbose")),
        args.is_present("binary"),
        ofile,
        ifile
    );

    let ipath = Path::new(ifile);

    // Open the path in read-only mode, returns `io::Result<File>`
    let source = match File::open(&ipath) {
        Err(err) => {
            error!("fatal: unable to open input file `{}`: {}", ipath.display(), err);
            std::process::exit(1);
        },
        Ok(file) => file,
    };

    let image = match assembler::assemble(Box::new(source)) {
        Err(err) => {
            error!("fatal: {} {}", err.class(), err);
            std::process::exit(1);
        },
        Ok(image) => image,
    };

    if args.is_present("print-debug") {
        print_listing(&image);
    }

    let opath = Path::new(ofile);
    let text = if args.is_present("binary") {
        emitter::emit_binary(&image)
    } else {
        emitter::emit(&image)
    };

    if let Err(err) = emitter::save(opath, &text) {
        error!("fatal: unable to write to output file `{}`: {}", opath.display(), err);
        std::process::exit(1);
    }

    info!("Wrote {} word(s) to `{}`.", image.len(), opath.display());
    println!("Compile successful.");
}

fn print_listing(image: &[Instruction]) {
    let mut grid = Grid::new(GridOptions {
        filling:     Filling::Spaces(1),
        direction:   Direction::LeftToRight,
    });

    for (idx, ins) in image.iter().enumerate() {
        grid.add(Cell::from(format!("0x{:04X}:", idx)));
        grid.add(Cell::from(format!("{}", ins)));
        grid.add(Cell::from("=>".to_string()));
        grid.add(Cell::from(emitter::hex_word(ins.assemble())));
        grid.add(Cell::from(ins.to_binary()));
    }

    println!("{}", grid.fit_into_columns(5));
}

fn process_arguments() -> ArgMatches<'static> {
    App::new(option_env!("CARGO_PKG_NAME").unwrap_or("lasm"))
        .version(option_env!("CARGO_PKG_VERSION").unwrap_or("unknown"))
        .author(option_env!("CARGO_PKG_AUTHORS").unwrap_or(""))
        .about(option_env!("CARGO_PKG_DESCRIPTION").unwrap_or(""))
        .arg(Arg::with_name("INPUT")
            .help("Sets the source file to assemble")
            .default_value("code.txt")
            .multiple(false)
            .index(1))
        .arg(Arg::with_name("verbose")
            .short("v")
            .multiple(true)
            .takes_value(false)
            .help("Sets the level of verbosity"))
        .arg(Arg::with_name("output")
            .short("o")
            .takes_value(true)
            .default_value("hex_code")
            .help("write the image to an outfile"))
        .arg(Arg::with_name("binary")
            .short("b")
            .takes_value(false)
            .help("write one 24-bit binary word per line instead of raw hex"))
        .arg(Arg::with_name("print-debug")
            .short("d")
            .alias("show")
            .alias("s")
            .takes_value(false)
            .help("prints the assembled listing to STDOUT"))
        .get_matches()
}

fn level_for(verbosity: u64) -> log::LevelFilter {
    match verbosity {
        0 => log::LevelFilter::Error,
        1 => log::LevelFilter::Warn,
        2 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    }
}

fn initialize_logging(verbosity: u64) {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(level_for(verbosity))
        .chain(std::io::stdout())
        .apply().ok();
}
