use anyhow::{Context, Result};
use clap::{crate_version, App, AppSettings, Arg, ArgMatches, SubCommand};
use gazette::archive::{check_dates, group_by_year};
use gazette::config::Config;
use gazette::parser::{markdown_body, Parser};
use gazette::toc::table_of_contents;
use std::io::Write;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() {
    let matches = App::new("gazette")
        .version(crate_version!())
        .about("Year archives and tables of contents for a markdown blog")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .global(true)
                .help("Log debug output"),
        )
        .arg(
            Arg::with_name("quiet")
                .short("q")
                .long("quiet")
                .global(true)
                .conflicts_with("verbose")
                .help("Log warnings and errors only"),
        )
        .subcommand(
            SubCommand::with_name("archive")
                .about("Prints the posts of the project grouped by year")
                .arg(
                    Arg::with_name("DIR")
                        .index(1)
                        .default_value(".")
                        .help("A directory inside the project"),
                ),
        )
        .subcommand(
            SubCommand::with_name("toc")
                .about("Prints the table of contents of a markdown file")
                .arg(Arg::with_name("FILE").index(1).required(true)),
        )
        .get_matches();

    init_logging(&matches);

    if let Err(e) = run(&matches) {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}

fn init_logging(matches: &ArgMatches) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if matches.is_present("quiet") {
        EnvFilter::new("warn")
    } else if matches.is_present("verbose") {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        ("archive", Some(m)) => archive(Path::new(m.value_of("DIR").unwrap_or("."))),
        ("toc", Some(m)) => toc(Path::new(m.value_of("FILE").unwrap_or_default())),
        _ => Ok(()),
    }
}

fn archive(dir: &Path) -> Result<()> {
    let dir = dir
        .canonicalize()
        .with_context(|| format!("Resolving directory `{}`", dir.display()))?;
    let config = Config::from_directory(&dir)?;
    let content = Parser::new(&config.site_root).parse_content(&config.content_directory)?;
    check_dates(&content.posts, config.date_policy)?;
    print_yaml(&group_by_year(&content.posts))
}

fn toc(file: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("Reading `{}`", file.display()))?;
    print_yaml(&table_of_contents(markdown_body(&contents)))
}

fn print_yaml<T: serde::Serialize>(value: &T) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_yaml::to_writer(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}
