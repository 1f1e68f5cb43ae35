//! Command-line front end for lddsym

use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::ArgAction;
use clap::Parser;

use lddsym::ParseOptions;

#[derive(Parser, Debug)]
#[command(
    name = "lddsym",
    version,
    about = "Report which shared library satisfies each undefined dynamic symbol of an ELF file"
)]
struct Args {
    /// Path to the ELF file to analyse
    #[arg(long, value_name = "FILE")]
    path: PathBuf,

    /// Directory to consider the root for SONAME resolution
    #[arg(long, value_name = "DIR", default_value = "/")]
    root: PathBuf,

    /// Additional search directories, colon-separated
    #[arg(long, value_name = "DIRS", default_value = "")]
    ldpath: String,

    /// Track function symbols
    #[arg(long, value_name = "BOOL", default_value_t = true, action = ArgAction::Set)]
    funcs: bool,

    /// Track object symbols
    #[arg(long, value_name = "BOOL", default_value_t = true, action = ArgAction::Set)]
    objects: bool,

    /// Track symbols that are neither functions nor objects
    #[arg(long, value_name = "BOOL", default_value_t = false, action = ArgAction::Set)]
    other: bool,

    /// Include weak symbols
    #[arg(long, value_name = "BOOL", default_value_t = false, action = ArgAction::Set)]
    weak: bool,

    /// Do not exit out early once all symbols are resolved
    #[arg(long, value_name = "BOOL", default_value_t = true, action = ArgAction::Set)]
    full: bool,

    /// Search the standard paths and ld.so.conf
    #[arg(long, value_name = "BOOL", default_value_t = true, action = ArgAction::Set)]
    std: bool,

    /// Search the Android platform paths
    #[arg(
        long,
        value_name = "BOOL",
        default_value_t = cfg!(target_os = "android"),
        action = ArgAction::Set
    )]
    android: bool,

    /// Output JSON instead of text
    #[arg(long, value_name = "BOOL", default_value_t = false, action = ArgAction::Set)]
    json: bool,

    /// Write a CPU profile (flamegraph SVG) to this file
    #[arg(long, value_name = "FILE")]
    profile: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let profiler = match &args.profile {
        Some(_) => Some(pprof::ProfilerGuard::new(100).context("starting profiler")?),
        None => None,
    };

    let options = ParseOptions {
        elf_path: args.path.clone(),
        root: args.root.clone(),
        ld_library_path: args.ldpath.clone(),
        get_func: args.funcs,
        get_object: args.objects,
        get_other: args.other,
        get_weak: args.weak,
        full: args.full,
        std: args.std,
        android: args.android,
    };

    let results = lddsym::analyze(&options)?;

    if args.json {
        println!("{}", serde_json::to_string(&results)?);
    } else {
        print!("{}", results);
    }

    if let (Some(profile_path), Some(profiler)) = (&args.profile, profiler) {
        let report = profiler.report().build().context("building profile report")?;
        let file = File::create(profile_path)
            .with_context(|| format!("creating {}", profile_path.display()))?;
        report.flamegraph(file).context("writing flamegraph")?;
    }

    Ok(())
}
