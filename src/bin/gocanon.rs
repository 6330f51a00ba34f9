//! gocanon: canonical declaration order for Go sources.
//!
//! With no paths, reads stdin and writes stdout. Directories are walked for
//! `*.go` files in sorted order.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use gocanon::config::CONFIG_FILE;
use gocanon::{BaseFormatter, CanonConfig, Formatter};
use tracing::{debug, error};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "gocanon", version)]
#[command(about = "Sort Go struct fields, var/const groups and imports into canonical order")]
struct Args {
    /// Files or directories to format. Reads stdin when empty.
    paths: Vec<PathBuf>,

    /// Write the result back to the file instead of stdout
    #[arg(short, long)]
    write: bool,

    /// Only list files whose formatting differs
    #[arg(short, long)]
    list: bool,

    /// Command run before and after canonicalization (default: gofumpt, then gofmt)
    #[arg(long, value_name = "CMD", conflicts_with = "no_base_formatter")]
    base_formatter: Option<String>,

    /// Skip the external base formatter
    #[arg(long)]
    no_base_formatter: bool,

    /// Config file (default: ./gocanon.toml if present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Field sorted right after embedded fields
    #[arg(long, value_name = "NAME")]
    role_field: Option<String>,

    /// Field sorted after the role field
    #[arg(long, value_name = "NAME")]
    id_field: Option<String>,

    /// Field sorted last. May be repeated; replaces the configured set.
    #[arg(long, value_name = "NAME")]
    timestamp_field: Vec<String>,

    /// Continue with the next file after a failure
    #[arg(long)]
    keep_going: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "gocanon=debug,gocanon_syntax=debug"
    } else {
        "gocanon=info"
    };
    let filter =
        EnvFilter::try_from_env("GOCANON_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn load_config(args: &Args) -> Result<CanonConfig> {
    let mut config = match &args.config {
        Some(path) => {
            anyhow::ensure!(path.is_file(), "config file {} not found", path.display());
            CanonConfig::load(path)?
        }
        None => CanonConfig::load(Path::new(CONFIG_FILE))?,
    };
    if let Some(role) = &args.role_field {
        config.fields.role = role.clone();
    }
    if let Some(id) = &args.id_field {
        config.fields.identifier = id.clone();
    }
    if !args.timestamp_field.is_empty() {
        config.fields.timestamps = args.timestamp_field.clone();
    }
    if let Some(cmd) = &args.base_formatter {
        config.base_formatter = Some(cmd.clone());
    }
    config.validate()?;
    Ok(config)
}

fn build_formatter(args: &Args, config: CanonConfig) -> Result<Formatter> {
    let base = if args.no_base_formatter {
        None
    } else {
        match &config.base_formatter {
            Some(cmd) => Some(BaseFormatter::from_command(cmd)?),
            None => BaseFormatter::detect(),
        }
    };
    let formatter = Formatter::new(config);
    Ok(match base {
        Some(base) => formatter.with_base(base),
        None => formatter,
    })
}

fn go_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry.with_context(|| format!("walking {}", path.display()))?;
            if entry.file_type().is_file() && entry.path().extension().is_some_and(|e| e == "go")
            {
                files.push(entry.into_path());
            }
        }
    }
    Ok(files)
}

fn run_stdin(args: &Args, formatter: &Formatter) -> Result<()> {
    let mut src = String::new();
    std::io::stdin()
        .read_to_string(&mut src)
        .context("reading stdin")?;
    let out = formatter
        .format_source(&src)
        .context("formatting <stdin>")?;
    let mut stdout = std::io::stdout().lock();
    if args.list {
        if out != src {
            writeln!(stdout, "<stdin>")?;
        }
    } else {
        stdout.write_all(out.as_bytes())?;
    }
    Ok(())
}

fn run_file(args: &Args, formatter: &Formatter, path: &Path) -> Result<()> {
    let src =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let out = formatter
        .format_source(&src)
        .with_context(|| format!("formatting {}", path.display()))?;
    let changed = out != src;
    debug!(path = %path.display(), changed, "formatted");

    let mut stdout = std::io::stdout().lock();
    if args.list && changed {
        writeln!(stdout, "{}", path.display())?;
    }
    if args.write {
        if changed {
            std::fs::write(path, &out)
                .with_context(|| format!("writing {}", path.display()))?;
        }
    } else if !args.list {
        stdout.write_all(out.as_bytes())?;
    }
    Ok(())
}

fn run(args: &Args) -> Result<bool> {
    let config = load_config(args)?;
    let formatter = build_formatter(args, config)?;

    if args.paths.is_empty() {
        anyhow::ensure!(!args.write, "cannot use --write with standard input");
        run_stdin(args, &formatter)?;
        return Ok(true);
    }

    let mut ok = true;
    for path in go_files(&args.paths)? {
        if let Err(err) = run_file(args, &formatter, &path) {
            if !args.keep_going {
                return Err(err);
            }
            error!("{err:#}");
            ok = false;
        }
    }
    Ok(ok)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);
    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("gocanon: {err:#}");
            ExitCode::FAILURE
        }
    }
}
