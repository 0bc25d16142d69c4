//! `bitjson-cli`: the command-line driver. Wires the structural-description
//! provider (`descriptors`) and the code emitter (`codegen`) together:
//! engine selection, file I/O, `--noformat` passthrough, exit codes.

use std::io::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Engine {
    Custom,
    Fastjson,
}

/// Reads a set of `#[bitjson(...)]`-annotated Rust record declarations and
/// emits specialized JSON decoder source bound to `jsoncore` or `serde_json`.
#[derive(Debug, Parser)]
#[command(name = "bitjson-cli", version, about)]
struct Args {
    /// Selects the emission target.
    #[arg(long, value_enum, default_value_t = Engine::Custom)]
    engine: Engine,

    /// Symbolic module name for generated output.
    #[arg(long, default_value = "generated")]
    pkgname: String,

    /// Source file or directory to introspect for record declarations.
    #[arg(long, default_value = ".")]
    pkg: PathBuf,

    /// Destination for the emitted source; `-` means standard output.
    #[arg(long, default_value = "-")]
    write: String,

    /// Bypasses the `rustfmt` formatting pass.
    #[arg(long)]
    noformat: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            log::error!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), String> {
    log::info!("bitjson-cli: engine={:?} pkg={}", args.engine, args.pkg.display());

    let graph = descriptors::graph_for_path(&args.pkg, &args.pkgname)
        .map_err(|e| format!("reading `{}`: {e}", args.pkg.display()))?;

    if graph.is_empty() {
        log::warn!("no record declarations found under {}", args.pkg.display());
    }

    let opts = codegen::Options {
        pkgname: args.pkgname.clone(),
        noformat: args.noformat,
    };

    let source = match args.engine {
        Engine::Custom => codegen::generate(&graph, &codegen::CustomEngine, &opts),
        Engine::Fastjson => codegen::generate(&graph, &codegen::FastjsonEngine, &opts),
    }
    .map_err(|e| format!("generating decoders: {e}"))?;

    write_output(&args.write, &source).map_err(|e| format!("writing output: {e}"))
}

fn write_output(dest: &str, source: &str) -> std::io::Result<()> {
    if dest == "-" {
        std::io::stdout().write_all(source.as_bytes())
    } else {
        std::fs::write(dest, source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_args_parse() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults_match_spec() {
        let args = Args::parse_from(["bitjson-cli"]);
        assert_eq!(args.engine, Engine::Custom);
        assert_eq!(args.pkgname, "generated");
        assert_eq!(args.pkg, PathBuf::from("."));
        assert_eq!(args.write, "-");
        assert!(!args.noformat);
    }

    #[test]
    fn engine_flag_parses_fastjson() {
        let args = Args::parse_from(["bitjson-cli", "--engine", "fastjson"]);
        assert_eq!(args.engine, Engine::Fastjson);
    }
}
