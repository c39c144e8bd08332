use std::{
    env,
    path::{Path, PathBuf},
    process::{Command, ExitCode},
};

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "xtask", about = "Wordembed dev tasks")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Run clippy --fix then cargo +nightly fmt
    Fmt {
        /// Extra arguments passed to `cargo fmt`
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Test wordembed under each hasher / tracing feature set
    FeatureMatrix,
}

/// `--features` sets exercised by `feature-matrix`; `None` is the default set.
const FEATURE_SETS: &[Option<&str>] = &[
    None,
    Some("foldhash"),
    Some("tracing"),
    Some("foldhash,tracing"),
];

fn repo_root() -> PathBuf {
    let manifest = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
    Path::new(&manifest)
        .parent()
        .expect("xtask should be one level below repo root")
        .to_path_buf()
}

fn run(cmd: &mut Command) -> Result<(), String> {
    let status = cmd
        .status()
        .map_err(|e| format!("failed to run {:?}: {e}", cmd.get_program()))?;
    if !status.success() {
        return Err(format!("{:?} exited with {status}", cmd.get_program()));
    }
    Ok(())
}

fn cmd_fmt(args: &[String]) -> Result<(), String> {
    run(Command::new("cargo").args(["clippy", "--fix", "--allow-dirty", "--allow-staged"]))?;
    let mut cmd = Command::new("cargo");
    cmd.args(["+nightly", "fmt"]);
    cmd.args(args);
    run(&mut cmd)
}

fn cmd_feature_matrix(root: &Path) -> Result<(), String> {
    for features in FEATURE_SETS {
        let mut cmd = Command::new("cargo");
        cmd.current_dir(root).args(["test", "-p", "wordembed"]);
        match features {
            Some(features) => {
                println!("Testing wordembed with features: {features}");
                cmd.args(["--no-default-features", "--features", features]);
            }
            None => println!("Testing wordembed with default features"),
        }
        run(&mut cmd)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let root = repo_root();
    let result = match &cli.cmd {
        Cmd::Fmt { args } => cmd_fmt(args),
        Cmd::FeatureMatrix => cmd_feature_matrix(&root),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("error: {msg}");
            ExitCode::FAILURE
        }
    }
}
