use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Result};

pub const USAGE: &str = "\
usage:
  blockfall replay <script.json> [--compact]
  blockfall demo [--seed N] [--config FILE] [--pieces N] [--think-ms N]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    Replay(ReplayArgs),
    Demo(DemoArgs),
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayArgs {
    pub script: PathBuf,
    pub compact: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoArgs {
    pub seed: Option<u32>,
    pub config: Option<PathBuf>,
    /// Pieces to place before ending the game
    pub pieces: u32,
    pub think: Duration,
}

impl Default for DemoArgs {
    fn default() -> Self {
        Self {
            seed: None,
            config: None,
            pieces: 100,
            think: Duration::from_millis(60),
        }
    }
}

pub fn parse_args(args: &[String]) -> Result<CliCommand> {
    let Some(first) = args.first() else {
        return Ok(CliCommand::Help);
    };
    match first.as_str() {
        "replay" => parse_replay(&args[1..]).map(CliCommand::Replay),
        "demo" => parse_demo(&args[1..]).map(CliCommand::Demo),
        "-h" | "--help" | "help" => Ok(CliCommand::Help),
        other => Err(anyhow!("unknown command: {}", other)),
    }
}

fn parse_replay(args: &[String]) -> Result<ReplayArgs> {
    let mut script = None;
    let mut compact = false;
    for arg in args {
        match arg.as_str() {
            "--compact" => compact = true,
            flag if flag.starts_with("--") => {
                return Err(anyhow!("replay: unknown argument: {}", flag));
            }
            path => {
                if script.replace(PathBuf::from(path)).is_some() {
                    return Err(anyhow!("replay: more than one script given"));
                }
            }
        }
    }
    let script = script.ok_or_else(|| anyhow!("replay: missing script path"))?;
    Ok(ReplayArgs { script, compact })
}

fn parse_demo(args: &[String]) -> Result<DemoArgs> {
    let mut out = DemoArgs::default();
    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                i += 1;
                let v = value(args, i, "--seed")?;
                out.seed = Some(
                    v.parse()
                        .map_err(|_| anyhow!("demo: invalid --seed value: {}", v))?,
                );
            }
            "--config" => {
                i += 1;
                out.config = Some(PathBuf::from(value(args, i, "--config")?));
            }
            "--pieces" => {
                i += 1;
                let v = value(args, i, "--pieces")?;
                out.pieces = v
                    .parse()
                    .map_err(|_| anyhow!("demo: invalid --pieces value: {}", v))?;
            }
            "--think-ms" => {
                i += 1;
                let v = value(args, i, "--think-ms")?;
                let ms: u64 = v
                    .parse()
                    .map_err(|_| anyhow!("demo: invalid --think-ms value: {}", v))?;
                out.think = Duration::from_millis(ms.max(1));
            }
            other => {
                return Err(anyhow!("demo: unknown argument: {}", other));
            }
        }
        i += 1;
    }
    Ok(out)
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str> {
    args.get(i)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("demo: missing value for {}", flag))
}
