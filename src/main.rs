mod debug_report;

use mrsgraph::{
    ApposDecomposer, ClosurePolicy, Decomposer, Mrs, Options, SubclauseDecomposer, VarName, closure_verbose,
    decompose_verbose, read_json, to_json,
};
use std::io::{self, IsTerminal, Read};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_ENV: &str = "MRSGRAPH_LOG";

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(io::stderr))
        .init();

    if let Err(err) = run(&config) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(config: &CliConfig) -> Result<(), String> {
    let text = match &config.input {
        Some(path) => std::fs::read_to_string(path).map_err(|err| format!("cannot read {path}: {err}"))?,
        None => read_stdin_input()?,
    };
    if text.trim().is_empty() {
        return Err("no input provided".to_string());
    }

    let options = Options { strict: !config.lenient, ..Options::default() };
    let mrs = read_json(&text, &options).map_err(|err| err.to_string())?;

    match config.seed {
        Some(seed) => {
            let details = closure_verbose(&mrs, seed, config.policy).map_err(|err| err.to_string())?;
            if config.json {
                println!("{}", to_json(&details.result).map_err(|err| err.to_string())?);
            } else {
                debug_report::print_closure(&mrs, &details, config.color);
            }
        }
        None => {
            let details = decompose_verbose(&mrs, &config.strategy.decomposers());
            if config.json {
                println!("{}", outputs_json(&details.outputs)?);
            } else {
                debug_report::print_run(&mrs, &details, config.color);
            }
        }
    }
    Ok(())
}

fn outputs_json(outputs: &[Mrs]) -> Result<String, String> {
    let docs: Vec<_> = outputs.iter().map(Mrs::to_document).collect();
    serde_json::to_string_pretty(&docs).map_err(|err| err.to_string())
}

#[derive(Debug, Clone, Copy)]
enum StrategyChoice {
    Appos,
    Subclause,
    All,
}

impl StrategyChoice {
    fn parse(value: &str) -> Result<Self, String> {
        match value {
            "appos" => Ok(StrategyChoice::Appos),
            "subclause" => Ok(StrategyChoice::Subclause),
            "all" => Ok(StrategyChoice::All),
            _ => Err(format!("error: invalid --strategy '{value}' (expected appos, subclause or all)")),
        }
    }

    fn decomposers(self) -> Vec<Box<dyn Decomposer>> {
        match self {
            StrategyChoice::Appos => vec![Box::new(ApposDecomposer)],
            StrategyChoice::Subclause => vec![Box::new(SubclauseDecomposer)],
            StrategyChoice::All => mrsgraph::default_strategies(),
        }
    }
}

struct CliConfig {
    input: Option<String>,
    strategy: StrategyChoice,
    seed: Option<VarName>,
    policy: ClosurePolicy,
    json: bool,
    lenient: bool,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut input: Option<String> = None;
    let mut strategy = StrategyChoice::All;
    let mut seed: Option<VarName> = None;
    let mut policy = ClosurePolicy::default();
    let mut json = false;
    let mut lenient = false;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("mrsgraph {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--json" => json = true,
            "--lenient" => lenient = true,
            "--relax-eq" => policy.relax_eq = true,
            "--no-keep-eq" => policy.keep_eq = false,
            "--strategy" => {
                let value = args.next().ok_or_else(|| "error: --strategy expects a value".to_string())?;
                strategy = StrategyChoice::parse(&value)?;
            }
            "--seed" => {
                let value = args.next().ok_or_else(|| "error: --seed expects a value".to_string())?;
                seed = Some(parse_seed(&value)?);
            }
            "--input" | "-i" => {
                let value = args.next().ok_or_else(|| "error: --input expects a value".to_string())?;
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(value);
            }
            _ if arg.starts_with("--strategy=") => {
                strategy = StrategyChoice::parse(arg.trim_start_matches("--strategy="))?;
            }
            _ if arg.starts_with("--seed=") => {
                seed = Some(parse_seed(arg.trim_start_matches("--seed="))?);
            }
            _ if arg.starts_with("--input=") => {
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(arg.trim_start_matches("--input=").to_string());
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(arg);
            }
        }
    }

    Ok(CliConfig { input, strategy, seed, policy, json, lenient, color })
}

fn parse_seed(value: &str) -> Result<VarName, String> {
    value.parse().map_err(|_| format!("error: invalid --seed '{value}' (expected a variable such as h7 or x5)"))
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("failed to read stdin: {err}"))?;
    Ok(buffer)
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "mrsgraph {version}

Decompose MRS documents into simpler sub-meanings.

Usage:
  mrsgraph [OPTIONS] [FILE]
  mrsgraph [OPTIONS] --input <file>

Options:
  -i, --input <file>         JSON MRS document. Reads stdin when omitted.
  --strategy <name>          appos, subclause or all. Default: all
  --seed <var>               Print the closure of one handle or variable
                             instead of running strategies.
  --relax-eq                 Split /EQ scopes on the first closure pass.
  --no-keep-eq               Drop verb/preposition governors linked by /EQ.
  --json                     Print resulting documents as JSON.
  --lenient                  Load documents with unresolved variables.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Environment:
  {log_env}=<filter>     Log filter for stderr, e.g. debug. Default: warn

Exit codes:
  0  Success.
  1  Unreadable or invalid document.
  2  Invalid arguments.
",
        version = env!("CARGO_PKG_VERSION"),
        log_env = LOG_ENV,
    )
}
