//! `narwhal`: the command-line driver for the crossing-minimization engine.
//! Hand-rolled argument parsing (no argument-parsing crate), matching the
//! teacher's `merman-cli::main` convention, adapted to this engine's
//! single-dash short-flag surface (§6).

use std::fmt;
use std::fs;
use std::process::ExitCode;
use std::time::Duration;

use narwhal::config::{Heuristic, MceStopRule, Preprocessor, SiftingObjective, SiftingOrder};
use narwhal::stats::ParetoPair;
use narwhal::weight::SentinelPolicy;
use narwhal::{Config, Error, Orchestrator};

#[derive(Debug)]
enum CliError {
    Usage(String),
    Io(std::io::Error),
    Narwhal(Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Narwhal(err) => write!(f, "{err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        CliError::Io(value)
    }
}

impl From<Error> for CliError {
    fn from(value: Error) -> Self {
        CliError::Narwhal(value)
    }
}

enum Input {
    DotOrd { dot_path: String, ord_path: String },
    Sgf { path: String },
}

struct Args {
    config: Config,
    input: Input,
    output_ord: Option<String>,
    output_dot: Option<String>,
}

fn usage() -> String {
    "narwhal - layered-graph crossing-minimization engine\n\
\n\
USAGE:\n\
  narwhal [OPTIONS] <graph.dot> <graph.ord>\n\
  narwhal [OPTIONS] <graph.sgf>\n\
\n\
OPTIONS:\n\
  -h NAME     heuristic: median|bary|mod_bary|static_bary|alt_bary|\n\
              up_down_bary|rotate_bary|slab_bary|mcn|mce|mce_s|mse|sifting\n\
              (default: bary)\n\
  -p NAME     preprocessor: bfs|dfs|mds (default: none)\n\
  -z          enable post-processing adjacent-swap pass\n\
  -i N        stop after N iterations\n\
  -r SECS     stop after SECS seconds\n\
  -R SEED     seed randomized tie-break with SEED\n\
  -P PAIR     pareto pair: bottleneck_total|stretch_total|bottleneck_stretch\n\
  -w POLICY   weight sentinel policy: none|left|avg (default: none)\n\
  -b          use balanced two-sided barycenter weight\n\
  -s ORDER    sifting node order: layer|degree|random (default: degree)\n\
  -e RULE     mce/mce_s/mse stop rule: nodes|edges|early|one_node\n\
  -g STYLE    sifting objective style: total|max (default: total)\n\
  -c ITER     capture a snapshot at iteration ITER\n\
  -o BASE     write snapshot .ord files with this base name\n\
  -k N        simulated processor count for bulk-synchronous heuristics\n\
  -m N        worker count (accepted for compatibility; single-threaded)\n\
  -t FREQ     trace frequency: >0 every FREQ iterations, 0 pass boundaries only, <0 silent\n\
  -v          print graph statistics before running\n\
  -f          track favored-edge crossings\n\
  --out-ord PATH   write the final layer order as .ord to PATH\n\
  --out-dot PATH   write the final graph as .dot to PATH\n\
  --help      show this message\n"
        .to_string()
}

fn parse_heuristic(s: &str) -> Option<Heuristic> {
    Some(match s {
        "median" => Heuristic::Median,
        "bary" => Heuristic::Barycenter,
        "mod_bary" => Heuristic::ModifiedBarycenter,
        "static_bary" => Heuristic::StaticBarycenter,
        "alt_bary" => Heuristic::AltBarycenter,
        "up_down_bary" => Heuristic::UpDownBarycenter,
        "rotate_bary" => Heuristic::RotateBarycenter,
        "slab_bary" => Heuristic::SlabBarycenter,
        "mcn" => Heuristic::Mcn,
        "mce" => Heuristic::Mce,
        "mce_s" => Heuristic::MceS,
        "mse" => Heuristic::Mse,
        "sifting" => Heuristic::Sifting,
        _ => return None,
    })
}

fn parse_preprocessor(s: &str) -> Option<Preprocessor> {
    Some(match s {
        "bfs" => Preprocessor::Bfs,
        "dfs" => Preprocessor::Dfs,
        "mds" => Preprocessor::Mds,
        _ => return None,
    })
}

fn parse_pareto_pair(s: &str) -> Option<ParetoPair> {
    Some(match s {
        "bottleneck_total" => ParetoPair::BottleneckTotal,
        "stretch_total" => ParetoPair::StretchTotal,
        "bottleneck_stretch" => ParetoPair::BottleneckStretch,
        _ => return None,
    })
}

fn parse_sentinel_policy(s: &str) -> Option<SentinelPolicy> {
    Some(match s {
        "none" => SentinelPolicy::None,
        "left" => SentinelPolicy::Left,
        "avg" => SentinelPolicy::Avg,
        _ => return None,
    })
}

fn parse_sifting_order(s: &str) -> Option<SiftingOrder> {
    Some(match s {
        "layer" => SiftingOrder::Layer,
        "degree" => SiftingOrder::Degree,
        "random" => SiftingOrder::Random,
        _ => return None,
    })
}

fn parse_mce_stop_rule(s: &str) -> Option<MceStopRule> {
    Some(match s {
        "nodes" => MceStopRule::Nodes,
        "edges" => MceStopRule::Edges,
        "early" => MceStopRule::Early,
        "one_node" => MceStopRule::OneNode,
        _ => return None,
    })
}

fn parse_sifting_objective(s: &str) -> Option<SiftingObjective> {
    Some(match s {
        "total" => SiftingObjective::Total,
        "max" => SiftingObjective::Max,
        _ => return None,
    })
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut config = Config::default();
    let mut positionals: Vec<String> = Vec::new();
    let mut output_ord = None;
    let mut output_dot = None;

    let mut it = argv.iter().skip(1).peekable();
    while let Some(a) = it.next() {
        macro_rules! next_value {
            () => {
                it.next().ok_or_else(|| CliError::Usage(usage()))?
            };
        }
        match a.as_str() {
            "--help" => return Err(CliError::Usage(usage())),
            "-h" => {
                let value = next_value!();
                config.heuristic = parse_heuristic(value).ok_or_else(|| CliError::Usage(usage()))?;
            }
            "-p" => {
                let value = next_value!();
                config.preprocessor =
                    Some(parse_preprocessor(value).ok_or_else(|| CliError::Usage(usage()))?);
            }
            "-z" => config.post_process = true,
            "-i" => {
                let value = next_value!();
                config.max_iterations =
                    Some(value.parse::<u64>().map_err(|_| CliError::Usage(usage()))?);
            }
            "-r" => {
                let value = next_value!();
                let secs = value.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
                config.max_runtime = Some(Duration::from_secs_f64(secs));
            }
            "-R" => {
                let value = next_value!();
                config.randomize_seed =
                    Some(value.parse::<u64>().map_err(|_| CliError::Usage(usage()))?);
            }
            "-P" => {
                let value = next_value!();
                config.pareto_pair =
                    parse_pareto_pair(value).ok_or_else(|| CliError::Usage(usage()))?;
            }
            "-w" => {
                let value = next_value!();
                config.sentinel_policy =
                    parse_sentinel_policy(value).ok_or_else(|| CliError::Usage(usage()))?;
            }
            "-b" => config.balanced = true,
            "-s" => {
                let value = next_value!();
                config.sifting_order =
                    parse_sifting_order(value).ok_or_else(|| CliError::Usage(usage()))?;
            }
            "-e" => {
                let value = next_value!();
                config.mce_stop_rule =
                    parse_mce_stop_rule(value).ok_or_else(|| CliError::Usage(usage()))?;
            }
            "-g" => {
                let value = next_value!();
                config.sifting_objective =
                    parse_sifting_objective(value).ok_or_else(|| CliError::Usage(usage()))?;
            }
            "-c" => {
                let value = next_value!();
                config.capture_iteration =
                    Some(value.parse::<u64>().map_err(|_| CliError::Usage(usage()))?);
            }
            "-o" => {
                let value = next_value!();
                config.snapshot_base = Some(value.clone());
            }
            "-k" => {
                let value = next_value!();
                config.processor_count =
                    value.parse::<usize>().map_err(|_| CliError::Usage(usage()))?;
            }
            "-m" => {
                let value = next_value!();
                config.worker_count =
                    value.parse::<usize>().map_err(|_| CliError::Usage(usage()))?;
            }
            "-t" => {
                let value = next_value!();
                config.trace_frequency =
                    value.parse::<i64>().map_err(|_| CliError::Usage(usage()))?;
            }
            "-v" => config.verbose = true,
            "-f" => config.favored_edges = true,
            "--out-ord" => output_ord = Some(next_value!().clone()),
            "--out-dot" => output_dot = Some(next_value!().clone()),
            "--" => {
                for rest in it.by_ref() {
                    positionals.push(rest.clone());
                }
            }
            other if other.starts_with('-') && other.len() > 1 => {
                return Err(CliError::Usage(usage()));
            }
            path => positionals.push(path.to_string()),
        }
    }

    let input = match positionals.as_slice() {
        [sgf] => Input::Sgf { path: sgf.clone() },
        [dot, ord] => Input::DotOrd {
            dot_path: dot.clone(),
            ord_path: ord.clone(),
        },
        _ => return Err(CliError::Usage(usage())),
    };

    Ok(Args {
        config,
        input,
        output_ord,
        output_dot,
    })
}

fn run(args: Args) -> Result<(), CliError> {
    let graph = match args.input {
        Input::Sgf { path } => {
            let contents = fs::read_to_string(&path)?;
            narwhal::io::read_sgf(&contents)?
        }
        Input::DotOrd { dot_path, ord_path } => {
            let dot = fs::read_to_string(&dot_path)?;
            let ord = fs::read_to_string(&ord_path)?;
            narwhal::io::read_graph(&dot, &ord)?
        }
    };

    let snapshot_base = args.config.snapshot_base.clone();
    let mut orchestrator = Orchestrator::new(graph, args.config);
    let report = orchestrator.run();

    tracing::info!(
        iterations = report.iterations,
        total_crossings = report.final_total_crossings,
        "run complete"
    );

    if let Some((filename, contents)) = orchestrator.take_captured_snapshot() {
        fs::write(&filename, contents)?;
    }
    if let Some(base) = snapshot_base {
        for (filename, contents) in orchestrator.emit_snapshots(&base) {
            fs::write(&filename, contents)?;
        }
    }
    if let Some(path) = args.output_ord {
        let contents = narwhal::io::write_graph_ord(&orchestrator.graph, "narwhal");
        fs::write(path, contents)?;
    }
    if let Some(path) = args.output_dot {
        let contents = narwhal::io::write_graph_dot(&orchestrator.graph, "narwhal");
        fs::write(path, contents)?;
    }

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let argv: Vec<String> = std::env::args().collect();
    let args = match parse_args(&argv) {
        Ok(args) => args,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            return ExitCode::from(64);
        }
        Err(err) => {
            eprintln!("narwhal: {err}");
            return ExitCode::from(1);
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            ExitCode::from(64)
        }
        Err(CliError::Io(err)) => {
            eprintln!("narwhal: {err}");
            ExitCode::from(66)
        }
        Err(CliError::Narwhal(err)) => {
            eprintln!("narwhal: {err}");
            ExitCode::from(65)
        }
    }
}
