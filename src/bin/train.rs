use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use fadeline::persist::{table_sha256, verify_table, write_table};
use fadeline::solver::{enumerate_canonical, merge_tables, EdgelessSolver, ExplicitSolver};
use fadeline::{Params, Record, Side, Symmetry};

#[derive(Debug, Parser)]
#[command(name = "train", about = "Retrograde solver for the fading-line board game")]
struct Args {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Solve a small board with materialized forward edges; writes the full
    /// table including undetermined states.
    TrainExplicit {
        /// Output table path
        output: Option<PathBuf>,
        #[arg(long, default_value_t = 3)]
        n: u8,
        #[arg(long, default_value_t = 3)]
        m: u8,
        /// Digit base of the positional encoding (defaults to cells + 1)
        #[arg(long)]
        base: Option<u64>,
        /// Write a JSON solve summary to this path
        #[arg(long)]
        summary: Option<PathBuf>,
    },
    /// Edgeless X-win pass: labels only states decided for X.
    TrainXwin {
        output: Option<PathBuf>,
        #[arg(long, default_value_t = 4)]
        n: u8,
        #[arg(long, default_value_t = 4)]
        m: u8,
        #[arg(long)]
        base: Option<u64>,
        #[arg(long)]
        summary: Option<PathBuf>,
    },
    /// Edgeless Y-win pass: the mirror of train-xwin.
    TrainYwin {
        output: Option<PathBuf>,
        #[arg(long, default_value_t = 4)]
        n: u8,
        #[arg(long, default_value_t = 4)]
        m: u8,
        #[arg(long)]
        base: Option<u64>,
        #[arg(long)]
        summary: Option<PathBuf>,
    },
    /// Stream-merge the two single-sided tables into the full table.
    Merge {
        xwin: PathBuf,
        ywin: PathBuf,
        output: PathBuf,
    },
    /// Enumerate canonical states and report counts without solving.
    Count {
        #[arg(long, default_value_t = 3)]
        n: u8,
        #[arg(long, default_value_t = 3)]
        m: u8,
        #[arg(long)]
        base: Option<u64>,
    },
    /// Validate the structure of a table file.
    Verify { table: PathBuf },
}

#[derive(Debug, Serialize)]
struct SolveSummary {
    n: u8,
    m: u8,
    base: u64,
    mode: String,
    records: u64,
    terminal_x_wins: u64,
    terminal_y_wins: u64,
    initial_dp: [i8; 2],
    initial_depth: [u16; 2],
    table_sha256: String,
}

fn make_params(n: u8, m: u8, base: Option<u64>) -> Result<Params, String> {
    match base {
        Some(b) => Params::new(n, m, b),
        None => Params::with_default_base(n, m),
    }
}

fn default_output(prefix: &str, params: &Params) -> PathBuf {
    PathBuf::from(format!(
        "{prefix}_{n}x{n}_m{m}.data",
        n = params.n(),
        m = params.m()
    ))
}

fn write_summary(path: &PathBuf, summary: &SolveSummary) -> Result<(), String> {
    let json = serde_json::to_string_pretty(summary)
        .map_err(|e| format!("summary serialize error: {e}"))?;
    std::fs::write(path, json).map_err(|e| format!("summary write error: {e}"))?;
    println!("[train] summary written to {}", path.display());
    Ok(())
}

fn initial_verdict(dp: [i8; 2]) -> &'static str {
    match dp[0] {
        1 => "X wins with perfect play",
        -1 => "Y wins with perfect play",
        _ => "draw or undecided from the empty board",
    }
}

fn run_explicit(
    output: Option<PathBuf>,
    n: u8,
    m: u8,
    base: Option<u64>,
    summary: Option<PathBuf>,
) -> Result<(), String> {
    let params = make_params(n, m, base)?;
    let out = output.unwrap_or_else(|| default_output("table", &params));
    let sym = Symmetry::new(params.n());

    println!(
        "[train] explicit mode: n={} m={} base={}",
        params.n(),
        params.m(),
        params.base()
    );
    let mut solver = ExplicitSolver::build(&params, &sym, true);
    let stats = solver.solve();
    println!(
        "[train] solved: {} states, {} win updates, {} lose updates",
        stats.states, stats.win_updates, stats.lose_updates
    );

    let initial = solver.info(0).unwrap_or_default();
    println!(
        "[train] initial state (code=0): dp=[{},{}] depth=[{},{}] -> {}",
        initial.dp[0],
        initial.dp[1],
        initial.depth[0],
        initial.depth[1],
        initial_verdict(initial.dp)
    );

    let records = solver.records();
    let count = write_table(&out, &records)?;
    println!("[train] wrote {count} records to {}", out.display());

    if let Some(path) = summary {
        write_summary(
            &path,
            &SolveSummary {
                n: params.n(),
                m: params.m(),
                base: params.base(),
                mode: "explicit".into(),
                records: count,
                terminal_x_wins: stats.terminal_x_wins,
                terminal_y_wins: stats.terminal_y_wins,
                initial_dp: initial.dp,
                initial_depth: initial.depth,
                table_sha256: table_sha256(&out)?,
            },
        )?;
    }
    Ok(())
}

fn run_edgeless(
    winner: Side,
    output: Option<PathBuf>,
    n: u8,
    m: u8,
    base: Option<u64>,
    summary: Option<PathBuf>,
) -> Result<(), String> {
    let params = make_params(n, m, base)?;
    let prefix = match winner {
        Side::X => "xwin",
        Side::Y => "ywin",
    };
    let out = output.unwrap_or_else(|| default_output(prefix, &params));
    let sym = Symmetry::new(params.n());

    println!(
        "[train] edgeless {prefix} pass: n={} m={} base={}",
        params.n(),
        params.m(),
        params.base()
    );
    let solver = EdgelessSolver::run(&params, &sym, winner, true);
    let stats = solver.stats();
    println!(
        "[train] pass done: {} states, {} seeds, {} Type A, {} Type B",
        stats.states, stats.seeds, stats.type_a, stats.type_b
    );

    let initial = solver
        .lookup(0)
        .and_then(|i| solver.record_at(i))
        .unwrap_or(Record {
            code: 0,
            dp0: 0,
            dp1: 0,
            depth0: 0,
            depth1: 0,
        });
    println!(
        "[train] initial state (code=0): dp=[{},{}] depth=[{},{}] -> {}",
        initial.dp0,
        initial.dp1,
        initial.depth0,
        initial.depth1,
        initial_verdict([initial.dp0, initial.dp1])
    );

    let count = solver.write_table(&out)?;
    println!("[train] wrote {count} records to {}", out.display());

    if let Some(path) = summary {
        let (tx, ty) = match winner {
            Side::X => (stats.seeds, stats.foreign_terminals),
            Side::Y => (stats.foreign_terminals, stats.seeds),
        };
        write_summary(
            &path,
            &SolveSummary {
                n: params.n(),
                m: params.m(),
                base: params.base(),
                mode: prefix.into(),
                records: count,
                terminal_x_wins: tx,
                terminal_y_wins: ty,
                initial_dp: [initial.dp0, initial.dp1],
                initial_depth: [initial.depth0, initial.depth1],
                table_sha256: table_sha256(&out)?,
            },
        )?;
    }
    Ok(())
}

fn run_merge(xwin: &PathBuf, ywin: &PathBuf, output: &PathBuf) -> Result<(), String> {
    println!(
        "[merge] {} + {} -> {}",
        xwin.display(),
        ywin.display(),
        output.display()
    );
    let stats = merge_tables(xwin, ywin, output)?;
    println!(
        "[merge] done: {} records ({} xwin only, {} ywin only, {} in both)",
        stats.written, stats.x_only, stats.y_only, stats.both
    );
    Ok(())
}

fn run_count(n: u8, m: u8, base: Option<u64>) -> Result<(), String> {
    let params = make_params(n, m, base)?;
    let sym = Symmetry::new(params.n());
    println!(
        "[count] n={} m={} base={}",
        params.n(),
        params.m(),
        params.base()
    );
    let enumeration = enumerate_canonical(&params, &sym, true);
    println!(
        "[count] scanned {} pairs: {} canonical states, {} X-win terminals, {} Y-win terminals",
        enumeration.scanned,
        enumeration.codes.len(),
        enumeration.x_terminal.len(),
        enumeration.y_terminal.len()
    );
    Ok(())
}

fn run_verify(table: &PathBuf) -> Result<(), String> {
    let check = verify_table(table)?;
    println!(
        "[verify] {}: {} records, {} bytes, codes {:?}..{:?} -> structure ok",
        table.display(),
        check.record_count,
        check.file_bytes,
        check.min_code,
        check.max_code
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let result = match args.cmd {
        Cmd::TrainExplicit {
            output,
            n,
            m,
            base,
            summary,
        } => run_explicit(output, n, m, base, summary),
        Cmd::TrainXwin {
            output,
            n,
            m,
            base,
            summary,
        } => run_edgeless(Side::X, output, n, m, base, summary),
        Cmd::TrainYwin {
            output,
            n,
            m,
            base,
            summary,
        } => run_edgeless(Side::Y, output, n, m, base, summary),
        Cmd::Merge { xwin, ywin, output } => run_merge(&xwin, &ywin, &output),
        Cmd::Count { n, m, base } => run_count(n, m, base),
        Cmd::Verify { table } => run_verify(&table),
    };
    result.map_err(Into::into)
}
