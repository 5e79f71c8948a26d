//! Command implementations for the segscan CLI.

use std::fs::File;
use std::io::BufReader;
use std::time::Instant;

use log::{debug, info};

use crate::backend::{AnyBackend, Backend, Direction, ScanConfig};
use crate::cli::args::*;
use crate::cli::output::*;
use crate::error::{Result, SegScanError};
use crate::segmented::Scanner;
use crate::vector::Vector;

/// Execute a CLI command.
pub fn execute_command(args: SegScanArgs) -> Result<()> {
    let scanner = Scanner::new(AnyBackend::from_config(&load_config(&args)?)?);
    debug!("running on the {} backend", scanner.backend().name());

    match &args.command {
        Command::Flags(flags_args) => {
            let result = run_flags(flags_args, &scanner)?;
            output_result("Boundary flags", &result, &args)
        }
        Command::Scan(scan_args) => {
            let result = run_scan(scan_args, &scanner)?;
            output_result("Scan result", &result, &args)
        }
    }
}

/// Resolve the backend configuration from the config file and flag overrides.
pub fn load_config(args: &SegScanArgs) -> Result<ScanConfig> {
    let mut config = match &args.config {
        Some(path) => {
            info!("loading config from {}", path.display());
            ScanConfig::from_json_file(path)?
        }
        None => ScanConfig::default(),
    };

    if let Some(backend) = args.backend {
        config = config.with_backend(backend.into());
    }
    if let Some(threads) = args.threads {
        config = config.with_thread_pool_size(threads);
    }

    config.validate()?;
    Ok(config)
}

/// Compute head or tail flags.
pub fn run_flags<B: Backend>(args: &FlagsArgs, scanner: &Scanner<B>) -> Result<FlagsResult> {
    let segments = Vector::new(args.segments.clone());
    let (boundary, flags) = if args.tail {
        ("tail", scanner.tail_flags(&segments)?)
    } else {
        ("head", scanner.head_flags(&segments)?)
    };

    Ok(FlagsResult {
        boundary: boundary.to_string(),
        flags: flags.to_vec(),
    })
}

/// Run the scan described by `args`.
pub fn run_scan<B: Backend>(args: &ScanArgs, scanner: &Scanner<B>) -> Result<ScanResult> {
    let input = match &args.input {
        Some(path) => {
            info!("reading input from {}", path.display());
            serde_json::from_reader(BufReader::new(File::open(path)?))?
        }
        None => ScanInput {
            values: args.values.clone(),
            segments: args.segments.clone(),
        },
    };

    if args.sums && !matches!(args.kind, ScanKind::Exclusive | ScanKind::Prescan) {
        return Err(SegScanError::other(
            "--sums only applies to exclusive scans and prescans",
        ));
    }

    let direction = if args.right {
        Direction::Right
    } else {
        Direction::Left
    };
    let values = Vector::new(input.values);
    let segmented = input.segments.is_some();
    let start = Instant::now();

    let (output, sums) = match input.segments {
        Some(segments) => {
            check_segments(&segments, values.len())?;
            segmented_scan(args, direction, scanner, &values, &Vector::new(segments))?
        }
        None => flat_scan(args, direction, scanner, &values),
    };

    Ok(ScanResult {
        backend: scanner.backend().name().to_string(),
        op: args.op,
        kind: args.kind,
        direction,
        segmented,
        values: output.to_vec(),
        sums: sums.map(|s| s.to_vec()),
        duration_us: u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX),
    })
}

/// The scan layer trusts its segment vectors; the command line does not.
fn check_segments(segments: &[usize], len: usize) -> Result<()> {
    let total: usize = segments.iter().sum();
    if total != len {
        return Err(SegScanError::invalid_segment(format!(
            "segment lengths sum to {total}, but there are {len} values"
        )));
    }
    Ok(())
}

type ScanOutput = (Vector<i64>, Option<Vector<i64>>);

fn segmented_scan<B: Backend>(
    args: &ScanArgs,
    direction: Direction,
    scanner: &Scanner<B>,
    values: &Vector<i64>,
    segments: &Vector<usize>,
) -> Result<ScanOutput> {
    let op = args.op;
    let f = move |a: i64, b: i64| op.apply(a, b);
    let z = op.identity();

    let output = match (args.kind, direction, args.sums) {
        (ScanKind::Inclusive, Direction::Left, _) => {
            (scanner.scanl1_seg(f, values, segments)?, None)
        }
        (ScanKind::Inclusive, Direction::Right, _) => {
            (scanner.scanr1_seg(f, values, segments)?, None)
        }
        (ScanKind::Exclusive | ScanKind::Prescan, Direction::Left, true) => {
            let (scan, sums) = scanner.scanl_seg_with_sums(f, z, values, segments)?;
            (scan, Some(sums))
        }
        (ScanKind::Exclusive | ScanKind::Prescan, Direction::Right, true) => {
            let (scan, sums) = scanner.scanr_seg_with_sums(f, z, values, segments)?;
            (scan, Some(sums))
        }
        (ScanKind::Exclusive, Direction::Left, false) => {
            (scanner.scanl_seg(f, z, values, segments)?, None)
        }
        (ScanKind::Exclusive, Direction::Right, false) => {
            (scanner.scanr_seg(f, z, values, segments)?, None)
        }
        (ScanKind::Prescan, Direction::Left, false) => {
            (scanner.prescanl_seg(f, z, values, segments)?, None)
        }
        (ScanKind::Prescan, Direction::Right, false) => {
            (scanner.prescanr_seg(f, z, values, segments)?, None)
        }
        (ScanKind::Postscan, Direction::Left, _) => {
            (scanner.postscanl_seg(f, z, values, segments)?, None)
        }
        (ScanKind::Postscan, Direction::Right, _) => {
            (scanner.postscanr_seg(f, z, values, segments)?, None)
        }
    };
    Ok(output)
}

fn flat_scan<B: Backend>(
    args: &ScanArgs,
    direction: Direction,
    scanner: &Scanner<B>,
    values: &Vector<i64>,
) -> ScanOutput {
    let op = args.op;
    let f = move |a: i64, b: i64| op.apply(a, b);
    let z = op.identity();

    match (args.kind, direction) {
        (ScanKind::Inclusive, dir) => (scanner.backend().scan(dir, f, values), None),
        (ScanKind::Exclusive, dir) => {
            let (scan, total) = scanner.backend().scan_exclusive(dir, f, z, values);
            let sums = args.sums.then(|| Vector::new(vec![total]));
            (scan, sums)
        }
        (ScanKind::Prescan, Direction::Left) => (scanner.prescanl(f, z, values), None),
        (ScanKind::Prescan, Direction::Right) => (scanner.prescanr(f, z, values), None),
        (ScanKind::Postscan, Direction::Left) => (scanner.postscanl(f, z, values), None),
        (ScanKind::Postscan, Direction::Right) => (scanner.postscanr(f, z, values), None),
    }
}
