//! Decompose command: seasonal adjustment of plain numeric series.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, info_span};

use seasadj_filters::FilterCache;
use seasadj_x11::{X11Decomposer, X11Result};

use crate::cli::DecomposeArgs;
use crate::config::SeasadjConfig;
use crate::convert;

/// One output row; the field names form the CSV header.
#[derive(Debug, Serialize)]
struct Row {
    t: usize,
    original: f64,
    trend: f64,
    seasonal: f64,
    irregular: f64,
    seasonally_adjusted: f64,
    weight: f64,
    correction: f64,
}

/// Run the decomposition of every input series.
pub fn run(args: DecomposeArgs) -> Result<()> {
    let _cmd = info_span!("decompose").entered();

    // 1. Load TOML, fall back to defaults when no file is given
    let config = match args.config {
        Some(ref path) => {
            let toml_str = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file: {}", path.display()))?;
            toml::from_str::<SeasadjConfig>(&toml_str).context("failed to parse TOML config")?
        }
        None => SeasadjConfig::default(),
    };
    let x11 = convert::build_x11_config(&config, args.mode.as_deref(), args.period)?;
    info!(
        mode = ?x11.mode(),
        period = x11.period(),
        n_inputs = args.input.len(),
        "configuration loaded"
    );

    if args.input.is_empty() {
        bail!("no input series: use --input at least once");
    }
    fs::create_dir_all(&args.output_dir).with_context(|| {
        format!(
            "failed to create output directory: {}",
            args.output_dir.display()
        )
    })?;

    // 2. Decompose in parallel on one shared filter cache
    let cache = Arc::new(FilterCache::new());
    let decomposer = X11Decomposer::new(x11)?.with_cache(Arc::clone(&cache));
    let outputs: Vec<PathBuf> = args
        .input
        .par_iter()
        .map(|input| {
            let series = read_series(input)?;
            let result = decomposer
                .decompose(&series)
                .with_context(|| format!("decomposition failed for {}", input.display()))?;
            let output = output_path(&args.output_dir, input);
            write_csv(&output, &result)?;
            info!(input = %input.display(), output = %output.display(), "series decomposed");
            Ok(output)
        })
        .collect::<Result<_>>()?;

    info!(
        n = outputs.len(),
        cached_trend_filters = cache.trend_len(),
        "all series decomposed"
    );
    Ok(())
}

/// Reads comma- or whitespace-separated numbers; lines starting with `#`
/// are comments.
pub fn read_series(path: &Path) -> Result<Vec<f64>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read input series: {}", path.display()))?;
    parse_series(&text).with_context(|| format!("invalid input series: {}", path.display()))
}

fn parse_series(text: &str) -> Result<Vec<f64>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .from_reader(text.as_bytes());
    let mut values = Vec::new();
    for record in reader.records() {
        let record = record.context("malformed input record")?;
        let line = record.position().map_or(0, |p| p.line());
        for token in record.iter().flat_map(str::split_whitespace) {
            let value = token
                .parse::<f64>()
                .with_context(|| format!("line {line}: not a number: {token:?}"))?;
            values.push(value);
        }
    }
    if values.is_empty() {
        bail!("no observations");
    }
    Ok(values)
}

fn output_path(dir: &Path, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "series".to_string());
    dir.join(format!("{stem}.csv"))
}

/// Writes the final components, one row per observation.
pub fn write_csv(path: &Path, result: &X11Result) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create output file: {}", path.display()))?;
    write_rows(&mut writer, result)
        .with_context(|| format!("failed to write output file: {}", path.display()))
}

fn write_rows<W: Write>(writer: &mut csv::Writer<W>, result: &X11Result) -> Result<()> {
    for t in 0..result.len() {
        writer.serialize(Row {
            t,
            original: result.original()[t],
            trend: result.trend()[t],
            seasonal: result.seasonal()[t],
            irregular: result.irregular()[t],
            seasonally_adjusted: result.seasonally_adjusted()[t],
            weight: result.weights()[t],
            correction: result.corrections()[t],
        })?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use seasadj_x11::X11Config;

    const HEADER: &str =
        "t,original,trend,seasonal,irregular,seasonally_adjusted,weight,correction";

    #[test]
    fn parses_mixed_separators_and_comments() {
        let values = parse_series("# monthly sales\n1.5, 2\n3\t4\n\n5e1\n").unwrap();
        assert_eq!(values, vec![1.5, 2.0, 3.0, 4.0, 50.0]);
    }

    #[test]
    fn rejects_non_numbers() {
        let err = parse_series("1\n2\nabc\n").unwrap_err();
        assert!(format!("{err:#}").contains("line 3"));
        assert!(parse_series("# nothing\n").is_err());
    }

    #[test]
    fn output_uses_input_stem() {
        let path = output_path(Path::new("out"), Path::new("data/retail.txt"));
        assert_eq!(path, Path::new("out").join("retail.csv"));
    }

    #[test]
    fn csv_has_one_row_per_observation() {
        let series: Vec<f64> = (0..48)
            .map(|t| (100.0 + t as f64) * if t % 12 < 6 { 1.1 } else { 0.9 })
            .collect();
        let decomposer = X11Decomposer::new(X11Config::default()).unwrap();
        let result = decomposer.decompose(&series).unwrap();
        let mut writer = csv::Writer::from_writer(Vec::new());
        write_rows(&mut writer, &result).unwrap();
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 49);
        assert_eq!(lines[0], HEADER);
        let first: Vec<&str> = lines[1].split(',').collect();
        assert_eq!(first[0], "0");
        assert_eq!(first[1].parse::<f64>().unwrap(), series[0]);
        assert_eq!(lines[48].split(',').count(), 8);
    }

    #[test]
    fn undefined_trend_ends_are_written_as_nan() {
        let series: Vec<f64> = (0..36)
            .map(|t| (100.0 + t as f64) * if t % 12 < 6 { 1.1 } else { 0.9 })
            .collect();
        let config = X11Config::default().with_end_points(None, None);
        let result = X11Decomposer::new(config).unwrap().decompose(&series).unwrap();
        let mut writer = csv::Writer::from_writer(Vec::new());
        write_rows(&mut writer, &result).unwrap();
        let data = writer.into_inner().unwrap();

        let mut reader = csv::Reader::from_reader(data.as_slice());
        let trend: Vec<f64> = reader
            .records()
            .map(|r| r.unwrap()[2].parse::<f64>().unwrap())
            .collect();
        assert_eq!(trend.len(), 36);
        assert!(trend[0].is_nan());
        assert!(trend[18].is_finite());
    }

    #[test]
    fn run_writes_one_csv_per_input() {
        let dir = tempfile::tempdir().unwrap();
        let mut inputs = Vec::new();
        for name in ["north", "south"] {
            let path = dir.path().join(format!("{name}.txt"));
            let text: Vec<String> = (0..60)
                .map(|t| (50.0 + t as f64 + if t % 4 == 0 { 5.0 } else { -1.0 }).to_string())
                .collect();
            fs::write(&path, text.join("\n")).unwrap();
            inputs.push(path);
        }
        let out = dir.path().join("out");
        run(DecomposeArgs {
            config: None,
            input: inputs,
            output_dir: out.clone(),
            mode: Some("additive".to_string()),
            period: Some(4.0),
        })
        .unwrap();
        for name in ["north", "south"] {
            let csv = fs::read_to_string(out.join(format!("{name}.csv"))).unwrap();
            assert_eq!(csv.lines().count(), 61);
        }
    }
}
