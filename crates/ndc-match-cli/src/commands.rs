//! Report generation.

use std::fs::File;
use std::io::{self, BufWriter, Write};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use ndc_match_core::matcher::{HistoryColumns, MatcherConfig, TargetColumns};
use ndc_match_core::{DateRange, DrugMatcher, Enricher, MatchResult, ReportLayout, RxNavClient, RxNavConfig};

use crate::cli::{Cli, OutputFormatArg};
use crate::input::{read_facilities, read_table};

/// Counts reported after a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub targets: usize,
    pub facilities: usize,
    pub matched: usize,
}

/// Build the report described by `cli` and write it out.
pub fn run(cli: &Cli) -> Result<RunSummary> {
    let range = date_range(cli)?;
    let targets = read_table(&cli.injectable_file, Some(&cli.injectable_sheet))
        .context("failed to load injectable file")?;
    let facilities = read_facilities(&cli.po_files)?;

    let rxnav = if cli.enable_rxnav {
        let config = RxNavConfig {
            timeout_secs: cli.rxnav_timeout,
            cache_path: cli.rxnav_cache.clone(),
            ..RxNavConfig::default()
        };
        Some(RxNavClient::new(&config).context("failed to set up RxNav client")?)
    } else {
        None
    };
    let enricher = rxnav.as_ref().map(|client| client as &dyn Enricher);

    let config = MatcherConfig {
        history: HistoryColumns {
            description: cli.po_description_column.clone(),
            ndc: cli.po_ndc_column.clone(),
            po_date: Some(cli.po_date_column.clone()),
        },
        ..MatcherConfig::default()
    }
    .with_fuzzy_threshold(cli.fuzzy_threshold)?;
    let matcher = DrugMatcher::new(&facilities, &config, enricher)?;

    let comments = targets
        .has_column(&cli.comments_column)
        .then(|| cli.comments_column.clone());
    if comments.is_none() {
        tracing::debug!(column = %cli.comments_column, "comments column not present");
    }
    let columns = TargetColumns {
        description: cli.injectable_description_column.clone(),
        ndc: cli.injectable_ndc_column.clone(),
        comments: comments.clone(),
    };
    let results = matcher.build_report(&targets, &columns, &range);
    let layout = ReportLayout::new(matcher.index(), comments);

    let output: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };
    match cli.output_format {
        OutputFormatArg::Csv => write_csv(output, &layout, &results)?,
        OutputFormatArg::Json => write_json(output, &layout, &results)?,
    }
    if let Some(path) = &cli.output {
        tracing::info!(path = %path.display(), "wrote report");
    }

    Ok(RunSummary {
        targets: results.len(),
        facilities: layout.facilities.len(),
        matched: results.iter().filter(|r| r.has_any_match()).count(),
    })
}

/// Explicit start/end dates take precedence over `--month`.
fn date_range(cli: &Cli) -> Result<DateRange> {
    let start = cli.start_date.as_deref().map(parse_iso_date).transpose()?;
    let end = cli.end_date.as_deref().map(parse_iso_date).transpose()?;

    let range = if start.is_some() || end.is_some() {
        DateRange::new(start, end)
    } else if let Some(month) = &cli.month {
        DateRange::parse_month(month).with_context(|| format!("invalid month '{month}', expected YYYY-MM"))?
    } else {
        DateRange::unbounded()
    };

    if let (Some(start), Some(end)) = (range.start, range.end) {
        if start > end {
            bail!("start date {start} is after end date {end}");
        }
    }
    Ok(range)
}

fn parse_iso_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date '{text}', expected YYYY-MM-DD"))
}

fn write_csv(output: impl Write, layout: &ReportLayout, results: &[MatchResult]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(layout.headers()).context("failed to write report header")?;
    for row in layout.rows(results) {
        writer.write_record(&row).context("failed to write report row")?;
    }
    writer.flush().context("failed to flush report")?;
    Ok(())
}

fn write_json(mut output: impl Write, layout: &ReportLayout, results: &[MatchResult]) -> Result<()> {
    let json = layout.to_json(results).context("failed to serialize report")?;
    writeln!(output, "{json}").context("failed to write report")?;
    output.flush().context("failed to flush report")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use clap::Parser;

    use super::*;
    use crate::input::FacilitySource;

    const ITEMS: &str = "\
Drug Name / Strength / Dosage Form,NDC,Comments
Ketorolac 30mg/mL vial,0409-3795-01,stat
Ondansetron 4mg/2mL inj,,
Vancomycin 1g vial,,
";

    const MERCY: &str = "\
Drug Name / Strength / Dosage Form,NDC,PO Processing Date
Ketorolac Tromethamine 30mg/mL vial,00409379501,2024-03-04
Ondansetron 4mg/2mL injection,,03/28/2024
Ondansetron 4mg/2mL injection,00409475503,2024-02-10
";

    const LUKE: &str = "\
Drug Name / Strength / Dosage Form,NDC,PO Processing Date
Ondansetron 4mg/2mL inj,0409-4755-03,
";

    fn write(dir: &Path, name: &str, contents: &str) -> String {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path.display().to_string()
    }

    fn cli(dir: &Path, extra: &[&str]) -> Cli {
        let items = write(dir, "items.csv", ITEMS);
        let mercy = format!("Mercy={}", write(dir, "mercy.csv", MERCY));
        let luke = format!("St. Luke={}", write(dir, "luke.csv", LUKE));
        let output = dir.join("report.out").display().to_string();
        let mut args = vec![
            "ndc-report".to_string(),
            "--injectable-file".into(),
            items,
            "--po-file".into(),
            luke,
            "--po-file".into(),
            mercy,
            "--output".into(),
            output,
        ];
        args.extend(extra.iter().map(|a| a.to_string()));
        Cli::try_parse_from(args).unwrap()
    }

    fn read_report(dir: &Path) -> Vec<csv::StringRecord> {
        let mut reader = csv::Reader::from_path(dir.join("report.out")).unwrap();
        let mut records = vec![reader.headers().unwrap().clone()];
        records.extend(reader.records().map(Result::unwrap));
        records
    }

    #[test]
    fn test_csv_report_for_month() {
        let dir = tempfile::tempdir().unwrap();
        let summary = run(&cli(dir.path(), &["--month", "2024-03"])).unwrap();
        assert_eq!(
            summary,
            RunSummary {
                targets: 3,
                facilities: 2,
                matched: 2
            }
        );

        let report = read_report(dir.path());
        assert_eq!(
            report[0].iter().collect::<Vec<_>>(),
            vec!["Drug", "NDC", "Drug Name", "Strength", "Dosage Form", "Comments", "Mercy", "St. Luke"]
        );
        assert_eq!(&report[1][1], "00409379501");
        assert_eq!(&report[1][5], "stat");
        assert_eq!(&report[1][6], "NDC match: 00409379501");
        assert_eq!(&report[1][7], "");
        // The February purchase with an NDC falls outside March
        assert_eq!(&report[2][6], "Name match: Ondansetron 4mg/2mL injection (100%)");
        assert_eq!(&report[2][7], "Name match: 00409475503 (100%)");
        assert_eq!(&report[3][6], "");
    }

    #[test]
    fn test_json_report_unfiltered() {
        let dir = tempfile::tempdir().unwrap();
        run(&cli(dir.path(), &["--output-format", "json"])).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("report.out")).unwrap()).unwrap();
        assert_eq!(json.as_array().map(Vec::len), Some(3));
        assert_eq!(json[1]["Drug Name"], "Ondansetron");
        assert_eq!(json[1]["Strength"], "4MG / 2ML");
        assert_eq!(json[1]["Mercy"], "Name match: Ondansetron 4mg/2mL injection (100%); 00409475503 (100%)");
    }

    #[test]
    fn test_explicit_dates_override_month() {
        let dir = tempfile::tempdir().unwrap();
        let cli = cli(dir.path(), &["--month", "2024-03", "--start-date", "2024-02-01"]);
        let range = date_range(&cli).unwrap();
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2024, 2, 1));
        assert_eq!(range.end, None);
    }

    #[test]
    fn test_invalid_dates_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(date_range(&cli(dir.path(), &["--month", "March"])).is_err());
        assert!(date_range(&cli(dir.path(), &["--start-date", "03/01/2024"])).is_err());
        let reversed = cli(dir.path(), &["--start-date", "2024-03-02", "--end-date", "2024-03-01"]);
        assert!(date_range(&reversed).is_err());
    }

    #[test]
    fn test_missing_comments_column_is_omitted() {
        let dir = tempfile::tempdir().unwrap();
        run(&cli(dir.path(), &["--comments-column", "Notes"])).unwrap();
        let report = read_report(dir.path());
        assert_eq!(report[0].len(), 7);
        assert_eq!(&report[0][5], "Mercy");
    }

    #[test]
    fn test_missing_po_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut cli = cli(dir.path(), &[]);
        cli.po_files.push(FacilitySource {
            name: "Ghost".into(),
            path: dir.path().join("ghost.csv"),
            sheet: None,
        });
        let error = run(&cli).unwrap_err();
        assert!(format!("{error:#}").contains("Ghost"));
    }
}
