use crate::chart::{render, ChartSpec, ChartStyle};
use crate::dataset::{Dataset, Series};
use crate::error::ChartError;
use anyhow::{Context, Result};
use plotters::style::RGBColor;
use serde::Serialize;
use std::path::Path;

/// Hardware environments, in display order.
const HARDWARE: [&str; 3] = ["Leaseweb (SSD)", "Hetzner (HDD)", "Macbook (NVME)"];

/// Payload size per environment, in GiB.
const TEST_SIZE_GIB: [u64; 3] = [21, 14, 30];

const MKBRR_GREEN: RGBColor = RGBColor(46, 204, 113);
const MKTORRENT_RED: RGBColor = RGBColor(231, 76, 60);
const TORRENTTOOLS_BLUE: RGBColor = RGBColor(52, 152, 219);
const TORF_YELLOW: RGBColor = RGBColor(241, 196, 15);

/// Print resolution for the saved charts.
const OUTPUT_DPI: u32 = 300;

type ReportBuilder = fn(&Path) -> Result<(Dataset, ChartSpec), ChartError>;

fn builders() -> [ReportBuilder; 3] {
    [creation_time_chart, speed_chart, consistency_chart]
}

fn hardware() -> Vec<String> {
    HARDWARE.iter().map(|s| s.to_string()).collect()
}

fn base_spec(title: &str, x_label: &str, output_path: std::path::PathBuf) -> ChartSpec {
    ChartSpec {
        title: title.to_string(),
        x_label: x_label.to_string(),
        colors: Vec::new(),
        reference_line: None,
        annotations: None,
        output_path,
        dpi: OUTPUT_DPI,
        style: ChartStyle::default(),
    }
}

/// Absolute creation time per tool, annotated with the payload size tested
/// on each machine. torrenttools was not measured on the Macbook.
pub fn creation_time_chart(output_dir: &Path) -> Result<(Dataset, ChartSpec), ChartError> {
    let dataset = Dataset::new(
        hardware(),
        vec![
            Series::complete("mkbrr", vec![7.24, 41.02, 9.71]),
            Series::complete("mktorrent", vec![45.41, 68.17, 10.90]),
            Series::new("torrenttools", vec![Some(9.07), Some(47.97), None]),
            Series::complete("torf", vec![8.85, 58.19, 9.78]),
        ],
    )?;

    let mut spec = base_spec(
        "Torrent Creation Performance Comparison",
        "Time (seconds)",
        output_dir.join("benchmark_comparison.png"),
    );
    spec.colors = vec![MKBRR_GREEN, MKTORRENT_RED, TORRENTTOOLS_BLUE, TORF_YELLOW];
    spec.annotations = Some(
        TEST_SIZE_GIB
            .iter()
            .map(|size| format!("{} GiB", size))
            .collect(),
    );

    Ok((dataset, spec))
}

/// mkbrr's speed multiplier over each competitor, with a dashed parity line
/// at 1.0.
pub fn speed_chart(output_dir: &Path) -> Result<(Dataset, ChartSpec), ChartError> {
    let dataset = Dataset::new(
        hardware(),
        vec![
            Series::complete("vs mktorrent", vec![6.3, 1.7, 1.1]),
            Series::new("vs torrenttools", vec![Some(1.3), Some(1.2), None]),
            Series::complete("vs torf", vec![1.2, 1.4, 1.0]),
        ],
    )?;

    let mut spec = base_spec(
        "mkbrr Speed Comparison",
        "Speed Multiplier (\u{d7})",
        output_dir.join("speed_comparison.png"),
    );
    spec.colors = vec![MKTORRENT_RED, TORRENTTOOLS_BLUE, TORF_YELLOW];
    spec.reference_line = Some(1.0);

    Ok((dataset, spec))
}

/// Run-to-run variability (standard deviation as a percentage of the mean)
/// per tool.
pub fn consistency_chart(output_dir: &Path) -> Result<(Dataset, ChartSpec), ChartError> {
    let dataset = Dataset::new(
        hardware(),
        vec![
            Series::complete("mkbrr", vec![0.25, 2.39, 3.66]),
            Series::complete("mktorrent", vec![0.36, 39.10, 6.43]),
            Series::new("torrenttools", vec![Some(1.02), Some(22.00), None]),
            Series::complete("torf", vec![0.87, 9.95, 7.66]),
        ],
    )?;

    let mut spec = base_spec(
        "Performance Consistency Comparison",
        "Standard Deviation (%)",
        output_dir.join("consistency_comparison.png"),
    );
    spec.colors = vec![MKBRR_GREEN, MKTORRENT_RED, TORRENTTOOLS_BLUE, TORF_YELLOW];

    Ok((dataset, spec))
}

/// Render the full set of comparison charts into `output_dir`.
pub fn generate_charts(output_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(output_dir).context("Failed to create output directory")?;

    for build in builders() {
        let (dataset, spec) = build(output_dir)?;
        let path = spec.output_path.clone();
        render(&dataset, &spec)
            .with_context(|| format!("Failed to render {}", path.display()))?;
        println!("Generated: {}", path.display());
    }

    Ok(())
}

/// Print the underlying benchmark tables to the console.
pub fn print_tables() -> Result<()> {
    println!("\n{:=<80}", "");
    println!("Benchmark Data");
    println!("{:=<80}", "");

    for build in builders() {
        let (dataset, spec) = build(Path::new("."))?;

        println!("\n{} [{}]", spec.title, spec.x_label);
        println!("{:-<76}", "");

        print!("  {:<16}", "");
        for series in dataset.series() {
            print!("{:>15}", series.name);
        }
        println!();

        for (c_idx, category) in dataset.categories().iter().enumerate() {
            print!("  {:<16}", category);
            for series in dataset.series() {
                match series.values[c_idx] {
                    Some(value) => print!("{:>15.2}", value),
                    None => print!("{:>15}", "-"),
                }
            }
            println!();
        }
    }
    println!();

    Ok(())
}

#[derive(Serialize)]
struct ChartData {
    title: String,
    x_label: String,
    dataset: Dataset,
}

/// Write the chart datasets as pretty-printed JSON next to the images.
/// Absent measurements serialize as `null`, never as zero.
pub fn dump_data(output_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(output_dir).context("Failed to create output directory")?;

    let mut charts = Vec::new();
    for build in builders() {
        let (dataset, spec) = build(output_dir)?;
        charts.push(ChartData {
            title: spec.title,
            x_label: spec.x_label,
            dataset,
        });
    }

    let json = serde_json::to_string_pretty(&charts)?;
    let path = output_dir.join("benchmark_data.json");
    std::fs::write(&path, json)?;
    println!("Generated: {}", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_chart_has_one_color_per_series() {
        for build in builders() {
            let (dataset, spec) = build(Path::new(".")).unwrap();
            assert_eq!(spec.colors.len(), dataset.series_count());
        }
    }

    #[test]
    fn test_category_order_is_shared_across_charts() {
        let charts: Vec<(Dataset, ChartSpec)> = builders()
            .iter()
            .map(|build| build(Path::new(".")).unwrap())
            .collect();

        let reference = charts[0].0.categories().to_vec();
        assert_eq!(reference, vec!["Leaseweb (SSD)", "Hetzner (HDD)", "Macbook (NVME)"]);
        for (dataset, _) in &charts {
            assert_eq!(dataset.categories(), reference.as_slice());
        }
    }

    #[test]
    fn test_creation_time_chart_shape() {
        let (dataset, spec) = creation_time_chart(Path::new("out")).unwrap();

        assert_eq!(dataset.series_count(), 4);
        assert_eq!(dataset.bar_count(), 11);
        assert_eq!(
            spec.output_path,
            Path::new("out").join("benchmark_comparison.png")
        );
        assert_eq!(
            spec.annotations,
            Some(vec![
                "21 GiB".to_string(),
                "14 GiB".to_string(),
                "30 GiB".to_string()
            ])
        );
        assert!(spec.reference_line.is_none());

        // torrenttools has no Macbook measurement.
        let torrenttools = &dataset.series()[2];
        assert_eq!(torrenttools.name, "torrenttools");
        assert_eq!(torrenttools.values[2], None);
        assert_eq!(torrenttools.present_count(), 2);
    }

    #[test]
    fn test_speed_chart_has_parity_line() {
        let (dataset, spec) = speed_chart(Path::new("out")).unwrap();

        assert_eq!(dataset.series_count(), 3);
        assert_eq!(spec.reference_line, Some(1.0));
        assert!(spec.annotations.is_none());
        assert_eq!(spec.output_path, Path::new("out").join("speed_comparison.png"));
        assert_eq!(dataset.series()[1].values[2], None);
    }

    #[test]
    fn test_consistency_chart_shape() {
        let (dataset, spec) = consistency_chart(Path::new("out")).unwrap();

        assert_eq!(dataset.series_count(), 4);
        assert!(spec.reference_line.is_none());
        assert!(spec.annotations.is_none());
        assert_eq!(
            spec.output_path,
            Path::new("out").join("consistency_comparison.png")
        );
        assert_eq!(dataset.max_value(), 39.10);
    }

    #[test]
    fn test_generate_charts_writes_all_files() {
        let dir = tempfile::tempdir().unwrap();
        generate_charts(dir.path()).unwrap();

        for name in [
            "benchmark_comparison.png",
            "speed_comparison.png",
            "consistency_comparison.png",
        ] {
            let path = dir.path().join(name);
            assert!(path.exists(), "missing {}", name);
            assert!(std::fs::metadata(&path).unwrap().len() > 0);
        }
    }

    #[test]
    fn test_dump_data_serializes_missing_as_null() {
        let dir = tempfile::tempdir().unwrap();
        dump_data(dir.path()).unwrap();

        let json = std::fs::read_to_string(dir.path().join("benchmark_data.json")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        let charts = parsed.as_array().unwrap();
        assert_eq!(charts.len(), 3);

        let torrenttools = &charts[0]["dataset"]["series"][2];
        assert_eq!(torrenttools["name"], "torrenttools");
        assert!(torrenttools["values"][2].is_null());
        assert_eq!(torrenttools["values"][0], 9.07);
    }
}
