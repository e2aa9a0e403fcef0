use clap::Parser;
use mlhelpers::{
    suppress, suppress_multi_class_with, MultiClassConfig, OwnedArray, Prediction, Rect,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "mlhelpers CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq)]
#[serde(rename_all = "snake_case")]
enum NmsMode {
    /// Class-agnostic suppression.
    Single,
    /// Per-class suppression followed by a global cap.
    #[default]
    MultiClass,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct NmsConfigJson {
    mode: NmsMode,
    num_classes: usize,
    score_threshold: f32,
    iou_threshold: f32,
    max_per_class: usize,
    max_total: usize,
    parallel: bool,
}

impl Default for NmsConfigJson {
    fn default() -> Self {
        let cfg = MultiClassConfig::default();
        Self {
            mode: NmsMode::default(),
            num_classes: cfg.num_classes,
            score_threshold: cfg.score_threshold,
            iou_threshold: cfg.iou_threshold,
            max_per_class: cfg.max_per_class,
            max_total: cfg.max_total,
            parallel: cfg.parallel,
        }
    }
}

impl From<&NmsConfigJson> for MultiClassConfig {
    fn from(value: &NmsConfigJson) -> Self {
        Self {
            num_classes: value.num_classes,
            score_threshold: value.score_threshold,
            iou_threshold: value.iou_threshold,
            max_per_class: value.max_per_class,
            max_total: value.max_total,
            parallel: value.parallel,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TensorConfigJson {
    /// Raw little-endian f32 values in row-major order.
    path: String,
    shape: Vec<usize>,
    #[serde(default)]
    transpose: Option<Vec<usize>>,
    #[serde(default)]
    reshape: Option<Vec<usize>>,
    #[serde(default)]
    channel: Option<usize>,
    #[serde(default)]
    offset: f32,
    #[serde(default = "default_scale")]
    scale: f32,
    image_path: String,
}

fn default_scale() -> f32 {
    255.0
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct Config {
    predictions_path: Option<String>,
    output_path: Option<String>,
    nms: NmsConfigJson,
    tensor: Option<TensorConfigJson>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
struct RectRecord {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
struct PredictionRecord {
    class_index: usize,
    score: f32,
    rect: RectRecord,
}

impl From<PredictionRecord> for Prediction {
    fn from(value: PredictionRecord) -> Self {
        let r = value.rect;
        Prediction::new(
            value.class_index,
            value.score,
            Rect::new(r.x, r.y, r.width, r.height),
        )
    }
}

#[derive(Debug, Serialize)]
struct Output {
    selected: Vec<usize>,
    predictions: Vec<PredictionRecord>,
}

fn run_nms(
    records: &[PredictionRecord],
    cfg: &NmsConfigJson,
) -> Result<Vec<usize>, Box<dyn std::error::Error>> {
    let multi = MultiClassConfig::from(cfg);
    multi.validate()?;

    let predictions: Vec<Prediction> = records.iter().copied().map(Prediction::from).collect();
    let selected = match cfg.mode {
        NmsMode::MultiClass => suppress_multi_class_with(&predictions, &multi),
        NmsMode::Single => {
            let candidates: Vec<usize> = predictions
                .iter()
                .enumerate()
                .filter(|(_, p)| p.score > cfg.score_threshold)
                .map(|(idx, _)| idx)
                .collect();
            suppress(&predictions, &candidates, cfg.iou_threshold, cfg.max_total)
        }
    };
    info!(
        input = predictions.len(),
        selected = selected.len(),
        "non-maximum suppression done"
    );
    Ok(selected)
}

fn run_tensor(cfg: &TensorConfigJson) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = fs::read(&cfg.path)?;
    if bytes.len() % 4 != 0 {
        return Err(format!("{}: length {} is not a multiple of 4", cfg.path, bytes.len()).into());
    }
    let values: Vec<f32> = bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();

    let mut tensor = OwnedArray::from_vec(values, &cfg.shape)?;
    let mut view = tensor.view();
    if let Some(order) = &cfg.transpose {
        view = view.transposed(order)?;
    }
    if let Some(shape) = &cfg.reshape {
        if !view.is_contiguous() {
            info!("reshaping a non-contiguous view follows storage order");
        }
        view = view.reshaped(shape)?;
    }

    let pixels = match cfg.channel {
        Some(channel) => view.channel_to_gray_bytes(channel, cfg.offset, cfg.scale)?,
        None => view.to_pixels(cfg.offset, cfg.scale)?,
    };
    pixels.save(&cfg.image_path)?;
    info!(
        width = pixels.width(),
        height = pixels.height(),
        path = %cfg.image_path,
        "tensor image written"
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("mlhelpers=info".parse()?),
            )
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.predictions_path.is_none() && config.tensor.is_none() {
        return Err("config must set predictions_path, tensor, or both".into());
    }

    if let Some(tensor) = &config.tensor {
        run_tensor(tensor)?;
    }

    if let Some(path) = &config.predictions_path {
        let records: Vec<PredictionRecord> = serde_json::from_str(&fs::read_to_string(path)?)?;
        let selected = run_nms(&records, &config.nms)?;
        let output = Output {
            predictions: selected.iter().map(|&idx| records[idx]).collect(),
            selected,
        };
        let json = serde_json::to_string_pretty(&output)?;

        match &config.output_path {
            Some(path) => fs::write(path, json)?,
            None => println!("{json}"),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{NmsConfigJson, NmsMode};

    #[test]
    fn nms_section_rejects_unknown_keys() {
        let err = serde_json::from_str::<NmsConfigJson>(r#"{"mode": "single", "iou": 0.4}"#);
        assert!(err.is_err());
    }

    #[test]
    fn nms_section_fills_defaults() {
        let cfg: NmsConfigJson = serde_json::from_str(r#"{"mode": "single"}"#).unwrap();
        assert_eq!(cfg.mode, NmsMode::Single);
        assert_eq!(cfg.max_total, 100);
    }
}
