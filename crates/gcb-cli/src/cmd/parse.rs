use std::path::PathBuf;

use clap::Args;
use gcb_core::dict::DictionaryStore;
use gcb_core::preprocess::{preprocess, PreprocessConfig};

use crate::io::files;

#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Recognizer analyzer-result JSON (frame_num/frame0/frame1/...)
    #[arg(long)]
    pub r#in: PathBuf,

    /// Where to write the parse result JSON; stdout when omitted
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// CL-Beacon dictionary file
    #[arg(long)]
    pub cl_dict: PathBuf,

    /// CM-Beacon dictionary file
    #[arg(long)]
    pub cm_dict: PathBuf,

    /// Camera capture rate, used to bound the exposure-duration estimate
    #[arg(long, default_value_t = 30.0)]
    pub fps: f64,

    /// Exposure duration override, in seconds. When omitted it's estimated
    /// from the complementary-LED blink ratios.
    #[arg(long)]
    pub exp_duration_sec: Option<f64>,
}

pub fn run(args: ParseArgs) -> anyhow::Result<()> {
    let analyzer_result = files::read_json(&args.r#in)?;
    let dict = DictionaryStore::load(&args.cl_dict, &args.cm_dict)?;

    let config = PreprocessConfig {
        dict: &dict,
        fps: args.fps,
        exp_duration_sec: args.exp_duration_sec,
    };

    let output = preprocess(&analyzer_result, &config)?;

    eprintln!("--- parse ---");
    eprintln!("in              = {}", args.r#in.display());
    eprintln!("frames          = {}", output.frames.len());
    eprintln!("instances       = {}", output.stats.len());
    eprintln!("dTexp (sec)     = {:.6}", output.exp_duration_sec);

    let frames: Vec<serde_json::Value> = output
        .results
        .iter()
        .map(|frame| {
            let instances: serde_json::Map<String, serde_json::Value> = frame
                .iter()
                .map(|(id, result)| {
                    let value = match result {
                        Some(r) => serde_json::to_value(r).unwrap_or(serde_json::Value::Null),
                        None => serde_json::Value::Null,
                    };
                    (id.clone(), value)
                })
                .collect();
            serde_json::Value::Object(instances)
        })
        .collect();

    let report = serde_json::json!({
        "dTexp": output.exp_duration_sec,
        "frames": frames,
    });

    files::write_json(args.out.as_deref(), &report)
}
