use std::path::PathBuf;

use clap::Args;
use gcb_core::dict::DictionaryStore;

#[derive(Args, Debug)]
pub struct DictInfoArgs {
    /// CL-Beacon dictionary file
    #[arg(long)]
    pub cl_dict: PathBuf,

    /// CM-Beacon dictionary file
    #[arg(long)]
    pub cm_dict: PathBuf,
}

pub fn run(args: DictInfoArgs) -> anyhow::Result<()> {
    let dict = DictionaryStore::load(&args.cl_dict, &args.cm_dict)?;

    eprintln!("--- dict-info ---");
    report_one("cl", &args.cl_dict, dict.cl());
    report_one("cm", &args.cm_dict, dict.cm());

    Ok(())
}

fn report_one(label: &str, path: &PathBuf, dict: &gcb_core::dict::BeaconDict) {
    let durations = dict.duration_keys_ms();
    eprintln!("[{label}] path            = {}", path.display());
    eprintln!("[{label}] duration buckets = {}", durations.len());
    for d in &durations {
        let offsets = dict.offset_count(*d);
        eprintln!("[{label}]   dTexp={d:>8.2}ms  offsets={offsets}");
    }
}
