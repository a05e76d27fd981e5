//! Command-line interface for jsonxsd

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
use jsonxsd::formats::DateOrder;
#[cfg(feature = "cli")]
use jsonxsd::render::{render_files, RenderConfig};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input JSON file
    input: PathBuf,

    /// Output basename; writes <basename>.xsd and <basename>.xml
    #[arg(short, long)]
    out: PathBuf,

    /// Name of the top-level element
    #[arg(short, long, default_value = "Root")]
    name: String,

    /// Date order accepted by the format recognizer
    #[arg(long, default_value = "dmy", value_parser = parse_date_order)]
    date_order: DateOrder,
}

#[cfg(feature = "cli")]
fn parse_date_order(s: &str) -> Result<DateOrder, String> {
    match s {
        "dmy" => Ok(DateOrder::DayFirst),
        "mdy" => Ok(DateOrder::MonthFirst),
        other => Err(format!("unknown date order '{}', expected dmy or mdy", other)),
    }
}

#[cfg(feature = "cli")]
fn main() {
    let args = Args::parse();

    let config = RenderConfig::new()
        .with_top_level(&args.name)
        .with_date_order(args.date_order);

    match render_files(&args.input, &args.out, &config) {
        Ok((xsd_path, xml_path)) => {
            println!("wrote {}", xsd_path.display());
            println!("wrote {}", xml_path.display());
        }
        Err(err) => {
            eprintln!("error: {}", err);
            std::process::exit(1);
        }
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}
