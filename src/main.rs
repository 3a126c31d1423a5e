use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use picfield_rs::{AxisName, Backend, FieldError, FieldMetadata, MaxResolution, ModeSelection, ReadOptions};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Reads a field from an Osiris, HiPACE or openPMD file and prints its normalized shape
/// and metadata
#[derive(Parser, Debug)]
#[command(name = "picfield", version)]
struct Cli {
    /// Simulation code that wrote the file: osiris, hipace or openpmd
    #[arg(value_parser = parse_arg::<Backend>)]
    backend: Backend,

    /// Path to the hdf5 file
    file: PathBuf,

    /// Field inside the file, e.g. `e1` (Osiris) or `E/z` (openPMD)
    field: String,

    /// First axis to slice across
    #[arg(long, value_parser = parse_arg::<AxisName>)]
    slice_dir_i: Option<AxisName>,

    /// Relative position of the first slice, in [0, 1]
    #[arg(long, default_value_t = picfield_rs::consts::DEFAULT_SLICE_POSITION)]
    slice_i: f64,

    /// Second axis to slice across
    #[arg(long, value_parser = parse_arg::<AxisName>)]
    slice_dir_j: Option<AxisName>,

    /// Relative position of the second slice, in [0, 1]
    #[arg(long, default_value_t = picfield_rs::consts::DEFAULT_SLICE_POSITION)]
    slice_j: f64,

    /// Azimuthal mode of thetaMode data, `all` to sum every mode
    #[arg(long, default_value = "all", value_parser = parse_arg::<ModeSelection>)]
    mode: ModeSelection,

    /// Angle of the thetaMode cut
    #[arg(long, default_value_t = picfield_rs::consts::DEFAULT_THETA, conflicts_with = "full_3d")]
    theta: f64,

    /// Rebuild thetaMode data as a full 3D volume instead of a cut
    #[arg(long)]
    full_3d: bool,

    /// Maximum longitudinal and transverse cells of a 3D reconstruction
    #[arg(long, num_args = 2, value_names = ["LONGITUDINAL", "TRANSVERSE"])]
    max_res_3d: Option<Vec<usize>>,

    /// Only read the metadata
    #[arg(long)]
    metadata_only: bool,

    /// Save the normalized field and its axes to this hdf5 file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn parse_arg<T: FromStr<Err = FieldError>>(s: &str) -> Result<T, String> {
    s.parse().map_err(|e: FieldError| e.to_string())
}

impl Cli {
    fn read_options(&self) -> picfield_rs::Result<ReadOptions> {
        let max_resolution_3d = match self.max_res_3d.as_deref() {
            Some(&[longitudinal, transverse]) => Some(MaxResolution::new(longitudinal, transverse)?),
            _ => None,
        };
        Ok(ReadOptions {
            slice_i: self.slice_i,
            slice_j: self.slice_j,
            slice_dir_i: self.slice_dir_i,
            slice_dir_j: self.slice_dir_j,
            mode: self.mode,
            theta: if self.full_3d { None } else { Some(self.theta) },
            max_resolution_3d,
            only_metadata: self.metadata_only,
        })
    }
}

fn print_metadata(md: &FieldMetadata) {
    println!("Geometry: {}", md.field.geometry);
    println!("Units: {}", md.field.units);
    println!("Time: {} {}", md.time.value, md.time.units);
    for axis in &md.axes {
        let first = axis.array.first().copied().unwrap_or(f64::NAN);
        let last = axis.array.last().copied().unwrap_or(f64::NAN);
        println!(
            "Axis {}: [{first}, {last}] {} ({} points)",
            axis.name,
            axis.units,
            axis.array.len()
        );
    }
}

fn run(cli: &Cli) -> picfield_rs::Result<()> {
    let options = cli.read_options()?;
    info!(backend = %cli.backend, file = %cli.file.display(), field = %cli.field, "reading field");
    let (field, md) = picfield_rs::read_field(cli.backend, &cli.file, &cli.field, &options)?;
    print_metadata(&md);
    if !options.only_metadata {
        println!("Field shape: {:?}", field.shape());
    }
    if let Some(output) = &cli.output {
        picfield_rs::save_hdf5(&field, &md, output)?;
        info!(output = %output.display(), "saved normalized field");
    }
    Ok(())
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "picfield_rs=info,picfield=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        error!("{e}");
        std::process::exit(1);
    }
}
