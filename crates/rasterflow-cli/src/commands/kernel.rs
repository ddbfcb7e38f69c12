//! Blur kernel preview command.

use clap::{Args, ValueEnum};
use rasterflow_core::operators::Blur;
use rasterflow_core::{BlurMode, Kernel, MAX_RADIUS, MIN_RADIUS};
use serde::Serialize;

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Uniform,
    Directional,
}

impl From<Mode> for BlurMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Uniform => BlurMode::Uniform,
            Mode::Directional => BlurMode::Directional,
        }
    }
}

#[derive(Args)]
pub struct KernelArgs {
    /// Blur radius in pixels
    #[arg(short, long, default_value_t = MIN_RADIUS,
          value_parser = clap::value_parser!(u32).range(i64::from(MIN_RADIUS)..=i64::from(MAX_RADIUS)))]
    radius: u32,

    /// Kernel shape
    #[arg(short, long, value_enum, default_value = "uniform")]
    mode: Mode,

    /// Line angle in degrees (directional mode)
    #[arg(short, long, default_value_t = 0.0, allow_negative_numbers = true)]
    angle: f32,

    /// Print as JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct KernelReport {
    radius: u32,
    mode: String,
    angle: f32,
    size: usize,
    sum: f32,
    rows: Vec<Vec<f32>>,
}

impl KernelReport {
    fn new(blur: &Blur) -> Self {
        let kernel = blur.kernel();
        Self {
            radius: blur.radius(),
            mode: format!("{:?}", blur.mode()).to_lowercase(),
            angle: blur.angle(),
            size: kernel.size(),
            sum: kernel.sum(),
            rows: kernel.rows().map(<[f32]>::to_vec).collect(),
        }
    }
}

/// Formats a kernel as a table with three decimals per cell.
fn format_table(kernel: &Kernel) -> String {
    let mut out = String::new();
    for row in kernel.rows() {
        let cells: Vec<String> = row.iter().map(|w| format!("{w:.3}")).collect();
        out.push_str(&cells.join(" "));
        out.push('\n');
    }
    out
}

pub fn run(args: KernelArgs) -> anyhow::Result<()> {
    let mut blur = Blur::new();
    blur.set_radius(args.radius);
    blur.set_mode(args.mode.into());
    blur.set_angle(args.angle);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&KernelReport::new(&blur))?);
        return Ok(());
    }

    let kernel = blur.kernel();
    println!(
        "{:?} kernel, radius {}, angle {:.1}°, {}x{}",
        blur.mode(),
        blur.radius(),
        blur.angle(),
        kernel.size(),
        kernel.size()
    );
    println!();
    print!("{}", format_table(kernel));
    Ok(())
}
