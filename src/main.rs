use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use raw2imd::capacity::CapacityCheck;
use raw2imd::disk_formats::{self, PRESETS};
use raw2imd::formats::imd::{self, ImdImage, ImdWriter};
use raw2imd::geometry::{Density, GeometryBuilder, MediaSize};
use raw2imd::materialize::{self, NullSink};
use raw2imd::{core, descriptor};
use std::fs::File;
use std::io::{BufReader, BufWriter, IsTerminal, Read};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "raw2imd", version, about = "Raw floppy image to ImageDisk converter")]
struct Cli {
    /// Log every track as it is written
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a raw sector dump into an .imd container
    Convert(ConvertArgs),
    /// List the tracks of an .imd container
    Display {
        input: PathBuf,
        /// Show a printable preview of every sector
        #[arg(long)]
        ascii: bool,
    },
    /// List the built-in geometry presets
    Presets,
}

#[derive(Args)]
struct ConvertArgs {
    /// Raw image to read
    input: PathBuf,
    /// Container to write; without it the image is only checked
    output: Option<PathBuf>,
    /// Start from a named preset (see `presets`)
    #[arg(long)]
    preset: Option<String>,
    /// Read the geometry from the descriptor in the last 128 bytes of the input
    #[arg(short, long)]
    probe: bool,
    /// Media size in inches (5 or 8)
    #[arg(long, value_parser = parse_media)]
    media: Option<MediaSize>,
    #[arg(short, long)]
    cylinders: Option<u32>,
    #[arg(long)]
    heads: Option<u32>,
    /// Sectors per track
    #[arg(short, long)]
    sectors: Option<u32>,
    /// Sector length in bytes
    #[arg(short, long)]
    length: Option<u32>,
    /// Double density (MFM); same as --density double
    #[arg(short, long, conflicts_with = "density")]
    mfm: bool,
    /// single, double or extended
    #[arg(long, value_parser = parse_density)]
    density: Option<Density>,
    /// Data rate in kbps, overriding the media default
    #[arg(long)]
    rate: Option<u32>,
    /// 0 continuation, 1 interlaced, 2 paired
    #[arg(long)]
    side_mode: Option<u32>,
    /// Number of the first sector on side 0
    #[arg(short, long)]
    offset: Option<u32>,
    /// Number of the first sector on side 1
    #[arg(long)]
    offset2: Option<u32>,
    /// Sector interleave for side 0; the sign picks the collision direction
    #[arg(short = 'k', long, allow_hyphen_values = true)]
    skew: Option<i32>,
    /// Sector interleave for side 1 (defaults to --skew)
    #[arg(long, allow_hyphen_values = true)]
    skew2: Option<i32>,
    /// Ignore extra data at the end of the input
    #[arg(short, long)]
    ignore: bool,
    /// Accept an input shorter than the geometry
    #[arg(short, long)]
    force: bool,
    /// Read comment text from stdin
    #[arg(short = 'C', long)]
    comment: bool,
    /// Use this text as the disk comment
    #[arg(short = 'T', long)]
    title: Option<String>,
}

fn parse_media(s: &str) -> Result<MediaSize, String> {
    let inches: u32 = s.trim_end_matches('"').parse().map_err(|e| format!("Invalid media size: {}", e))?;
    MediaSize::from_inches(inches).map_err(|e| e.to_string())
}

fn parse_density(s: &str) -> Result<Density, String> {
    match s.to_lowercase().as_str() {
        "single" | "sd" | "fm" => Ok(Density::Single),
        "double" | "dd" | "mfm" => Ok(Density::Double),
        "extended" | "hd" => Ok(Density::Extended),
        other => Err(format!("Unknown density: {}", other)),
    }
}

impl ConvertArgs {
    /// Geometry values given on the command line; these win over everything.
    fn overrides(&self) -> GeometryBuilder {
        GeometryBuilder {
            media: self.media,
            sector_length: self.length,
            sectors: self.sectors,
            heads: self.heads,
            cylinders: self.cylinders,
            density: if self.mfm { Some(Density::Double) } else { self.density },
            data_rate: self.rate,
            side_policy: self.side_mode,
            first_sector: self.offset,
            first_sector_other: self.offset2,
            skew: self.skew,
            skew_other: self.skew2,
        }
    }

    fn comment(&self) -> Result<String> {
        let mut text = None;
        if self.comment {
            let mut stdin = std::io::stdin();
            if stdin.is_terminal() {
                eprintln!("Enter comment, terminated by EOF");
            }
            let mut buf = String::new();
            stdin.read_to_string(&mut buf).context("read from stdin failed")?;
            text = Some(buf);
        }
        Ok(imd::disk_comment(self.title.as_deref(), text.as_deref()))
    }
}

fn convert(args: ConvertArgs) -> Result<()> {
    let mut builder = match &args.preset {
        Some(name) => disk_formats::find(name)
            .ok_or_else(|| anyhow!("Unknown preset: {}", name))?
            .builder(),
        None => GeometryBuilder::default(),
    };

    // Without probing, a bad geometry is reported before the input is opened.
    let mut source = None;
    if args.probe {
        let mut file = File::open(&args.input).with_context(|| format!("cannot open {}", args.input.display()))?;
        let probed = descriptor::probe(&mut file).with_context(|| format!("probing {}", args.input.display()))?;
        builder = builder.merge(probed);
        source = Some(file);
    }
    let geometry = builder.merge(args.overrides()).build()?;
    info!("geometry: {}", geometry);

    let file = match source {
        Some(file) => file,
        None => File::open(&args.input).with_context(|| format!("cannot open {}", args.input.display()))?,
    };
    let mut source = BufReader::new(file);
    let check = CapacityCheck { ignore_excess: args.ignore, force: args.force };

    match &args.output {
        Some(path) => {
            let comment = args.comment()?;
            // TODO: load an existing container first so its comment is kept
            let out = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
            let mut writer = ImdWriter::new(BufWriter::new(out), &comment)?;
            materialize::convert(&geometry, &mut source, args.probe, check, &mut writer)
                .with_context(|| format!("converting {}", args.input.display()))?;
            writer.finish()?;
            println!("Converted to {}", path.display());
        }
        None => {
            let tracks = materialize::convert(&geometry, &mut source, args.probe, check, &mut NullSink)
                .with_context(|| format!("checking {}", args.input.display()))?;
            println!("{}: {} tracks, no output written", args.input.display(), tracks);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Convert(args) => convert(args)?,
        Commands::Display { input, ascii } => {
            let data = std::fs::read(&input).with_context(|| format!("cannot read {}", input.display()))?;
            let image = ImdImage::parse(&data)?;
            println!("{}", core::display(&image, ascii));
        }
        Commands::Presets => {
            for preset in PRESETS {
                println!("{:<10} {} ({} bytes)", preset.name, preset.description, preset.total_size());
            }
        }
    }
    Ok(())
}
