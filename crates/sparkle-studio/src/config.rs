use std::path::PathBuf;

use anyhow::{Result, bail};
use log::LevelFilter;
use sparkle_paint::RasterConfig;
use sparkle_paint::logging::{LoggingConfig, WriteStyle};

pub const USAGE: &str = "\
usage: sparkle-studio <scene.json> [options]

options:
  -o, --output <path>   PNG to write (default: scene path with .png extension)
      --log <filter>    env_logger filter, e.g. \"debug\" or \"sparkle_paint=trace\"
  -q, --quiet           only log warnings and errors (unless --log or RUST_LOG is set)
      --no-color        disable ANSI colors in log output
      --sequential      paint rows on the calling thread only
  -h, --help            print this help
";

/// Studio configuration, assembled from the command line.
#[derive(Debug, Clone, Default)]
pub struct StudioConfig {
    pub scene: PathBuf,
    pub output: Option<PathBuf>,
    pub logging: LoggingConfig,
    pub raster: RasterConfig,
}

impl StudioConfig {
    /// Parses arguments (without the program name).
    ///
    /// Returns `Ok(None)` when help was requested.
    pub fn from_args<I>(args: I) -> Result<Option<Self>>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = StudioConfig::default();
        let mut scene = None;
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => return Ok(None),
                "-o" | "--output" => {
                    config.output = Some(PathBuf::from(value_for(&arg, args.next())?));
                }
                "--log" => config.logging.env_filter = Some(value_for(&arg, args.next())?),
                "-q" | "--quiet" => config.logging.fallback_level = LevelFilter::Warn,
                "--no-color" => config.logging.write_style = WriteStyle::Never,
                "--sequential" => config.raster.parallel = false,
                flag if flag.starts_with('-') => bail!("unknown option '{flag}'"),
                _ if scene.is_some() => bail!("unexpected argument '{arg}'"),
                _ => scene = Some(PathBuf::from(&arg)),
            }
        }

        let Some(scene) = scene else {
            bail!("missing scene file");
        };
        config.scene = scene;
        Ok(Some(config))
    }

    /// Output path, falling back to the scene path with a `.png` extension.
    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| self.scene.with_extension("png"))
    }
}

fn value_for(flag: &str, value: Option<String>) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => bail!("option '{flag}' needs a value"),
    }
}
