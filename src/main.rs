#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::path::PathBuf;

use solstice::{Options, Viewer};

const USAGE: &str = "Usage: solstice [HDRI_PATH] [--preset PATH]";

/// Parsed command line.
struct Args {
    hdri: Option<PathBuf>,
    preset: Option<PathBuf>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args {
        hdri: None,
        preset: None,
    };
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--preset" => {
                let path = args
                    .next()
                    .ok_or_else(|| "--preset needs a path".to_owned())?;
                parsed.preset = Some(PathBuf::from(path));
            }
            "-h" | "--help" => return Err(USAGE.to_owned()),
            flag if flag.starts_with("--") => {
                return Err(format!("unknown flag {flag}\n{USAGE}"));
            }
            _ if parsed.hdri.is_none() => parsed.hdri = Some(PathBuf::from(arg)),
            _ => return Err(format!("unexpected argument {arg}\n{USAGE}")),
        }
    }
    Ok(parsed)
}

fn main() {
    env_logger::init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(2);
        }
    };

    let options = match args.preset.as_deref().map(Options::load) {
        Some(Ok(options)) => {
            if let Some(path) = &args.preset {
                log::info!("Loaded preset {}", path.display());
            }
            options
        }
        Some(Err(e)) => {
            log::error!("{e}");
            std::process::exit(1);
        }
        None => Options::default(),
    };

    let mut builder = Viewer::builder().with_options(options);
    if let Some(hdri) = args.hdri {
        builder = builder.with_hdri(hdri);
    } else {
        log::info!("no HDRI given, using the fallback environment");
    }

    if let Err(e) = builder.build().run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
