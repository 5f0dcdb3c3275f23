//! `prism [MODEL_PATH] [--options FILE]`: open the multi-viewport viewer.

use std::path::PathBuf;

use clap::Parser;
use prism::{options::Options, viewer::Viewer};

#[derive(Parser, Debug)]
#[command(name = "prism")]
#[command(about = "Multi-viewport glTF viewer with synchronized cameras")]
struct Args {
    /// glTF/GLB model to load instead of the configured `assets.model`
    model_path: Option<PathBuf>,

    /// TOML options file
    #[arg(long)]
    options: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let options = match &args.options {
        Some(path) => match Options::load(path) {
            Ok(options) => options,
            Err(e) => {
                log::error!("{}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => Options::default(),
    };

    let mut builder = Viewer::builder().with_options(options);
    if let Some(path) = args.model_path {
        builder = builder.with_model_path(path);
    }

    if let Err(e) = builder.build().run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn args(list: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("prism").chain(list.iter().copied()))
    }

    #[test]
    fn command_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn model_and_options_in_any_order() {
        let parsed = args(&["--options", "prism.toml", "robot.glb"]).unwrap();
        assert_eq!(parsed.model_path, Some(PathBuf::from("robot.glb")));
        assert_eq!(parsed.options, Some(PathBuf::from("prism.toml")));

        let parsed = args(&["robot.glb", "--options=prism.toml"]).unwrap();
        assert_eq!(parsed.model_path, Some(PathBuf::from("robot.glb")));
        assert_eq!(parsed.options, Some(PathBuf::from("prism.toml")));
    }

    #[test]
    fn no_arguments_uses_configuration() {
        let parsed = args(&[]).unwrap();
        assert!(parsed.model_path.is_none());
        assert!(parsed.options.is_none());
    }

    #[test]
    fn rejects_bad_input() {
        assert!(args(&["--options"]).is_err());
        assert!(args(&["--verbose"]).is_err());
        assert!(args(&["a.glb", "b.glb"]).is_err());
    }
}
