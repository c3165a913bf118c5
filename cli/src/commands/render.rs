use anyhow::{bail, Result};
use nzatlas::write_svg;

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::RenderArgs) -> Result<()> {
    let out_path = &args.output.clone().unwrap_or("./atlas.svg".into());
    if out_path.exists() && !args.force {
        bail!("[render] {} already exists (use --force to overwrite)", out_path.display());
    }

    let config = super::load_config(cli)?;
    let controller = super::build_controller(config, &args.view)?;

    let state = controller.state();
    log::info!("[render] {} for {} -> {}", state.attribute, state.selection, out_path.display());
    write_svg(&controller, out_path)?;

    Ok(())
}
