use anyhow::{Context, Result};

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::ViewArgs) -> Result<()> {
    let config = super::load_config(cli)?;
    let controller = super::build_controller(config, args)?;

    let output = serde_json::json!({
        "attribute": controller.state().attribute,
        "selection": controller.state().selection.to_string(),
        "boundaries": controller.state().mapping.boundaries(),
        "join": {
            "unmatched_geometries": controller.dataset().join_report().unmatched_geometries,
            "unmatched_records": controller.dataset().join_report().unmatched_records,
        },
        "views": controller.render_all(),
    });
    let text = serde_json::to_string_pretty(&output)
        .context("[inspect] failed to serialize views")?;
    println!("{text}");

    Ok(())
}
