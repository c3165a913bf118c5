use anyhow::Result;
use nzatlas::AttributeId;

pub fn run(_cli: &crate::cli::Cli) -> Result<()> {
    for attribute in AttributeId::order() {
        println!("{:<12} {:<11} {}", attribute.to_str(), format!("{:?}", attribute.format_kind()), attribute.label());
    }
    Ok(())
}
