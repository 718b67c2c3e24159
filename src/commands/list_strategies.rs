use crate::strategy::StrategyKind;
use anyhow::Result;

pub fn render() -> String {
    let id_width = StrategyKind::ALL
        .iter()
        .map(|kind| kind.id().len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for kind in StrategyKind::ALL {
        out.push_str(&format!(
            "{:<id_width$}  {}: {}\n",
            kind.id(),
            kind.display_name(),
            kind.description(),
        ));
    }
    out
}

pub fn run() -> Result<()> {
    print!("{}", render());
    Ok(())
}
