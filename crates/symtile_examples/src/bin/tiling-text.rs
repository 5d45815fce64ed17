use symtile::prelude::*;

fn main() -> anyhow::Result<()> {
    symtile_examples::init_tracing();

    let key = std::env::args().nth(1).unwrap_or_else(|| "Frieze/mg".to_owned());
    let tiling = builtin_by_key(&key)?;
    let text = tiling.to_text();
    print!("{text}");

    let back: Tiling = text.parse()?;
    anyhow::ensure!(
        back.basecells.len() == tiling.basecells.len(),
        "round trip lost base cells"
    );
    Ok(())
}
