//! `rummage ask` — answer a single question and exit.

pub async fn run(question: &str) -> Result<(), Box<dyn std::error::Error>> {
    let (runner, _events) = super::setup()?;

    let outcome = runner.run(question).await?;

    println!("{}", outcome.answer);
    println!();
    println!("Source: {}", outcome.source_label());
    Ok(())
}
