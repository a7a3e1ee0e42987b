#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = elearning_portal::run().await {
        eprintln!("elearning-portal fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
