use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    tasktab::tui::run().await
}
