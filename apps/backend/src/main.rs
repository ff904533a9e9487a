#[tokio::main]
async fn main() -> anyhow::Result<()> {
    flashback_backend::run().await
}
