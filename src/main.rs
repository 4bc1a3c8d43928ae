use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    rootsmith::run().await
}
