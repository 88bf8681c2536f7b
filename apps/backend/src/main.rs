#[tokio::main]
async fn main() -> anyhow::Result<()> {
    practice_tracker_backend::run().await
}
