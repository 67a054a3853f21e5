#[tokio::main]
async fn main() -> anyhow::Result<()> {
    moodfocus_lib::run().await
}
