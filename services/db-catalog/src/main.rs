#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    db_catalog::run().await
}
