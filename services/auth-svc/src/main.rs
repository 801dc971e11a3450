#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    auth_svc::run().await
}
