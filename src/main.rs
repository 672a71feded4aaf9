#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    yogi_booking::run().await
}
