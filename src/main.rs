#[tokio::main]
async fn main() {
    scorebat_highlights_lib::run().await;
}
