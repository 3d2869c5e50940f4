#[tokio::main]
async fn main() {
    exone_api::start_server().await;
}
