#[tokio::main]
async fn main() -> anyhow::Result<()> {
    leaderboard::start_server().await
}
